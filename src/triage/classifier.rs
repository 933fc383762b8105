//! Stateless reading classifier
//! Location: src/triage/classifier.rs

use super::alert::{Alert, AlertId, AlertSeverity, Finding, ReadingRef};
use super::thresholds::{Band, TriageThresholds};
use crate::simulation::reading::Reading;

#[derive(Debug, Clone, Default)]
pub struct AlertTriage {
    thresholds: TriageThresholds,
}

impl AlertTriage {
    pub fn new(thresholds: TriageThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &TriageThresholds {
        &self.thresholds
    }

    /// Out-of-band triaged metrics, worst first
    pub fn findings(&self, reading: &Reading) -> Vec<Finding> {
        let mut findings: Vec<Finding> = reading
            .values
            .iter()
            .filter_map(|(metric, &value)| {
                let band = self.thresholds.classify(metric, value)?;
                (band != Band::Normal).then(|| Finding {
                    metric: metric.clone(),
                    value,
                    band,
                })
            })
            .collect();
        findings.sort_by(|a, b| b.band.cmp(&a.band));
        findings
    }

    /// Severity implied by a set of findings and the reading's anomaly flag
    pub fn severity(findings: &[Finding], anomalous: bool) -> Option<AlertSeverity> {
        let warnings = findings.iter().filter(|f| f.band == Band::Warning).count();

        if findings.iter().any(|f| f.band == Band::Critical) {
            Some(AlertSeverity::Critical)
        } else if warnings >= 2 {
            Some(AlertSeverity::High)
        } else if warnings == 1 {
            Some(AlertSeverity::Medium)
        } else if anomalous {
            Some(AlertSeverity::Low)
        } else {
            None
        }
    }

    /// Classify one reading; never resolves anything.
    /// The alert id is random; the registry reassigns it from its seeded source.
    pub fn evaluate(&self, reading: &Reading) -> Option<Alert> {
        let findings = self.findings(reading);
        let severity = Self::severity(&findings, reading.anomaly)?;

        let (title, message) = match findings.first() {
            Some(worst) => {
                let detail = findings
                    .iter()
                    .map(|f| f.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                (
                    format!("{} {}", humanize(&worst.metric), worst.band),
                    format!("Patient {} on {}: {}", reading.patient_id, reading.device_id, detail),
                )
            }
            None => (
                "Anomalous reading".to_string(),
                format!(
                    "Patient {} on {}: anomalous {}",
                    reading.patient_id,
                    reading.device_id,
                    reading.anomalous_metrics.join(", ")
                ),
            ),
        };

        Some(Alert {
            id: AlertId::new(),
            patient_id: reading.patient_id.clone(),
            device_id: reading.device_id.clone(),
            severity,
            title,
            message,
            findings,
            source_reading: ReadingRef::from(reading),
            acknowledged: false,
            resolved: false,
            requires_acknowledgment: severity == AlertSeverity::Critical,
            created_at: reading.timestamp,
            updated_at: reading.timestamp,
            escalation_count: 0,
            occurrences: 1,
        })
    }
}

fn humanize(metric: &str) -> String {
    let spaced = metric.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
