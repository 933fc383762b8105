//! Alert lifecycle: creation, escalation, acknowledgment, resolution
//! Location: src/triage/book.rs
//!
//! At most one open alert exists per (patient, device). Repeat hits of equal
//! or lower severity fold into it; a worse hit escalates it in place.

use super::alert::{Alert, AlertId, AlertSeverity};
use crate::error::{SimError, SimResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info, warn};

/// Change notification delivered to alert listeners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AlertEvent {
    Created(Alert),
    Escalated { alert: Alert, previous: AlertSeverity },
}

impl AlertEvent {
    pub fn alert(&self) -> &Alert {
        match self {
            AlertEvent::Created(alert) => alert,
            AlertEvent::Escalated { alert, .. } => alert,
        }
    }
}

#[derive(Debug, Default)]
pub struct AlertBook {
    alerts: Vec<Alert>,
    index: HashMap<AlertId, usize>,
    open: HashMap<(String, String), AlertId>,
}

impl AlertBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a fresh triage hit into the book; `at` stamps `updated_at`
    pub fn record(&mut self, mut alert: Alert, at: DateTime<Utc>) -> Option<AlertEvent> {
        let key = (alert.patient_id.clone(), alert.device_id.clone());

        if let Some(&open_id) = self.open.get(&key) {
            if let Some(&pos) = self.index.get(&open_id) {
                let existing = &mut self.alerts[pos];
                existing.occurrences += 1;
                existing.updated_at = at;

                if alert.severity <= existing.severity {
                    return None;
                }

                let previous = existing.severity;
                existing.severity = alert.severity;
                existing.title = alert.title;
                existing.message = alert.message;
                existing.findings = alert.findings;
                existing.source_reading = alert.source_reading;
                existing.requires_acknowledgment |= alert.requires_acknowledgment;
                existing.acknowledged = false;
                existing.escalation_count += 1;

                log_alert(existing, "ALERT ESCALATED");
                return Some(AlertEvent::Escalated {
                    alert: existing.clone(),
                    previous,
                });
            }
        }

        alert.updated_at = at;
        log_alert(&alert, "ALERT RAISED");
        self.open.insert(key, alert.id);
        self.index.insert(alert.id, self.alerts.len());
        self.alerts.push(alert.clone());
        Some(AlertEvent::Created(alert))
    }

    pub fn acknowledge(&mut self, id: AlertId, at: DateTime<Utc>) -> SimResult<()> {
        let alert = self.get_mut(id)?;
        if !alert.acknowledged {
            alert.acknowledged = true;
            alert.updated_at = at;
            info!(alert_id = %id, "Alert acknowledged");
        }
        Ok(())
    }

    /// Close an alert; resolving implies acknowledgment
    pub fn resolve(&mut self, id: AlertId, at: DateTime<Utc>) -> SimResult<()> {
        let alert = self.get_mut(id)?;
        if alert.resolved {
            return Ok(());
        }
        alert.resolved = true;
        alert.acknowledged = true;
        alert.updated_at = at;
        let key = (alert.patient_id.clone(), alert.device_id.clone());

        if self.open.get(&key) == Some(&id) {
            self.open.remove(&key);
        }
        info!(alert_id = %id, "Alert resolved");
        Ok(())
    }

    pub fn get(&self, id: AlertId) -> Option<&Alert> {
        self.index.get(&id).map(|&pos| &self.alerts[pos])
    }

    /// Every alert ever raised, oldest first
    pub fn all(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn open(&self) -> impl Iterator<Item = &Alert> + '_ {
        self.alerts.iter().filter(|a| a.is_open())
    }

    pub fn open_for(&self, patient_id: &str, device_id: &str) -> Option<&Alert> {
        self.open
            .get(&(patient_id.to_string(), device_id.to_string()))
            .and_then(|id| self.get(*id))
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Open alert count per severity
    pub fn summary(&self) -> HashMap<AlertSeverity, usize> {
        let mut summary = HashMap::new();
        for alert in self.open() {
            *summary.entry(alert.severity).or_insert(0) += 1;
        }
        summary
    }

    fn get_mut(&mut self, id: AlertId) -> SimResult<&mut Alert> {
        let pos = *self.index.get(&id).ok_or(SimError::AlertNotFound(id))?;
        Ok(&mut self.alerts[pos])
    }
}

fn log_alert(alert: &Alert, what: &str) {
    match alert.severity {
        AlertSeverity::Critical => error!(
            alert_id = %alert.id,
            patient_id = %alert.patient_id,
            device_id = %alert.device_id,
            severity = %alert.severity,
            "CRITICAL {}: {}", what, alert.title
        ),
        AlertSeverity::High | AlertSeverity::Medium => warn!(
            alert_id = %alert.id,
            patient_id = %alert.patient_id,
            severity = %alert.severity,
            "{}: {}", what, alert.title
        ),
        AlertSeverity::Low => info!(
            alert_id = %alert.id,
            "{}: {}", what, alert.title
        ),
    }
}
