//! Alert records produced by triage
//! Location: src/triage/alert.rs

use super::thresholds::Band;
use crate::simulation::reading::Reading;
use crate::simulation::session::SessionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use rand::Rng;
use uuid::{Builder, Uuid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(Uuid);

impl AlertId {
    pub fn new() -> Self {
        AlertId(Uuid::new_v4())
    }

    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        AlertId(Builder::from_random_bytes(rng.gen()).into_uuid())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        AlertId(uuid)
    }
}

impl Default for AlertId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Alert severity, ordered from least to most urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSeverity::Low => write!(f, "low"),
            AlertSeverity::Medium => write!(f, "medium"),
            AlertSeverity::High => write!(f, "high"),
            AlertSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Pointer back to the reading that raised or last escalated an alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingRef {
    pub reading_id: Uuid,
    pub session_id: SessionId,
    pub timestamp: DateTime<Utc>,
}

impl From<&Reading> for ReadingRef {
    fn from(reading: &Reading) -> Self {
        Self {
            reading_id: reading.id,
            session_id: reading.session_id,
            timestamp: reading.timestamp,
        }
    }
}

/// One out-of-band metric value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub metric: String,
    pub value: f64,
    pub band: Band,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.1} ({})", self.metric, self.value, self.band)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub patient_id: String,
    pub device_id: String,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub findings: Vec<Finding>,
    pub source_reading: ReadingRef,
    pub acknowledged: bool,
    pub resolved: bool,
    pub requires_acknowledgment: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub escalation_count: u32,
    /// Triage hits folded into this alert, including the first
    pub occurrences: u32,
}

impl Alert {
    pub fn is_open(&self) -> bool {
        !self.resolved
    }
}
