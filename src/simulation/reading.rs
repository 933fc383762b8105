//! Timestamped snapshot of every simulated metric of one device
//! Location: src/simulation/reading.rs

use super::quality::ReadingQuality;
use super::session::SessionId;
use crate::device::DeviceType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One reading; immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: Uuid,
    pub device_id: String,
    pub session_id: SessionId,
    pub patient_id: String,
    pub device_type: DeviceType,
    /// Position within the owning session, starting at 1
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub values: BTreeMap<String, f64>,
    pub quality: ReadingQuality,
    pub anomaly: bool,
    #[serde(default)]
    pub anomalous_metrics: Vec<String>,
}

impl Reading {
    pub fn value(&self, metric: &str) -> Option<f64> {
        self.values.get(metric).copied()
    }
}
