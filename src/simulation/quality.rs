//! Reading quality heuristic
//! Location: src/simulation/quality.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Signal quality attached to every reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingQuality {
    Good,
    Degraded,
    Poor,
}

impl ReadingQuality {
    /// No anomalous metric is good, one is degraded, several at once is poor
    pub fn assess(anomalous_metric_count: usize) -> Self {
        match anomalous_metric_count {
            0 => ReadingQuality::Good,
            1 => ReadingQuality::Degraded,
            _ => ReadingQuality::Poor,
        }
    }
}

impl fmt::Display for ReadingQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingQuality::Good => write!(f, "good"),
            ReadingQuality::Degraded => write!(f, "degraded"),
            ReadingQuality::Poor => write!(f, "poor"),
        }
    }
}
