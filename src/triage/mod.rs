// src/triage/mod.rs
//! Alert triage: clinical bands, reading classification and alert lifecycle
//!
//! [`AlertTriage`] is stateless and only ever raises alerts. [`AlertBook`]
//! owns every alert and applies escalation, acknowledgment and resolution.

pub mod alert;
pub mod book;
pub mod classifier;
pub mod thresholds;

pub use alert::{Alert, AlertId, AlertSeverity, Finding, ReadingRef};
pub use book::{AlertBook, AlertEvent};
pub use classifier::AlertTriage;
pub use thresholds::{Band, BandClassifier, TriageThresholds};
