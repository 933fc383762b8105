// src/device/mod.rs
//! Virtual device descriptions: kinds, metric specs and catalog defaults

pub mod catalog;
pub mod types;

pub use catalog::{default_metric_specs, MetricSpecs};
pub use types::{metrics, DeviceType, MetricSpec};
