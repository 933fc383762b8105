//! VitalSim-Core: synthetic vital-sign device simulator with anomaly
//! injection and alert triage
//!
//! This library produces physiologically plausible readings for virtual
//! medical devices. It features:
//!
//! - Metric generation with Gaussian noise and on-demand anomaly injection
//! - Timer-driven device sessions with bounded per-device history
//! - Named clinical scenarios layered over device catalog defaults
//! - Alert triage with escalation, acknowledgment and resolution
//! - Lazy historical batches over past time windows
//! - Layered configuration (defaults, TOML, environment)
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vitalsim_core::config::SimulatorSettings;
//! use vitalsim_core::driver::{shared, SimulationDriver};
//! use vitalsim_core::simulation::SimulationRegistry;
//! use vitalsim_core::utils::SystemTimeProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = SimulatorSettings::default();
//!     let mut registry = SimulationRegistry::new(Arc::new(SystemTimeProvider), &settings)?;
//!
//!     registry.on_alert(|event, _| println!("{:?}", event.alert().severity));
//!     let config = registry.create_scenario("cardiac_arrhythmia", "patient-7")?;
//!     registry.start_simulation(config)?;
//!
//!     let registry = shared(registry);
//!     let driver = SimulationDriver::spawn(registry.clone(), &settings.driver)?;
//!     tokio::time::sleep(std::time::Duration::from_secs(30)).await;
//!     driver.shutdown().await;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod device;
#[cfg(feature = "runtime")]
pub mod driver;
pub mod error;
pub mod simulation;
pub mod telemetry;
pub mod triage;
pub mod utils;

// Re-export commonly used types for convenience
pub use device::{DeviceType, MetricSpec};
pub use error::{SimError, SimResult};

pub use simulation::{
    DeviceSimulationConfig, HistoricalReadings, Reading, ReadingQuality, Scenario,
    ScenarioLibrary, SessionId, SimulationEvent, SimulationRegistry, SimulationRequest,
    StopOutcome,
};

pub use triage::{Alert, AlertEvent, AlertId, AlertSeverity, AlertTriage};

pub use utils::{
    time::{MockTimeProvider, SystemTimeProvider, TimeProvider},
    validation::{ValidationError, ValidationResult},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "Synthetic vital-sign device simulator with anomaly injection and alert triage"
            .to_string(),
        features: vec![
            "Metric generation with anomaly injection".to_string(),
            "Timer-driven device sessions".to_string(),
            "Clinical scenario presets".to_string(),
            "Alert triage and escalation".to_string(),
            "Historical batch generation".to_string(),
        ],
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Library name
    pub name: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
    /// List of features
    pub features: Vec<String>,
}
