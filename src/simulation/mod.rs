// src/simulation/mod.rs
//! Virtual device simulation
//!
//! A [`SimulationRegistry`] owns every [`SimulationSession`]. Sessions tick on
//! a cooperative [`TimerQueue`]; each tick runs the [`MetricGenerator`] over
//! the device's metric specs and yields one [`Reading`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vitalsim_core::config::SimulatorSettings;
//! use vitalsim_core::simulation::{SimulationEvent, SimulationRegistry};
//! use vitalsim_core::utils::SystemTimeProvider;
//!
//! let mut registry = SimulationRegistry::new(Arc::new(SystemTimeProvider), &SimulatorSettings::default())?;
//! registry.subscribe(|event, _commands| {
//!     if let SimulationEvent::Reading(reading) = event {
//!         println!("{} {:?}", reading.device_id, reading.values);
//!     }
//! });
//! let config = registry.create_scenario("hypertensive_crisis", "patient-42")?;
//! registry.start_simulation(config)?;
//! registry.poll();
//! # Ok::<(), vitalsim_core::SimError>(())
//! ```

pub mod config;
pub mod generator;
pub mod historical;
pub mod history;
pub mod quality;
pub mod reading;
pub mod registry;
pub mod request;
pub mod scenario;
pub mod scheduler;
pub mod session;

pub use config::DeviceSimulationConfig;
pub use generator::{GeneratedValue, GeneratedValues, MetricGenerator, MetricSource};
pub use historical::HistoricalReadings;
pub use history::{HistoryBuffer, HistoryError};
pub use quality::ReadingQuality;
pub use reading::Reading;
pub use registry::{
    AlertCallback, Command, CommandSender, ReadingCallback, SimulationEvent, SimulationRegistry,
    StopOutcome, SubscriptionId,
};
pub use request::SimulationRequest;
pub use scenario::{Scenario, ScenarioLibrary};
pub use scheduler::{TimerEvent, TimerKind, TimerQueue};
pub use session::{SessionId, SessionStatus, SimulationSession, StopReason, TickOutcome};
