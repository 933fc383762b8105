// src/error.rs
//! Unified error handling for VitalSim Core
//!
//! Every fallible operation in the crate returns [`SimResult`]. Configuration
//! problems are reported synchronously to the caller that supplied them;
//! runtime tick failures never reach callers and are instead reported to
//! subscribers as a terminal session status.

use crate::config::ConfigError;
use crate::simulation::session::SessionId;
use crate::triage::alert::AlertId;
use crate::utils::validation::ValidationError;
use thiserror::Error;

/// Unified error type for the simulator
#[derive(Debug, Clone, Error)]
pub enum SimError {
    /// Out-of-range duration, frequency, probability or metric parameter
    #[error("[CONFIG] Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// Scenario name is not registered in the scenario library
    #[error("[SCENARIO] Unknown scenario '{0}'")]
    UnknownScenario(String),

    /// No live or retired session carries this id
    #[error("[SESSION] Session {0} not found")]
    SessionNotFound(SessionId),

    /// No alert carries this id
    #[error("[ALERT] Alert {0} not found")]
    AlertNotFound(AlertId),

    /// Internal invariant violation inside metric generation
    #[error("[GENERATOR] Generator fault: {0}")]
    GeneratorFault(String),

    /// Settings could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for simulator operations
pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    /// Shorthand for an [`SimError::InvalidConfiguration`]
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SimError::InvalidConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error originates from caller-supplied configuration
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SimError::InvalidConfiguration { .. } | SimError::UnknownScenario(_) | SimError::Config(_)
        )
    }
}

impl From<ValidationError> for SimError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::OutOfRange { ref field, .. }
            | ValidationError::NotFinite { ref field, .. }
            | ValidationError::Empty { ref field } => SimError::InvalidConfiguration {
                field: field.clone(),
                reason: err.to_string(),
            },
        }
    }
}
