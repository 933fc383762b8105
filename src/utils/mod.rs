//! Common utility functions for VitalSim Core
//!
//! - Clock abstraction with a mock provider for deterministic tests
//! - Range and finiteness validation helpers
//!
//! Limits used by callers live in `config::constants`.

pub mod time;
pub mod validation;

pub use time::{MockTimeProvider, SystemTimeProvider, TimeProvider};

pub use validation::{
    validate_finite, validate_fraction, validate_non_empty, validate_range, ValidationError,
    ValidationResult,
};
