// src/config/constants.rs
//! System-wide configuration constants

/// Configuration-surface limits enforced at the boundary
pub mod limits {
    pub const MIN_DURATION_MINUTES: u32 = 1;
    pub const MAX_DURATION_MINUTES: u32 = 1440;
    pub const MIN_TICK_INTERVAL_SECONDS: u32 = 1;
    pub const MAX_TICK_INTERVAL_SECONDS: u32 = 3600;
    pub const MIN_PROBABILITY: f64 = 0.0;
    pub const MAX_PROBABILITY: f64 = 1.0;

    // Core sessions take seconds; the upper bound matches 1440 minutes.
    pub const MIN_DURATION_SECONDS: u64 = 1;
    pub const MAX_DURATION_SECONDS: u64 = MAX_DURATION_MINUTES as u64 * 60;

    pub const MIN_HISTORICAL_INTERVAL_MINUTES: u32 = 1;
    pub const MAX_HISTORICAL_INTERVAL_MINUTES: u32 = 1440;
}

/// Metric generation constants
pub mod generator {
    /// Normal draws are truncated to this many standard deviations
    pub const NORMAL_SIGMA_CLAMP: f64 = 3.0;
    pub const ANOMALY_SIGMA_MIN: f64 = 2.0;
    pub const ANOMALY_SIGMA_MAX: f64 = 4.0;
    /// Variability used for anomaly displacement when a metric is configured flatter
    pub const MIN_ANOMALY_VARIABILITY: f64 = 0.05;
    pub const DEFAULT_METRIC_FLOOR: f64 = 0.0;
}

/// Registry and history retention
pub mod registry {
    pub const DEFAULT_HISTORY_CAPACITY: usize = 100;
    pub const DEFAULT_RETIRED_SESSION_CAPACITY: usize = 256;
    pub const MAX_HISTORY_CAPACITY: usize = 100_000;
}

/// Scenario presets. Hand-picked for demos, not validated clinical values.
pub mod scenario {
    pub const DEFAULT_EMERGENCY_ANOMALY_PROBABILITY: f64 = 0.8;
    pub const DEFAULT_NORMAL_ANOMALY_PROBABILITY: f64 = 0.03;
    pub const MIN_NORMAL_ANOMALY_PROBABILITY: f64 = 0.02;
    pub const MAX_NORMAL_ANOMALY_PROBABILITY: f64 = 0.05;
    pub const DEFAULT_TICK_INTERVAL_SECONDS: u32 = 5;
    pub const DEFAULT_DURATION_SECONDS: u64 = 600;
}

/// Historical batch generation
pub mod historical {
    pub const DEFAULT_INTERVAL_MINUTES: u32 = 15;
}

/// Async driver cadence
pub mod driver {
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;
    pub const MIN_POLL_INTERVAL_MS: u64 = 1;
    pub const MAX_POLL_INTERVAL_MS: u64 = 60_000;
}

/// Logging defaults
pub mod logging {
    pub const DEFAULT_FILTER: &str = "info";
}

/// Clinical triage bands
pub mod triage {
    pub const HEART_RATE_NORMAL_MIN: f64 = 60.0;
    pub const HEART_RATE_NORMAL_MAX: f64 = 100.0;
    pub const HEART_RATE_CRITICAL_LOW: f64 = 50.0;
    pub const HEART_RATE_CRITICAL_HIGH: f64 = 120.0;

    pub const OXYGEN_SATURATION_NORMAL_MIN: f64 = 95.0;
    pub const OXYGEN_SATURATION_CRITICAL_LOW: f64 = 90.0;

    pub const TEMPERATURE_NORMAL_MIN: f64 = 36.1;
    pub const TEMPERATURE_NORMAL_MAX: f64 = 37.2;
    pub const TEMPERATURE_CRITICAL_HIGH: f64 = 38.5;

    pub const SYSTOLIC_WARNING_MIN: f64 = 120.0;
    pub const SYSTOLIC_CRITICAL_MIN: f64 = 140.0;

    pub const RESPIRATORY_RATE_NORMAL_MIN: f64 = 12.0;
    pub const RESPIRATORY_RATE_NORMAL_MAX: f64 = 20.0;
    pub const RESPIRATORY_RATE_CRITICAL_LOW: f64 = 10.0;
    pub const RESPIRATORY_RATE_CRITICAL_HIGH: f64 = 24.0;

    pub const BLOOD_GLUCOSE_NORMAL_MIN: f64 = 70.0;
    pub const BLOOD_GLUCOSE_NORMAL_MAX: f64 = 140.0;
    pub const BLOOD_GLUCOSE_CRITICAL_LOW: f64 = 54.0;
    pub const BLOOD_GLUCOSE_CRITICAL_HIGH: f64 = 250.0;
}

/// Configuration file locations
pub mod paths {
    pub const CONFIG_FILE_NAME: &str = "vitalsim.toml";
    pub const CONFIG_DIR: &str = "config";
    pub const ENV_PREFIX: &str = "VITALSIM";
    pub const ENV_SEPARATOR: &str = "__";
}
