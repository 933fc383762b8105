//! Named clinical presets layered over device catalog defaults
//! Location: src/simulation/scenario.rs

use super::config::DeviceSimulationConfig;
use crate::config::ScenarioSettings;
use crate::device::{default_metric_specs, metrics, DeviceType, MetricSpecs};
use crate::error::{SimError, SimResult};
use crate::utils::validation::validate_non_empty;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Registered scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    Normal,
    HypertensiveCrisis,
    HypoglycemicEpisode,
    CardiacArrhythmia,
    RespiratoryDistress,
}

/// Baseline/variability override for one metric
#[derive(Debug, Clone, Copy, PartialEq)]
struct MetricOverride {
    metric: &'static str,
    baseline: f64,
    variability: f64,
}

const fn over(metric: &'static str, baseline: f64, variability: f64) -> MetricOverride {
    MetricOverride {
        metric,
        baseline,
        variability,
    }
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::Normal,
        Scenario::HypertensiveCrisis,
        Scenario::HypoglycemicEpisode,
        Scenario::CardiacArrhythmia,
        Scenario::RespiratoryDistress,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Normal => "normal",
            Scenario::HypertensiveCrisis => "hypertensive_crisis",
            Scenario::HypoglycemicEpisode => "hypoglycemic_episode",
            Scenario::CardiacArrhythmia => "cardiac_arrhythmia",
            Scenario::RespiratoryDistress => "respiratory_distress",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Scenario::Normal => "Resting adult with all vitals inside normal bands",
            Scenario::HypertensiveCrisis => "Severely elevated blood pressure with compensatory tachycardia",
            Scenario::HypoglycemicEpisode => "Blood glucose falling below the safe threshold",
            Scenario::CardiacArrhythmia => "Fast, irregular heart rhythm with collapsed variability",
            Scenario::RespiratoryDistress => "Desaturation with rapid breathing",
        }
    }

    pub fn device_type(&self) -> DeviceType {
        match self {
            Scenario::Normal => DeviceType::VitalSignsMonitor,
            Scenario::HypertensiveCrisis => DeviceType::BloodPressureMonitor,
            Scenario::HypoglycemicEpisode => DeviceType::GlucoseMeter,
            Scenario::CardiacArrhythmia => DeviceType::HeartRateMonitor,
            Scenario::RespiratoryDistress => DeviceType::PulseOximeter,
        }
    }

    pub fn is_emergency(&self) -> bool {
        !matches!(self, Scenario::Normal)
    }

    fn overrides(&self) -> &'static [MetricOverride] {
        static HYPERTENSIVE: [MetricOverride; 3] = [
            over(metrics::BLOOD_PRESSURE_SYSTOLIC, 185.0, 0.06),
            over(metrics::BLOOD_PRESSURE_DIASTOLIC, 122.0, 0.06),
            over(metrics::HEART_RATE, 98.0, 0.08),
        ];
        static HYPOGLYCEMIC: [MetricOverride; 1] = [over(metrics::BLOOD_GLUCOSE, 52.0, 0.10)];
        static ARRHYTHMIA: [MetricOverride; 2] = [
            over(metrics::HEART_RATE, 135.0, 0.20),
            over(metrics::HEART_RATE_VARIABILITY, 15.0, 0.50),
        ];
        static RESPIRATORY: [MetricOverride; 3] = [
            over(metrics::OXYGEN_SATURATION, 87.0, 0.03),
            over(metrics::RESPIRATORY_RATE, 28.0, 0.12),
            over(metrics::HEART_RATE, 112.0, 0.08),
        ];

        match self {
            Scenario::Normal => &[],
            Scenario::HypertensiveCrisis => &HYPERTENSIVE,
            Scenario::HypoglycemicEpisode => &HYPOGLYCEMIC,
            Scenario::CardiacArrhythmia => &ARRHYTHMIA,
            Scenario::RespiratoryDistress => &RESPIRATORY,
        }
    }

    /// Device catalog defaults with this scenario's overrides applied
    pub fn metric_specs(&self) -> MetricSpecs {
        let mut specs = default_metric_specs(self.device_type());
        for o in self.overrides() {
            if let Some(spec) = specs.get_mut(o.metric) {
                spec.baseline = o.baseline;
                spec.variability = o.variability;
            }
        }
        specs
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Scenario::ALL
            .iter()
            .copied()
            .find(|scenario| scenario.name() == normalized)
            .ok_or_else(|| SimError::UnknownScenario(s.to_string()))
    }
}

/// Resolves scenario names into ready-to-start configurations
#[derive(Debug, Clone, Default)]
pub struct ScenarioLibrary {
    settings: ScenarioSettings,
}

impl ScenarioLibrary {
    pub fn new(settings: ScenarioSettings) -> Self {
        Self { settings }
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        Scenario::ALL.iter().map(|s| s.name())
    }

    pub fn anomaly_probability(&self, scenario: Scenario) -> f64 {
        if scenario.is_emergency() {
            self.settings.emergency_anomaly_probability
        } else {
            self.settings.normal_anomaly_probability
        }
    }

    /// Build the configuration for `name`; unknown names yield no config at all
    pub fn resolve(&self, name: &str, patient_id: &str) -> SimResult<DeviceSimulationConfig> {
        let scenario: Scenario = name.parse()?;
        validate_non_empty("patient_id", patient_id)?;

        let config = DeviceSimulationConfig {
            device_type: scenario.device_type(),
            device_id: None,
            patient_id: patient_id.to_string(),
            metric_specs: scenario.metric_specs(),
            anomaly_probability: self.anomaly_probability(scenario),
            tick_interval_seconds: self.settings.tick_interval_seconds,
            duration_seconds: self.settings.duration_seconds,
            scenario: Some(scenario.name().to_string()),
        };
        config.validate()?;
        Ok(config)
    }
}
