//! Physiological value generation with anomaly injection
//! Location: src/simulation/generator.rs

use crate::config::constants::generator::{
    ANOMALY_SIGMA_MAX, ANOMALY_SIGMA_MIN, MIN_ANOMALY_VARIABILITY, NORMAL_SIGMA_CLAMP,
};
use crate::device::{MetricSpec, MetricSpecs};
use rand::{Rng, RngCore};
use std::collections::BTreeMap;

/// One generated metric value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratedValue {
    pub value: f64,
    pub is_anomaly: bool,
}

/// All metric values for one tick
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeneratedValues {
    pub values: BTreeMap<String, f64>,
    pub anomalous_metrics: Vec<String>,
}

impl GeneratedValues {
    pub fn any_anomaly(&self) -> bool {
        !self.anomalous_metrics.is_empty()
    }
}

/// Stateless metric generator; randomness comes from the caller's source
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricGenerator;

impl MetricGenerator {
    /// Draw one value for `spec`
    pub fn generate<R: Rng + ?Sized>(
        spec: &MetricSpec,
        anomaly_probability: f64,
        rng: &mut R,
    ) -> GeneratedValue {
        let probability = sanitize_fraction(anomaly_probability);
        let variability = sanitize_fraction(spec.variability);

        let roll: f64 = rng.gen();
        let is_anomaly = roll < probability;

        let candidate = if is_anomaly {
            let spread = spec.baseline.abs() * variability.max(MIN_ANOMALY_VARIABILITY);
            let sigmas = rng.gen_range(ANOMALY_SIGMA_MIN..=ANOMALY_SIGMA_MAX);
            let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            spec.baseline + direction * sigmas * spread
        } else {
            let z = box_muller(rng).clamp(-NORMAL_SIGMA_CLAMP, NORMAL_SIGMA_CLAMP);
            spec.baseline + spec.baseline * variability * z
        };

        GeneratedValue {
            value: clamp_to_spec(spec, candidate),
            is_anomaly,
        }
    }

    /// Run the generator over every metric in name order
    pub fn generate_all<R: Rng + ?Sized>(
        specs: &MetricSpecs,
        anomaly_probability: f64,
        rng: &mut R,
    ) -> GeneratedValues {
        let mut generated = GeneratedValues::default();

        for (name, spec) in specs {
            let sample = Self::generate(spec, anomaly_probability, rng);
            if sample.is_anomaly {
                generated.anomalous_metrics.push(name.clone());
            }
            generated.values.insert(name.clone(), sample.value);
        }

        generated
    }
}

/// Produces the metric values of one tick.
///
/// Sessions use [`MetricGenerator`]; other sources replay recorded data or
/// exercise fault handling.
pub trait MetricSource: Send {
    fn generate_all(
        &self,
        specs: &MetricSpecs,
        anomaly_probability: f64,
        rng: &mut dyn RngCore,
    ) -> GeneratedValues;
}

impl MetricSource for MetricGenerator {
    fn generate_all(
        &self,
        specs: &MetricSpecs,
        anomaly_probability: f64,
        rng: &mut dyn RngCore,
    ) -> GeneratedValues {
        MetricGenerator::generate_all(specs, anomaly_probability, rng)
    }
}

/// Standard-normal draw via the Box-Muller transform
fn box_muller<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // u1 in (0, 1] keeps ln() finite
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

fn sanitize_fraction(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn clamp_to_spec(spec: &MetricSpec, candidate: f64) -> f64 {
    let floor = if spec.floor.is_finite() { spec.floor } else { 0.0 };
    let fallback = if spec.baseline.is_finite() { spec.baseline } else { floor };
    let value = if candidate.is_finite() { candidate } else { fallback };

    let value = value.max(floor);
    match spec.ceiling {
        Some(ceiling) if ceiling.is_finite() && ceiling >= floor => value.min(ceiling),
        _ => value,
    }
}
