//! Device simulation session lifecycle
//! Location: src/simulation/session.rs

use super::config::DeviceSimulationConfig;
use super::generator::{MetricGenerator, MetricSource};
use super::quality::ReadingQuality;
use super::reading::Reading;
use crate::error::{SimError, SimResult};
use chrono::{DateTime, Duration, Utc};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::{Builder, Uuid};

/// Unique session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }

    /// Id drawn from `rng`, so seeded registries replay the same ids
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        SessionId(Builder::from_random_bytes(rng.gen()).into_uuid())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        SessionId(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a session left the running state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum StopReason {
    /// Explicit stop or stop-all
    Requested,
    /// Configured duration elapsed
    Completed,
    /// A tick failed; the session is not retried
    Fault(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "reason")]
pub enum SessionStatus {
    Running,
    Stopped(StopReason),
}

/// Result of a scheduler tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Emitted(Reading),
    /// Session not running, or the tick falls past the duration boundary
    Skipped,
}

/// A running or finished virtual device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSession {
    pub id: SessionId,
    pub device_id: String,
    pub config: DeviceSimulationConfig,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub stopped_at: Option<DateTime<Utc>>,
    pub readings_emitted: u64,
    pub last_tick_at: Option<DateTime<Utc>>,
}

impl SimulationSession {
    /// New running session; the config must already be validated
    pub fn new<R: Rng + ?Sized>(
        config: DeviceSimulationConfig,
        started_at: DateTime<Utc>,
        rng: &mut R,
    ) -> Self {
        let id = SessionId::from_rng(rng);
        let device_id = config.device_id.clone().unwrap_or_else(|| {
            let suffix = id.as_uuid().simple().to_string();
            format!("{}-{}", config.device_type, &suffix[..8])
        });

        Self {
            id,
            device_id,
            config,
            status: SessionStatus::Running,
            started_at,
            stopped_at: None,
            readings_emitted: 0,
            last_tick_at: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::seconds(i64::from(self.config.tick_interval_seconds))
    }

    /// Instant the configured duration runs out
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.config
            .duration_seconds
            .map(|seconds| self.started_at + Duration::seconds(seconds as i64))
    }

    /// Whether a tick at `at` still lies inside the duration
    pub fn within_duration(&self, at: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(expiry) => at <= expiry,
            None => true,
        }
    }

    /// Due time of the tick following one due at `due`, if it is inside the duration
    pub fn next_tick_after(&self, due: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let next = due + self.tick_interval();
        self.within_duration(next).then_some(next)
    }

    /// Generate one reading stamped with the scheduled tick time
    pub fn tick<R: RngCore>(&mut self, at: DateTime<Utc>, rng: &mut R) -> SimResult<TickOutcome> {
        self.tick_with(at, &MetricGenerator, rng)
    }

    /// [`tick`](Self::tick) with values taken from `source`
    pub fn tick_with(
        &mut self,
        at: DateTime<Utc>,
        source: &dyn MetricSource,
        rng: &mut dyn RngCore,
    ) -> SimResult<TickOutcome> {
        if !self.is_running() || !self.within_duration(at) {
            return Ok(TickOutcome::Skipped);
        }

        let generated = source.generate_all(
            &self.config.metric_specs,
            self.config.anomaly_probability,
            rng,
        );

        if let Some((name, value)) = generated.values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SimError::GeneratorFault(format!(
                "metric '{}' produced non-finite value {}",
                name, value
            )));
        }

        self.readings_emitted += 1;
        self.last_tick_at = Some(at);

        // Drawn from the session's source so seeded runs replay identical ids
        let id = Builder::from_random_bytes(rng.gen()).into_uuid();

        Ok(TickOutcome::Emitted(Reading {
            id,
            device_id: self.device_id.clone(),
            session_id: self.id,
            patient_id: self.config.patient_id.clone(),
            device_type: self.config.device_type,
            sequence: self.readings_emitted,
            timestamp: at,
            quality: ReadingQuality::assess(generated.anomalous_metrics.len()),
            anomaly: generated.any_anomaly(),
            anomalous_metrics: generated.anomalous_metrics,
            values: generated.values,
        }))
    }

    /// Transition to stopped; false when already stopped
    pub fn stop(&mut self, reason: StopReason, at: DateTime<Utc>) -> bool {
        if !self.is_running() {
            return false;
        }
        self.status = SessionStatus::Stopped(reason);
        self.stopped_at = Some(at);
        true
    }
}
