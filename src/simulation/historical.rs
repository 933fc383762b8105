//! Non-realtime batch of readings over a past time window
//! Location: src/simulation/historical.rs

use super::config::DeviceSimulationConfig;
use super::reading::Reading;
use super::session::{SessionId, SimulationSession, TickOutcome};
use crate::config::constants::limits;
use crate::error::{SimError, SimResult};
use crate::utils::validation::validate_range;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;

/// Lazy, restartable sequence of readings stamped `start, start + step, ...`
/// over the half-open window `[start, end)`.
///
/// All readings share one batch session id. Cloning yields an independent
/// cursor at the same position.
#[derive(Debug, Clone)]
pub struct HistoricalReadings {
    template: SimulationSession,
    session: SimulationSession,
    seed: u64,
    initial_rng: StdRng,
    rng: StdRng,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
    next_index: u32,
    total: u32,
}

impl HistoricalReadings {
    pub fn new(
        mut config: DeviceSimulationConfig,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval_minutes: u32,
        seed: u64,
    ) -> SimResult<Self> {
        if end <= start {
            return Err(SimError::invalid(
                "end",
                format!("window end {} must be after start {}", end, start),
            ));
        }
        validate_range(
            "interval_minutes",
            interval_minutes,
            limits::MIN_HISTORICAL_INTERVAL_MINUTES,
            limits::MAX_HISTORICAL_INTERVAL_MINUTES,
        )?;

        // The batch steps itself; the session only needs an open-ended duration
        config.duration_seconds = None;
        config.tick_interval_seconds = interval_minutes * 60;

        let step = Duration::minutes(i64::from(interval_minutes));
        let window_ms = (end - start).num_milliseconds();
        let step_ms = step.num_milliseconds();
        let total = u32::try_from((window_ms + step_ms - 1) / step_ms).map_err(|_| {
            SimError::invalid("end", "window holds too many readings for one batch")
        })?;

        let mut rng = StdRng::seed_from_u64(seed);
        let template = SimulationSession::new(config, start, &mut rng);
        Ok(Self {
            session: template.clone(),
            template,
            seed,
            initial_rng: rng.clone(),
            rng,
            start,
            end,
            step,
            next_index: 0,
            total,
        })
    }

    /// Rewind to the first reading; the replay is identical
    pub fn restart(&mut self) {
        self.session = self.template.clone();
        self.rng = self.initial_rng.clone();
        self.next_index = 0;
    }

    pub fn session_id(&self) -> SessionId {
        self.template.id
    }

    pub fn device_id(&self) -> &str {
        &self.template.device_id
    }

    pub fn window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start, self.end)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Timestamp of the reading at `index`
    pub fn timestamp_at(&self, index: u32) -> DateTime<Utc> {
        self.start + Duration::milliseconds(self.step.num_milliseconds() * i64::from(index))
    }
}

impl Iterator for HistoricalReadings {
    type Item = Reading;

    fn next(&mut self) -> Option<Reading> {
        if self.next_index >= self.total {
            return None;
        }
        let at = self.timestamp_at(self.next_index);
        self.next_index += 1;

        match self.session.tick(at, &mut self.rng) {
            Ok(TickOutcome::Emitted(reading)) => Some(reading),
            Ok(TickOutcome::Skipped) => None,
            Err(e) => {
                warn!(session_id = %self.template.id, error = %e, "Historical batch ended early");
                self.next_index = self.total;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total - self.next_index) as usize;
        (0, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceType;
    use chrono::TimeZone;

    fn config() -> DeviceSimulationConfig {
        DeviceSimulationConfig::new(DeviceType::VitalSignsMonitor, "patient-h", 60)
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_hour_at_fifteen_minutes_yields_four() {
        let batch =
            HistoricalReadings::new(config(), start(), start() + Duration::minutes(60), 15, 1).unwrap();
        let readings: Vec<_> = batch.collect();

        assert_eq!(readings.len(), 4);
        assert_eq!(readings[0].timestamp, start());
        for pair in readings.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::minutes(15));
        }
        assert!(readings.iter().all(|r| r.timestamp < start() + Duration::minutes(60)));
    }

    #[test]
    fn test_partial_step_counts_started_slot() {
        let batch =
            HistoricalReadings::new(config(), start(), start() + Duration::minutes(61), 15, 1).unwrap();
        assert_eq!(batch.count(), 5);
    }

    #[test]
    fn test_restart_replays_identically() {
        let mut batch =
            HistoricalReadings::new(config(), start(), start() + Duration::hours(2), 10, 42).unwrap();
        let first: Vec<_> = batch.by_ref().collect();
        batch.restart();
        let second: Vec<_> = batch.collect();

        assert_eq!(first, second);
        assert!(first.iter().all(|r| r.session_id == first[0].session_id));
    }

    #[test]
    fn test_invalid_windows_rejected() {
        assert!(HistoricalReadings::new(config(), start(), start(), 15, 0).is_err());
        assert!(
            HistoricalReadings::new(config(), start(), start() - Duration::minutes(5), 15, 0).is_err()
        );
        assert!(
            HistoricalReadings::new(config(), start(), start() + Duration::hours(1), 0, 0).is_err()
        );
        assert!(
            HistoricalReadings::new(config(), start(), start() + Duration::hours(1), 1441, 0).is_err()
        );
    }

    #[test]
    fn test_long_window_timestamps_keep_increasing() {
        let end = start() + Duration::days(365 * 5000);
        let batch = HistoricalReadings::new(config(), start(), end, 1, 3).unwrap();

        let total = batch.size_hint().1.unwrap() as u32;
        assert!(total > i32::MAX as u32);

        let before = batch.timestamp_at(i32::MAX as u32);
        let after = batch.timestamp_at(i32::MAX as u32 + 1);
        assert_eq!(after - before, Duration::minutes(1));
        assert!(batch.timestamp_at(total - 1) < end);
        assert!(batch.timestamp_at(total - 1) > before);
    }
}
