//! Simulation registry: owns every session, drives their timers and fans
//! readings and alerts out to listeners
//! Location: src/simulation/registry.rs
//!
//! All mutation happens on the caller's thread inside registry methods.
//! Listener callbacks never see the registry itself; they queue
//! [`Command`]s through a [`CommandSender`], and queued commands are applied
//! once the event being dispatched has reached every listener.

use super::config::DeviceSimulationConfig;
use super::generator::{MetricGenerator, MetricSource};
use super::historical::HistoricalReadings;
use super::history::HistoryBuffer;
use super::reading::Reading;
use super::scenario::ScenarioLibrary;
use super::scheduler::{TimerKind, TimerQueue};
use super::session::{SessionId, SimulationSession, StopReason, TickOutcome};
use crate::config::{ConfigError, RegistrySettings, SimulatorSettings};
use crate::device::DeviceType;
use crate::error::{SimError, SimResult};
use crate::triage::{Alert, AlertBook, AlertEvent, AlertId, AlertSeverity, AlertTriage};
use crate::utils::time::TimeProvider;
use chrono::{DateTime, Utc};
use crossbeam::channel::{unbounded, Receiver, Sender};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Event delivered to reading subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimulationEvent {
    Reading(Reading),
    SessionStopped {
        session_id: SessionId,
        reason: StopReason,
    },
}

/// Result of a stop request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    AlreadyStopped,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Registry mutation requested from inside a callback
#[derive(Debug, Clone)]
pub enum Command {
    Start(Box<DeviceSimulationConfig>),
    Stop(SessionId),
    StopAll,
}

/// Cloneable handle for queueing registry commands
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: Sender<Command>,
}

impl CommandSender {
    /// Queue a command; false once the registry is gone
    pub fn send(&self, command: Command) -> bool {
        self.tx.send(command).is_ok()
    }

    pub fn start(&self, config: DeviceSimulationConfig) -> bool {
        self.send(Command::Start(Box::new(config)))
    }

    pub fn stop(&self, session_id: SessionId) -> bool {
        self.send(Command::Stop(session_id))
    }

    pub fn stop_all(&self) -> bool {
        self.send(Command::StopAll)
    }
}

pub type ReadingCallback = Box<dyn FnMut(&SimulationEvent, &CommandSender) + Send>;
pub type AlertCallback = Box<dyn FnMut(&AlertEvent, &CommandSender) + Send>;

pub struct SimulationRegistry {
    clock: Arc<dyn TimeProvider>,
    rng: StdRng,
    source: Box<dyn MetricSource>,
    settings: RegistrySettings,
    historical_interval_minutes: u32,
    historical_anomaly_probability: f64,
    scenarios: ScenarioLibrary,
    triage: AlertTriage,
    alerts: AlertBook,
    sessions: HashMap<SessionId, SimulationSession>,
    retired: VecDeque<SimulationSession>,
    timers: TimerQueue,
    histories: HashMap<String, HistoryBuffer<Reading>>,
    subscribers: Vec<(SubscriptionId, ReadingCallback)>,
    alert_listeners: Vec<(SubscriptionId, AlertCallback)>,
    next_subscription: u64,
    commander: CommandSender,
    commands: Receiver<Command>,
}

impl SimulationRegistry {
    /// Registry seeded from `settings.registry.rng_seed`, or from entropy
    pub fn new(clock: Arc<dyn TimeProvider>, settings: &SimulatorSettings) -> SimResult<Self> {
        let rng = match settings.registry.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(clock, settings, rng)
    }

    pub fn with_rng(
        clock: Arc<dyn TimeProvider>,
        settings: &SimulatorSettings,
        rng: StdRng,
    ) -> SimResult<Self> {
        settings
            .validate()
            .map_err(|errors| SimError::Config(ConfigError::ValidationError(errors)))?;

        let (tx, rx) = unbounded();
        Ok(Self {
            clock,
            rng,
            source: Box::new(MetricGenerator),
            settings: settings.registry.clone(),
            historical_interval_minutes: settings.historical.interval_minutes,
            historical_anomaly_probability: settings.scenarios.normal_anomaly_probability,
            scenarios: ScenarioLibrary::new(settings.scenarios.clone()),
            triage: AlertTriage::new(settings.triage.clone()),
            alerts: AlertBook::new(),
            sessions: HashMap::new(),
            retired: VecDeque::new(),
            timers: TimerQueue::new(),
            histories: HashMap::new(),
            subscribers: Vec::new(),
            alert_listeners: Vec::new(),
            next_subscription: 0,
            commander: CommandSender { tx },
            commands: rx,
        })
    }

    /// Replace the generator feeding every session tick
    pub fn with_metric_source<S: MetricSource + 'static>(mut self, source: S) -> Self {
        self.source = Box::new(source);
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn command_sender(&self) -> CommandSender {
        self.commander.clone()
    }

    // ---------------------------------------------------------------------
    // Session lifecycle
    // ---------------------------------------------------------------------

    /// Validate `config` and schedule its first tick one interval from now
    #[instrument(skip(self, config), fields(device_type = %config.device_type, patient_id = %config.patient_id))]
    pub fn start_simulation(&mut self, config: DeviceSimulationConfig) -> SimResult<SessionId> {
        let id = self.start_session(config)?;
        self.drain_commands();
        Ok(id)
    }

    /// Config for a named scenario under the loaded scenario settings.
    /// Nothing is started; pass the result to [`start_simulation`](Self::start_simulation).
    pub fn create_scenario(&self, name: &str, patient_id: &str) -> SimResult<DeviceSimulationConfig> {
        self.scenarios.resolve(name, patient_id)
    }

    #[instrument(skip(self))]
    pub fn stop_simulation(&mut self, session_id: SessionId) -> StopOutcome {
        let outcome = self.stop_session(session_id);
        self.drain_commands();
        outcome
    }

    /// Stop every running session; returns how many were stopped
    #[instrument(skip(self))]
    pub fn stop_all(&mut self) -> usize {
        let stopped = self.stop_all_sessions();
        self.drain_commands();
        stopped
    }

    /// Snapshot of a live or recently retired session
    pub fn get_status(&self, session_id: SessionId) -> SimResult<SimulationSession> {
        self.sessions
            .get(&session_id)
            .or_else(|| self.retired.iter().rev().find(|s| s.id == session_id))
            .cloned()
            .ok_or(SimError::SessionNotFound(session_id))
    }

    /// Running sessions in start order
    pub fn active_sessions(&self) -> Vec<&SimulationSession> {
        let mut active: Vec<_> = self.sessions.values().collect();
        active.sort_by(|a, b| a.started_at.cmp(&b.started_at).then(a.device_id.cmp(&b.device_id)));
        active
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    // ---------------------------------------------------------------------
    // Scheduling
    // ---------------------------------------------------------------------

    /// Fire every timer due at or before the clock's current time.
    /// Returns the number of readings emitted.
    pub fn poll(&mut self) -> usize {
        let now = self.clock.now();
        let mut emitted = 0;

        self.drain_commands();
        while let Some(event) = self.timers.pop_due(now) {
            match event.kind {
                TimerKind::Tick => {
                    if self.fire_tick(event.session_id, event.due) {
                        emitted += 1;
                    }
                }
                TimerKind::Expire => {
                    if self.finish(event.session_id, StopReason::Completed, event.due) {
                        info!(session_id = %event.session_id, "Simulation completed");
                    }
                }
            }
            self.drain_commands();
        }

        emitted
    }

    /// Due time of the earliest pending timer
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.timers.next_due()
    }

    // ---------------------------------------------------------------------
    // Subscriptions
    // ---------------------------------------------------------------------

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&SimulationEvent, &CommandSender) + Send + 'static,
    {
        let id = self.next_subscription_id();
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn on_alert<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&AlertEvent, &CommandSender) + Send + 'static,
    {
        let id = self.next_subscription_id();
        self.alert_listeners.push((id, Box::new(callback)));
        id
    }

    /// Remove a reading or alert subscription; false when unknown
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len() + self.alert_listeners.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.alert_listeners.retain(|(sub, _)| *sub != id);
        before != self.subscribers.len() + self.alert_listeners.len()
    }

    // ---------------------------------------------------------------------
    // History
    // ---------------------------------------------------------------------

    /// Retained readings of a device, oldest first
    pub fn history(&self, device_id: &str) -> Vec<Reading> {
        self.histories
            .get(device_id)
            .map(HistoryBuffer::to_vec)
            .unwrap_or_default()
    }

    pub fn latest_reading(&self, device_id: &str) -> Option<&Reading> {
        self.histories.get(device_id).and_then(HistoryBuffer::latest)
    }

    /// Devices with a retained history
    pub fn tracked_devices(&self) -> usize {
        self.histories.len()
    }

    /// Lazy batch over `[start, end)`; the interval defaults to the configured one
    pub fn generate_historical_data(
        &mut self,
        device_type: DeviceType,
        patient_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval_minutes: Option<u32>,
    ) -> SimResult<HistoricalReadings> {
        let interval = interval_minutes.unwrap_or(self.historical_interval_minutes);
        let config = DeviceSimulationConfig::new(device_type, patient_id, 60)
            .with_anomaly_probability(self.historical_anomaly_probability);
        config.validate()?;

        let seed = self.rng.gen();
        let batch = HistoricalReadings::new(config, start, end, interval, seed)?;
        debug!(
            session_id = %batch.session_id(),
            %device_type,
            %start,
            %end,
            interval,
            "Historical batch prepared"
        );
        Ok(batch)
    }

    // ---------------------------------------------------------------------
    // Alerts
    // ---------------------------------------------------------------------

    pub fn alerts(&self) -> &[Alert] {
        self.alerts.all()
    }

    pub fn open_alerts(&self) -> Vec<&Alert> {
        self.alerts.open().collect()
    }

    pub fn alert(&self, id: AlertId) -> Option<&Alert> {
        self.alerts.get(id)
    }

    /// Open alert count per severity
    pub fn alert_summary(&self) -> HashMap<AlertSeverity, usize> {
        self.alerts.summary()
    }

    pub fn acknowledge_alert(&mut self, id: AlertId) -> SimResult<()> {
        let now = self.clock.now();
        self.alerts.acknowledge(id, now)
    }

    pub fn resolve_alert(&mut self, id: AlertId) -> SimResult<()> {
        let now = self.clock.now();
        self.alerts.resolve(id, now)
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn next_subscription_id(&mut self) -> SubscriptionId {
        self.next_subscription += 1;
        SubscriptionId(self.next_subscription)
    }

    fn start_session(&mut self, config: DeviceSimulationConfig) -> SimResult<SessionId> {
        config.validate()?;

        let now = self.clock.now();
        let session = SimulationSession::new(config, now, &mut self.rng);
        let id = session.id;

        if !self.histories.contains_key(&session.device_id) {
            let buffer = HistoryBuffer::new(self.settings.history_capacity)
                .map_err(|e| SimError::invalid("registry.history_capacity", e.to_string()))?;
            self.histories.insert(session.device_id.clone(), buffer);
        }

        if let Some(first) = session.next_tick_after(session.started_at) {
            self.timers.schedule(id, TimerKind::Tick, first);
        }
        if let Some(expiry) = session.expires_at() {
            self.timers.schedule(id, TimerKind::Expire, expiry);
        }

        info!(
            session_id = %id,
            device_id = %session.device_id,
            tick_interval_seconds = session.config.tick_interval_seconds,
            duration_seconds = ?session.config.duration_seconds,
            scenario = ?session.config.scenario,
            "Simulation started"
        );
        self.sessions.insert(id, session);
        Ok(id)
    }

    fn stop_session(&mut self, session_id: SessionId) -> StopOutcome {
        let now = self.clock.now();
        if self.finish(session_id, StopReason::Requested, now) {
            info!(session_id = %session_id, "Simulation stopped");
            StopOutcome::Stopped
        } else if self.retired.iter().any(|s| s.id == session_id) {
            debug!(session_id = %session_id, "Simulation already stopped");
            StopOutcome::AlreadyStopped
        } else {
            warn!(session_id = %session_id, "Stop requested for unknown simulation");
            StopOutcome::NotFound
        }
    }

    fn stop_all_sessions(&mut self) -> usize {
        let ids: Vec<SessionId> = self.active_sessions().iter().map(|s| s.id).collect();
        let now = self.clock.now();
        let stopped = ids
            .into_iter()
            .filter(|id| self.finish(*id, StopReason::Requested, now))
            .count();
        info!(stopped, "All simulations stopped");
        stopped
    }

    /// Run one scheduled tick; stale events of finished sessions are ignored
    fn fire_tick(&mut self, session_id: SessionId, due: DateTime<Utc>) -> bool {
        let Some(session) = self.sessions.get_mut(&session_id) else {
            return false;
        };

        match session.tick_with(due, self.source.as_ref(), &mut self.rng) {
            Ok(TickOutcome::Emitted(reading)) => {
                if let Some(next) = session.next_tick_after(due) {
                    self.timers.schedule(session_id, TimerKind::Tick, next);
                }
                debug!(
                    session_id = %session_id,
                    device_id = %reading.device_id,
                    sequence = reading.sequence,
                    anomaly = reading.anomaly,
                    quality = %reading.quality,
                    "Reading emitted"
                );
                self.record_reading(reading);
                true
            }
            Ok(TickOutcome::Skipped) => false,
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Simulation tick failed");
                self.finish(session_id, StopReason::Fault(e.to_string()), due);
                false
            }
        }
    }

    /// Store, broadcast, then triage a fresh reading
    fn record_reading(&mut self, reading: Reading) {
        if let Some(history) = self.histories.get_mut(&reading.device_id) {
            history.push(reading.clone());
        }

        let now = self.clock.now();
        let alert_event = match self.triage.evaluate(&reading) {
            Some(mut alert) => {
                alert.id = AlertId::from_rng(&mut self.rng);
                self.alerts.record(alert, now)
            }
            None => None,
        };

        self.dispatch(&SimulationEvent::Reading(reading));
        if let Some(event) = alert_event {
            self.dispatch_alert(&event);
        }
    }

    /// Move a running session to the retired list and notify subscribers
    fn finish(&mut self, session_id: SessionId, reason: StopReason, at: DateTime<Utc>) -> bool {
        let Some(mut session) = self.sessions.remove(&session_id) else {
            return false;
        };

        session.stop(reason.clone(), at);
        self.timers.cancel(session_id);
        self.retire(session);
        self.dispatch(&SimulationEvent::SessionStopped { session_id, reason });
        true
    }

    fn retire(&mut self, session: SimulationSession) {
        let capacity = self.settings.retired_session_capacity;
        let evicted = if capacity == 0 {
            Some(session)
        } else {
            let oldest = if self.retired.len() >= capacity {
                self.retired.pop_front()
            } else {
                None
            };
            self.retired.push_back(session);
            oldest
        };

        if let Some(old) = evicted {
            self.release_history(&old.device_id);
        }
    }

    /// Drop a device's history once no live or retained session refers to it
    fn release_history(&mut self, device_id: &str) {
        let in_use = self.sessions.values().any(|s| s.device_id == device_id)
            || self.retired.iter().any(|s| s.device_id == device_id);
        if !in_use && self.histories.remove(device_id).is_some() {
            debug!(device_id, "Device history released");
        }
    }

    fn dispatch(&mut self, event: &SimulationEvent) {
        let sender = &self.commander;
        for (_, callback) in self.subscribers.iter_mut() {
            callback(event, sender);
        }
    }

    fn dispatch_alert(&mut self, event: &AlertEvent) {
        let sender = &self.commander;
        for (_, callback) in self.alert_listeners.iter_mut() {
            callback(event, sender);
        }
    }

    /// Apply queued commands, including any queued while applying them
    fn drain_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            match command {
                Command::Start(config) => {
                    if let Err(e) = self.start_session(*config) {
                        warn!(error = %e, "Queued simulation start rejected");
                    }
                }
                Command::Stop(session_id) => {
                    self.stop_session(session_id);
                }
                Command::StopAll => {
                    self.stop_all_sessions();
                }
            }
        }
    }
}

impl fmt::Debug for SimulationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationRegistry")
            .field("active_sessions", &self.sessions.len())
            .field("retired_sessions", &self.retired.len())
            .field("pending_timers", &self.timers.len())
            .field("subscribers", &self.subscribers.len())
            .field("alert_listeners", &self.alert_listeners.len())
            .field("alerts", &self.alerts.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::session::SessionStatus;
    use crate::utils::time::MockTimeProvider;
    use chrono::{Duration, TimeZone};
    use parking_lot::Mutex;

    fn setup() -> (Arc<MockTimeProvider>, SimulationRegistry) {
        let clock = Arc::new(MockTimeProvider::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        let registry = SimulationRegistry::with_rng(
            clock.clone(),
            &SimulatorSettings::default(),
            StdRng::seed_from_u64(7),
        )
        .unwrap();
        (clock, registry)
    }

    fn config(duration: u64) -> DeviceSimulationConfig {
        DeviceSimulationConfig::new(DeviceType::VitalSignsMonitor, "patient-1", 10)
            .with_duration_seconds(duration)
    }

    #[test]
    fn test_readings_stop_at_duration() {
        let (clock, mut registry) = setup();
        let id = registry.start_simulation(config(30)).unwrap();
        let device_id = registry.get_status(id).unwrap().device_id;

        clock.advance_secs(60);
        assert_eq!(registry.poll(), 3);

        let status = registry.get_status(id).unwrap();
        assert_eq!(status.status, SessionStatus::Stopped(StopReason::Completed));
        assert_eq!(registry.history(&device_id).len(), 3);
        assert_eq!(registry.active_count(), 0);
        assert!(registry.next_due().is_none());
    }

    #[test]
    fn test_readings_carry_scheduled_timestamps() {
        let (clock, mut registry) = setup();
        let start = clock.now();
        let id = registry.start_simulation(config(25)).unwrap();
        let device_id = registry.get_status(id).unwrap().device_id;

        clock.advance_secs(3600);
        registry.poll();

        let stamps: Vec<_> = registry.history(&device_id).iter().map(|r| r.timestamp).collect();
        assert_eq!(stamps, vec![start + Duration::seconds(10), start + Duration::seconds(20)]);
    }

    #[test]
    fn test_invalid_config_creates_nothing() {
        let (_, mut registry) = setup();
        let bad = config(30).with_anomaly_probability(2.0);
        assert!(matches!(
            registry.start_simulation(bad),
            Err(SimError::InvalidConfiguration { .. })
        ));
        assert_eq!(registry.active_count(), 0);
        assert!(registry.next_due().is_none());
    }

    #[test]
    fn test_stop_outcomes() {
        let (_, mut registry) = setup();
        let id = registry.start_simulation(config(30)).unwrap();

        assert_eq!(registry.stop_simulation(id), StopOutcome::Stopped);
        assert_eq!(registry.stop_simulation(id), StopOutcome::AlreadyStopped);
        assert_eq!(registry.stop_simulation(SessionId::new()), StopOutcome::NotFound);
        assert!(matches!(
            registry.get_status(SessionId::new()),
            Err(SimError::SessionNotFound(_))
        ));
    }

    #[test]
    fn test_subscriber_sees_readings_then_stop() {
        let (clock, mut registry) = setup();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        registry.subscribe(move |event, _| sink.lock().push(event.clone()));

        let id = registry.start_simulation(config(20)).unwrap();
        clock.advance_secs(20);
        registry.poll();

        let events = events.lock();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], SimulationEvent::Reading(_)));
        assert!(matches!(events[1], SimulationEvent::Reading(_)));
        assert_eq!(
            events[2],
            SimulationEvent::SessionStopped {
                session_id: id,
                reason: StopReason::Completed
            }
        );
    }

    #[test]
    fn test_unsubscribe() {
        let (clock, mut registry) = setup();
        let count = Arc::new(Mutex::new(0usize));
        let counter = count.clone();
        let sub = registry.subscribe(move |_, _| *counter.lock() += 1);

        assert!(registry.unsubscribe(sub));
        assert!(!registry.unsubscribe(sub));

        registry.start_simulation(config(10)).unwrap();
        clock.advance_secs(10);
        registry.poll();
        assert_eq!(*count.lock(), 0);
    }

    #[test]
    fn test_history_is_bounded() {
        let clock = Arc::new(MockTimeProvider::from_millis(0));
        let mut settings = SimulatorSettings::default();
        settings.registry.history_capacity = 5;
        let mut registry =
            SimulationRegistry::with_rng(clock.clone(), &settings, StdRng::seed_from_u64(1)).unwrap();

        let id = registry
            .start_simulation(DeviceSimulationConfig::new(DeviceType::Thermometer, "p", 1))
            .unwrap();
        let device_id = registry.get_status(id).unwrap().device_id;

        clock.advance_secs(12);
        assert_eq!(registry.poll(), 12);

        let history = registry.history(&device_id);
        assert_eq!(history.len(), 5);
        assert_eq!(history[0].sequence, 8);
        assert_eq!(registry.latest_reading(&device_id).unwrap().sequence, 12);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let clock = Arc::new(MockTimeProvider::from_millis(0));
        let mut settings = SimulatorSettings::default();
        settings.registry.history_capacity = 0;
        assert!(matches!(
            SimulationRegistry::new(clock, &settings),
            Err(SimError::Config(ConfigError::ValidationError(_)))
        ));
    }

    #[test]
    fn test_histories_follow_retained_sessions() {
        let clock = Arc::new(MockTimeProvider::from_millis(0));
        let mut settings = SimulatorSettings::default();
        settings.registry.retired_session_capacity = 4;
        let mut registry =
            SimulationRegistry::with_rng(clock.clone(), &settings, StdRng::seed_from_u64(2)).unwrap();

        let mut devices = Vec::new();
        for _ in 0..10 {
            let id = registry
                .start_simulation(DeviceSimulationConfig::new(DeviceType::Thermometer, "p", 1))
                .unwrap();
            clock.advance_secs(1);
            assert_eq!(registry.poll(), 1);
            assert_eq!(registry.stop_simulation(id), StopOutcome::Stopped);
            devices.push(registry.get_status(id).unwrap().device_id);
        }

        assert_eq!(registry.tracked_devices(), 4);
        assert!(registry.history(&devices[0]).is_empty());
        assert_eq!(registry.history(&devices[9]).len(), 1);
    }

    #[test]
    fn test_shared_device_history_outlives_evicted_session() {
        let clock = Arc::new(MockTimeProvider::from_millis(0));
        let mut settings = SimulatorSettings::default();
        settings.registry.retired_session_capacity = 0;
        let mut registry =
            SimulationRegistry::with_rng(clock.clone(), &settings, StdRng::seed_from_u64(3)).unwrap();

        let bedside =
            || DeviceSimulationConfig::new(DeviceType::Thermometer, "p", 1).with_device_id("thermo-1");
        let short = registry.start_simulation(bedside()).unwrap();
        registry.start_simulation(bedside()).unwrap();

        clock.advance_secs(1);
        assert_eq!(registry.poll(), 2);
        registry.stop_simulation(short);

        assert_eq!(registry.tracked_devices(), 1);
        assert_eq!(registry.history("thermo-1").len(), 2);

        registry.stop_all();
        assert_eq!(registry.tracked_devices(), 0);
    }

    /// Emits NaN for temperature so thermometer ticks fail
    struct FaultyThermometer;

    impl MetricSource for FaultyThermometer {
        fn generate_all(
            &self,
            specs: &crate::device::MetricSpecs,
            anomaly_probability: f64,
            rng: &mut dyn rand::RngCore,
        ) -> crate::simulation::GeneratedValues {
            let mut generated = MetricGenerator::generate_all(specs, anomaly_probability, rng);
            if let Some(value) = generated.values.get_mut(crate::device::metrics::TEMPERATURE) {
                *value = f64::NAN;
            }
            generated
        }
    }

    #[test]
    fn test_tick_fault_stops_only_the_failing_session() {
        let (clock, registry) = setup();
        let mut registry = registry.with_metric_source(FaultyThermometer);
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        registry.subscribe(move |event, _| sink.lock().push(event.clone()));

        let faulty = registry
            .start_simulation(DeviceSimulationConfig::new(DeviceType::Thermometer, "p", 10))
            .unwrap();
        let healthy = registry
            .start_simulation(DeviceSimulationConfig::new(DeviceType::PulseOximeter, "p", 10))
            .unwrap();

        clock.advance_secs(30);
        assert_eq!(registry.poll(), 3);

        match registry.get_status(faulty).unwrap().status {
            SessionStatus::Stopped(StopReason::Fault(detail)) => assert!(detail.contains("temperature")),
            other => panic!("Expected fault stop, got {:?}", other),
        }
        assert_eq!(registry.get_status(faulty).unwrap().readings_emitted, 0);
        assert!(registry.get_status(healthy).unwrap().is_running());
        assert_eq!(registry.get_status(healthy).unwrap().readings_emitted, 3);

        let events = events.lock();
        let stops: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, SimulationEvent::SessionStopped { .. }))
            .collect();
        assert_eq!(stops.len(), 1);
        assert!(matches!(
            stops[0],
            SimulationEvent::SessionStopped { session_id, reason: StopReason::Fault(_) } if *session_id == faulty
        ));
    }
}
