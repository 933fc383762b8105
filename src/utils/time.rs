use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;

/// Time provider trait for dependency injection and testing
pub trait TimeProvider: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// System time provider using actual system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Mock time provider for deterministic testing
#[derive(Debug)]
pub struct MockTimeProvider {
    current_time: Mutex<DateTime<Utc>>,
}

impl MockTimeProvider {
    pub fn new(initial_time: DateTime<Utc>) -> Self {
        Self {
            current_time: Mutex::new(initial_time),
        }
    }

    /// Mock clock starting at the Unix epoch plus `millis`
    pub fn from_millis(millis: i64) -> Self {
        Self::new(Utc.timestamp_millis_opt(millis).single().unwrap_or_default())
    }

    pub fn advance_by(&self, delta: Duration) {
        let mut current = self.current_time.lock();
        *current += delta;
    }

    pub fn advance_secs(&self, seconds: i64) {
        self.advance_by(Duration::seconds(seconds));
    }

    pub fn set_time(&self, time: DateTime<Utc>) {
        *self.current_time.lock() = time;
    }
}

impl TimeProvider for MockTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        *self.current_time.lock()
    }
}
