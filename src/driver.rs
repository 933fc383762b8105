// src/driver.rs
//! Background tokio task that polls a shared registry on a fixed cadence

use crate::config::{constants::driver as limits, DriverSettings};
use crate::error::{SimError, SimResult};
use crate::simulation::SimulationRegistry;
use crate::utils::validation::validate_range;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Registry shared between the driver task and callers
pub type SharedRegistry = Arc<Mutex<SimulationRegistry>>;

pub fn shared(registry: SimulationRegistry) -> SharedRegistry {
    Arc::new(Mutex::new(registry))
}

pub struct SimulationDriver;

impl SimulationDriver {
    /// Spawn the polling loop on the current tokio runtime
    pub fn spawn(registry: SharedRegistry, settings: &DriverSettings) -> SimResult<DriverHandle> {
        validate_range(
            "driver.poll_interval_ms",
            settings.poll_interval_ms,
            limits::MIN_POLL_INTERVAL_MS,
            limits::MAX_POLL_INTERVAL_MS,
        )
        .map_err(SimError::from)?;

        let period = Duration::from_millis(settings.poll_interval_ms);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut total = 0u64;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let emitted = registry.lock().poll();
                        if emitted > 0 {
                            total += emitted as u64;
                            debug!(emitted, total, "Driver poll");
                        }
                    }
                    _ = &mut shutdown_rx => {
                        info!(total, "Simulation driver stopped");
                        break;
                    }
                }
            }
            total
        });

        info!(poll_interval_ms = settings.poll_interval_ms, "Simulation driver started");
        Ok(DriverHandle {
            shutdown: Some(shutdown_tx),
            task,
        })
    }
}

/// Owner of a running driver task
pub struct DriverHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<u64>,
}

impl DriverHandle {
    /// Stop polling; returns the number of readings emitted by the driver
    pub async fn shutdown(mut self) -> u64 {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        (&mut self.task).await.unwrap_or_default()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for DriverHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
