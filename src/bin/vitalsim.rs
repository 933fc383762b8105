//! VitalSim CLI - stream simulated vital signs and alerts as JSON lines

use chrono::{Duration as ChronoDuration, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use vitalsim_core::config::{ConfigLoader, SimulatorSettings};
use vitalsim_core::driver::{shared, SimulationDriver};
use vitalsim_core::simulation::{Scenario, SimulationRegistry};
use vitalsim_core::telemetry::init_tracing;
use vitalsim_core::utils::SystemTimeProvider;
use vitalsim_core::{DeviceType, SimError};

#[derive(Parser)]
#[command(name = "vitalsim")]
#[command(about = "Synthetic vital-sign device simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario in real time, printing readings and alerts
    Run {
        /// Scenario name (see `vitalsim scenarios`)
        #[arg(short, long)]
        scenario: String,

        /// Patient identifier
        #[arg(short, long)]
        patient: String,

        /// Session duration in seconds, overriding the scenario default
        #[arg(long)]
        seconds: Option<u64>,

        /// Tick interval in seconds, overriding the scenario default
        #[arg(long)]
        tick: Option<u32>,
    },

    /// List available scenarios
    Scenarios,

    /// Print a historical batch ending now
    History {
        /// Device type, e.g. pulse_oximeter
        #[arg(short, long)]
        device: DeviceType,

        /// Patient identifier
        #[arg(short, long)]
        patient: String,

        /// Window length in hours
        #[arg(long, default_value = "1")]
        hours: u32,

        /// Minutes between readings
        #[arg(short, long)]
        interval: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let settings = load_settings(cli.config)?;
    init_tracing(&settings.logging);

    match cli.command {
        Commands::Run {
            scenario,
            patient,
            seconds,
            tick,
        } => run(settings, &scenario, &patient, seconds, tick).await?,
        Commands::Scenarios => {
            for scenario in Scenario::ALL {
                println!(
                    "{:<22} {:<24} {}",
                    scenario.name(),
                    scenario.device_type().as_str(),
                    scenario.description()
                );
            }
        }
        Commands::History {
            device,
            patient,
            hours,
            interval,
        } => history(settings, device, &patient, hours, interval)?,
    }

    Ok(())
}

fn load_settings(path: Option<PathBuf>) -> Result<SimulatorSettings, SimError> {
    let loader = match path {
        Some(path) => ConfigLoader::with_paths(vec![path]),
        None => ConfigLoader::new(),
    };
    Ok(loader.load()?)
}

async fn run(
    settings: SimulatorSettings,
    scenario: &str,
    patient: &str,
    seconds: Option<u64>,
    tick: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = SimulationRegistry::new(Arc::new(SystemTimeProvider), &settings)?;
    let mut config = registry.create_scenario(scenario, patient)?;
    if let Some(seconds) = seconds {
        config.duration_seconds = Some(seconds);
    }
    if let Some(tick) = tick {
        config.tick_interval_seconds = tick;
    }

    registry.subscribe(|event, _| print_json(event));
    registry.on_alert(|event, _| print_json(event));
    let session_id = registry.start_simulation(config)?;

    let registry = shared(registry);
    let driver = SimulationDriver::spawn(registry.clone(), &settings.driver)?;
    let check_every = Duration::from_millis(settings.driver.poll_interval_ms);

    loop {
        tokio::select! {
            _ = tokio::time::sleep(check_every) => {
                if registry.lock().active_count() == 0 {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                registry.lock().stop_simulation(session_id);
                break;
            }
        }
    }

    let emitted = driver.shutdown().await;
    let open_alerts = registry.lock().alert_summary();
    info!(%session_id, emitted, ?open_alerts, "Run finished");
    Ok(())
}

fn history(
    settings: SimulatorSettings,
    device: DeviceType,
    patient: &str,
    hours: u32,
    interval: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let end = Utc::now();
    let start = end - ChronoDuration::hours(i64::from(hours));

    let mut registry = SimulationRegistry::new(Arc::new(SystemTimeProvider), &settings)?;
    for reading in registry.generate_historical_data(device, patient, start, end, interval)? {
        print_json(&reading);
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{}", line),
        Err(e) => tracing::warn!(error = %e, "Failed to serialize output"),
    }
}
