// tests/historical_data.rs
//! Historical batch generation through the registry

use chrono::{Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use vitalsim_core::config::SimulatorSettings;
use vitalsim_core::device::DeviceType;
use vitalsim_core::simulation::SimulationRegistry;
use vitalsim_core::utils::time::MockTimeProvider;
use vitalsim_core::SimError;

fn registry(settings: &SimulatorSettings) -> SimulationRegistry {
    let clock = Arc::new(MockTimeProvider::from_millis(0));
    SimulationRegistry::with_rng(clock, settings, StdRng::seed_from_u64(21)).unwrap()
}

#[test]
fn test_one_hour_at_default_interval() {
    let mut registry = registry(&SimulatorSettings::default());
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).unwrap();
    let end = start + Duration::minutes(60);

    let readings: Vec<_> = registry
        .generate_historical_data(DeviceType::PulseOximeter, "patient-h", start, end, None)
        .unwrap()
        .collect();

    assert_eq!(readings.len(), 4);
    let expected: Vec<_> = (0..4).map(|i| start + Duration::minutes(15 * i)).collect();
    let actual: Vec<_> = readings.iter().map(|r| r.timestamp).collect();
    assert_eq!(actual, expected);

    for reading in &readings {
        assert_eq!(reading.patient_id, "patient-h");
        assert_eq!(reading.device_type, DeviceType::PulseOximeter);
        assert_eq!(reading.session_id, readings[0].session_id);
    }
}

#[test]
fn test_configured_interval_is_the_default() {
    let mut settings = SimulatorSettings::default();
    settings.historical.interval_minutes = 30;
    let mut registry = registry(&settings);
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();

    let count = registry
        .generate_historical_data(DeviceType::Thermometer, "p", start, start + Duration::hours(3), None)
        .unwrap()
        .count();
    assert_eq!(count, 6);

    let explicit = registry
        .generate_historical_data(DeviceType::Thermometer, "p", start, start + Duration::hours(3), Some(60))
        .unwrap()
        .count();
    assert_eq!(explicit, 3);
}

#[test]
fn test_batch_is_lazy_and_restartable() {
    let mut registry = registry(&SimulatorSettings::default());
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    let mut batch = registry
        .generate_historical_data(DeviceType::VitalSignsMonitor, "p", start, start + Duration::days(7), Some(5))
        .unwrap();

    let head: Vec<_> = batch.by_ref().take(3).collect();
    let snapshot = batch.clone();
    let rest: Vec<_> = batch.by_ref().collect();
    assert_eq!(head.len() + rest.len(), 7 * 24 * 12);
    assert_eq!(snapshot.count(), rest.len());

    batch.restart();
    let replay: Vec<_> = batch.take(3).collect();
    assert_eq!(replay, head);
}

#[test]
fn test_invalid_windows() {
    let mut registry = registry(&SimulatorSettings::default());
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();

    for (end, interval) in [
        (start, Some(15)),
        (start - Duration::hours(1), Some(15)),
        (start + Duration::hours(1), Some(0)),
        (start + Duration::hours(1), Some(2000)),
    ] {
        assert!(matches!(
            registry.generate_historical_data(DeviceType::Thermometer, "p", start, end, interval),
            Err(SimError::InvalidConfiguration { .. })
        ));
    }

    assert!(registry
        .generate_historical_data(DeviceType::Thermometer, "", start, start + Duration::hours(1), None)
        .is_err());
}
