use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use vitalsim_core::config::SimulatorSettings;
use vitalsim_core::device::{default_metric_specs, DeviceType};
use vitalsim_core::simulation::{DeviceSimulationConfig, MetricGenerator, SimulationRegistry};
use vitalsim_core::triage::AlertTriage;
use vitalsim_core::utils::time::{MockTimeProvider, TimeProvider};

const SESSION_COUNTS: &[usize] = &[1, 10, 100];
const ANOMALY_PROBABILITIES: &[f64] = &[0.0, 0.03, 0.8];

fn benchmark_metric_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generator");
    let specs = default_metric_specs(DeviceType::VitalSignsMonitor);

    for &probability in ANOMALY_PROBABILITIES {
        group.throughput(Throughput::Elements(1000));
        group.bench_with_input(
            BenchmarkId::new("generate_all", format!("p{}", probability)),
            &probability,
            |b, &p| {
                let mut rng = StdRng::seed_from_u64(1);
                b.iter(|| {
                    for _ in 0..1000 {
                        black_box(MetricGenerator::generate_all(&specs, p, &mut rng));
                    }
                });
            },
        );
    }

    group.finish();
}

fn benchmark_registry_poll(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");

    for &sessions in SESSION_COUNTS {
        group.throughput(Throughput::Elements((sessions * 60) as u64));
        group.bench_with_input(
            BenchmarkId::new("poll_one_minute", sessions),
            &sessions,
            |b, &count| {
                b.iter(|| {
                    let clock = Arc::new(MockTimeProvider::new(
                        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                    ));
                    let mut registry = SimulationRegistry::with_rng(
                        clock.clone(),
                        &SimulatorSettings::default(),
                        StdRng::seed_from_u64(2),
                    )
                    .unwrap();

                    for i in 0..count {
                        let config = DeviceSimulationConfig::new(
                            DeviceType::VitalSignsMonitor,
                            format!("patient-{}", i),
                            1,
                        )
                        .with_anomaly_probability(0.03);
                        registry.start_simulation(config).unwrap();
                    }

                    clock.advance_by(Duration::seconds(60));
                    black_box(registry.poll())
                });
            },
        );
    }

    group.finish();
}

fn benchmark_triage(c: &mut Criterion) {
    let clock = Arc::new(MockTimeProvider::from_millis(0));
    let mut registry =
        SimulationRegistry::with_rng(clock.clone(), &SimulatorSettings::default(), StdRng::seed_from_u64(3))
            .unwrap();
    let batch = registry
        .generate_historical_data(
            DeviceType::VitalSignsMonitor,
            "patient-bench",
            clock.now(),
            clock.now() + Duration::hours(24),
            Some(1),
        )
        .unwrap();
    let readings: Vec<_> = batch.collect();
    let triage = AlertTriage::default();

    c.bench_function("triage_evaluate_day", |b| {
        b.iter(|| {
            readings
                .iter()
                .filter_map(|r| triage.evaluate(black_box(r)))
                .count()
        });
    });
}

criterion_group!(
    benches,
    benchmark_metric_generation,
    benchmark_registry_poll,
    benchmark_triage
);
criterion_main!(benches);
