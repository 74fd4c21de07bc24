//! Benchmarks for the EvoLife generation driver.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use evolife::{
    compute::{Field, GenerationDriver, Torus, transition_kernel},
    schema::{FieldSeed, InitialField, Pattern, SimulationConfig},
};

fn soup(size: usize) -> SimulationConfig {
    SimulationConfig {
        width: size,
        height: size,
        death_speed: 23,
        max_genes: 14,
        random_seed: Some(42),
        census_interval: 0,
        ..Default::default()
    }
}

fn random_seed() -> FieldSeed {
    FieldSeed {
        pattern: Pattern::RandomGenomes {
            region: None,
            density: 0.5,
        },
    }
}

fn bench_driver_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("driver_step");

    for size in [64, 128, 256, 512, 1024] {
        let mut driver = GenerationDriver::new(soup(size), &random_seed()).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| {
                    driver.step();
                    black_box(driver.tick());
                });
            },
        );
    }

    group.finish();
}

fn bench_birth_cost(c: &mut Criterion) {
    let mut group = c.benchmark_group("birth_cost");

    for birth_cost in [0, 1, 15] {
        let config = SimulationConfig {
            birth_cost,
            ..soup(256)
        };
        let mut driver = GenerationDriver::new(config, &random_seed()).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(birth_cost),
            &birth_cost,
            |b, _| {
                b.iter(|| driver.step());
            },
        );
    }

    group.finish();
}

fn bench_transition_kernel(c: &mut Criterion) {
    let size = 512;
    let config = soup(size);
    let mut rng = StdRng::seed_from_u64(7);
    let initial = random_seed().generate(size, size, &mut rng).unwrap();
    let mut field = Field::new(Torus::new(size, size), &initial, &mut rng);
    let params = config.transition_params();

    c.bench_function("transition_kernel_512", |b| {
        b.iter(|| {
            transition_kernel(field.transition_view(), black_box(&params));
        });
    });
}

criterion_group!(
    benches,
    bench_driver_step,
    bench_birth_cost,
    bench_transition_kernel
);
criterion_main!(benches);
