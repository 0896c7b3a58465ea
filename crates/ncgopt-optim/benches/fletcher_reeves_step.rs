//! Benchmarks of single Fletcher-Reeves steps per step length policy
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ncgopt_core::prelude::*;
use ncgopt_optim::{FletcherReeves, FletcherReevesConfig, LineSearchKind};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Random diagonal quadratic with curvatures in [1, 100).
fn random_problem(dim: usize, seed: u64) -> (QuadraticObjective<f64>, DVector<f64>) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let diag: Vec<f64> = (0..dim).map(|_| rng.gen_range(1.0..100.0)).collect();
    let x0 = DVector::from_fn(dim, |_, _| rng.gen_range(-10.0..10.0));
    (QuadraticObjective::diagonal(&diag), x0)
}

fn benchmark_line_searches(c: &mut Criterion) {
    let mut group = c.benchmark_group("fletcher_reeves_step");

    for &dim in &[10, 100, 500] {
        let (objective, x0) = random_problem(dim, 42);

        for kind in [LineSearchKind::Armijo, LineSearchKind::Wolfe, LineSearchKind::StrongWolfe] {
            group.bench_with_input(BenchmarkId::new(kind.to_string(), dim), &dim, |b, _| {
                b.iter(|| {
                    let x = Parameter::new(x0.clone());
                    let config = FletcherReevesConfig::new().with_line_search(kind);
                    let mut optimizer = FletcherReeves::new(vec![x.clone()], config).unwrap();
                    for _ in 0..10 {
                        optimizer
                            .step_with_closure(black_box(objective.closure(&x)))
                            .unwrap();
                    }
                    x
                });
            });
        }
    }

    group.finish();
}

fn benchmark_exact_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_step");

    for &dim in &[10, 50, 100] {
        let (objective, x0) = random_problem(dim, 7);

        group.bench_with_input(BenchmarkId::new("assemble_and_step", dim), &dim, |b, _| {
            b.iter(|| {
                let x = Parameter::new(x0.clone());
                let mut optimizer = FletcherReeves::with_curvature_oracle(
                    vec![x.clone()],
                    FletcherReevesConfig::exact(),
                    Box::new(objective.clone()),
                )
                .unwrap();
                for _ in 0..5 {
                    optimizer
                        .step_with_closure(black_box(objective.closure(&x)))
                        .unwrap();
                }
                x
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_line_searches, benchmark_exact_step);
criterion_main!(benches);
