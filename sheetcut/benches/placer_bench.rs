use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::prelude::SmallRng;
use rand::{Rng, SeedableRng};

use sheetcut::config::{Algorithm, OptimizerConfig};
use sheetcut::entities::{Instance, Order, Stock};
use sheetcut::geometry::PieceShape;
use sheetcut::optimize;
use sheetcut::placement::PlacerKind;
use sheetcut::search::Candidate;
use sheetcut::util::Tolerance;

criterion_main!(benches);
criterion_group!(benches, decode_bench, random_decode_bench, genetic_bench);

const N_ORDERS: usize = 20;
const N_STOCKS: usize = 4;

/// Random mix of rectangles, with the occasional circle
fn create_benchmark_problem(seed: u64) -> (Vec<Stock>, Vec<Order>) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let stocks = (0..N_STOCKS)
        .map(|i| Stock::new(format!("sheet-{i}"), 2000.0, 1000.0))
        .collect();
    let orders = (0..N_ORDERS)
        .map(|i| {
            let shape = match rng.random_bool(0.2) {
                true => PieceShape::circle(rng.random_range(30.0..120.0)),
                false => PieceShape::rectangle(
                    rng.random_range(50.0..400.0),
                    rng.random_range(50.0..300.0),
                ),
            };
            Order::new(format!("order-{i}"), shape, rng.random_range(1..6))
        })
        .collect();
    (stocks, orders)
}

fn decode_bench(c: &mut Criterion) {
    let (stocks, orders) = create_benchmark_problem(0);
    let instance = Instance::new(&stocks, &orders, true, Tolerance(1e-3)).unwrap();
    let candidate = Candidate::greedy(&instance);

    let mut group = c.benchmark_group("greedy_decode");
    for placer in [PlacerKind::FirstFit, PlacerKind::BestFit, PlacerKind::BottomLeft] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{placer:?}")),
            &placer,
            |b, &placer| b.iter(|| candidate.decode(&instance, placer, 64)),
        );
    }
    group.finish();
}

fn random_decode_bench(c: &mut Criterion) {
    let (stocks, orders) = create_benchmark_problem(1);
    let instance = Instance::new(&stocks, &orders, true, Tolerance(1e-3)).unwrap();
    let mut rng = SmallRng::seed_from_u64(0);

    c.bench_function("random_decode_bottom_left", |b| {
        b.iter(|| {
            let candidate = Candidate::random(&instance, &mut rng);
            candidate.decode(&instance, PlacerKind::BottomLeft, 64)
        })
    });
}

fn genetic_bench(c: &mut Criterion) {
    let (stocks, orders) = create_benchmark_problem(2);
    let mut config = OptimizerConfig::default().with_algorithm(Algorithm::Genetic);
    config.genetic.max_generations = Some(10);
    config.target_efficiency = None;

    let mut group = c.benchmark_group("genetic");
    group.sample_size(10);
    group.bench_function("10_generations", |b| {
        b.iter(|| optimize(&stocks, &orders, &config).unwrap())
    });
    group.finish();
}
