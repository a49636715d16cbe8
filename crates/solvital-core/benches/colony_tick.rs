use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use solvital_core::prelude::*;

fn colony(size: usize) -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimulationContext::standard(11));
    let base = engine.habitats.add("Base", HabitatKind::Settlement);
    for i in 0..size {
        engine.spawn_random_colonist(Name::new("Colonist", i.to_string()), Some(base));
    }
    engine.init();
    engine
}

fn bench_colony_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("colony_tick");
    for size in [10, 100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut engine = colony(size);
            b.iter(|| black_box(engine.update(black_box(1.0))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_colony_tick);
criterion_main!(benches);
