//! Criterion benchmarks for the per-turn engine step.
//!
//! Run with: cargo bench -p outbreak-logic --bench advance_turn

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use outbreak_logic::Simulation;

/// Building sizes as (floors, rooms per floor, initial zombies).
const SIZES: [(usize, usize, usize); 3] = [(3, 5, 2), (20, 20, 40), (50, 100, 500)];

fn seeded(floors: usize, rooms: usize, zombies: usize) -> Simulation {
    let mut sim = Simulation::seeded(1);
    sim.setup(floors, rooms).expect("valid building");
    sim.add_initial_zombies(zombies).expect("configured");
    sim.add_practicante().expect("configured");
    sim
}

fn bench_advance_turn(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance_turn");

    for (floors, rooms, zombies) in SIZES {
        let name = format!("{floors}x{rooms}_{zombies}z");
        group.bench_function(&name, |b| {
            b.iter_batched(
                || seeded(floors, rooms, zombies),
                |mut sim| black_box(sim.advance_turn()),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_state_snapshot(c: &mut Criterion) {
    let sim = seeded(50, 100, 500);
    c.bench_function("get_state_50x100", |b| {
        b.iter(|| black_box(sim.get_state()));
    });
}

criterion_group!(benches, bench_advance_turn, bench_state_snapshot);
criterion_main!(benches);
