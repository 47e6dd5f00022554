use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use sweepsage_core::*;

const TIERS: [(&str, Coord2, CellCount); 3] = [
    ("beginner", (9, 9), 10),
    ("intermediate", (16, 16), 40),
    ("expert", (30, 16), 99),
];

const GAMES_PER_ITER: u64 = 16;

fn play_tier(size: Coord2, mines: CellCount) -> u32 {
    let start = (size.0 / 2, size.1 / 2);
    let mut cleared = 0;
    for seed in 0..GAMES_PER_ITER {
        let layout =
            RandomLayoutGenerator::new(seed, start, StartTile::AlwaysZero).generate(size, mines);
        let config = layout.agent_config(start).with_seed(seed).with_sweep(true);
        let Ok(mut agent) = Agent::new(config) else {
            continue;
        };
        let mut referee = Referee::new(layout);
        let max_turns = 2 * u32::from(mult(size.0, size.1));
        if let Ok(report) = play_out(&mut agent, &mut referee, max_turns) {
            if report.outcome == GameOutcome::Cleared {
                cleared += 1;
            }
        }
    }
    cleared
}

fn bench_agent_tiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("agent_tiers");
    for (name, size, mines) in TIERS {
        group.bench_with_input(BenchmarkId::from_parameter(name), &(size, mines), |b, &(size, mines)| {
            b.iter(|| play_tier(black_box(size), black_box(mines)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_agent_tiers);
criterion_main!(benches);
