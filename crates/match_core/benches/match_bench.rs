use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use match_core::{aggregate, simulate_batch, MatchSimulator, Player, Position, SimConfig, Team};

const SHAPE: [Position; 11] = [
    Position::GK,
    Position::DL,
    Position::DC,
    Position::DC,
    Position::DR,
    Position::DMC,
    Position::ML,
    Position::MC,
    Position::MR,
    Position::FC,
    Position::FC,
];

fn team(name: &str, value: u8) -> Team {
    let players = SHAPE
        .iter()
        .enumerate()
        .map(|(i, pos)| Player::uniform(format!("{name} {i}"), *pos, value).expect("valid player"))
        .collect();
    Team::new(name, players).expect("valid team")
}

fn bench_single_match(c: &mut Criterion) {
    let (home, away) = (team("Home", 12), team("Away", 10));

    c.bench_function("simulate_90_minutes", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            let mut sim = MatchSimulator::new(home.clone(), away.clone(), 90, seed).expect("valid match");
            black_box(sim.run().len())
        })
    });

    let mut sim = MatchSimulator::new(home.clone(), away.clone(), 90, 42).expect("valid match");
    let log = sim.run().to_vec();
    c.bench_function("aggregate_90_minutes", |b| b.iter(|| black_box(aggregate(&log, &home, &away))));
}

fn bench_batch(c: &mut Criterion) {
    let (home, away) = (team("Home", 12), team("Away", 10));
    let config = SimConfig::default();
    let mut group = c.benchmark_group("batch");
    group.sample_size(10);
    for matches in [100u32, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(matches), &matches, |b, &matches| {
            b.iter(|| black_box(simulate_batch(&home, &away, 90, matches, 7, &config).expect("batch")))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_match, bench_batch);
criterion_main!(benches);
