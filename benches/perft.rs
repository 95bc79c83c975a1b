//! Criterion benchmarks measuring move generation and perft throughput.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use roque::perft::perft;
use roque::position::Position;

fn movegen_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");
    let positions: Vec<Position> = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "2n4k/1PP5/6K1/3Pp1Q1/3N4/3P4/P3R3/8 w - e6 0 1",
        "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1",
        "4r2k/8/8/8/4R3/8/8/4K3 w - - 0 1",
    ]
    .iter()
    .map(|fen| Position::try_from(*fen).expect("benchmark positions are legal"))
    .collect();
    group.throughput(criterion::Throughput::Elements(positions.len() as u64));
    group.bench_with_input(
        BenchmarkId::new("generate_moves", format!("{} positions", positions.len())),
        &positions,
        |b, positions| {
            b.iter(|| {
                for position in positions {
                    std::hint::black_box(position.generate_moves());
                }
            });
        },
    );
    group.finish();
}

criterion_group! {
    name = movegen;
    config = Criterion::default().sample_size(100);
    targets = movegen_bench
}

// This acts both as a performance and a correctness check: the node count is
// asserted inside the measured closure.
fn perft_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    for (depth, nodes) in &[(1usize, 20u64), (2, 400), (3, 8902)] {
        let position = Position::starting();
        group.throughput(criterion::Throughput::Elements(*nodes));
        group.bench_with_input(
            BenchmarkId::new("perft", format!("depth {depth}, nodes {nodes}")),
            depth,
            |b, &depth| {
                b.iter(|| {
                    assert_eq!(perft(&position, depth), *nodes);
                });
            },
        );
    }
    group.finish();
}

criterion_group! {
    name = perft_nodes;
    config = Criterion::default().sample_size(20);
    targets = perft_bench
}

criterion_main!(movegen, perft_nodes);
