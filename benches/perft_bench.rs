//! Perft and move-generation benchmarks, grounded in the retrieval pack's
//! own `criterion` benchmark shape rather than the teacher's hand-rolled
//! `Instant`-based timer.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use rookery::{board::Board, movegen::generate_moves};

fn perft(board: &mut Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = generate_moves(board).moves;
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut total = 0;
    for mv in moves {
        board.make_move(mv);
        total += perft(board, depth - 1);
        board.unmake_move(mv);
    }
    total
}

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    let mut startpos = Board::starting_position();
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| perft(black_box(&mut startpos), black_box(depth)));
        });
    }

    let mut kiwipete: Board = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
        .parse()
        .expect("valid FEN");
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| perft(black_box(&mut kiwipete), black_box(depth)));
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    let startpos = Board::starting_position();
    group.bench_function("startpos", |b| b.iter(|| generate_moves(black_box(&startpos))));

    let kiwipete: Board = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
        .parse()
        .expect("valid FEN");
    group.bench_function("kiwipete", |b| b.iter(|| generate_moves(black_box(&kiwipete))));

    group.finish();
}

criterion_group!(benches, bench_perft, bench_movegen);
criterion_main!(benches);
