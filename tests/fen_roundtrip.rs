//! `fen -> board -> fen` is the identity on canonical-form FENs.

use rookery::{board::Board, fen};

const CANONICAL_FENS: &[&str] = &[
    fen::STARTPOS,
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1",
    "8/8/8/KPp4r/8/8/8/8 w - c6 0 1",
];

#[test]
fn canonical_fens_round_trip() {
    for &input in CANONICAL_FENS {
        let board: Board = input.parse().expect("valid FEN");
        assert_eq!(fen::to_fen(&board), input, "round-trip mismatch for {input}");
    }
}

#[test]
fn round_trip_survives_a_played_move() {
    let mut board = Board::starting_position();
    let moves = rookery::movegen::generate_moves(&board).moves;
    let e4 = moves
        .iter()
        .copied()
        .find(|mv| mv.start() == rookery::defs::Square::from_algebraic("e2").unwrap())
        .expect("white has a move from e2");
    board.make_move(e4);
    let fen = fen::to_fen(&board);
    let reparsed: Board = fen.parse().expect("valid FEN");
    assert_eq!(reparsed, board);
}
