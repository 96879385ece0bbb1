//! The concrete scenarios from the testable-properties list that aren't
//! already covered inline by `movegen`'s own test module (S2-S5): S1 and S6.

use rookery::{
    board::Board,
    chess_move::{Move, MoveFlag},
    defs::{Side, Square},
};

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).expect("valid square")
}

#[test]
fn scenario_s1_opening_sets_ep_file_and_keeps_the_clean_halfmove_clock() {
    let mut board = Board::starting_position();
    let mv = Move::new(sq("e2"), sq("e4"), MoveFlag::DoublePush);
    board.make_move(mv);

    assert_eq!(board.side_to_move(), Side::Black);
    assert_eq!(board.en_passant_file(), Some(4));
    assert_eq!(board.halfmove_clock(), 0);
}

#[test]
fn scenario_s6_shuffling_knights_back_and_forth_is_a_threefold_draw() {
    let mut board = Board::starting_position();
    let cycle = [("b1", "c3"), ("b8", "c6"), ("c3", "b1"), ("c6", "b8")];

    for _ in 0..3 {
        for &(from, to) in &cycle {
            board.make_move(Move::new(sq(from), sq(to), MoveFlag::None));
        }
    }

    assert_eq!(board.ply_counter(), 12);
    assert!(board.is_draw_by_rule());
}
