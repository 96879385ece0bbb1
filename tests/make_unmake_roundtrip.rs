//! For any sequence of legal moves drawn from `generate_moves`, playing them
//! out and then unmaking them in reverse order reproduces the starting
//! board exactly (squares, lists, bitboards, hash, stacks, side).

use proptest::prelude::*;
use rookery::{board::Board, movegen::generate_moves};

proptest! {
    #[test]
    fn make_then_unmake_a_random_legal_sequence_is_the_identity(
        choices in proptest::collection::vec(any::<u32>(), 0..40)
    ) {
        let start = Board::starting_position();
        let mut board = start.clone();
        let mut played = Vec::new();

        for choice in choices {
            let moves = generate_moves(&board).moves;
            if moves.is_empty() {
                break;
            }
            let mv = moves[(choice as usize) % moves.len()];
            board.make_move(mv);
            played.push(mv);
        }

        for mv in played.into_iter().rev() {
            board.unmake_move(mv);
        }

        prop_assert_eq!(board, start);
    }
}
