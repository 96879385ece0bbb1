/*
 * Rookery, a chess position engine
 *
 * Rookery is free software: you can redistribute it and/or modify it under
 * the terms of the GNU General Public License as published by the Free
 * Software Foundation, either version 3 of the License, or (at your option)
 * any later version.
 *
 * Rookery is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
 * FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
 * details.
 *
 * You should have received a copy of the GNU General Public License along
 * with Rookery. If not, see <https://www.gnu.org/licenses/>.
 */

//! The contract a search implementation plugs into: [`Ai`] is handed its own
//! [`Board`] copy in [`Ai::init`], and replies to moves asynchronously
//! through the [`AiHandle`] it hands back from [`Ai::accept_move`]. No
//! search, evaluation or opening-book code lives in this crate; only the
//! boundary a host's search plugs into.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::{board::Board, chess_move::Move};

/// A search implementation the game-model façade can hand turns to.
///
/// Implementations own their own [`Board`], obtained via [`Ai::init`] and
/// kept up to date by the moves passed to [`Ai::accept_move`]; they must
/// never see or touch the façade's board. `accept_move` is expected to
/// return quickly — any actual search happens on a worker thread spawned
/// inside it, reporting back through the returned [`AiHandle`].
pub trait Ai: Send {
    /// Hands the AI its own copy of the starting position. Called once, by
    /// the façade's `set_position`, before any moves are played.
    fn init(&mut self, board: Board);

    /// Informs the AI that `mv` was just played (by the opponent or by a
    /// human, the AI cannot tell and does not need to), and asks it to
    /// choose its own reply for the resulting position.
    ///
    /// Returns immediately with an [`AiHandle`] the caller polls (or blocks
    /// on) for the chosen move.
    fn accept_move(&mut self, mv: Move) -> AiHandle;
}

/// A pending reply from an [`Ai`], plus the worker thread producing it.
///
/// The façade owns the only [`Board`] driving the game; it never touches an
/// AI's internal state directly; it just holds one of these until a reply
/// move is ready, then applies that move to its own board on its own
/// thread. This is the hop from the AI's worker thread to the thread that
/// owns the game's `Board`.
pub struct AiHandle {
    /// The end of the channel the worker thread sends its chosen move down.
    receiver: Receiver<Move>,
    /// The worker thread itself, joined on drop. `None` once joined.
    worker: Option<JoinHandle<()>>,
}

impl AiHandle {
    /// Wraps a worker thread that will eventually send its chosen move down
    /// `sender`'s matching receiver.
    #[must_use]
    pub fn new(receiver: Receiver<Move>, worker: JoinHandle<()>) -> Self {
        Self { receiver, worker: Some(worker) }
    }

    /// Returns the reply move if the worker has produced one, without
    /// blocking.
    pub fn try_recv(&self) -> Option<Move> {
        match self.receiver.try_recv() {
            Ok(mv) => Some(mv),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Blocks until the worker produces its reply move.
    ///
    /// Returns `None` if the worker thread ended without replying (for
    /// example because the position it was given has no legal moves).
    pub fn recv(&self) -> Option<Move> {
        self.receiver.recv().ok()
    }
}

impl Drop for AiHandle {
    /// Joins the worker thread so it is never silently detached and
    /// outlived by the handle that was supposed to track it.
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// A minimal [`Ai`] that replies with a uniformly random legal move.
///
/// Exists to exercise the façade/AI boundary in tests; it is not a search
/// engine and carries no evaluation of any kind.
pub struct RandomMoveAi {
    /// The position this AI believes it is playing from.
    board: Board,
    /// The seed for the next reply's random draw, perturbed after each one.
    seed: u128,
}

impl RandomMoveAi {
    /// An AI seeded with `seed`, starting from the standard position until
    /// [`Ai::init`] is called.
    #[must_use]
    pub fn new(seed: u128) -> Self {
        Self { board: Board::starting_position(), seed }
    }
}

impl Ai for RandomMoveAi {
    fn init(&mut self, board: Board) {
        self.board = board;
    }

    fn accept_move(&mut self, mv: Move) -> AiHandle {
        self.board.make_move(mv);
        let mut board = self.board.clone();
        let seed = self.seed;
        let (sender, receiver) = mpsc::channel();
        let worker = thread::spawn(move || {
            let moves = crate::movegen::generate_moves(&board).moves;
            if moves.is_empty() {
                return;
            }
            let mut rng = oorandom::Rand64::new(seed);
            let index = rng.rand_range(0..moves.len() as u64) as usize;
            let chosen = moves[index];
            board.make_move(chosen);
            let _ = sender.send(chosen);
        });
        // Re-seeding on every call would repeat the same draw; perturb the
        // stored seed so consecutive replies from this AI are not identical.
        self.seed = self.seed.wrapping_add(1);
        AiHandle::new(receiver, worker)
    }
}

#[cfg(test)]
mod tests {
    use super::{Ai, RandomMoveAi};
    use crate::{board::Board, chess_move::Move, defs::Square};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).expect("valid square")
    }

    #[test]
    fn random_ai_replies_with_a_legal_move() {
        let mut ai = RandomMoveAi::new(0x9E37_79B9_7F4A_7C15);
        ai.init(Board::starting_position());
        let mv = Move::new(sq("e2"), sq("e4"), crate::chess_move::MoveFlag::DoublePush);
        let handle = ai.accept_move(mv);
        let reply = handle.recv().expect("starting position always has a reply for black");
        let mut board = Board::starting_position();
        board.make_move(mv);
        let legal = crate::movegen::generate_moves(&board).moves;
        assert!(legal.contains(&reply));
    }
}
