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

//! The game-model façade a renderer drives: owns the one authoritative
//! [`Board`], the click state machine that turns a stream of tile clicks
//! into moves, and the per-side [`Ai`] handles that stand in for a human
//! when present.

use crate::{
    ai::Ai,
    board::Board,
    chess_move::Move,
    defs::{Piece, PieceType, Side, Square},
    error::FenError,
    movegen,
};

/// How a tile should be drawn, on top of whatever piece occupies it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileEffect {
    /// Nothing special about this tile.
    None,
    /// The currently selected square.
    Highlighted,
    /// An empty square the selected piece may legally move to.
    Spotted,
    /// An enemy-occupied square the selected piece may legally capture.
    Targeted,
    /// The side-to-move king's square, while in check.
    Checked,
}

/// One square's worth of renderable state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    /// The occupying piece, or [`Piece::NONE`].
    pub piece: Piece,
    /// The effect to draw on this tile.
    pub effect: TileEffect,
}

/// The selection state of the click state machine (§4.7 in the design
/// notes): either nothing is selected, or a friendly square is.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Selection {
    /// No square is selected.
    Idle,
    /// A friendly square is selected, awaiting a destination click.
    Selected(Square),
}

/// Owns the one authoritative [`Board`] plus the click state machine and
/// optional per-side AI handles.
///
/// A side is "human" exactly when its AI slot is empty; `handle_tile_clicked`
/// is a no-op whenever it is the AI's turn to move. Replies from an AI
/// arrive asynchronously; call [`Facade::poll_ai_reply`] from the thread
/// that owns this façade (e.g. once per render frame) to apply one once
/// it's ready.
pub struct Facade {
    /// The one authoritative position this façade is driving.
    board: Board,
    /// `ais[side]`, `None` when that side is human-controlled.
    ais: [Option<Box<dyn Ai>>; 2],
    /// The click state machine's current state.
    selection: Selection,
    /// The installed AI's in-flight reply, if one has been requested.
    pending: Option<crate::ai::AiHandle>,
}

impl Facade {
    /// A façade starting from the standard position, with no AI installed
    /// for either side.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Board::starting_position(),
            ais: [None, None],
            selection: Selection::Idle,
            pending: None,
        }
    }

    /// Installs (or removes, passing `None`) the AI controlling `side`.
    pub fn set_ai(&mut self, side: Side, ai: Option<Box<dyn Ai>>) {
        self.ais[side.to_index()] = ai;
    }

    /// The board currently being played on.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The currently selected square, if any.
    #[must_use]
    pub fn selected(&self) -> Option<Square> {
        match self.selection {
            Selection::Idle => None,
            Selection::Selected(sq) => Some(sq),
        }
    }

    /// Parses `fen`, installs it as the current position, clears any
    /// selection and pending AI reply, and notifies both installed AIs of
    /// the new starting position via [`Ai::init`].
    ///
    /// # Errors
    ///
    /// Returns the [`FenError`] describing the first malformed field; the
    /// current position is left untouched on failure.
    pub fn set_position(&mut self, fen: &str) -> Result<(), FenError> {
        let board = crate::fen::parse(fen)?;
        self.board = board;
        self.selection = Selection::Idle;
        self.pending = None;
        for ai in self.ais.iter_mut().flatten() {
            ai.init(self.board.clone());
        }
        #[cfg(feature = "logging")]
        log::info!("position set: {fen}");
        Ok(())
    }

    /// The current 8x8 grid of tile state, rank 8 first (row 0), a-file
    /// first (column 0) — matching [`Square::from_rank_file`].
    #[must_use]
    pub fn get_tiles(&self) -> [[Tile; 8]; 8] {
        let move_list = movegen::generate_moves(&self.board);
        let selected = self.selected();
        let legal_targets: Vec<Move> = match selected {
            Some(from) => move_list.moves.iter().copied().filter(|mv| mv.start() == from).collect(),
            None => Vec::new(),
        };

        let mut grid = [[Tile { piece: Piece::NONE, effect: TileEffect::None }; 8]; 8];
        let checked_king_square = move_list.is_check.then(|| self.board.king_square(self.board.side_to_move()));

        for rank in 0..8u8 {
            for file in 0..8u8 {
                let square = Square::from_rank_file(rank, file);
                let piece = self.board.piece_at(square);

                let effect = if Some(square) == selected {
                    TileEffect::Highlighted
                } else if let Some(mv) = legal_targets.iter().find(|mv| mv.target() == square) {
                    if self.board.piece_at(mv.target()).is_none() && !mv.is_en_passant() {
                        TileEffect::Spotted
                    } else {
                        TileEffect::Targeted
                    }
                } else if Some(square) == checked_king_square {
                    TileEffect::Checked
                } else {
                    TileEffect::None
                };

                grid[rank as usize][file as usize] = Tile { piece, effect };
            }
        }
        grid
    }

    /// Advances the click state machine with a click on `(row, col)`,
    /// returning the move applied, if any.
    ///
    /// A no-op (state unchanged, `None` returned) whenever it is an
    /// installed AI's turn to move: the renderer should treat clicks as
    /// disabled while `ais[side_to_move]` is present.
    pub fn handle_tile_clicked(&mut self, row: u8, col: u8) -> Option<Move> {
        let square = Square::from_rank_file(row, col);
        let side_to_move = self.board.side_to_move();

        if self.ais[side_to_move.to_index()].is_some() {
            #[cfg(feature = "logging")]
            log::debug!("click on {square} ignored: {side_to_move} is AI-controlled");
            return None;
        }

        let clicked_piece = self.board.piece_at(square);
        let clicked_is_movers = clicked_piece.side() == Some(side_to_move);

        let applied = match self.selection {
            Selection::Idle => {
                if clicked_is_movers {
                    self.selection = Selection::Selected(square);
                }
                None
            }
            Selection::Selected(from) => {
                if clicked_is_movers {
                    self.selection = Selection::Selected(square);
                    None
                } else {
                    self.selection = Selection::Idle;
                    self.legal_move_from_to(from, square)
                }
            }
        };

        #[cfg(feature = "logging")]
        log::debug!("click on {square}: selection now {:?}", self.selected());

        if let Some(mv) = applied {
            self.apply_move(mv);
        }
        applied
    }

    /// If this façade's current AI reply (if any) has arrived, applies it
    /// and returns it. Must be polled periodically by the thread that owns
    /// this façade; an AI's reply is never applied on its own worker
    /// thread.
    pub fn poll_ai_reply(&mut self) -> Option<Move> {
        let mv = self.pending.as_ref()?.try_recv()?;
        self.pending = None;
        self.apply_move(mv);
        Some(mv)
    }

    /// The unique legal move from `from` to `to`, choosing the queen
    /// promotion automatically when more than one legal move shares that
    /// (from, to) pair (i.e. the four promotion choices).
    fn legal_move_from_to(&self, from: Square, to: Square) -> Option<Move> {
        let candidates: Vec<Move> = movegen::generate_moves(&self.board)
            .moves
            .into_iter()
            .filter(|mv| mv.start() == from && mv.target() == to)
            .collect();
        if candidates.len() == 1 {
            return Some(candidates[0]);
        }
        candidates.into_iter().find(|mv| mv.promotion_piece_type() == Some(PieceType::Queen))
    }

    /// Applies `mv` to the board, then (if the side now to move has an AI
    /// installed) asks it to reply.
    fn apply_move(&mut self, mv: Move) {
        self.board.make_move(mv);
        #[cfg(feature = "logging")]
        log::info!("applied {mv}");

        let side_to_move = self.board.side_to_move();
        if let Some(ai) = self.ais[side_to_move.to_index()].as_mut() {
            self.pending = Some(ai.accept_move(mv));
        }
    }
}

impl Default for Facade {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Facade, TileEffect};
    use crate::{ai::RandomMoveAi, defs::Side};

    fn rc(square: &str) -> (u8, u8) {
        let sq = crate::defs::Square::from_algebraic(square).expect("valid square");
        (sq.rank(), sq.file())
    }

    #[test]
    fn clicking_an_own_piece_then_a_legal_square_plays_the_move() {
        let mut facade = Facade::new();
        let (r1, c1) = rc("e2");
        assert!(facade.handle_tile_clicked(r1, c1).is_none());
        let (r2, c2) = rc("e4");
        let mv = facade.handle_tile_clicked(r2, c2).expect("e2-e4 is legal");
        assert_eq!(facade.board().side_to_move(), Side::Black);
        assert_eq!(mv.start(), crate::defs::Square::from_algebraic("e2").unwrap());
        assert_eq!(mv.target(), crate::defs::Square::from_algebraic("e4").unwrap());
        assert_eq!(facade.selected(), None);
    }

    #[test]
    fn clicking_an_illegal_destination_clears_the_selection_without_moving() {
        let mut facade = Facade::new();
        let (r1, c1) = rc("e2");
        facade.handle_tile_clicked(r1, c1);
        let (r2, c2) = rc("e5");
        assert!(facade.handle_tile_clicked(r2, c2).is_none());
        assert_eq!(facade.selected(), None);
        assert_eq!(facade.board().side_to_move(), Side::White);
    }

    #[test]
    fn reselecting_another_own_piece_switches_the_selection() {
        let mut facade = Facade::new();
        let (r1, c1) = rc("e2");
        facade.handle_tile_clicked(r1, c1);
        let (r2, c2) = rc("d2");
        facade.handle_tile_clicked(r2, c2);
        assert_eq!(facade.selected(), Some(crate::defs::Square::from_algebraic("d2").unwrap()));
    }

    #[test]
    fn clicks_are_ignored_while_the_side_to_move_is_ai_controlled() {
        let mut facade = Facade::new();
        facade.set_ai(Side::White, Some(Box::new(RandomMoveAi::new(1))));
        let (r, c) = rc("e2");
        assert!(facade.handle_tile_clicked(r, c).is_none());
        assert_eq!(facade.selected(), None);
    }

    #[test]
    fn selected_square_is_highlighted_and_legal_targets_are_spotted() {
        let mut facade = Facade::new();
        let (r, c) = rc("e2");
        facade.handle_tile_clicked(r, c);
        let tiles = facade.get_tiles();
        let (tr, tc) = rc("e2");
        assert_eq!(tiles[tr as usize][tc as usize].effect, TileEffect::Highlighted);
        let (fr, fc) = rc("e4");
        assert_eq!(tiles[fr as usize][fc as usize].effect, TileEffect::Spotted);
    }

    #[test]
    fn set_position_clears_selection_and_pending_reply() {
        let mut facade = Facade::new();
        let (r, c) = rc("e2");
        facade.handle_tile_clicked(r, c);
        facade.set_position(crate::fen::STARTPOS).expect("valid FEN");
        assert_eq!(facade.selected(), None);
    }
}
