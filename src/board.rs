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

//! The board: a mailbox of squares, bitboards and piece lists kept in sync,
//! and a stack-based `make_move`/`unmake_move` pair that mutates in place
//! instead of cloning a new position per move.

use std::fmt::{self, Display, Formatter};

use crate::{
    chess_move::{Move, MoveFlag},
    defs::{Piece, PieceType, Side, Square},
    piece_list::PieceList,
    bitboard::Bitboard,
    util::Stack,
    zobrist,
};

/// No en-passant file is available this move.
const NO_EP_FILE: u8 = 8;

/// The irreversible part of a position, packed into 20 of a `u32`'s bits:
/// the 4-bit castle-rights word, the en-passant file (`0..8`, or
/// [`NO_EP_FILE`]), the piece captured by the move that produced this state,
/// and the halfmove clock.
///
/// One of these lives on [`Board`] as the current state; one more is pushed
/// to [`Board::game_state_stack`] per `make_move` call, holding the state
/// *before* that move, so `unmake_move` can restore it without recomputing
/// anything.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct GameState(u32);

impl GameState {
    const CASTLE_SHIFT: u32 = 0;
    const EP_SHIFT: u32 = 4;
    const CAPTURED_SHIFT: u32 = 8;
    const HALFMOVE_SHIFT: u32 = 13;
    const CASTLE_MASK: u32 = 0xF;
    const EP_MASK: u32 = 0xF;
    const CAPTURED_MASK: u32 = 0x1F;
    const HALFMOVE_MASK: u32 = 0x7F;

    const fn new(castle_rights: u8, en_passant_file: u8, captured: Piece, halfmove_clock: u16) -> Self {
        Self(
            ((castle_rights as u32) << Self::CASTLE_SHIFT)
                | ((en_passant_file as u32) << Self::EP_SHIFT)
                | ((captured.0 as u32) << Self::CAPTURED_SHIFT)
                | ((halfmove_clock as u32) << Self::HALFMOVE_SHIFT),
        )
    }

    const fn castle_rights(self) -> u8 {
        ((self.0 >> Self::CASTLE_SHIFT) & Self::CASTLE_MASK) as u8
    }

    const fn en_passant_file(self) -> u8 {
        ((self.0 >> Self::EP_SHIFT) & Self::EP_MASK) as u8
    }

    const fn captured_piece(self) -> Piece {
        Piece(((self.0 >> Self::CAPTURED_SHIFT) & Self::CAPTURED_MASK) as u8)
    }

    const fn halfmove_clock(self) -> u16 {
        ((self.0 >> Self::HALFMOVE_SHIFT) & Self::HALFMOVE_MASK) as u16
    }
}

impl Default for GameState {
    /// Full castle rights, no en-passant square, no capture, a clean clock —
    /// the starting position's state.
    fn default() -> Self {
        Self::new(0b1111, NO_EP_FILE, Piece::NONE, 0)
    }
}

/// White kingside castle right.
pub const CASTLE_WK: u8 = 0b0001;
/// White queenside castle right.
pub const CASTLE_WQ: u8 = 0b0010;
/// Black kingside castle right.
pub const CASTLE_BK: u8 = 0b0100;
/// Black queenside castle right.
pub const CASTLE_BQ: u8 = 0b1000;

/// A chess position: piece placement, whose move it is, and enough history
/// to undo any move made on it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Board {
    /// One entry per square; [`Piece::NONE`] where empty.
    squares: [Piece; 64],
    /// Whose turn it is.
    side_to_move: Side,
    /// Total half-moves made since the position was set up.
    ply_counter: u32,
    /// The position's Zobrist hash, maintained incrementally.
    zobrist_hash: u64,
    /// `piece_lists[side][piece_type.piece_list_index()]`. Kings are not
    /// tracked here.
    piece_lists: [[PieceList; 5]; 2],
    /// `king_square[side]`.
    king_square: [Square; 2],
    /// `bitboards[side][piece_type_index]`, `0` = pawn .. `5` = king.
    bitboards: [[Bitboard; 6]; 2],
    /// The current irreversible state.
    game_state: GameState,
    /// One entry per made move, each the state *before* that move, so
    /// `unmake_move` can pop back to it.
    game_state_stack: Stack<GameState>,
    /// One hash per made move (the hash *after* that move), used to count
    /// repetitions.
    hash_history: Vec<u64>,
}

impl Board {
    /// An empty board: no pieces, White to move, no castle rights.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            squares: [Piece::NONE; 64],
            side_to_move: Side::White,
            ply_counter: 0,
            zobrist_hash: 0,
            piece_lists: Default::default(),
            king_square: [Square(0); 2],
            bitboards: [[Bitboard::EMPTY; 6]; 2],
            game_state: GameState::new(0, NO_EP_FILE, Piece::NONE, 0),
            game_state_stack: Stack::new(),
            hash_history: Vec::new(),
        }
    }

    /// The standard starting position.
    ///
    /// # Panics
    ///
    /// Never: [`crate::fen::STARTPOS`] is a compile-time constant known to
    /// parse.
    #[must_use]
    pub fn starting_position() -> Self {
        crate::fen::parse(crate::fen::STARTPOS).expect("STARTPOS is a valid FEN")
    }

    /// The piece on `square`, or [`Piece::NONE`] if empty.
    #[must_use]
    pub fn piece_at(&self, square: Square) -> Piece {
        self.squares[usize::from(square.0)]
    }

    /// Whose turn it is.
    #[must_use]
    pub const fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    /// Total half-moves made since the position was set up.
    #[must_use]
    pub const fn ply_counter(&self) -> u32 {
        self.ply_counter
    }

    /// The position's Zobrist hash.
    #[must_use]
    pub const fn zobrist_hash(&self) -> u64 {
        self.zobrist_hash
    }

    /// The square `side`'s king is on.
    #[must_use]
    pub fn king_square(&self, side: Side) -> Square {
        self.king_square[side.to_index()]
    }

    /// The set of squares occupied by `side`'s pieces of `piece_type`.
    #[must_use]
    pub fn pieces(&self, side: Side, piece_type: PieceType) -> Bitboard {
        self.bitboards[side.to_index()][bb_index(piece_type)]
    }

    /// The set of squares occupied by any of `side`'s pieces.
    #[must_use]
    pub fn occupancy(&self, side: Side) -> Bitboard {
        self.bitboards[side.to_index()]
            .iter()
            .fold(Bitboard::EMPTY, |acc, &bb| acc | bb)
    }

    /// The set of squares occupied by any piece.
    #[must_use]
    pub fn all_occupancy(&self) -> Bitboard {
        self.occupancy(Side::White) | self.occupancy(Side::Black)
    }

    /// The squares occupied by `side`'s pieces of `piece_type`, excluding the
    /// king (tracked separately by [`Board::king_square`]).
    #[must_use]
    pub fn piece_list(&self, side: Side, piece_type: PieceType) -> &PieceList {
        &self.piece_lists[side.to_index()][piece_type.piece_list_index()]
    }

    /// The current castle-rights word (bit0 WK, bit1 WQ, bit2 BK, bit3 BQ).
    #[must_use]
    pub const fn castle_rights(&self) -> u8 {
        self.game_state.castle_rights()
    }

    /// The file (`0..8`) a pawn may currently capture en passant onto, or
    /// `None` if no such capture is available.
    #[must_use]
    pub const fn en_passant_file(&self) -> Option<u8> {
        match self.game_state.en_passant_file() {
            NO_EP_FILE => None,
            file => Some(file),
        }
    }

    /// The halfmove clock (half-moves since the last pawn move or capture),
    /// used for the fifty-move rule.
    #[must_use]
    pub const fn halfmove_clock(&self) -> u16 {
        self.game_state.halfmove_clock()
    }

    /// `true` if the current position is drawn by the fifty-move rule or by
    /// threefold repetition.
    ///
    /// Threefold repetition is counted against the full history: the
    /// current hash, plus every hash in [`Board::hash_history`], that are
    /// equal to the current one.
    #[must_use]
    pub fn is_draw_by_rule(&self) -> bool {
        if self.game_state.halfmove_clock() >= 100 {
            return true;
        }
        let occurrences = self
            .hash_history
            .iter()
            .rev()
            .take(self.game_state.halfmove_clock() as usize + 1)
            .filter(|&&hash| hash == self.zobrist_hash)
            .count();
        occurrences >= 3
    }

    /// Sets whose turn it is, without touching anything else. Used by the
    /// FEN parser while assembling a position from scratch.
    pub(crate) fn set_side_to_move(&mut self, side: Side) {
        self.side_to_move = side;
    }

    /// Sets the total half-move counter directly. Used by the FEN parser,
    /// which derives it from the fullmove number and side to move.
    pub(crate) fn set_ply_counter(&mut self, ply: u32) {
        self.ply_counter = ply;
    }

    /// Finishes assembling a position parsed from FEN: records the
    /// irreversible state fields that [`Board::put_piece`] doesn't touch,
    /// and folds them (plus the side to move) into the Zobrist hash, which
    /// up to this point only reflects piece placement.
    ///
    /// Must be called exactly once, after every piece has been placed and
    /// [`Board::set_side_to_move`] has been called.
    pub(crate) fn finalize_from_fen(
        &mut self,
        castle_rights: u8,
        en_passant_file: Option<u8>,
        halfmove_clock: u16,
    ) {
        let ep_file = en_passant_file.unwrap_or(NO_EP_FILE);
        self.game_state = GameState::new(castle_rights, ep_file, Piece::NONE, halfmove_clock);
        if matches!(self.side_to_move, Side::Black) {
            self.zobrist_hash ^= zobrist::black_to_move();
        }
        self.zobrist_hash ^= zobrist::castle_rights(castle_rights);
        if let Some(file) = en_passant_file {
            self.zobrist_hash ^= zobrist::en_passant_file(file);
        }
        self.hash_history.clear();
        self.hash_history.push(self.zobrist_hash);
    }

    /// Places `piece` on `square`, updating the mailbox, bitboards, piece
    /// lists and hash. `square` must be empty.
    ///
    /// # Panics
    ///
    /// Panics (in debug) if `piece` is [`Piece::NONE`] or `square` is
    /// already occupied.
    pub(crate) fn put_piece(&mut self, square: Square, piece: Piece) {
        debug_assert!(!piece.is_none(), "cannot place the empty-square sentinel");
        debug_assert!(self.squares[usize::from(square.0)].is_none(), "square already occupied");
        let side = piece.side().expect("non-empty piece has a side");
        let piece_type = piece.piece_type().expect("non-empty piece has a type");
        self.squares[usize::from(square.0)] = piece;
        self.bitboards[side.to_index()][bb_index(piece_type)] =
            self.bitboards[side.to_index()][bb_index(piece_type)].with(square);
        if piece_type == PieceType::King {
            self.king_square[side.to_index()] = square;
        } else {
            self.piece_lists[side.to_index()][piece_type.piece_list_index()].add(square);
        }
        self.zobrist_hash ^= zobrist::piece_square(side, piece_type, square);
    }

    /// Removes the piece on `square` and returns it.
    ///
    /// # Panics
    ///
    /// Panics (in debug) if `square` is empty.
    fn remove_piece(&mut self, square: Square) -> Piece {
        let piece = self.squares[usize::from(square.0)];
        debug_assert!(!piece.is_none(), "cannot remove from an empty square");
        let side = piece.side().expect("non-empty piece has a side");
        let piece_type = piece.piece_type().expect("non-empty piece has a type");
        self.squares[usize::from(square.0)] = Piece::NONE;
        self.bitboards[side.to_index()][bb_index(piece_type)] =
            self.bitboards[side.to_index()][bb_index(piece_type)].without(square);
        if piece_type != PieceType::King {
            self.piece_lists[side.to_index()][piece_type.piece_list_index()].remove(square);
        }
        self.zobrist_hash ^= zobrist::piece_square(side, piece_type, square);
        piece
    }

    /// Moves the piece on `from` to `to` without capturing. `to` must be
    /// empty and `from` must be occupied.
    fn relocate_piece(&mut self, from: Square, to: Square) {
        let piece = self.squares[usize::from(from.0)];
        debug_assert!(!piece.is_none(), "cannot relocate from an empty square");
        debug_assert!(self.squares[usize::from(to.0)].is_none(), "relocation target occupied");
        let side = piece.side().expect("non-empty piece has a side");
        let piece_type = piece.piece_type().expect("non-empty piece has a type");
        self.squares[usize::from(from.0)] = Piece::NONE;
        self.squares[usize::from(to.0)] = piece;
        let toggled = Bitboard::from(from) | Bitboard::from(to);
        self.bitboards[side.to_index()][bb_index(piece_type)] ^= toggled;
        if piece_type == PieceType::King {
            self.king_square[side.to_index()] = to;
        } else {
            self.piece_lists[side.to_index()][piece_type.piece_list_index()].relocate(from, to);
        }
        self.zobrist_hash ^= zobrist::piece_square(side, piece_type, from);
        self.zobrist_hash ^= zobrist::piece_square(side, piece_type, to);
    }

    /// Applies `mv` to the position, assumed to be legal. Pushes enough
    /// state onto the board's internal stacks for a matching
    /// [`Board::unmake_move`] to undo it exactly.
    pub fn make_move(&mut self, mv: Move) {
        let start = mv.start();
        let target = mv.target();
        let flag = mv.flag();
        let mover = self.piece_at(start);
        let side = mover.side().expect("make_move called with an empty start square");
        let moving_type = mover.piece_type().expect("make_move called with an empty start square");

        let old_state = self.game_state;
        let old_rights = old_state.castle_rights();
        let old_ep_file = old_state.en_passant_file();

        let en_passant_capture_square = en_passant_captured_square(target, side);

        let captured_piece = if flag == MoveFlag::EnPassant {
            self.remove_piece(en_passant_capture_square)
        } else if !self.piece_at(target).is_none() {
            self.remove_piece(target)
        } else {
            Piece::NONE
        };

        if let Some(promoted_type) = mv.promotion_piece_type() {
            self.remove_piece(start);
            self.put_piece(target, Piece::new(side, promoted_type));
        } else if flag == MoveFlag::Castle {
            self.relocate_piece(start, target);
            let (rook_start, rook_target) = castle_rook_squares(side, target.file() > start.file());
            self.relocate_piece(rook_start, rook_target);
        } else {
            self.relocate_piece(start, target);
        }

        let mut new_rights = old_rights;
        if moving_type == PieceType::King {
            new_rights &= !side_castle_mask(side);
        }
        new_rights &= !corner_castle_mask(start);
        if !captured_piece.is_none() {
            new_rights &= !corner_castle_mask(target);
        }

        let new_ep_file = if flag == MoveFlag::DoublePush { start.file() } else { NO_EP_FILE };

        let new_halfmove = if !captured_piece.is_none() || moving_type == PieceType::Pawn {
            0
        } else {
            old_state.halfmove_clock() + 1
        };

        self.zobrist_hash ^= zobrist::castle_rights(old_rights) ^ zobrist::castle_rights(new_rights);
        if old_ep_file != NO_EP_FILE {
            self.zobrist_hash ^= zobrist::en_passant_file(old_ep_file);
        }
        if new_ep_file != NO_EP_FILE {
            self.zobrist_hash ^= zobrist::en_passant_file(new_ep_file);
        }
        self.zobrist_hash ^= zobrist::black_to_move();

        self.game_state_stack.push(old_state);
        self.game_state = GameState::new(new_rights, new_ep_file, captured_piece, new_halfmove);
        self.side_to_move = self.side_to_move.flip();
        self.ply_counter += 1;
        self.hash_history.push(self.zobrist_hash);

        self.debug_check_invariants();
    }

    /// Undoes the most recent `make_move`. `mv` must be the exact move that
    /// was passed to it.
    ///
    /// # Panics
    ///
    /// Panics (in debug) if called on a board with no moves made.
    pub fn unmake_move(&mut self, mv: Move) {
        debug_assert!(!self.game_state_stack.is_empty(), "unmake_move called with nothing to undo");

        let mover_side = self.side_to_move.flip();
        let start = mv.start();
        let target = mv.target();
        let flag = mv.flag();

        let captured_piece = self.game_state.captured_piece();
        let new_rights = self.game_state.castle_rights();
        let new_ep_file = self.game_state.en_passant_file();

        if mv.is_promotion() {
            self.remove_piece(target);
            self.put_piece(start, Piece::new(mover_side, PieceType::Pawn));
        } else if flag == MoveFlag::Castle {
            self.relocate_piece(target, start);
            let (rook_start, rook_target) = castle_rook_squares(mover_side, target.file() > start.file());
            self.relocate_piece(rook_target, rook_start);
        } else {
            self.relocate_piece(target, start);
        }

        if flag == MoveFlag::EnPassant {
            let capture_square = en_passant_captured_square(target, mover_side);
            self.put_piece(capture_square, Piece::new(mover_side.flip(), PieceType::Pawn));
        } else if !captured_piece.is_none() {
            self.put_piece(target, captured_piece);
        }

        self.hash_history.pop();
        let old_state = self.game_state_stack.pop().expect("checked non-empty above");
        let old_rights = old_state.castle_rights();
        let old_ep_file = old_state.en_passant_file();

        self.zobrist_hash ^= zobrist::castle_rights(old_rights) ^ zobrist::castle_rights(new_rights);
        if old_ep_file != NO_EP_FILE {
            self.zobrist_hash ^= zobrist::en_passant_file(old_ep_file);
        }
        if new_ep_file != NO_EP_FILE {
            self.zobrist_hash ^= zobrist::en_passant_file(new_ep_file);
        }
        self.zobrist_hash ^= zobrist::black_to_move();

        self.game_state = old_state;
        self.side_to_move = mover_side;
        self.ply_counter -= 1;

        self.debug_check_invariants();
    }

    /// Walks every square, checking that the mailbox, bitboards and piece
    /// lists agree on what's there. A no-op in release builds.
    ///
    /// # Panics
    ///
    /// Panics (in debug) on the first square found to disagree.
    fn debug_check_invariants(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        for index in 0..64u8 {
            let square = Square(index);
            let piece = self.piece_at(square);
            if piece.is_none() {
                continue;
            }
            let side = piece.side().expect("non-empty piece has a side");
            let piece_type = piece.piece_type().expect("non-empty piece has a type");
            let tracked = if piece_type == PieceType::King {
                self.king_square[side.to_index()] == square
            } else {
                self.bitboards[side.to_index()][bb_index(piece_type)].contains(square)
                    && self.piece_lists[side.to_index()][piece_type.piece_list_index()].contains(square)
            };
            if !tracked {
                #[cfg(feature = "logging")]
                log::error!(
                    "square {square} holds {piece:?} but is not tracked by its bitboard or piece list"
                );
                debug_assert!(tracked, "mailbox/bitboard-or-piece-list desync at {square}");
            }
        }
    }
}

/// The index of `piece_type` into a `[T; 6]` per-piece-type array (pawn `0`
/// through king `5`).
const fn bb_index(piece_type: PieceType) -> usize {
    piece_type as usize - 1
}

/// The square the captured pawn actually stands on for an en-passant
/// capture landing on `target`, given the capturing `side`.
fn en_passant_captured_square(target: Square, side: Side) -> Square {
    let offset: i16 = if matches!(side, Side::White) { 8 } else { -8 };
    Square((i16::from(target.0) + offset) as u8)
}

/// The castle-rights bits belonging to `side` (both of that side's rights).
const fn side_castle_mask(side: Side) -> u8 {
    match side {
        Side::White => CASTLE_WK | CASTLE_WQ,
        Side::Black => CASTLE_BK | CASTLE_BQ,
    }
}

/// The single castle-rights bit forfeited when a rook leaves, or is
/// captured on, `square` — `0` if `square` is not one of the four corners.
const fn corner_castle_mask(square: Square) -> u8 {
    match square.0 {
        63 => CASTLE_WK, // h1
        56 => CASTLE_WQ, // a1
        7 => CASTLE_BK,  // h8
        0 => CASTLE_BQ,  // a8
        _ => 0,
    }
}

/// The rook's start and target squares for a castling move by `side`,
/// `kingside` or queenside.
const fn castle_rook_squares(side: Side, kingside: bool) -> (Square, Square) {
    let rank = match side {
        Side::White => 7,
        Side::Black => 0,
    };
    let (start_file, target_file) = if kingside { (7, 5) } else { (0, 3) };
    (Square::from_rank_file(rank, start_file), Square::from_rank_file(rank, target_file))
}

impl Display for Board {
    /// An 8x8 ASCII grid, rank 8 first, matching how a board is normally
    /// read, followed by the side to move.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for rank in 0..8u8 {
            for file in 0..8u8 {
                let square = Square::from_rank_file(rank, file);
                write!(f, "{} ", char::from(self.piece_at(square)))?;
            }
            writeln!(f)?;
        }
        write!(f, "{} to move", self.side_to_move)
    }
}

#[cfg(test)]
mod tests {
    use super::Board;
    use crate::{
        chess_move::{Move, MoveFlag},
        defs::{Piece, PieceType, Side, Square},
    };

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).expect("valid square")
    }

    fn small_board() -> Board {
        let mut board = Board::empty();
        board.put_piece(sq("e1"), Piece::new(Side::White, PieceType::King));
        board.put_piece(sq("e8"), Piece::new(Side::Black, PieceType::King));
        board.put_piece(sq("e2"), Piece::new(Side::White, PieceType::Pawn));
        board
    }

    #[test]
    fn make_then_unmake_restores_the_exact_position() {
        let before = small_board();
        let mut board = before.clone();
        let mv = Move::new(sq("e2"), sq("e4"), MoveFlag::DoublePush);
        board.make_move(mv);
        assert_ne!(board, before);
        board.unmake_move(mv);
        assert_eq!(board, before);
    }

    #[test]
    fn capture_restores_the_captured_piece_on_unmake() {
        let mut board = Board::empty();
        board.put_piece(sq("e1"), Piece::new(Side::White, PieceType::King));
        board.put_piece(sq("e8"), Piece::new(Side::Black, PieceType::King));
        board.put_piece(sq("d4"), Piece::new(Side::White, PieceType::Bishop));
        board.put_piece(sq("g7"), Piece::new(Side::Black, PieceType::Pawn));
        let before = board.clone();
        let mv = Move::new(sq("d4"), sq("g7"), MoveFlag::None);
        board.make_move(mv);
        assert!(board.piece_at(sq("d4")).is_none());
        assert_eq!(board.piece_at(sq("g7")).piece_type(), Some(PieceType::Bishop));
        board.unmake_move(mv);
        assert_eq!(board, before);
    }

    #[test]
    fn en_passant_capture_removes_the_passed_pawn() {
        let mut board = Board::empty();
        board.put_piece(sq("e1"), Piece::new(Side::White, PieceType::King));
        board.put_piece(sq("e8"), Piece::new(Side::Black, PieceType::King));
        board.put_piece(sq("d5"), Piece::new(Side::White, PieceType::Pawn));
        board.put_piece(sq("c5"), Piece::new(Side::Black, PieceType::Pawn));
        let before = board.clone();
        let mv = Move::new(sq("d5"), sq("c6"), MoveFlag::EnPassant);
        board.make_move(mv);
        assert!(board.piece_at(sq("c5")).is_none());
        assert_eq!(board.piece_at(sq("c6")).piece_type(), Some(PieceType::Pawn));
        board.unmake_move(mv);
        assert_eq!(board, before);
    }

    #[test]
    fn promotion_replaces_the_pawn_and_unmake_restores_it() {
        let mut board = Board::empty();
        board.put_piece(sq("e1"), Piece::new(Side::White, PieceType::King));
        board.put_piece(sq("e8"), Piece::new(Side::Black, PieceType::King));
        board.put_piece(sq("a7"), Piece::new(Side::White, PieceType::Pawn));
        let before = board.clone();
        let mv = Move::new(sq("a7"), sq("a8"), MoveFlag::PromoteQueen);
        board.make_move(mv);
        assert_eq!(board.piece_at(sq("a8")).piece_type(), Some(PieceType::Queen));
        board.unmake_move(mv);
        assert_eq!(board, before);
        assert_eq!(board.piece_at(sq("a7")).piece_type(), Some(PieceType::Pawn));
    }

    #[test]
    fn kingside_castle_moves_the_rook_too() {
        let mut board = Board::empty();
        board.put_piece(sq("e1"), Piece::new(Side::White, PieceType::King));
        board.put_piece(sq("h1"), Piece::new(Side::White, PieceType::Rook));
        board.put_piece(sq("e8"), Piece::new(Side::Black, PieceType::King));
        let before = board.clone();
        let mv = Move::new(sq("e1"), sq("g1"), MoveFlag::Castle);
        board.make_move(mv);
        assert_eq!(board.piece_at(sq("g1")).piece_type(), Some(PieceType::King));
        assert_eq!(board.piece_at(sq("f1")).piece_type(), Some(PieceType::Rook));
        assert!(board.piece_at(sq("h1")).is_none());
        board.unmake_move(mv);
        assert_eq!(board, before);
    }

    #[test]
    fn king_move_forfeits_both_castle_rights() {
        let mut board = small_board();
        board.put_piece(sq("a1"), Piece::new(Side::White, PieceType::Rook));
        board.put_piece(sq("h1"), Piece::new(Side::White, PieceType::Rook));
        board.game_state = super::GameState::new(0b1111, super::NO_EP_FILE, Piece::NONE, 0);
        let mv = Move::new(sq("e1"), sq("f1"), MoveFlag::None);
        board.make_move(mv);
        assert_eq!(board.castle_rights() & (super::CASTLE_WK | super::CASTLE_WQ), 0);
    }

    #[test]
    fn fifty_move_rule_triggers_at_100_halfmoves() {
        let mut board = small_board();
        board.game_state = super::GameState::new(0, super::NO_EP_FILE, Piece::NONE, 99);
        assert!(!board.is_draw_by_rule());
        board.game_state = super::GameState::new(0, super::NO_EP_FILE, Piece::NONE, 100);
        assert!(board.is_draw_by_rule());
    }
}
