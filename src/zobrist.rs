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

//! Zobrist hashing: a deterministic, incrementally-maintained 64-bit
//! position hash.
//!
//! The tables are seeded from a fixed compile-time constant rather than an
//! OS random source or a file on disk, so the hash of a given position is
//! identical across runs and across machines — needed for repetition
//! detection and for a transposition table to be reusable at all. (An
//! earlier approach of caching random values in a file next to the
//! executable, and silently regenerating them on a cache miss, is exactly
//! the kind of thing that breaks that guarantee; this crate does not do
//! that.)

use lazy_static::lazy_static;
use oorandom::Rand64;

use crate::defs::{PieceType, Side, Square};

/// Fixed seed for the table generator. Any change to this constant changes
/// every hash the engine has ever produced; it must never vary at runtime.
const SEED: u128 = 0x5265_7849_305f_525f_4f4f_4b45_5259;

lazy_static! {
    static ref TABLES: Tables = Tables::generate();
}

/// All the Zobrist sub-tables, generated once from [`SEED`].
struct Tables {
    /// `piece_square[side][piece_type_index][square]`.
    piece_square: [[[u64; 64]; 6]; 2],
    /// XORed in iff Black is to move.
    black_to_move: u64,
    /// `en_passant_file[file]`, file `0..8`; index `8` (no ep file) is
    /// deliberately absent since that case XORs in nothing.
    en_passant_file: [u64; 8],
    /// `castle_rights[rights]`, indexed by the 4-bit rights word `0..16`.
    castle_rights: [u64; 16],
}

impl Tables {
    fn generate() -> Self {
        let mut rng = Rand64::new(SEED);

        let mut piece_square = [[[0u64; 64]; 6]; 2];
        for side in &mut piece_square {
            for piece_type in side.iter_mut() {
                for entry in piece_type.iter_mut() {
                    *entry = rng.rand_u64();
                }
            }
        }

        let black_to_move = rng.rand_u64();

        let mut en_passant_file = [0u64; 8];
        for entry in &mut en_passant_file {
            *entry = rng.rand_u64();
        }

        let mut castle_rights = [0u64; 16];
        for entry in &mut castle_rights {
            *entry = rng.rand_u64();
        }

        Self { piece_square, black_to_move, en_passant_file, castle_rights }
    }
}

/// The table entry for a piece of `side` and `piece_type` standing on
/// `square`.
#[must_use]
pub fn piece_square(side: Side, piece_type: PieceType, square: Square) -> u64 {
    TABLES.piece_square[side.to_index()][piece_type as usize - 1][usize::from(square.0)]
}

/// XORed in iff it is Black's turn to move.
#[must_use]
pub fn black_to_move() -> u64 {
    TABLES.black_to_move
}

/// The table entry for en-passant being available on `file` (`0..8`).
/// Callers must not call this for "no ep file" (file index `8`); that case
/// simply XORs in nothing.
#[must_use]
pub fn en_passant_file(file: u8) -> u64 {
    TABLES.en_passant_file[usize::from(file)]
}

/// The table entry for the 4-bit castle-rights word (`0..16`).
#[must_use]
pub fn castle_rights(rights: u8) -> u64 {
    TABLES.castle_rights[usize::from(rights)]
}

#[cfg(test)]
mod tests {
    use super::{black_to_move, castle_rights, en_passant_file, piece_square};
    use crate::defs::{PieceType, Side, Square};

    #[test]
    fn table_is_deterministic_across_calls() {
        let a = piece_square(Side::White, PieceType::Queen, Square(12));
        let b = piece_square(Side::White, PieceType::Queen, Square(12));
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_keys_are_extremely_unlikely_to_collide() {
        let white_queen_d1 = piece_square(Side::White, PieceType::Queen, Square::from_rank_file(7, 3));
        let black_queen_d1 = piece_square(Side::Black, PieceType::Queen, Square::from_rank_file(7, 3));
        let white_rook_d1 = piece_square(Side::White, PieceType::Rook, Square::from_rank_file(7, 3));
        assert_ne!(white_queen_d1, black_queen_d1);
        assert_ne!(white_queen_d1, white_rook_d1);
        assert_ne!(black_to_move(), 0);
        assert_ne!(castle_rights(0), castle_rights(0b1111));
        assert_ne!(en_passant_file(0), en_passant_file(7));
    }
}
