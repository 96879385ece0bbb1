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

use std::fmt::{self, Display, Formatter};

/// An error produced while parsing a FEN string.
///
/// Every variant carries enough of the offending field to produce a useful
/// message; the caller receives a clear failure and no [`Board`](crate::board::Board)
/// is constructed (per the parse-error handling rule: reject at the input
/// boundary).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FenError {
    /// The string did not split into the expected six whitespace-separated
    /// fields (or at least four, since the last two are commonly omitted).
    WrongFieldCount {
        /// The number of fields found.
        found: usize,
    },
    /// A rank in the piece-placement field did not add up to 8 files.
    BadRank {
        /// The 0-indexed rank as written (0 = the first rank written, rank 8).
        rank: usize,
    },
    /// A character in the piece-placement field was not a piece letter or a
    /// digit 1-8.
    BadPieceChar {
        /// The offending character.
        found: char,
    },
    /// The side-to-move field was not `w` or `b`.
    BadSideToMove {
        /// The offending token.
        found: String,
    },
    /// The castle-rights field contained a character outside `KQkq-`.
    BadCastleRights {
        /// The offending token.
        found: String,
    },
    /// The en-passant field was not `-` or a valid algebraic square.
    BadEnPassantSquare {
        /// The offending token.
        found: String,
    },
    /// The halfmove clock or fullmove number did not parse as an integer.
    BadCounter {
        /// Which field (4 = halfmove clock, 5 = fullmove number).
        field: usize,
        /// The offending token.
        found: String,
    },
}

impl Display for FenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongFieldCount { found } => {
                write!(f, "expected at least 4 FEN fields, found {found}")
            }
            Self::BadRank { rank } => write!(f, "rank {rank} does not add up to 8 files"),
            Self::BadPieceChar { found } => write!(f, "'{found}' is not a valid piece character"),
            Self::BadSideToMove { found } => {
                write!(f, "side to move must be 'w' or 'b', found '{found}'")
            }
            Self::BadCastleRights { found } => {
                write!(
                    f,
                    "castle rights must be a subset of \"KQkq\" or \"-\", found '{found}'"
                )
            }
            Self::BadEnPassantSquare { found } => {
                write!(f, "'{found}' is not a valid en passant square")
            }
            Self::BadCounter { field, found } => {
                write!(f, "field {field} ('{found}') is not a valid counter")
            }
        }
    }
}

impl std::error::Error for FenError {}
