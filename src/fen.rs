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

//! Forsyth-Edwards Notation: parsing a [`Board`] from six whitespace
//! separated fields, and emitting it back out. Parsing a legal FEN and then
//! emitting it again reproduces the canonical form of the input.

use std::{
    fmt::Write as _,
    str::FromStr,
};

use crate::{
    board::Board,
    defs::{Piece, PieceType, Side, Square},
    error::FenError,
};

/// The FEN of the standard starting position.
pub const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl FromStr for Board {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Self, Self::Err> {
        parse(fen)
    }
}

/// Parses a FEN string into a [`Board`].
///
/// The last two fields (halfmove clock, fullmove number) may be omitted, in
/// which case they default to `0` and `1`; everything before that must be
/// present.
///
/// # Errors
///
/// Returns a [`FenError`] describing the first field that fails to parse.
/// No `Board` is returned on failure.
pub fn parse(fen: &str) -> Result<Board, FenError> {
    let mut fields = fen.split_whitespace();

    let placement = fields.next().ok_or(FenError::WrongFieldCount { found: 0 })?;
    let side_to_move = fields.next().ok_or(FenError::WrongFieldCount { found: 1 })?;
    let castle_rights = fields.next().unwrap_or("-");
    let en_passant = fields.next().unwrap_or("-");
    let halfmove_clock = fields.next().unwrap_or("0");
    let fullmove_number = fields.next().unwrap_or("1");

    let mut board = Board::empty();
    parse_placement(&mut board, placement)?;
    board.set_side_to_move(parse_side_to_move(side_to_move)?);
    let rights = parse_castle_rights(castle_rights)?;
    let ep_file = parse_en_passant(en_passant)?;
    let halfmove_clock: u16 = halfmove_clock
        .parse()
        .map_err(|_| FenError::BadCounter { field: 4, found: halfmove_clock.to_owned() })?;
    let fullmove_number: u32 = fullmove_number
        .parse()
        .map_err(|_| FenError::BadCounter { field: 5, found: fullmove_number.to_owned() })?;

    board.finalize_from_fen(rights, ep_file, halfmove_clock);
    board.set_ply_counter(fullmove_to_ply(fullmove_number, board.side_to_move()));

    Ok(board)
}

/// Emits `board` as a FEN string.
#[must_use]
pub fn to_fen(board: &Board) -> String {
    let mut out = String::with_capacity(64);
    write_placement(&mut out, board);
    out.push(' ');
    out.push_str(match board.side_to_move() {
        Side::White => "w",
        Side::Black => "b",
    });
    out.push(' ');
    write_castle_rights(&mut out, board.castle_rights());
    out.push(' ');
    write_en_passant(&mut out, board.en_passant_file(), board.side_to_move());
    let _ = write!(out, " {} {}", board.halfmove_clock(), ply_to_fullmove(board.ply_counter(), board.side_to_move()));
    out
}

/// Parses the piece-placement field, placing each piece directly on `board`.
fn parse_placement(board: &mut Board, placement: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongFieldCount { found: ranks.len() });
    }
    for (rank_index, rank_str) in ranks.iter().enumerate() {
        let mut file: u8 = 0;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as u8;
            } else {
                let piece = parse_piece_char(c)?;
                if file >= 8 {
                    return Err(FenError::BadRank { rank: rank_index });
                }
                board.put_piece(Square::from_rank_file(rank_index as u8, file), piece);
                file += 1;
            }
        }
        if file != 8 {
            return Err(FenError::BadRank { rank: rank_index });
        }
    }
    Ok(())
}

/// Parses a single piece-placement character into a [`Piece`].
fn parse_piece_char(c: char) -> Result<Piece, FenError> {
    let side = if c.is_ascii_uppercase() { Side::White } else { Side::Black };
    let piece_type = match c.to_ascii_lowercase() {
        'p' => PieceType::Pawn,
        'n' => PieceType::Knight,
        'b' => PieceType::Bishop,
        'r' => PieceType::Rook,
        'q' => PieceType::Queen,
        'k' => PieceType::King,
        _ => return Err(FenError::BadPieceChar { found: c }),
    };
    Ok(Piece::new(side, piece_type))
}

/// Parses the side-to-move field.
fn parse_side_to_move(token: &str) -> Result<Side, FenError> {
    match token {
        "w" => Ok(Side::White),
        "b" => Ok(Side::Black),
        _ => Err(FenError::BadSideToMove { found: token.to_owned() }),
    }
}

/// Parses the castle-rights field into the crate's 4-bit `KQkq` word.
fn parse_castle_rights(token: &str) -> Result<u8, FenError> {
    if token == "-" {
        return Ok(0);
    }
    let mut rights = 0u8;
    for c in token.chars() {
        rights |= match c {
            'K' => crate::board::CASTLE_WK,
            'Q' => crate::board::CASTLE_WQ,
            'k' => crate::board::CASTLE_BK,
            'q' => crate::board::CASTLE_BQ,
            _ => return Err(FenError::BadCastleRights { found: token.to_owned() }),
        };
    }
    Ok(rights)
}

/// Parses the en-passant field into a target file, or `None` for `-`.
fn parse_en_passant(token: &str) -> Result<Option<u8>, FenError> {
    if token == "-" {
        return Ok(None);
    }
    let square = Square::from_algebraic(token)
        .ok_or_else(|| FenError::BadEnPassantSquare { found: token.to_owned() })?;
    Ok(Some(square.file()))
}

/// Converts a FEN fullmove number (1-based, incremented after Black moves)
/// into the crate's total half-move counter.
fn fullmove_to_ply(fullmove_number: u32, side_to_move: Side) -> u32 {
    let base = fullmove_number.saturating_sub(1) * 2;
    match side_to_move {
        Side::White => base,
        Side::Black => base + 1,
    }
}

/// The inverse of [`fullmove_to_ply`].
const fn ply_to_fullmove(ply: u32, side_to_move: Side) -> u32 {
    match side_to_move {
        Side::White => ply / 2 + 1,
        Side::Black => (ply - 1) / 2 + 1,
    }
}

/// Writes the piece-placement field.
fn write_placement(out: &mut String, board: &Board) {
    for rank in 0..8u8 {
        let mut empty_run = 0u8;
        for file in 0..8u8 {
            let piece = board.piece_at(Square::from_rank_file(rank, file));
            if piece.is_none() {
                empty_run += 1;
            } else {
                if empty_run != 0 {
                    out.push((b'0' + empty_run) as char);
                    empty_run = 0;
                }
                out.push(char::from(piece));
            }
        }
        if empty_run != 0 {
            out.push((b'0' + empty_run) as char);
        }
        if rank != 7 {
            out.push('/');
        }
    }
}

/// Writes the castle-rights field.
fn write_castle_rights(out: &mut String, rights: u8) {
    if rights == 0 {
        out.push('-');
        return;
    }
    if rights & crate::board::CASTLE_WK != 0 {
        out.push('K');
    }
    if rights & crate::board::CASTLE_WQ != 0 {
        out.push('Q');
    }
    if rights & crate::board::CASTLE_BK != 0 {
        out.push('k');
    }
    if rights & crate::board::CASTLE_BQ != 0 {
        out.push('q');
    }
}

/// Writes the en-passant field. The target square's rank is derived from
/// whose move it is: the square a capturing pawn of `side_to_move` would
/// land on.
fn write_en_passant(out: &mut String, file: Option<u8>, side_to_move: Side) {
    let Some(file) = file else {
        out.push('-');
        return;
    };
    let rank = match side_to_move {
        Side::White => 2, // rank index for the 6th rank
        Side::Black => 5, // rank index for the 3rd rank
    };
    let square = Square::from_rank_file(rank, file);
    let _ = write!(out, "{square}");
}

#[cfg(test)]
mod tests {
    use super::{parse, to_fen, STARTPOS};

    #[test]
    fn starting_position_round_trips() {
        let board = parse(STARTPOS).expect("valid FEN");
        assert_eq!(to_fen(&board), STARTPOS);
    }

    #[test]
    fn short_fen_defaults_missing_fields() {
        let board = parse("8/8/8/8/8/8/8/K6k w - -").expect("valid FEN");
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(board.ply_counter(), 0);
    }

    #[test]
    fn en_passant_scenario_round_trips() {
        let fen = "8/8/8/KPp4r/8/8/8/8 w - c6 0 1";
        let board = parse(fen).expect("valid FEN");
        assert_eq!(board.en_passant_file(), Some(2));
        assert_eq!(to_fen(&board), fen);
    }

    #[test]
    fn malformed_piece_char_is_rejected() {
        assert!(parse("8/8/8/8/8/8/8/K6x w - - 0 1").is_err());
    }

    #[test]
    fn wrong_field_count_is_rejected() {
        assert!(parse("8/8/8/8/8/8/8/8").is_err());
    }
}
