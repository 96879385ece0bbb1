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

//! Precomputed square-geometry tables: how far a square is from the edge of
//! the board in each of the 8 directions, which direction (if any) connects
//! two squares, and the squares strictly between two squares on a shared
//! ray. Built once per process with `lazy_static!`, the same idiom the
//! teacher's own lookup tables use.

use lazy_static::lazy_static;

use crate::{bitboard::Bitboard, defs::Direction, defs::Square};

lazy_static! {
    /// `squares_to_edge[square][direction]`: the number of single-step moves
    /// in that direction before falling off the board.
    static ref SQUARES_TO_EDGE: [[u8; 8]; 64] = build_squares_to_edge();
    /// `direction_between[from][to]`: the signed single-step offset that
    /// reaches `to` from `from` by repeated application, or `0` if `to` is
    /// not reachable from `from` along a single ray.
    static ref DIRECTION_BETWEEN: [[i8; 64]; 64] = build_direction_between();
    /// `ray_between[from][to]`: the squares strictly between `from` and `to`
    /// on their shared ray (empty if they don't share one).
    static ref RAY_BETWEEN: [[Bitboard; 64]; 64] = build_ray_between();
    /// Chebyshev (king-move) distance between every pair of squares.
    static ref CHEBYSHEV_DISTANCE: [[u8; 64]; 64] = build_chebyshev_distance();
    /// Manhattan (taxicab) distance between every pair of squares.
    static ref MANHATTAN_DISTANCE: [[u8; 64]; 64] = build_manhattan_distance();
}

/// The number of single-step moves from `square` in `direction` before
/// stepping off the board.
#[must_use]
pub fn squares_to_edge(square: Square, direction: Direction) -> u8 {
    SQUARES_TO_EDGE[usize::from(square.0)][direction.to_index()]
}

/// The signed offset that reaches `to` from `from` along a single ray
/// (orthogonal or diagonal), or `0` if the two squares do not share one.
#[must_use]
pub fn direction_between(from: Square, to: Square) -> i8 {
    DIRECTION_BETWEEN[usize::from(from.0)][usize::from(to.0)]
}

/// The squares strictly between `from` and `to` on their shared ray.
///
/// Empty if the squares are equal or do not lie on a common orthogonal or
/// diagonal ray.
#[must_use]
pub fn ray_between(from: Square, to: Square) -> Bitboard {
    RAY_BETWEEN[usize::from(from.0)][usize::from(to.0)]
}

/// The Chebyshev (king-move) distance between two squares.
#[must_use]
pub fn chebyshev_distance(from: Square, to: Square) -> u8 {
    CHEBYSHEV_DISTANCE[usize::from(from.0)][usize::from(to.0)]
}

/// The Manhattan (taxicab) distance between two squares.
#[must_use]
pub fn manhattan_distance(from: Square, to: Square) -> u8 {
    MANHATTAN_DISTANCE[usize::from(from.0)][usize::from(to.0)]
}

/// Builds the `squares_to_edge` table from plain rank/file arithmetic.
fn build_squares_to_edge() -> [[u8; 8]; 64] {
    let mut table = [[0u8; 8]; 64];
    for (index, entry) in table.iter_mut().enumerate() {
        let square = Square(index as u8);
        let up = square.rank();
        let left = square.file();
        let down = 7 - square.rank();
        let right = 7 - square.file();
        entry[Direction::Up.to_index()] = up;
        entry[Direction::Right.to_index()] = right;
        entry[Direction::Down.to_index()] = down;
        entry[Direction::Left.to_index()] = left;
        entry[Direction::UpRight.to_index()] = up.min(right);
        entry[Direction::DownRight.to_index()] = down.min(right);
        entry[Direction::DownLeft.to_index()] = down.min(left);
        entry[Direction::UpLeft.to_index()] = up.min(left);
    }
    table
}

/// Builds the `direction_between` table from rank/file deltas: same rank is
/// a horizontal ray, same file a vertical ray, equal absolute deltas a
/// diagonal ray, anything else is unreachable (`0`).
fn build_direction_between() -> [[i8; 64]; 64] {
    let mut table = [[0i8; 64]; 64];
    for from in 0..64u8 {
        for to in 0..64u8 {
            if from == to {
                continue;
            }
            let from_sq = Square(from);
            let to_sq = Square(to);
            let rank_delta = i16::from(to_sq.rank()) - i16::from(from_sq.rank());
            let file_delta = i16::from(to_sq.file()) - i16::from(from_sq.file());
            let direction = if rank_delta == 0 {
                file_delta.signum() * i16::from(Direction::Right.offset())
            } else if file_delta == 0 {
                rank_delta.signum() * i16::from(Direction::Down.offset())
            } else if rank_delta.abs() == file_delta.abs() {
                rank_delta.signum() * i16::from(Direction::Down.offset())
                    + file_delta.signum() * i16::from(Direction::Right.offset())
            } else {
                0
            };
            table[usize::from(from)][usize::from(to)] = direction as i8;
        }
    }
    table
}

/// Builds the `ray_between` bitboard table by walking from `from` toward
/// `to` in the shared direction, stopping just short of `to`. Depends on
/// [`build_direction_between`] directly (rather than the lazy `DIRECTION_BETWEEN`
/// static) so the two tables don't have to agree on initialization order.
fn build_ray_between() -> [[Bitboard; 64]; 64] {
    let direction_between = build_direction_between();
    let mut table = [[Bitboard::EMPTY; 64]; 64];
    for from in 0..64u8 {
        for to in 0..64u8 {
            let direction = direction_between[usize::from(from)][usize::from(to)];
            if direction == 0 {
                continue;
            }
            let mut ray = Bitboard::EMPTY;
            let mut current = i16::from(from) + i16::from(direction);
            while current != i16::from(to) {
                ray = ray.with(Square(current as u8));
                current += i16::from(direction);
            }
            table[usize::from(from)][usize::from(to)] = ray;
        }
    }
    table
}

/// Builds the Chebyshev distance table: `max(|drank|, |dfile|)`.
fn build_chebyshev_distance() -> [[u8; 64]; 64] {
    let mut table = [[0u8; 64]; 64];
    for from in 0..64u8 {
        for to in 0..64u8 {
            let from_sq = Square(from);
            let to_sq = Square(to);
            let drank = from_sq.rank().abs_diff(to_sq.rank());
            let dfile = from_sq.file().abs_diff(to_sq.file());
            table[usize::from(from)][usize::from(to)] = drank.max(dfile);
        }
    }
    table
}

/// Builds the Manhattan distance table: `|drank| + |dfile|`.
fn build_manhattan_distance() -> [[u8; 64]; 64] {
    let mut table = [[0u8; 64]; 64];
    for from in 0..64u8 {
        for to in 0..64u8 {
            let from_sq = Square(from);
            let to_sq = Square(to);
            let drank = from_sq.rank().abs_diff(to_sq.rank());
            let dfile = from_sq.file().abs_diff(to_sq.file());
            table[usize::from(from)][usize::from(to)] = drank + dfile;
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::{chebyshev_distance, direction_between, manhattan_distance, ray_between, squares_to_edge};
    use crate::defs::{Direction, Square};

    #[test]
    fn edge_distances_from_a8() {
        // a8 is square 0: top-left corner.
        assert_eq!(squares_to_edge(Square::from_rank_file(0, 0), Direction::Up), 0);
        assert_eq!(squares_to_edge(Square::from_rank_file(0, 0), Direction::Left), 0);
        assert_eq!(squares_to_edge(Square::from_rank_file(0, 0), Direction::Down), 7);
        assert_eq!(squares_to_edge(Square::from_rank_file(0, 0), Direction::Right), 7);
    }

    #[test]
    fn direction_between_shares_a_rank() {
        let e4 = Square::from_algebraic("e4").expect("valid square");
        let a4 = Square::from_algebraic("a4").expect("valid square");
        assert_eq!(direction_between(e4, a4), Direction::Left.offset());
        assert_eq!(direction_between(a4, e4), Direction::Right.offset());
    }

    #[test]
    fn direction_between_unrelated_squares_is_zero() {
        let a1 = Square::from_algebraic("a1").expect("valid square");
        let b3 = Square::from_algebraic("b3").expect("valid square");
        assert_eq!(direction_between(a1, b3), 0);
    }

    #[test]
    fn ray_between_excludes_endpoints() {
        let a1 = Square::from_algebraic("a1").expect("valid square");
        let a4 = Square::from_algebraic("a4").expect("valid square");
        let ray = ray_between(a1, a4);
        assert!(!ray.contains(a1));
        assert!(!ray.contains(a4));
        assert!(ray.contains(Square::from_algebraic("a2").expect("valid square")));
        assert!(ray.contains(Square::from_algebraic("a3").expect("valid square")));
        assert_eq!(ray.count(), 2);
    }

    #[test]
    fn distances_of_knight_hop() {
        let e4 = Square::from_algebraic("e4").expect("valid square");
        let f6 = Square::from_algebraic("f6").expect("valid square");
        assert_eq!(chebyshev_distance(e4, f6), 2);
        assert_eq!(manhattan_distance(e4, f6), 3);
    }
}
