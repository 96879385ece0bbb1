//! Rookery, a chess position engine: board representation, legal move
//! generation, and make/unmake with incremental Zobrist hashing, plus a
//! game-model façade and an AI contract for a host to plug a search
//! implementation into. No search, evaluation, opening book, UCI, or
//! rendering code lives here — see [`ai`] and [`facade`] for the seams a
//! host fills in.

/// The AI contract a search implementation plugs into.
pub mod ai;
/// Items related to the board. Mainly [`Board`](board::Board).
pub mod board;
/// A move, packed into 16 bits.
pub mod chess_move;
/// Definitions and enumerations: sides, piece types, pieces, squares.
pub mod defs;
/// Parse error types.
pub mod error;
/// Forsyth-Edwards Notation: parsing and emitting a [`Board`](board::Board).
pub mod fen;
/// The game-model façade a renderer drives.
pub mod facade;
/// Square-geometry lookup tables: rays, distances, edges.
pub mod geometry;
/// Legal move generation.
pub mod movegen;
/// A dense, O(1)-mutable set of squares occupied by one (side, piece type).
pub mod piece_list;
/// Bitboards: 64-bit sets of squares.
pub mod bitboard;
/// Small generic helpers shared by the board and move generator.
pub mod util;
/// Incremental Zobrist hashing.
pub mod zobrist;
