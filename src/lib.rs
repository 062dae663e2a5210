//! Pruning engine for a row-swap tile puzzle solver.
//!
//! The puzzle: a grid of tiles, each carrying a color and a remaining-move
//! budget; a move swaps two tiles sharing a row or column, spending one
//! budget unit on each; the board is solved when every tile sits in the row
//! its color maps to with its budget used up. This crate decides, as early
//! as possible, that a partially explored state can never reach a solved
//! board, so the search can abandon the branch without recursing further.

pub mod board;
pub mod pruning;
pub mod search;

// Re-export main types
pub use board::{Board, BoardError, BoardSpec, Move, SearchState, Tile};
pub use pruning::{PruneRule, Pruner};
pub use search::{solve, SearchConfig, SearchResult};
