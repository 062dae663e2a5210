//! Board, tile, and move types for the row-swap puzzle.
//!
//! These types are the read-only input of the pruning engine: a rectangular
//! grid of colored tiles with per-tile move budgets, a bijective row/color
//! target mapping, and the move and state bookkeeping the search layer
//! produces. Boards deserialize from the JSON emitted by the puzzle
//! generator; the mapping defaults to identity when the input omits it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// A single grid cell: a color and the number of swaps it must still make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub color: usize,
    #[serde(rename = "movesLeft")]
    pub moves_left: u32,
}

impl Tile {
    pub fn new(color: usize, moves_left: u32) -> Self {
        Self { color, moves_left }
    }

    /// A tile can take part in a swap only while its budget is positive.
    pub fn is_live(&self) -> bool {
        self.moves_left > 0
    }
}

/// A swap of the tiles at two grid positions sharing a row or a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub r1: usize,
    pub c1: usize,
    pub r2: usize,
    pub c2: usize,
}

impl Move {
    pub fn new(r1: usize, c1: usize, r2: usize, c2: usize) -> Self {
        Self { r1, c1, r2, c2 }
    }

    /// A well-formed move joins two distinct cells in one row or one column,
    /// never both and never neither.
    pub fn is_well_formed(&self) -> bool {
        (self.r1 == self.r2) != (self.c1 == self.c2)
    }

    /// The two grid positions this move touches.
    pub fn endpoints(&self) -> [(usize, usize); 2] {
        [(self.r1, self.c1), (self.r2, self.c2)]
    }
}

/// Errors raised when assembling a board from untrusted input.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("board has no rows or no columns")]
    Empty,
    #[error("row {row} has {got} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        got: usize,
        expected: usize,
    },
    #[error("row-color mapping has {got} entries, expected {expected}")]
    MappingLength { got: usize, expected: usize },
    #[error("row-color mapping is not a bijection over [0, {rows}): color {color}")]
    MappingNotBijective { color: usize, rows: usize },
    #[error("color {color} at ({row}, {col}) has no target row")]
    ColorOutOfRange {
        color: usize,
        row: usize,
        col: usize,
    },
}

/// JSON shape of a board: a grid of tiles and an optional row-color mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSpec {
    pub tiles: Vec<Vec<Tile>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_colors: Option<Vec<usize>>,
}

/// A rectangular grid of tiles plus the bijective row/color target mapping.
///
/// Construction validates the grid shape and the mapping; after that every
/// accessor panics on an out-of-range index rather than masking the caller's
/// contract violation behind a default answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BoardSpec", into = "BoardSpec")]
pub struct Board {
    rows: usize,
    cols: usize,
    /// Row-major tile storage.
    tiles: Vec<Tile>,
    /// Row index to the color that must fill it.
    row_colors: Vec<usize>,
    /// Color to the row it must fill; inverse of `row_colors`.
    color_rows: Vec<usize>,
}

impl Board {
    /// Build a board from a tile grid and an optional row-color mapping
    /// (identity when `None`).
    pub fn new(tiles: Vec<Vec<Tile>>, row_colors: Option<Vec<usize>>) -> Result<Self, BoardError> {
        let rows = tiles.len();
        let cols = tiles.first().map_or(0, |row| row.len());
        if rows == 0 || cols == 0 {
            return Err(BoardError::Empty);
        }
        for (row, cells) in tiles.iter().enumerate() {
            if cells.len() != cols {
                return Err(BoardError::RaggedRow {
                    row,
                    got: cells.len(),
                    expected: cols,
                });
            }
        }

        let row_colors = row_colors.unwrap_or_else(|| (0..rows).collect());
        if row_colors.len() != rows {
            return Err(BoardError::MappingLength {
                got: row_colors.len(),
                expected: rows,
            });
        }
        let mut color_rows = vec![usize::MAX; rows];
        for (row, &color) in row_colors.iter().enumerate() {
            if color >= rows || color_rows[color] != usize::MAX {
                return Err(BoardError::MappingNotBijective { color, rows });
            }
            color_rows[color] = row;
        }

        for (row, cells) in tiles.iter().enumerate() {
            for (col, tile) in cells.iter().enumerate() {
                if tile.color >= rows {
                    return Err(BoardError::ColorOutOfRange {
                        color: tile.color,
                        row,
                        col,
                    });
                }
            }
        }

        Ok(Self {
            rows,
            cols,
            tiles: tiles.into_iter().flatten().collect(),
            row_colors,
            color_rows,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Tile at `(row, col)`. Panics when the position is out of range.
    pub fn tile(&self, row: usize, col: usize) -> Tile {
        assert!(
            row < self.rows && col < self.cols,
            "tile position ({row}, {col}) out of range"
        );
        self.tiles[row * self.cols + col]
    }

    /// The row that tiles of `color` must end up in.
    pub fn target_row(&self, color: usize) -> usize {
        self.color_rows[color]
    }

    /// The color that must fill `row`.
    pub fn target_color(&self, row: usize) -> usize {
        self.row_colors[row]
    }

    /// Solved means every tile sits in its target row with its budget spent.
    pub fn is_solved(&self) -> bool {
        self.tiles.iter().enumerate().all(|(i, tile)| {
            tile.moves_left == 0 && self.color_rows[tile.color] == i / self.cols
        })
    }

    /// Whether `mv` is legal here: well-formed shape, in range, both tiles
    /// holding budget.
    pub fn is_legal(&self, mv: &Move) -> bool {
        mv.is_well_formed()
            && mv.r1 < self.rows
            && mv.r2 < self.rows
            && mv.c1 < self.cols
            && mv.c2 < self.cols
            && self.tile(mv.r1, mv.c1).is_live()
            && self.tile(mv.r2, mv.c2).is_live()
    }

    /// Apply a swap in place, spending one budget unit at each endpoint.
    /// Panics on an illegal move; producing legal moves is the caller's
    /// contract.
    pub fn apply(&mut self, mv: &Move) {
        assert!(self.is_legal(mv), "illegal move {mv:?}");
        let a = mv.r1 * self.cols + mv.c1;
        let b = mv.r2 * self.cols + mv.c2;
        self.tiles[a].moves_left -= 1;
        self.tiles[b].moves_left -= 1;
        self.tiles.swap(a, b);
    }

    /// Enumerate every legal swap on the board.
    pub fn legal_moves(&self) -> SmallVec<[Move; 32]> {
        let mut moves = SmallVec::new();
        for r in 0..self.rows {
            for c1 in 0..self.cols {
                if !self.tile(r, c1).is_live() {
                    continue;
                }
                for c2 in (c1 + 1)..self.cols {
                    if self.tile(r, c2).is_live() {
                        moves.push(Move::new(r, c1, r, c2));
                    }
                }
            }
        }
        for c in 0..self.cols {
            for r1 in 0..self.rows {
                if !self.tile(r1, c).is_live() {
                    continue;
                }
                for r2 in (r1 + 1)..self.rows {
                    if self.tile(r2, c).is_live() {
                        moves.push(Move::new(r1, c, r2, c));
                    }
                }
            }
        }
        moves
    }
}

impl TryFrom<BoardSpec> for Board {
    type Error = BoardError;

    fn try_from(spec: BoardSpec) -> Result<Self, Self::Error> {
        Board::new(spec.tiles, spec.row_colors)
    }
}

impl From<Board> for BoardSpec {
    fn from(board: Board) -> Self {
        let tiles = board
            .tiles
            .chunks(board.cols)
            .map(|row| row.to_vec())
            .collect();
        BoardSpec {
            tiles,
            row_colors: Some(board.row_colors),
        }
    }
}

/// A board plus the ordered move sequence that produced it.
#[derive(Debug, Clone)]
pub struct SearchState {
    board: Board,
    history: Vec<Move>,
}

impl SearchState {
    /// The initial state: no moves taken yet.
    pub fn root(board: Board) -> Self {
        Self {
            board,
            history: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The move that produced this state, absent for the initial state.
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().copied()
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Clone-and-mutate successor under `mv`.
    pub fn child(&self, mv: Move) -> Self {
        let mut board = self.board.clone();
        board.apply(&mv);
        let mut history = self.history.clone();
        history.push(mv);
        Self { board, history }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(color: usize, moves_left: u32) -> Tile {
        Tile::new(color, moves_left)
    }

    fn board_2x2() -> Board {
        // One vertical swap from solved.
        Board::new(
            vec![vec![t(1, 1), t(0, 0)], vec![t(0, 1), t(1, 0)]],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_identity_mapping_default() {
        let board = board_2x2();
        assert_eq!(board.target_row(0), 0);
        assert_eq!(board.target_row(1), 1);
        assert_eq!(board.target_color(0), 0);
        assert_eq!(board.target_color(1), 1);
    }

    #[test]
    fn test_explicit_mapping_both_directions() {
        let board = Board::new(
            vec![vec![t(1, 0), t(1, 0)], vec![t(0, 0), t(0, 0)]],
            Some(vec![1, 0]),
        )
        .unwrap();
        assert_eq!(board.target_color(0), 1);
        assert_eq!(board.target_color(1), 0);
        assert_eq!(board.target_row(1), 0);
        assert_eq!(board.target_row(0), 1);
        assert!(board.is_solved());
    }

    #[test]
    fn test_rejects_ragged_grid() {
        let result = Board::new(vec![vec![t(0, 0), t(0, 0)], vec![t(1, 0)]], None);
        assert!(matches!(result, Err(BoardError::RaggedRow { row: 1, .. })));
    }

    #[test]
    fn test_rejects_non_bijective_mapping() {
        let result = Board::new(
            vec![vec![t(0, 0)], vec![t(1, 0)]],
            Some(vec![0, 0]),
        );
        assert!(matches!(
            result,
            Err(BoardError::MappingNotBijective { color: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_unmapped_color() {
        let result = Board::new(vec![vec![t(2, 0)], vec![t(0, 0)]], None);
        assert!(matches!(
            result,
            Err(BoardError::ColorOutOfRange { color: 2, .. })
        ));
    }

    #[test]
    fn test_solved_requires_spent_budgets() {
        let placed = Board::new(
            vec![vec![t(0, 0), t(0, 1)], vec![t(1, 0), t(1, 0)]],
            None,
        )
        .unwrap();
        assert!(!placed.is_solved());

        let done = Board::new(
            vec![vec![t(0, 0), t(0, 0)], vec![t(1, 0), t(1, 0)]],
            None,
        )
        .unwrap();
        assert!(done.is_solved());
    }

    #[test]
    fn test_apply_swaps_and_spends_budget() {
        let mut board = board_2x2();
        board.apply(&Move::new(0, 0, 1, 0));
        assert_eq!(board.tile(0, 0), t(0, 0));
        assert_eq!(board.tile(1, 0), t(1, 0));
        assert!(board.is_solved());
    }

    #[test]
    #[should_panic(expected = "illegal move")]
    fn test_apply_rejects_spent_tile() {
        let mut board = board_2x2();
        // (0, 1) has no budget left.
        board.apply(&Move::new(0, 0, 0, 1));
    }

    #[test]
    fn test_move_shape() {
        assert!(Move::new(0, 0, 0, 2).is_well_formed());
        assert!(Move::new(0, 1, 2, 1).is_well_formed());
        // Same cell twice, and a diagonal.
        assert!(!Move::new(1, 1, 1, 1).is_well_formed());
        assert!(!Move::new(0, 0, 1, 1).is_well_formed());
    }

    #[test]
    fn test_legal_moves_enumeration() {
        let board = board_2x2();
        let moves = board.legal_moves();
        // Only (0,0) and (1,0) are live, sharing column 0.
        assert_eq!(moves.as_slice(), [Move::new(0, 0, 1, 0)]);
    }

    #[test]
    fn test_state_history_and_last_move() {
        let root = SearchState::root(board_2x2());
        assert!(root.last_move().is_none());
        assert!(root.history().is_empty());

        let mv = Move::new(0, 0, 1, 0);
        let child = root.child(mv);
        assert_eq!(child.last_move(), Some(mv));
        assert_eq!(child.history(), [mv]);
        assert!(child.board().is_solved());
        // The parent snapshot is untouched.
        assert!(!root.board().is_solved());
    }

    #[test]
    fn test_board_json_round_trip() {
        let json = r#"{
            "tiles": [
                [{"color": 1, "movesLeft": 1}, {"color": 0, "movesLeft": 0}],
                [{"color": 0, "movesLeft": 1}, {"color": 1, "movesLeft": 0}]
            ]
        }"#;
        let board: Board = serde_json::from_str(json).unwrap();
        assert_eq!(board.rows(), 2);
        assert_eq!(board.cols(), 2);
        assert_eq!(board.tile(0, 0), t(1, 1));

        let back = serde_json::to_string(&board).unwrap();
        let again: Board = serde_json::from_str(&back).unwrap();
        assert_eq!(again, board);
    }

    #[test]
    fn test_board_json_rejects_bad_mapping() {
        let json = r#"{
            "tiles": [[{"color": 0, "movesLeft": 0}], [{"color": 1, "movesLeft": 0}]],
            "rowColors": [1, 1]
        }"#;
        assert!(serde_json::from_str::<Board>(json).is_err());
    }
}
