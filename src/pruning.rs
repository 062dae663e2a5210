//! Invalidity filters for the row-swap puzzle search.
//!
//! Each filter is a sound necessary-condition check: a positive answer proves
//! that no sequence of legal swaps can take the state to a solved board, so
//! the search may abandon the branch without recursing. Filters restrict
//! their scan to the neighborhood of the last move where the property allows
//! it, falling back to a full-board scan for the initial state; the two
//! filters built on global counts always scan the whole board.

use crate::board::{Board, Move, SearchState};

/// One invalidity filter. The set is closed, so dispatch is a plain `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PruneRule {
    /// A budget-exhausted tile outside its target row can never move again.
    WrongRowNoMoves,
    /// A live tile with no live partner in its row or column can never spend
    /// its budget, and no live tile can ever enter its row or column.
    IsolatedTile,
    /// A one-move tile outside its target row can only reach the cell in its
    /// own column of that row; a spent tile sitting there never vacates.
    BlockedSwap,
    /// A row's color group that can only trade swaps among itself must carry
    /// an even budget total to reach zero.
    StuckTilesParity,
    /// The column-unique variant of the parity argument, net of the single
    /// committed move each stray still owes.
    FutureStuckTiles,
    /// No row or column holds two live tiles, so no further swap exists.
    Stalemate,
}

impl PruneRule {
    /// Stable name for diagnostics and telemetry.
    pub const fn name(self) -> &'static str {
        match self {
            PruneRule::WrongRowNoMoves => "wrong_row_no_moves",
            PruneRule::IsolatedTile => "isolated_tile",
            PruneRule::BlockedSwap => "blocked_swap",
            PruneRule::StuckTilesParity => "stuck_tiles_parity",
            PruneRule::FutureStuckTiles => "future_stuck_tiles",
            PruneRule::Stalemate => "stalemate",
        }
    }

    /// Decide whether `state` is provably unsolvable.
    ///
    /// When the state carries a last move, the scan covers only the cells
    /// whose verdict that move could have changed. Given that the previous
    /// state passed every filter, the result equals
    /// [`PruneRule::is_invalid_full`] on the same board.
    pub fn is_invalid(self, state: &SearchState) -> bool {
        let board = state.board();
        match (self, state.last_move()) {
            (PruneRule::WrongRowNoMoves, Some(mv)) => wrong_row_at_endpoints(board, &mv),
            (PruneRule::IsolatedTile, Some(mv)) => isolated_near(board, &mv),
            (PruneRule::BlockedSwap, Some(mv)) => blocked_near(board, &mv),
            (PruneRule::StuckTilesParity, Some(mv)) => parity_near(board, &mv),
            (rule, _) => rule.is_invalid_full(board),
        }
    }

    /// Full-board variant of the same decision.
    pub fn is_invalid_full(self, board: &Board) -> bool {
        match self {
            PruneRule::WrongRowNoMoves => wrong_row_full(board),
            PruneRule::IsolatedTile => isolated_full(board),
            PruneRule::BlockedSwap => blocked_full(board),
            PruneRule::StuckTilesParity => parity_full(board),
            PruneRule::FutureStuckTiles => future_stuck(board),
            PruneRule::Stalemate => stalemate(board),
        }
    }
}

/// Fixed evaluation order: cheapest and most discriminating first, the two
/// always-full-scan filters last.
const RULES: [PruneRule; 6] = [
    PruneRule::WrongRowNoMoves,
    PruneRule::IsolatedTile,
    PruneRule::BlockedSwap,
    PruneRule::StuckTilesParity,
    PruneRule::FutureStuckTiles,
    PruneRule::Stalemate,
];

/// Applies every filter in a fixed order, short-circuiting on the first
/// positive verdict. Stateless; a single instance can serve every search
/// worker at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pruner;

impl Pruner {
    pub fn new() -> Self {
        Self
    }

    /// The ordered filter list.
    pub fn rules(&self) -> &'static [PruneRule] {
        &RULES
    }

    pub fn rule_count(&self) -> usize {
        RULES.len()
    }

    /// The first filter that proves `state` unsolvable, if any.
    pub fn first_failure(&self, state: &SearchState) -> Option<PruneRule> {
        RULES.iter().copied().find(|rule| rule.is_invalid(state))
    }

    /// Whether any filter proves `state` unsolvable.
    pub fn is_invalid(&self, state: &SearchState) -> bool {
        self.first_failure(state).is_some()
    }
}

fn wrong_row_tile(board: &Board, row: usize, col: usize) -> bool {
    let tile = board.tile(row, col);
    tile.moves_left == 0 && board.target_row(tile.color) != row
}

fn wrong_row_at_endpoints(board: &Board, mv: &Move) -> bool {
    // Either endpoint may just have dropped to zero budget.
    mv.endpoints()
        .iter()
        .any(|&(r, c)| wrong_row_tile(board, r, c))
}

fn wrong_row_full(board: &Board) -> bool {
    (0..board.rows()).any(|r| (0..board.cols()).any(|c| wrong_row_tile(board, r, c)))
}

/// A live tile is isolated when every other tile in its row and column is out
/// of budget. Nothing can reach it: entering its row or column takes a swap
/// with one of the spent occupants.
fn isolated_tile(board: &Board, row: usize, col: usize) -> bool {
    if !board.tile(row, col).is_live() {
        return false;
    }
    let row_partner = (0..board.cols()).any(|c| c != col && board.tile(row, c).is_live());
    let col_partner = (0..board.rows()).any(|r| r != row && board.tile(r, col).is_live());
    !row_partner && !col_partner
}

fn isolated_near(board: &Board, mv: &Move) -> bool {
    // Isolation can only have changed for tiles sharing a row or column with
    // an endpoint.
    for &(er, ec) in mv.endpoints().iter() {
        if (0..board.cols()).any(|c| isolated_tile(board, er, c)) {
            return true;
        }
        if (0..board.rows()).any(|r| isolated_tile(board, r, ec)) {
            return true;
        }
    }
    false
}

fn isolated_full(board: &Board) -> bool {
    (0..board.rows()).any(|r| (0..board.cols()).any(|c| isolated_tile(board, r, c)))
}

/// The tile at `(row, col)` has exactly one move left and sits outside its
/// target row: its whole future is the single vertical swap into
/// `(target, col)`, which a spent occupant there forecloses forever.
fn blocked_as_mover(board: &Board, row: usize, col: usize) -> bool {
    let t1 = board.tile(row, col);
    if t1.moves_left != 1 {
        return false;
    }
    let target = board.target_row(t1.color);
    target != row && board.tile(target, col).moves_left == 0
}

/// The reverse direction: a spent tile blocks every one-move tile in its
/// column whose target row it occupies.
fn blocked_as_blocker(board: &Board, row: usize, col: usize) -> bool {
    if board.tile(row, col).moves_left != 0 {
        return false;
    }
    (0..board.rows()).any(|r| {
        let t1 = board.tile(r, col);
        r != row && t1.moves_left == 1 && board.target_row(t1.color) == row
    })
}

fn blocked_near(board: &Board, mv: &Move) -> bool {
    mv.endpoints()
        .iter()
        .any(|&(r, c)| blocked_as_mover(board, r, c) || blocked_as_blocker(board, r, c))
}

fn blocked_full(board: &Board) -> bool {
    // Scanning every cell as a potential mover visits every blocked pair.
    (0..board.rows()).any(|r| (0..board.cols()).any(|c| blocked_as_mover(board, r, c)))
}

/// Parity verdict for one row's color group.
///
/// Every swap between two group members spends two budget units while both
/// stay in a group slot, so a group that can only trade swaps among itself
/// carries its total's parity to the end: an odd total can never reach zero.
/// Rows with a budget of three or more anywhere in the group, or with more
/// than one member outside the row, are inconclusive.
fn row_parity_invalid(board: &Board, row: usize) -> bool {
    let color = board.target_color(row);
    let mut in_row_total: u64 = 0;
    let mut outside: Option<(usize, u32)> = None;
    for r in 0..board.rows() {
        for c in 0..board.cols() {
            let tile = board.tile(r, c);
            if tile.color != color {
                continue;
            }
            if tile.moves_left >= 3 {
                return false;
            }
            if r == row {
                in_row_total += u64::from(tile.moves_left);
            } else if outside.is_some() {
                return false;
            } else {
                outside = Some((c, tile.moves_left));
            }
        }
    }
    let total = match outside {
        None => in_row_total,
        Some((col, budget)) => {
            if board.tile(row, col).color == color {
                // The stray lands on a group member: displacing it costs the
                // stray exactly two moves, both spent inside the group.
                if budget != 2 {
                    return false;
                }
                in_row_total + u64::from(budget)
            } else {
                // The stray enters over a non-member: its single move is
                // already accounted for and adds nothing to the group total.
                if budget != 1 {
                    return false;
                }
                in_row_total
            }
        }
    };
    total % 2 == 1
}

fn parity_near(board: &Board, mv: &Move) -> bool {
    // A move can only change the verdict of the rows it touched and of the
    // two moved tiles' own color groups.
    let rows = [
        mv.r1,
        mv.r2,
        board.target_row(board.tile(mv.r1, mv.c1).color),
        board.target_row(board.tile(mv.r2, mv.c2).color),
    ];
    for (i, &row) in rows.iter().enumerate() {
        if rows[..i].contains(&row) {
            continue;
        }
        if row_parity_invalid(board, row) {
            return true;
        }
    }
    false
}

fn parity_full(board: &Board) -> bool {
    (0..board.rows()).any(|row| row_parity_invalid(board, row))
}

/// Column-unique color group whose strays are all down to their final move:
/// each stray's committed entering move is subtracted up front, and the
/// remainder the in-row group will carry must be even.
fn future_stuck_color(board: &Board, color: usize) -> bool {
    let target = board.target_row(color);
    let mut sum: u64 = 0;
    let mut strays: u64 = 0;
    for c in 0..board.cols() {
        let mut in_col = 0u32;
        for r in 0..board.rows() {
            let tile = board.tile(r, c);
            if tile.color != color {
                continue;
            }
            in_col += 1;
            sum += u64::from(tile.moves_left);
            if r == target {
                if tile.moves_left >= 3 {
                    return false;
                }
            } else {
                strays += 1;
                if tile.moves_left != 1 {
                    return false;
                }
            }
        }
        if in_col != 1 {
            return false;
        }
    }
    (sum - strays) % 2 == 1
}

fn future_stuck(board: &Board) -> bool {
    (0..board.rows()).any(|row| future_stuck_color(board, board.target_color(row)))
}

/// No pair of live tiles shares a row or column, so no further swap exists;
/// only a board that is already solved may rest there.
fn stalemate(board: &Board) -> bool {
    let mut row_live = vec![0u32; board.rows()];
    let mut col_live = vec![0u32; board.cols()];
    for r in 0..board.rows() {
        for c in 0..board.cols() {
            if board.tile(r, c).is_live() {
                row_live[r] += 1;
                col_live[c] += 1;
                if row_live[r] == 2 || col_live[c] == 2 {
                    return false;
                }
            }
        }
    }
    !board.is_solved()
}
