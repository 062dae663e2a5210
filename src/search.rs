//! Bounded depth-first search over swap sequences.
//!
//! The search is the pruning engine's caller: it expands legal moves,
//! consults the [`Pruner`] before recursing into a branch, and gives up on a
//! deadline or state cap. Duplicate boards are skipped through a 64-bit
//! fingerprint set.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use smallvec::SmallVec;

use crate::board::{Board, Move, SearchState};
use crate::pruning::Pruner;

/// Limits for one search run.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum wall-clock time to search.
    pub timeout: Duration,
    /// Maximum number of states to expand.
    pub max_states: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            max_states: 1_000_000,
        }
    }
}

/// Outcome of a bounded search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Whether a solving sequence was found.
    pub solved: bool,
    /// The solving sequence, when found.
    pub solution: Option<Vec<Move>>,
    /// States popped and expanded.
    pub states_explored: usize,
    /// Branches discarded by the invalidity filters.
    pub states_pruned: usize,
    /// Whether the bounded space was fully exhausted.
    pub search_exhausted: bool,
    /// Time elapsed in milliseconds.
    pub time_elapsed_ms: u64,
}

/// Depth-first search for a sequence of swaps solving `board`.
///
/// Every candidate child state is shown to `pruner` first; a positive
/// verdict discards the branch with no further work.
pub fn solve(board: &Board, config: &SearchConfig, pruner: &Pruner) -> SearchResult {
    let start = Instant::now();
    let deadline = start + config.timeout;

    let mut explored = 0usize;
    let mut pruned = 0usize;
    let mut seen: HashSet<u64> = HashSet::new();

    let root = SearchState::root(board.clone());
    seen.insert(board_fingerprint(root.board()));
    if let Some(rule) = pruner.first_failure(&root) {
        tracing::debug!(rule = rule.name(), "initial state pruned");
        return SearchResult {
            solved: false,
            solution: None,
            states_explored: 0,
            states_pruned: 1,
            search_exhausted: true,
            time_elapsed_ms: start.elapsed().as_millis() as u64,
        };
    }

    let mut stack: Vec<SearchState> = vec![root];

    while let Some(state) = stack.pop() {
        if Instant::now() > deadline || explored >= config.max_states {
            return SearchResult {
                solved: false,
                solution: None,
                states_explored: explored,
                states_pruned: pruned,
                search_exhausted: false,
                time_elapsed_ms: start.elapsed().as_millis() as u64,
            };
        }
        explored += 1;

        if state.board().is_solved() {
            tracing::info!(
                moves = state.history().len(),
                explored,
                pruned,
                "solution found"
            );
            return SearchResult {
                solved: true,
                solution: Some(state.history().to_vec()),
                states_explored: explored,
                states_pruned: pruned,
                search_exhausted: false,
                time_elapsed_ms: start.elapsed().as_millis() as u64,
            };
        }

        let moves: SmallVec<[Move; 32]> = state.board().legal_moves();
        for mv in moves {
            let child = state.child(mv);
            if !seen.insert(board_fingerprint(child.board())) {
                continue;
            }
            if let Some(rule) = pruner.first_failure(&child) {
                tracing::debug!(
                    rule = rule.name(),
                    depth = child.history().len(),
                    "branch pruned"
                );
                pruned += 1;
                continue;
            }
            stack.push(child);
        }
    }

    SearchResult {
        solved: false,
        solution: None,
        states_explored: explored,
        states_pruned: pruned,
        search_exhausted: true,
        time_elapsed_ms: start.elapsed().as_millis() as u64,
    }
}

/// 64-bit fingerprint of a board for duplicate elimination.
fn board_fingerprint(board: &Board) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    board.hash(&mut hasher);
    hasher.finish()
}
