//! CLI entry point for the row-swap puzzle pruning engine.
//!
//! Usage:
//!   swap-pruner check <board.json> [--stdin]
//!   swap-pruner solve <board.json> [--stdin] [options]
//!
//! Options for solve:
//!   --timeout <seconds>   Maximum search time (default: 15)
//!   --max-states <n>      Maximum states to expand (default: 1000000)
//!
//! Both subcommands read a board JSON of the form
//!   { "tiles": [[{"color": 0, "movesLeft": 1}, ...], ...],
//!     "rowColors": [0, 1, ...] }
//! where `rowColors` is optional (identity mapping when omitted), and print
//! a JSON report on stdout.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;

use swap_pruner::{solve, Board, Move, Pruner, SearchConfig, SearchState};

#[derive(Parser)]
#[command(name = "swap-pruner")]
#[command(about = "Pruning engine and bounded solver for the row-swap tile puzzle")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the invalidity filters once on a board state
    Check {
        /// Path to board JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read board from stdin instead of a file
        #[arg(long)]
        stdin: bool,
    },
    /// Search for a sequence of swaps that solves the board
    Solve {
        /// Path to board JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read board from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Maximum search time in seconds
        #[arg(long, default_value = "15")]
        timeout: u64,

        /// Maximum number of states to expand
        #[arg(long, default_value = "1000000")]
        max_states: usize,
    },
}

/// Output format for the check subcommand
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckOutput {
    invalid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<&'static str>,
    rules_checked: usize,
}

/// Output format for the solve subcommand
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    solution: Option<Vec<Move>>,
    states_explored: usize,
    states_pruned: usize,
    search_exhausted: bool,
    time_elapsed_ms: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { file, stdin } => {
            let board = load_board(file, stdin);
            let pruner = Pruner::new();
            let rule = pruner.first_failure(&SearchState::root(board));

            let output = CheckOutput {
                invalid: rule.is_some(),
                rule: rule.map(|r| r.name()),
                rules_checked: pruner.rule_count(),
            };
            println!("{}", serde_json::to_string_pretty(&output).unwrap());

            if output.invalid {
                std::process::exit(1);
            }
        }
        Commands::Solve {
            file,
            stdin,
            timeout,
            max_states,
        } => {
            let board = load_board(file, stdin);
            let config = SearchConfig {
                timeout: Duration::from_secs(timeout),
                max_states,
            };
            let result = solve(&board, &config, &Pruner::new());

            let output = SolveOutput {
                solved: result.solved,
                solution: result.solution,
                states_explored: result.states_explored,
                states_pruned: result.states_pruned,
                search_exhausted: result.search_exhausted,
                time_elapsed_ms: result.time_elapsed_ms,
            };
            println!("{}", serde_json::to_string_pretty(&output).unwrap());

            if !output.solved {
                std::process::exit(1);
            }
        }
    }
}

fn load_board(file: Option<PathBuf>, stdin: bool) -> Board {
    let json_content = if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .expect("Failed to read from stdin");
        buffer
    } else if let Some(path) = file {
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read file {:?}: {}", path, e))
    } else {
        eprintln!("Error: Must provide either a file path or --stdin");
        std::process::exit(1);
    };

    match serde_json::from_str(&json_content) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Error parsing board JSON: {}", e);
            std::process::exit(1);
        }
    }
}
