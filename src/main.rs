//! NoGo-Rust: a NoGo MCTS engine.
//!
//! ## Usage
//!
//! - `nogo-rust` - Play a demo self-play game
//! - `nogo-rust gtp` - Start GTP server for GUI or referee integration
//! - `nogo-rust demo` - Play a demo self-play game
//!
//! Logs go to stderr; set the level with `--log-level` or `RUST_LOG`.

use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flexi_logger::Logger;
use log::{info, warn};

use nogo_rust::board::{Board, Color};
use nogo_rust::config::SearchConfig;
use nogo_rust::constants::{
    DEFAULT_SIZE, EXPLORATION, MAX_PROFILE_DEPTH, N_SIMS_PER_CHILD, PATTERN_CODES,
    TIME_LIMIT_SECS,
};
use nogo_rust::gtp::GtpEngine;
use nogo_rust::mcts::Mcts;
use nogo_rust::weights::WeightTable;

/// NoGo-Rust: a NoGo MCTS engine
#[derive(Parser)]
#[command(name = "nogo-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Pattern weights file (`<code> <weight>` per line); uniform weights if omitted
    #[arg(long, global = true)]
    weights: Option<PathBuf>,

    /// Board size
    #[arg(long, global = true, default_value_t = DEFAULT_SIZE)]
    size: usize,

    /// Simulations per legal root move
    #[arg(long, global = true, default_value_t = N_SIMS_PER_CHILD)]
    sims: usize,

    /// Fixed number of iterations per move (overrides --sims)
    #[arg(long, global = true)]
    iterations: Option<usize>,

    /// Time limit per move in seconds
    #[arg(long, global = true, default_value_t = TIME_LIMIT_SECS)]
    time_limit: u64,

    /// UCT exploration constant
    #[arg(long, global = true, default_value_t = EXPLORATION)]
    exploration: f64,

    /// Random seed for reproducible play
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server
    Gtp,
    /// Let the engine play a game against itself
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _logger = Logger::try_with_env_or_str(&cli.log_level)?
        .format(flexi_logger::colored_default_format)
        .start()?;

    let table = match &cli.weights {
        Some(path) => {
            let table = WeightTable::load(path)
                .with_context(|| format!("failed to load weights from {}", path.display()))?;
            info!("loaded {} pattern weights from {}", table.len(), path.display());
            if !table.is_complete() {
                warn!("weight table covers {} of {PATTERN_CODES} patterns", table.len());
            }
            table
        }
        None => {
            warn!("no weights file given, using uniform pattern weights");
            WeightTable::uniform(1.0)
        }
    };
    let table = Rc::new(table);

    let mcts = match cli.seed {
        Some(seed) => Mcts::with_seed(table, seed),
        None => Mcts::new(table),
    };

    let mut config = SearchConfig::default()
        .with_simulations_per_child(cli.sims)
        .with_time_limit(Duration::from_secs(cli.time_limit))
        .with_exploration(cli.exploration);
    if let Some(n) = cli.iterations {
        config = config.with_iterations(n);
    }

    let board = Board::new(cli.size).with_context(|| format!("invalid --size {}", cli.size))?;

    match cli.command {
        Some(Commands::Gtp) => {
            let mut engine = GtpEngine::new(mcts, board, config);
            engine.run()?;
        }
        Some(Commands::Demo) | None => run_demo(mcts, board, &config)?,
    }
    Ok(())
}

fn run_demo(mut mcts: Mcts, mut board: Board, config: &SearchConfig) -> Result<()> {
    println!("NoGo-Rust: NoGo MCTS Engine\n");
    println!("{board}");

    let mut color = Color::Black;
    let mut moves = 0;
    // One engine plays both sides, so each search reuses the previous tree.
    while let Some(pt) = mcts.select_move(&board, color, config)? {
        board.play_move(pt, color)?;
        moves += 1;

        let stats = mcts.last_stats();
        println!(
            "{moves:3}. {color} {} ({} iterations, {} visits at root)",
            board.format_point(pt),
            stats.map_or(0, |s| s.iterations),
            stats.map_or(0, |s| s.root_visits),
        );
        color = color.opponent();
    }

    println!("\n{board}");
    println!("{color} has no legal move; {} wins after {moves} moves", color.opponent());
    println!("Tree profile: {:?}", mcts.nodes_at_depth(MAX_PROFILE_DEPTH));
    Ok(())
}
