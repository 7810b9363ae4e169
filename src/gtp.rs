//! Go Text Protocol (GTP) front end.
//!
//! Implements the subset of GTP version 2 that NoGo tournaments use, so the
//! engine can be driven by GoGui or a referee script.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `boardsize <size>` - Set board size and clear the board
//! - `clear_board` - Reset the board to empty
//! - `showboard` - Print the board
//! - `play <color> <vertex>` - Play a move
//! - `genmove <color>` - Search, play and print a move (`pass` if none is legal)
//! - `legal_moves <color>` - List legal moves
//! - `timelimit <seconds>` - Set the time limit per move
//!
//! ## Example
//!
//! ```ignore
//! use nogo_rust::gtp::GtpEngine;
//! let mut engine = GtpEngine::new(mcts, board, config);
//! engine.run()?;
//! ```

use std::io::{self, BufRead, Write};
use std::time::Duration;

use log::{debug, error};

use crate::board::{Board, Color};
use crate::config::SearchConfig;
use crate::constants::MAX_PROFILE_DEPTH;
use crate::mcts::Mcts;

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "genmove",
    "known_command",
    "legal_moves",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "timelimit",
    "version",
];

/// GTP engine state.
pub struct GtpEngine {
    /// Current game position
    board: Board,
    /// Search engine, holding the tree between moves
    mcts: Mcts,
    /// Search settings for `genmove`
    config: SearchConfig,
}

impl GtpEngine {
    pub fn new(mcts: Mcts, board: Board, config: SearchConfig) -> Self {
        Self {
            board,
            mcts,
            config,
        }
    }

    /// Run the GTP command loop on stdin and stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    /// Run the GTP command loop until `quit` or end of input.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Parse optional command ID
            let (id, command_line) = Self::parse_id(line);

            // Parse command and arguments
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();
            debug!("gtp: {command_line}");

            // Execute command
            let (success, message) = self.execute(&command, args);

            // Format and send response
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            write!(output, "{prefix}{id_str} {message}\n\n")?;
            output.flush()?;

            // Quit if requested
            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());

        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }

        (None, trimmed)
    }

    /// Execute a GTP command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, "nogo-rust".to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let Ok(size) = arg.parse::<usize>() else {
                    return (false, "invalid size".to_string());
                };
                match Board::new(size) {
                    Ok(board) => {
                        self.board = board;
                        self.mcts.reset();
                        (true, String::new())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "clear_board" => {
                self.clear_board();
                (true, String::new())
            }

            "showboard" => (true, format!("\n{}", self.board)),

            "play" => {
                let [color, vertex] = args else {
                    return (false, "missing arguments".to_string());
                };
                let color: Color = match color.parse() {
                    Ok(c) => c,
                    Err(e) => return (false, format!("{e}")),
                };
                let Some(pt) = self.board.parse_point(vertex) else {
                    return (false, format!("illegal move: \"{color} {vertex}\" wrong coordinate"));
                };

                if let Err(e) = self.board.play_move(pt, color) {
                    return (false, format!("illegal move: \"{color} {vertex}\" {e}"));
                }
                if color == self.mcts.to_play() {
                    self.mcts.notify_opponent_move(pt);
                } else {
                    // A move the tree did not expect; its statistics no longer apply.
                    self.mcts.reset();
                }
                (true, String::new())
            }

            "genmove" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let color: Color = match arg.parse() {
                    Ok(c) => c,
                    Err(e) => return (false, format!("{e}")),
                };

                match self.mcts.select_move(&self.board, color, &self.config) {
                    Ok(Some(pt)) => match self.board.play_move(pt, color) {
                        Ok(()) => {
                            debug!("tree profile {:?}", self.mcts.nodes_at_depth(MAX_PROFILE_DEPTH));
                            (true, self.board.format_point(pt))
                        }
                        Err(e) => (false, e.to_string()),
                    },
                    Ok(None) => (true, "pass".to_string()),
                    Err(e) => {
                        error!("search failed: {e}");
                        (false, e.to_string())
                    }
                }
            }

            "legal_moves" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let color: Color = match arg.parse() {
                    Ok(c) => c,
                    Err(e) => return (false, format!("{e}")),
                };
                let mut moves: Vec<String> = self
                    .board
                    .legal_moves(color)
                    .into_iter()
                    .map(|pt| self.board.format_point(pt))
                    .collect();
                moves.sort();
                (true, moves.join(" "))
            }

            "timelimit" => {
                match args.first().and_then(|a| a.parse::<u64>().ok()) {
                    Some(secs) if secs > 0 => {
                        self.config.time_limit = Duration::from_secs(secs);
                        (true, String::new())
                    }
                    _ => (false, "invalid time limit".to_string()),
                }
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn clear_board(&mut self) {
        // The size was valid when this board was created.
        if let Ok(board) = Board::new(self.board.size()) {
            self.board = board;
        }
        self.mcts.reset();
    }
}
