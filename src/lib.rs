//! NoGo-Rust: a Monte Carlo Tree Search engine for NoGo.
//!
//! NoGo is played on a Go board, but capturing is forbidden: a move that
//! would remove any stones, including the mover's own, is illegal. The
//! first player with no legal move loses.
//!
//! The engine runs UCT tree search with pattern-weighted playouts, reusing
//! the search tree from one move to the next.
//!
//! ## Modules
//!
//! - [`constants`] - Board limits, cell codes and search defaults
//! - [`board`] - Board state, NoGo legality and coordinates
//! - [`patterns`] - 3x3 neighborhood pattern codes
//! - [`weights`] - Pattern weight table and its loader
//! - [`playout`] - Weighted random playouts
//! - [`fallback`] - Greedy move choice when search has no statistics
//! - [`config`] - Search budget and time limit
//! - [`mcts`] - Search tree and the search engine
//! - [`gtp`] - Go Text Protocol front end
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//!
//! use nogo_rust::board::{Board, Color};
//! use nogo_rust::config::SearchConfig;
//! use nogo_rust::mcts::Mcts;
//! use nogo_rust::weights::WeightTable;
//!
//! let board = Board::new(5).unwrap();
//! let mut engine = Mcts::with_seed(Rc::new(WeightTable::uniform(1.0)), 42);
//!
//! // Run 200 iterations and pick the most visited move
//! let config = SearchConfig::default().with_iterations(200);
//! let best = engine.select_move(&board, Color::Black, &config).unwrap();
//! println!("Best move: {}", board.format_point(best.unwrap()));
//! ```

pub mod board;
pub mod config;
pub mod constants;
pub mod fallback;
pub mod gtp;
pub mod mcts;
pub mod patterns;
pub mod playout;
pub mod weights;
