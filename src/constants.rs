//! Constants for board geometry, stone codes, and search defaults.
//!
//! The board uses a 1D array representation with padding for boundary detection.
//! Row `r` and column `c` (both 1-based) map to the index `r * (size + 1) + c`,
//! so the column-0 cell of each row doubles as the right-hand padding of the
//! row below it.

// =============================================================================
// Board Geometry
// =============================================================================

/// Default board size (NxN) used by NoGo competitions.
pub const DEFAULT_SIZE: usize = 7;

/// Smallest board we accept.
pub const MIN_SIZE: usize = 2;

/// Largest board we accept (GTP column letters run out at 25, but the
/// weight tables were never trained beyond 19).
pub const MAX_SIZE: usize = 19;

/// Length of the padded cell array for a `MAX_SIZE` board.
pub const MAX_BOARD_CELLS: usize = (MAX_SIZE + 1) * (MAX_SIZE + 2) + 1;

// =============================================================================
// Special Move Values
// =============================================================================

/// Marker for "no point" (index 0 is always padding).
pub const NO_POINT: usize = 0;

// =============================================================================
// Cell Codes
// =============================================================================

/// Empty point.
pub const EMPTY: u8 = 0;

/// Black stone.
pub const BLACK: u8 = 1;

/// White stone.
pub const WHITE: u8 = 2;

/// Out of bounds (padding).
pub const BORDER: u8 = 3;

// =============================================================================
// Patterns
// =============================================================================

/// Number of neighbors encoded in a pattern code.
pub const PATTERN_NEIGHBORS: usize = 8;

/// Size of the pattern code space: 4 states per neighbor, 8 neighbors.
pub const PATTERN_CODES: usize = 1 << (2 * PATTERN_NEIGHBORS);

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Default number of simulations per root child.
pub const N_SIMS_PER_CHILD: usize = 500;

/// Default UCT exploration constant (sqrt 2).
pub const EXPLORATION: f64 = std::f64::consts::SQRT_2;

/// Default wall-clock limit for one move, in seconds. One second below the
/// usual 30 second tournament limit to leave room for protocol overhead.
pub const TIME_LIMIT_SECS: u64 = 29;

/// Depth cap for the tree depth profile.
pub const MAX_PROFILE_DEPTH: usize = 100;
