//! 3x3 neighborhood pattern codes.
//!
//! The 8 neighbors of a point are each classified as empty, black, white or
//! border, and the classifications are combined into a base-4 number:
//!
//! ```text
//! code = n[0] + 4 * n[1] + 16 * n[2] + ... + 4^7 * n[7]
//! ```
//!
//! where `n` is [`Board::neighbors8`]. The neighbor order is a contract with
//! the weight tables: a table trained with a different order still loads,
//! it just scores every move wrongly.

use crate::board::{Board, Point};
use crate::constants::PATTERN_CODES;

/// Compute the pattern code for the neighborhood of `pt`.
#[inline]
pub fn pattern_code(board: &Board, pt: Point) -> u32 {
    let code = encode(&board.neighbors8(pt).map(|s| s.code()));
    debug_assert!((code as usize) < PATTERN_CODES);
    code
}

/// Fold 8 cell codes (each in 0..4) into a pattern code.
#[inline]
pub fn encode(cells: &[u32; 8]) -> u32 {
    cells.iter().rev().fold(0, |acc, &c| acc * 4 + c)
}
