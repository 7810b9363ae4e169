//! Single-ply greedy move choice.
//!
//! Used when the tree search ends without usable statistics, e.g. the time
//! limit struck before a single iteration completed.

use crate::board::{Board, Color, Point};
use crate::playout::candidate_weights;
use crate::weights::{WeightError, WeightTable};

/// Return the legal move with the highest pattern weight.
///
/// Ties go to the lowest point index. Returns `None` if `color` has no
/// legal move.
pub fn choose_greedy_move(
    board: &Board,
    color: Color,
    table: &WeightTable,
) -> Result<Option<Point>, WeightError> {
    let (moves, weights) = candidate_weights(board, color, table)?;
    let mut best: Option<(Point, f64)> = None;
    for (&pt, &w) in moves.iter().zip(&weights) {
        match best {
            Some((_, best_w)) if w <= best_w => {}
            _ => best = Some((pt, w)),
        }
    }
    Ok(best.map(|(pt, _)| pt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::pattern_code;

    #[test]
    fn test_picks_heaviest_pattern() {
        let board = Board::new(3).unwrap();
        let centre = board.parse_point("B2").unwrap();
        // Only the centre has an all-empty neighborhood on a 3x3 board.
        let mut entries: Vec<(u32, f64)> = board
            .empty_points()
            .map(|pt| (pattern_code(&board, pt), 1.0))
            .collect();
        entries.push((pattern_code(&board, centre), 5.0));
        let table = WeightTable::from_entries(entries).unwrap();

        let mv = choose_greedy_move(&board, Color::Black, &table).unwrap();
        assert_eq!(mv, Some(centre));
    }

    #[test]
    fn test_ties_go_to_first() {
        let board = Board::new(4).unwrap();
        let table = WeightTable::uniform(1.0);
        let mv = choose_greedy_move(&board, Color::Black, &table).unwrap();
        assert_eq!(mv, board.parse_point("A1"));
    }

    #[test]
    fn test_no_legal_move() {
        let mut board = Board::new(2).unwrap();
        board.play_move(board.parse_point("A1").unwrap(), Color::White).unwrap();
        board.play_move(board.parse_point("B2").unwrap(), Color::White).unwrap();
        // Black at A2 or B1 would be suicide.
        let table = WeightTable::uniform(1.0);
        assert_eq!(choose_greedy_move(&board, Color::Black, &table).unwrap(), None);
    }
}
