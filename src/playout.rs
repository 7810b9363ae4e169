//! Pattern-weighted Monte Carlo playouts.
//!
//! A playout plays weighted random legal moves until the side to move has
//! none left. That side loses. Each candidate move is weighted by the
//! [`WeightTable`] entry for its 3x3 neighborhood, and one move is drawn by
//! inverse-CDF sampling over the normalized weights.

use std::rc::Rc;

use log::trace;

use crate::board::{Board, Color, Point};
use crate::mcts::SearchError;
use crate::patterns::pattern_code;
use crate::weights::{WeightError, WeightTable};

/// Legal moves for `color` and their pattern weights, in ascending point order.
///
/// Weights are taken from the board as it is before the move is played.
pub fn candidate_weights(
    board: &Board,
    color: Color,
    table: &WeightTable,
) -> Result<(Vec<Point>, Vec<f64>), WeightError> {
    let moves = board.legal_moves(color);
    let weights = moves
        .iter()
        .map(|&pt| table.lookup(pattern_code(board, pt)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((moves, weights))
}

/// Cumulative bounds of the normalized weights.
///
/// The result is non-decreasing and ends at (or within round-off of) 1.0.
/// A zero total falls back to uniform weighting.
pub fn cumulative_distribution(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    let n = weights.len() as f64;
    let mut bound = 0.0;
    weights
        .iter()
        .map(|&w| {
            bound += if total > 0.0 { w / total } else { 1.0 / n };
            bound
        })
        .collect()
}

/// Index of the first bound strictly above `draw`.
///
/// A draw at or above the last bound (possible only through round-off)
/// picks the last entry.
pub fn sample_index(bounds: &[f64], draw: f64) -> Option<usize> {
    if bounds.is_empty() {
        return None;
    }
    let idx = bounds.partition_point(|&b| b <= draw);
    Some(idx.min(bounds.len() - 1))
}

/// Rollout move generator backed by a shared weight table.
#[derive(Debug, Clone)]
pub struct RolloutPolicy {
    table: Rc<WeightTable>,
}

impl RolloutPolicy {
    pub fn new(table: Rc<WeightTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &WeightTable {
        &self.table
    }

    /// Draw one legal move for `color`, or `None` if it has no legal move.
    pub fn choose_move(
        &self,
        board: &Board,
        color: Color,
        rng: &mut fastrand::Rng,
    ) -> Result<Option<Point>, WeightError> {
        let (moves, weights) = candidate_weights(board, color, &self.table)?;
        let bounds = cumulative_distribution(&weights);
        Ok(sample_index(&bounds, rng.f64()).map(|i| moves[i]))
    }

    /// Play the game out on `board` and return the winner.
    ///
    /// The board is consumed as scratch space; pass a copy of anything that
    /// must survive.
    pub fn simulate(&self, board: &mut Board, rng: &mut fastrand::Rng) -> Result<Color, SearchError> {
        let mut plies = 0usize;
        loop {
            let color = board.current_player();
            match self.choose_move(board, color, rng)? {
                Some(pt) => {
                    board.play_move(pt, color)?;
                    plies += 1;
                }
                None => {
                    trace!("playout ended after {plies} plies, {color} has no move");
                    return Ok(color.opponent());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_policy() -> RolloutPolicy {
        RolloutPolicy::new(Rc::new(WeightTable::uniform(1.0)))
    }

    #[test]
    fn test_cumulative_distribution() {
        let bounds = cumulative_distribution(&[3.0, 1.0]);
        assert_eq!(bounds, vec![0.75, 1.0]);

        let bounds = cumulative_distribution(&[0.0, 2.0, 0.0, 2.0]);
        assert_eq!(bounds, vec![0.0, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn test_zero_total_is_uniform() {
        let bounds = cumulative_distribution(&[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(bounds, vec![0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_sample_index() {
        let bounds = [0.25, 0.5, 1.0];
        assert_eq!(sample_index(&bounds, 0.0), Some(0));
        assert_eq!(sample_index(&bounds, 0.25), Some(1));
        assert_eq!(sample_index(&bounds, 0.7), Some(2));
        assert_eq!(sample_index(&[0.5, 0.9999999], 0.99999995), Some(1));
        assert_eq!(sample_index(&[], 0.3), None);
    }

    #[test]
    fn test_zero_weight_never_sampled() {
        let bounds = cumulative_distribution(&[1.0, 0.0, 1.0]);
        for i in 0..1000 {
            let draw = i as f64 / 1000.0;
            assert_ne!(sample_index(&bounds, draw), Some(1));
        }
    }

    #[test]
    fn test_weighted_sampling_favors_heavier() {
        // Two candidates with weights 3 and 1: expect about 75% / 25%.
        let bounds = cumulative_distribution(&[3.0, 1.0]);
        let mut rng = fastrand::Rng::with_seed(7);
        let draws = 10_000;
        let heavy = (0..draws)
            .filter(|_| sample_index(&bounds, rng.f64()) == Some(0))
            .count();
        let share = heavy as f64 / draws as f64;
        assert!(heavy > draws - heavy);
        assert!((share - 0.75).abs() < 0.03, "heavy share was {share}");
    }

    #[test]
    fn test_choose_move_follows_weights() {
        // Every corner of a 2x2 board has its own pattern; weight A1 at 3.0
        // against 1.0 for the other three, so A1 should come up half the time.
        let board = Board::new(2).unwrap();
        let a1 = board.parse_point("A1").unwrap();
        let entries = board.empty_points().map(|pt| {
            let w = if pt == a1 { 3.0 } else { 1.0 };
            (pattern_code(&board, pt), w)
        });
        let policy = RolloutPolicy::new(Rc::new(WeightTable::from_entries(entries).unwrap()));

        let mut rng = fastrand::Rng::with_seed(42);
        let draws = 10_000;
        let mut counts = [0usize; 2];
        for _ in 0..draws {
            let pt = policy.choose_move(&board, Color::Black, &mut rng).unwrap().unwrap();
            counts[usize::from(pt != a1)] += 1;
        }
        let share = counts[0] as f64 / draws as f64;
        assert!((share - 0.5).abs() < 0.03, "A1 share was {share}");
    }

    #[test]
    fn test_choose_move_is_legal() {
        let policy = uniform_policy();
        let board = Board::new(5).unwrap();
        let mut rng = fastrand::Rng::with_seed(1);
        for _ in 0..50 {
            let pt = policy.choose_move(&board, Color::Black, &mut rng).unwrap().unwrap();
            assert!(board.is_legal(pt, Color::Black));
        }
    }

    #[test]
    fn test_choose_move_missing_pattern() {
        let table: WeightTable = "0 1.0\n".parse().unwrap();
        let policy = RolloutPolicy::new(Rc::new(table));
        let board = Board::new(5).unwrap();
        let mut rng = fastrand::Rng::with_seed(1);
        // Edge points have border neighbors, so their codes are absent.
        let err = policy.choose_move(&board, Color::Black, &mut rng).unwrap_err();
        assert!(matches!(err, WeightError::MissingPattern(_)));
    }

    #[test]
    fn test_simulate_reaches_terminal() {
        let policy = uniform_policy();
        let mut rng = fastrand::Rng::with_seed(3);
        let mut board = Board::new(4).unwrap();
        let winner = policy.simulate(&mut board, &mut rng).unwrap();
        let loser = winner.opponent();
        assert_eq!(board.current_player(), loser);
        assert!(!board.has_legal_move(loser));
    }
}
