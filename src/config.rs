//! Search configuration.

use std::time::Duration;

use crate::constants::{EXPLORATION, N_SIMS_PER_CHILD, TIME_LIMIT_SECS};

/// How many iterations one call to `select_move` may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationBudget {
    /// Exactly this many iterations.
    Fixed(usize),
    /// This many iterations per legal move at the root. A reused root with
    /// many children gets a proportionally larger budget.
    PerChild(usize),
}

impl IterationBudget {
    /// Total iterations for a root with `child_count` children.
    pub fn resolve(self, child_count: usize) -> usize {
        match self {
            IterationBudget::Fixed(n) => n,
            IterationBudget::PerChild(n) => n.saturating_mul(child_count),
        }
    }
}

/// Configuration for one move search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Iteration budget; the search stops when it or the time limit runs out.
    pub budget: IterationBudget,

    /// Wall-clock limit for the whole search. Checked between iterations.
    pub time_limit: Duration,

    /// UCT exploration constant.
    /// Higher values encourage exploration, lower values favor exploitation.
    pub exploration: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            budget: IterationBudget::PerChild(N_SIMS_PER_CHILD),
            time_limit: Duration::from_secs(TIME_LIMIT_SECS),
            exploration: EXPLORATION,
        }
    }
}

impl SearchConfig {
    /// Builder pattern: run a fixed number of iterations.
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.budget = IterationBudget::Fixed(n);
        self
    }

    /// Builder pattern: run `n` iterations per root child.
    pub fn with_simulations_per_child(mut self, n: usize) -> Self {
        self.budget = IterationBudget::PerChild(n);
        self
    }

    /// Builder pattern: set the wall-clock limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.budget, IterationBudget::PerChild(500));
        assert_eq!(config.time_limit, Duration::from_secs(29));
        assert!((config.exploration - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_budget_resolve() {
        assert_eq!(IterationBudget::Fixed(200).resolve(49), 200);
        assert_eq!(IterationBudget::PerChild(10).resolve(49), 490);
        assert_eq!(IterationBudget::PerChild(10).resolve(0), 0);
        assert_eq!(IterationBudget::PerChild(usize::MAX).resolve(2), usize::MAX);
    }

    #[test]
    fn test_builders() {
        let config = SearchConfig::default()
            .with_iterations(64)
            .with_time_limit(Duration::from_millis(250))
            .with_exploration(0.5);
        assert_eq!(config.budget, IterationBudget::Fixed(64));
        assert_eq!(config.time_limit, Duration::from_millis(250));
        assert_eq!(config.exploration, 0.5);

        let config = config.with_simulations_per_child(3);
        assert_eq!(config.budget, IterationBudget::PerChild(3));
    }
}
