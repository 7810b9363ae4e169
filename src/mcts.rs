//! Monte Carlo Tree Search (MCTS) with UCT selection and tree reuse.
//!
//! Each iteration descends from the root with UCT, expands the leaf it
//! reaches, runs one pattern-weighted playout from there, and propagates the
//! winner back up the path. After the budget runs out the most-visited root
//! child is played, and the tree below it is kept for the next move.
//!
//! Children are owned by their parent. There are no parent links: the path of
//! child indices taken during descent is enough to walk back up, and
//! dropping a node drops its whole subtree.

use std::rc::Rc;
use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};
use thiserror::Error;

use crate::board::{Board, Color, MoveError, Point};
use crate::config::SearchConfig;
use crate::constants::NO_POINT;
use crate::fallback::choose_greedy_move;
use crate::playout::RolloutPolicy;
use crate::weights::{WeightError, WeightTable};

/// Errors that can occur during a search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The weight table does not cover a pattern met during a playout.
    #[error(transparent)]
    Weights(#[from] WeightError),

    /// A move stored in the tree was rejected by the board, meaning the tree
    /// and the board describe different positions.
    #[error("search tree out of sync with board: {0}")]
    Board(#[from] MoveError),
}

/// A node in the MCTS search tree.
///
/// Statistics are only written by the search; callers get read access.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// The color to move in this position
    pub(crate) color: Color,
    /// The move that led here from the parent (`NO_POINT` for a fresh root)
    pub(crate) mv: Point,
    /// Number of playouts through this node
    pub(crate) visits: u32,
    /// Playouts won by the player who made `mv`, i.e. the parent's color to
    /// move. This lets a parent rank its children by its own win rate.
    pub(crate) wins: u32,
    /// One child per legal move, sorted by move
    pub(crate) children: Vec<TreeNode>,
    /// Whether `children` has been populated
    pub(crate) expanded: bool,
}

impl TreeNode {
    /// Create an unexpanded root with `color` to move.
    pub fn new(color: Color) -> Self {
        Self::child(NO_POINT, color)
    }

    fn child(mv: Point, color: Color) -> Self {
        Self {
            color,
            mv,
            visits: 0,
            wins: 0,
            children: Vec::new(),
            expanded: false,
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn mv(&self) -> Point {
        self.mv
    }

    #[inline]
    pub fn visits(&self) -> u32 {
        self.visits
    }

    #[inline]
    pub fn wins(&self) -> u32 {
        self.wins
    }

    #[inline]
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    #[inline]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Win rate for the player who moved into this node.
    #[inline]
    pub fn winrate(&self) -> f64 {
        if self.visits > 0 {
            self.wins as f64 / self.visits as f64
        } else {
            -0.1 // Indicate unvisited
        }
    }

    /// Create one child per legal move of `board` for this node's color.
    ///
    /// `board` must be the position this node represents.
    pub fn expand(&mut self, board: &Board) {
        debug_assert!(!self.expanded, "node expanded twice");
        let child_color = self.color.opponent();
        self.children = board
            .legal_moves(self.color)
            .into_iter()
            .map(|mv| TreeNode::child(mv, child_color))
            .collect();
        self.expanded = true;
    }

    /// Pick the child to descend into.
    ///
    /// The first unvisited child wins outright; otherwise the child with the
    /// highest UCT score, ties going to the first. `None` for a leaf.
    pub fn select_child(&self, exploration: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, child) in self.children.iter().enumerate() {
            if child.visits == 0 {
                return Some(i);
            }
            let score = uct(child.wins, child.visits, self.visits, exploration);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((i, score));
            }
        }
        best.map(|(i, _)| i)
    }

    /// The most visited child, ties going to the first.
    pub fn best_child(&self) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (i, child) in self.children.iter().enumerate() {
            if best.is_none_or(|(_, v)| child.visits > v) {
                best = Some((i, child.visits));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Index of the child reached by `mv`.
    pub fn find_child(&self, mv: Point) -> Option<usize> {
        self.children.binary_search_by_key(&mv, |c| c.mv).ok()
    }

    /// Record one playout result at this node.
    #[inline]
    fn update(&mut self, winner: Color) {
        self.visits += 1;
        if self.color != winner {
            self.wins += 1;
        }
    }
}

/// UCT score of a child.
#[inline]
pub fn uct(wins: u32, visits: u32, parent_visits: u32, exploration: f64) -> f64 {
    let visits = visits as f64;
    wins as f64 / visits + exploration * ((parent_visits as f64).ln() / visits).sqrt()
}

/// Update statistics along `path` (child indices from `root`) after a playout
/// won by `winner`.
pub fn backpropagate(root: &mut TreeNode, path: &[usize], winner: Color) {
    let mut node = root;
    node.update(winner);
    for &idx in path {
        node = &mut node.children[idx];
        node.update(winner);
    }
}

/// Summary of the last search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStats {
    /// Completed iterations
    pub iterations: usize,
    /// Wall-clock time spent searching
    pub elapsed: Duration,
    /// Root visits after the search (includes reused visits)
    pub root_visits: u32,
    /// Whether the move came from the greedy fallback
    pub fallback_used: bool,
}

/// The search engine. Owns the persistent tree between moves.
pub struct Mcts {
    root: TreeNode,
    to_play: Color,
    policy: RolloutPolicy,
    rng: fastrand::Rng,
    last_stats: Option<SearchStats>,
}

impl Mcts {
    /// Create an engine seeded from system entropy.
    pub fn new(table: Rc<WeightTable>) -> Self {
        Self::with_rng(table, fastrand::Rng::new())
    }

    /// Create an engine with a deterministic random source.
    pub fn with_seed(table: Rc<WeightTable>, seed: u64) -> Self {
        Self::with_rng(table, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(table: Rc<WeightTable>, rng: fastrand::Rng) -> Self {
        Self {
            root: TreeNode::new(Color::Black),
            to_play: Color::Black,
            policy: RolloutPolicy::new(table),
            rng,
            last_stats: None,
        }
    }

    /// Discard the tree, e.g. at the start of a new game.
    pub fn reset(&mut self) {
        self.root = TreeNode::new(Color::Black);
        self.to_play = Color::Black;
    }

    /// The color the persistent tree expects to move next.
    #[inline]
    pub fn to_play(&self) -> Color {
        self.to_play
    }

    #[inline]
    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    pub fn last_stats(&self) -> Option<&SearchStats> {
        self.last_stats.as_ref()
    }

    /// Run one select / expand / playout / backpropagate cycle.
    ///
    /// `board` is played on and must be a scratch copy of the position at
    /// the root, with `color` to move.
    pub fn run_iteration(
        &mut self,
        board: &mut Board,
        mut color: Color,
        exploration: f64,
    ) -> Result<(), SearchError> {
        let mut path = Vec::new();
        let mut node = &mut self.root;
        if !node.expanded {
            node.expand(board);
        }

        while let Some(idx) = node.select_child(exploration) {
            board.play_move(node.children[idx].mv, color)?;
            color = color.opponent();
            path.push(idx);
            node = &mut node.children[idx];
        }
        if !node.expanded {
            node.expand(board);
        }
        debug_assert_eq!(color, node.color);

        let winner = if node.children.is_empty() {
            // No legal move here: the side to move has already lost.
            node.color.opponent()
        } else {
            debug_assert_eq!(board.current_player(), node.color);
            self.policy.simulate(board, &mut self.rng)?
        };
        trace!("iteration depth {} winner {winner}", path.len());
        backpropagate(&mut self.root, &path, winner);
        Ok(())
    }

    /// Search the position and return the move to play for `color`, or
    /// `None` if `color` has no legal move.
    ///
    /// `board` is only read. The persistent tree advances to the chosen move.
    pub fn select_move(
        &mut self,
        board: &Board,
        color: Color,
        config: &SearchConfig,
    ) -> Result<Option<Point>, SearchError> {
        if self.to_play != color || self.root.color != color {
            if self.root.expanded {
                warn!("tree expects {} to play, got {color}; starting fresh", self.to_play);
            }
            self.root = TreeNode::new(color);
            self.to_play = color;
        }
        if !self.root.expanded {
            self.root.expand(board);
        }
        if self.root.children.is_empty() {
            info!("{color} has no legal move");
            self.last_stats = Some(SearchStats {
                iterations: 0,
                elapsed: Duration::ZERO,
                root_visits: self.root.visits,
                fallback_used: false,
            });
            return Ok(None);
        }

        let start = Instant::now();
        let deadline = start.checked_add(config.time_limit);
        let budget = config.budget.resolve(self.root.children.len());
        let reused = self.root.visits;

        let mut iterations = 0;
        while iterations < budget {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                debug!("time limit reached after {iterations} of {budget} iterations");
                break;
            }
            let mut scratch = board.clone();
            self.run_iteration(&mut scratch, color, config.exploration)?;
            iterations += 1;
        }

        let elapsed = start.elapsed();
        let mut stats = SearchStats {
            iterations,
            elapsed,
            root_visits: self.root.visits,
            fallback_used: false,
        };

        let idx = match self.root.best_child() {
            Some(idx) if self.root.children[idx].visits > 0 => idx,
            _ => {
                warn!("search ended without statistics, using greedy move");
                stats.fallback_used = true;
                let mv = choose_greedy_move(board, color, self.policy.table())?;
                match mv.and_then(|mv| self.root.find_child(mv)) {
                    Some(idx) => idx,
                    None => {
                        self.root = TreeNode::new(color.opponent());
                        self.to_play = color.opponent();
                        self.last_stats = Some(stats);
                        return Ok(mv);
                    }
                }
            }
        };

        let mv = self.root.children[idx].mv;
        info!(
            "{color} plays {} after {iterations} iterations ({reused} reused) in {:.2?}",
            board.format_point(mv),
            elapsed
        );
        dump_children(&self.root, board);

        self.advance(idx);
        self.to_play = color.opponent();
        self.last_stats = Some(stats);
        Ok(Some(mv))
    }

    /// Follow the opponent's move in the persistent tree.
    ///
    /// Keeps the matching subtree and its statistics if the move was
    /// searched; otherwise starts a fresh tree for the new position.
    pub fn notify_opponent_move(&mut self, mv: Point) {
        match self.root.find_child(mv) {
            Some(idx) => {
                debug!(
                    "reusing subtree for point {mv} with {} visits",
                    self.root.children[idx].visits
                );
                self.advance(idx);
            }
            None => {
                debug!("point {mv} is outside the searched tree; starting fresh");
                self.root = TreeNode::new(self.to_play.opponent());
            }
        }
        self.to_play = self.to_play.opponent();
    }

    /// Make child `idx` the new root, dropping its siblings.
    fn advance(&mut self, idx: usize) {
        let child = self.root.children.swap_remove(idx);
        self.root = child;
    }

    /// Number of expanded nodes at each depth of the persistent tree, up to
    /// `max_depth` levels.
    pub fn nodes_at_depth(&self, max_depth: usize) -> Vec<usize> {
        let mut counts = vec![0; max_depth];
        count_at_depth(&self.root, 0, &mut counts);
        while counts.last() == Some(&0) {
            counts.pop();
        }
        counts
    }
}

fn count_at_depth(node: &TreeNode, depth: usize, counts: &mut [usize]) {
    if !node.expanded || depth >= counts.len() {
        return;
    }
    counts[depth] += 1;
    for child in &node.children {
        count_at_depth(child, depth + 1, counts);
    }
}

/// Log statistics of the root's children.
fn dump_children(root: &TreeNode, board: &Board) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    for child in root.children.iter().filter(|c| c.visits > 0) {
        debug!(
            "move {} v={} w={} wr={:.3}",
            board.format_point(child.mv),
            child.visits,
            child.wins,
            child.winrate()
        );
    }
}
