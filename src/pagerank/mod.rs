//! PageRank algorithms
//!
//! The personalized weighted PageRank engine, split into the pure
//! propagation step ([`step`]), the convergence loop ([`personalized`]),
//! iteration hooks ([`observer`]) and ranked-list emission ([`ranking`]).

pub mod observer;
pub mod personalized;
pub mod ranking;
pub mod step;

/// Result of a PageRank computation
#[derive(Debug, Clone, PartialEq)]
pub struct PageRankResult {
    /// Scores for each node (indexed by node ID)
    pub scores: Vec<f64>,
    /// Number of propagation steps performed
    pub iterations: usize,
    /// Final L1 delta between the last two vectors
    pub delta: f64,
    /// Whether the delta dropped below the threshold before the cap
    pub converged: bool,
}

impl PageRankResult {
    /// Create a new PageRank result
    pub fn new(scores: Vec<f64>, iterations: usize, delta: f64, converged: bool) -> Self {
        Self {
            scores,
            iterations,
            delta,
            converged,
        }
    }

    /// Get top N nodes by score, ties in node ID order
    pub fn top_n(&self, n: usize) -> Vec<(u32, f64)> {
        let mut order = ranking::order_by_score(&self.scores);
        order.truncate(n);
        order.into_iter().map(|i| (i, self.scores[i as usize])).collect()
    }

    /// Get the score for a specific node
    pub fn score(&self, node: u32) -> f64 {
        self.scores.get(node as usize).copied().unwrap_or(0.0)
    }

    /// Sum of all scores
    pub fn total(&self) -> f64 {
        self.scores.iter().sum()
    }
}
