//! Personalized weighted PageRank
//!
//! Power iteration seeded from the personalization vector itself. Each step
//! mixes the restart term with mass pulled along weighted in-edges; the loop
//! stops once the L1 distance between successive vectors is strictly below
//! the threshold.
//!
//! Unlike textbook PageRank, neither the personalization vector nor the
//! result is normalized, and dangling mass is dropped rather than
//! redistributed.
//!
//! The iteration cap is a hardening: without it an adversarial input (for
//! example damping 1.0 on a cycle) would loop forever. Hitting the cap is
//! reported through `converged = false` on the result.

use std::borrow::Cow;

use super::observer::{IterationObserver, NoopObserver};
use super::step::{l1_distance, propagate_into};
use super::PageRankResult;
use crate::graph::csr::CsrGraph;
use crate::types::{
    RankConfig, RestartStrategy, DEFAULT_DAMPING, DEFAULT_MAX_ITERATIONS, DEFAULT_THRESHOLD,
};

/// Personalized PageRank implementation
#[derive(Debug, Clone)]
pub struct PersonalizedPageRank {
    /// Damping factor (typically 0.85)
    pub damping: f64,
    /// Maximum number of iterations
    pub max_iterations: usize,
    /// Convergence threshold
    pub threshold: f64,
    /// Restart strategy
    pub strategy: RestartStrategy,
    /// Use the rayon pool for the propagation step
    pub parallel: bool,
}

impl Default for PersonalizedPageRank {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            threshold: DEFAULT_THRESHOLD,
            strategy: RestartStrategy::default(),
            parallel: false,
        }
    }
}

impl PersonalizedPageRank {
    /// Create a new PersonalizedPageRank with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the engine settings from a runtime config
    pub fn from_config(cfg: &RankConfig) -> Self {
        Self {
            damping: cfg.damping,
            max_iterations: cfg.max_iterations,
            threshold: cfg.threshold,
            strategy: cfg.strategy,
            parallel: cfg.parallel,
        }
    }

    /// Set the damping factor
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set the maximum iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the restart strategy
    pub fn with_strategy(mut self, strategy: RestartStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Enable the parallel propagation step
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run Personalized PageRank on a graph
    ///
    /// `personalization` holds the restart mass per node ID. A shorter vector
    /// is padded with zeros, a longer one truncated.
    pub fn run(&self, graph: &CsrGraph, personalization: &[f64]) -> PageRankResult {
        self.run_observed(graph, personalization, &mut NoopObserver)
    }

    /// Same as [`run`](Self::run), notifying `observer` after every step.
    pub fn run_observed(
        &self,
        graph: &CsrGraph,
        personalization: &[f64],
        observer: &mut impl IterationObserver,
    ) -> PageRankResult {
        let n = graph.num_nodes;
        if n == 0 {
            return PageRankResult::new(vec![], 0, 0.0, true);
        }

        let graph = match self.strategy {
            RestartStrategy::MinNormalized => Cow::Owned(graph.min_max_rescaled()),
            RestartStrategy::Personalized | RestartStrategy::UniformRestart => {
                Cow::Borrowed(graph)
            }
        };
        let restart = self.prepare_restart(n, personalization);

        // The restart vector doubles as the t = 0 state.
        let mut scores = restart.clone();
        let mut next_scores = vec![0.0; n];
        let mut iterations = 0;
        let mut delta = f64::INFINITY;
        let mut converged = false;

        while iterations < self.max_iterations {
            propagate_into(
                &graph,
                &scores,
                &restart,
                self.damping,
                self.parallel,
                &mut next_scores,
            );
            iterations += 1;

            delta = l1_distance(&scores, &next_scores);
            std::mem::swap(&mut scores, &mut next_scores);

            log_event!(trace, iteration = iterations, delta, "pagerank step");
            observer.on_iteration(iterations, delta, &scores);

            if delta < self.threshold {
                converged = true;
                break;
            }
        }

        PageRankResult::new(scores, iterations, delta, converged)
    }

    /// Build the restart distribution for the active strategy
    fn prepare_restart(&self, n: usize, personalization: &[f64]) -> Vec<f64> {
        match self.strategy {
            RestartStrategy::UniformRestart => vec![1.0 / n as f64; n],
            RestartStrategy::Personalized | RestartStrategy::MinNormalized => {
                let mut restart = vec![0.0; n];
                for (slot, &mass) in restart.iter_mut().zip(personalization) {
                    *slot = mass;
                }
                restart
            }
        }
    }
}
