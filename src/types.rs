//! Core shared types
//!
//! Runtime configuration for the ranking engine and the ranked-gene output
//! row consumed by report layers.

use serde::{Deserialize, Serialize};

/// Default damping factor (probability of following an edge).
pub const DEFAULT_DAMPING: f64 = 0.85;

/// Default L1 convergence threshold.
pub const DEFAULT_THRESHOLD: f64 = 1e-6;

/// Default iteration cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Below this many nodes the parallel propagation step runs sequentially.
pub const PARALLEL_MIN_NODES: usize = 1_000;

/// How restart mass and edge weights are interpreted by the engine.
///
/// These are mutually exclusive strategies; the engine never blends them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartStrategy {
    /// Restart term `(1 - d) * p0(v)` with raw per-edge weights.
    #[default]
    Personalized,
    /// Restart term `(1 - d) / n` for every node, starting from a uniform
    /// vector. The personalization vector is ignored.
    UniformRestart,
    /// Personalized restart over a graph whose positive edge weights have
    /// been min-max rescaled into `[0, 1]`.
    MinNormalized,
}

impl RestartStrategy {
    /// Returns the user-facing name used in JSON and log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personalized => "personalized",
            Self::UniformRestart => "uniform_restart",
            Self::MinNormalized => "min_normalized",
        }
    }
}

/// Runtime configuration for a ranking run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankConfig {
    /// Damping factor `d` in `[0, 1]`
    pub damping: f64,
    /// Convergence threshold on the L1 distance between iterations
    pub threshold: f64,
    /// Maximum number of propagation steps before giving up
    pub max_iterations: usize,
    /// Restart strategy
    pub strategy: RestartStrategy,
    /// Run the propagation step on the rayon thread pool
    pub parallel: bool,
    /// Return the last vector instead of an error when the cap is hit
    pub allow_unconverged: bool,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            threshold: DEFAULT_THRESHOLD,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            strategy: RestartStrategy::default(),
            parallel: false,
            allow_unconverged: false,
        }
    }
}

impl RankConfig {
    /// Set the damping factor
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set the convergence threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the iteration cap
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the restart strategy
    pub fn with_strategy(mut self, strategy: RestartStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Enable or disable the parallel propagation step
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Accept a non-converged result instead of failing
    pub fn with_allow_unconverged(mut self, allow: bool) -> Self {
        self.allow_unconverged = allow;
        self
    }
}

/// One row of the ranked output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedGene {
    /// Gene identifier as given to the graph builder
    pub gene: String,
    /// Converged score
    pub score: f64,
}

impl RankedGene {
    pub fn new(gene: impl Into<String>, score: f64) -> Self {
        Self {
            gene: gene.into(),
            score,
        }
    }
}
