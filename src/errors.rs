//! Error types for ranking, configuration, and FDR correction.

use thiserror::Error;

use crate::config::validation::ValidationReport;

/// Errors surfaced by the public API.
///
/// Dangling nodes, zero-weight edges, and an empty graph are not errors; they
/// are defined cases of the ranking algorithm.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GeneRankError {
    /// FDR method name outside the supported set.
    #[error("invalid FDR method {0:?}: expected 'indep' or 'negcorr'")]
    InvalidMethod(String),

    /// A p-value that is NaN or outside `[0, 1]`.
    #[error("p-value at position {index} is {value}, expected a number in [0, 1]")]
    InvalidPValue { index: usize, value: f64 },

    /// Negative or non-finite edge weight.
    #[error("edge {from} -> {to} has invalid weight {weight}")]
    InvalidWeight {
        from: String,
        to: String,
        weight: f64,
    },

    /// Negative or non-finite graph combination coefficient.
    #[error("coefficient {name} is {value}, expected a finite non-negative number")]
    InvalidCoefficient { name: &'static str, value: f64 },

    /// Negative or non-finite personalization mass.
    #[error("gene {gene} has invalid restart mass {mass}")]
    InvalidMass { gene: String, mass: f64 },

    /// Configuration rejected by the validation engine.
    #[error("invalid rank configuration: {0}")]
    InvalidConfig(ValidationReport),

    /// The iteration cap was reached before the L1 delta dropped below the
    /// threshold.
    #[error("did not converge after {iterations} iterations (last L1 delta {delta:e})")]
    NotConverged { iterations: usize, delta: f64 },

    /// Malformed JSON rank spec.
    #[error("malformed rank spec: {0}")]
    Spec(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GeneRankError>;
