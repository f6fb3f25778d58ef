//! Rank run specification.
//!
//! A [`RankSpec`] is the serialisable, versioned form of a
//! [`RankConfig`]. Callers usually load it from JSON, validate it with the
//! [`ValidationEngine`], and hand the resulting config to the ranker.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "v": 1,
//!   "damping": 0.9,
//!   "threshold": 1e-6,
//!   "max_iterations": 10000,
//!   "strategy": "personalized",
//!   "parallel": false,
//!   "allow_unconverged": false,
//!   "strict": false
//! }
//! ```
//!
//! Every field except `v` is optional and falls back to the
//! [`RankConfig`] default.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::validation::{ValidationEngine, ValidationReport};
use crate::errors::{GeneRankError, Result};
use crate::types::{
    RankConfig, RestartStrategy, DEFAULT_DAMPING, DEFAULT_MAX_ITERATIONS, DEFAULT_THRESHOLD,
};

/// The only spec version understood by this crate.
pub const SPEC_VERSION: u32 = 1;

/// Top-level rank specification (v1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankSpec {
    /// Spec version (currently `1`).
    pub v: u32,

    #[serde(default = "default_damping")]
    pub damping: f64,

    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    #[serde(default)]
    pub strategy: RestartStrategy,

    #[serde(default)]
    pub parallel: bool,

    #[serde(default)]
    pub allow_unconverged: bool,

    /// If `true`, unrecognized fields are errors; if `false`, warnings.
    #[serde(default)]
    pub strict: bool,

    /// Captures any fields not recognized by the schema.
    /// Used by the strict-mode validation rule.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

fn default_damping() -> f64 {
    DEFAULT_DAMPING
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

impl Default for RankSpec {
    fn default() -> Self {
        RankConfig::default().into()
    }
}

impl From<RankConfig> for RankSpec {
    fn from(cfg: RankConfig) -> Self {
        Self {
            v: SPEC_VERSION,
            damping: cfg.damping,
            threshold: cfg.threshold,
            max_iterations: cfg.max_iterations,
            strategy: cfg.strategy,
            parallel: cfg.parallel,
            allow_unconverged: cfg.allow_unconverged,
            strict: false,
            unknown_fields: HashMap::new(),
        }
    }
}

impl RankSpec {
    /// Parse a spec from JSON. Does not validate.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Run the default validation rules.
    pub fn validate(&self) -> ValidationReport {
        ValidationEngine::with_defaults().validate(self)
    }

    /// Validate and convert into a runtime [`RankConfig`].
    ///
    /// Warnings are logged and otherwise ignored; any error rejects the spec
    /// with the full report attached.
    pub fn to_config(&self) -> Result<RankConfig> {
        let report = self.validate();
        if report.has_errors() {
            return Err(GeneRankError::InvalidConfig(report));
        }
        #[cfg(feature = "tracing")]
        for warning in report.warnings() {
            tracing::warn!(%warning, "rank spec warning");
        }

        Ok(RankConfig {
            damping: self.damping,
            threshold: self.threshold,
            max_iterations: self.max_iterations,
            strategy: self.strategy,
            parallel: self.parallel,
            allow_unconverged: self.allow_unconverged,
        })
    }
}
