//! # rapid-generank
//!
//! Disease gene prioritization by personalized weighted PageRank.
//!
//! Seed evidence (a personalization vector over genes) is propagated across a
//! directed, weighted interaction graph with a restart-biased random walk.
//! Genes come out ranked by their converged score.
//!
//! ## Quick start
//!
//! ```
//! use rapid_generank::{GeneRanker, GraphBuilder, PersonalizationVector, RankConfig};
//!
//! let graph = GraphBuilder::from_edges([
//!     ("TP53", "MDM2", 1.0),
//!     ("MDM2", "CDKN1A", 0.5),
//!     ("CDKN1A", "TP53", 1.0),
//! ])
//! .unwrap()
//! .freeze();
//!
//! let seeds = PersonalizationVector::from_seeds(["TP53"], 1.0).unwrap();
//! let ranker = GeneRanker::new(RankConfig::default().with_damping(0.9)).unwrap();
//! let output = ranker.rank(&graph, &seeds).unwrap();
//!
//! assert_eq!(output.ranked[0].gene, "TP53");
//! ```
//!
//! The crate also ships a Benjamini-Hochberg / Benjamini-Yekutieli FDR
//! correction in [`stats::fdr`] for pre- and post-processing of enrichment
//! p-values.

/// Enter a tracing span for a ranking stage (when the `tracing` feature is
/// enabled). When disabled, this is a no-op and the compiler eliminates it.
macro_rules! trace_stage {
    ($name:expr) => {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("generank_stage", stage = $name).entered();
    };
}

/// Emit a tracing event at the given level (when the `tracing` feature is
/// enabled).
macro_rules! log_event {
    ($level:ident, $($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        tracing::$level!($($arg)+);
    };
}

pub mod config;
pub mod errors;
pub mod graph;
pub mod pagerank;
pub mod personalization;
pub mod ranker;
pub mod stats;
pub mod types;

pub use config::spec::RankSpec;
pub use errors::{GeneRankError, Result};
pub use graph::builder::GraphBuilder;
pub use graph::csr::CsrGraph;
pub use pagerank::personalized::PersonalizedPageRank;
pub use pagerank::PageRankResult;
pub use personalization::{AggregationPolicy, PersonalizationVector};
pub use ranker::{GeneRanker, RankOutput};
pub use stats::fdr::{fdr_correction, significant_ids, FdrCorrection, FdrMethod};
pub use types::{RankConfig, RankedGene, RestartStrategy};
