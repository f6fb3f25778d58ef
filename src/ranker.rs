//! Gene ranking facade
//!
//! [`GeneRanker`] holds a validated [`RankConfig`] and runs the stages in
//! order, each inside its own tracing span:
//!
//! 1. `freeze`: builder -> CSR (only for [`GeneRanker::rank_builder`])
//! 2. `personalize`: sparse seed masses -> dense restart vector
//! 3. `rank`: power iteration until convergence or the iteration cap
//! 4. `order`: scores -> ranked list
//!
//! A run that hits the cap fails with [`GeneRankError::NotConverged`] unless
//! the config allows unconverged results.

use serde::Serialize;

use crate::config::spec::RankSpec;
use crate::errors::{GeneRankError, Result};
use crate::graph::builder::GraphBuilder;
use crate::graph::csr::CsrGraph;
use crate::pagerank::observer::{IterationObserver, NoopObserver};
use crate::pagerank::personalized::PersonalizedPageRank;
use crate::pagerank::ranking::rank_genes;
use crate::personalization::PersonalizationVector;
use crate::types::{RankConfig, RankedGene};

/// Outcome of a ranking run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankOutput {
    /// Every graph node, best first
    pub ranked: Vec<RankedGene>,
    /// Propagation steps performed
    pub iterations: usize,
    /// Final L1 delta
    pub delta: f64,
    /// Whether the threshold was reached
    pub converged: bool,
    /// Personalization entries naming genes that are not in the graph
    pub unmatched_seeds: usize,
}

impl RankOutput {
    fn empty() -> Self {
        Self {
            ranked: Vec::new(),
            iterations: 0,
            delta: 0.0,
            converged: true,
            unmatched_seeds: 0,
        }
    }

    /// The best `n` genes (fewer if the graph is smaller).
    pub fn top_n(&self, n: usize) -> &[RankedGene] {
        &self.ranked[..n.min(self.ranked.len())]
    }

    /// Score of `gene`, if it is a graph node.
    pub fn score(&self, gene: &str) -> Option<f64> {
        self.ranked.iter().find(|r| r.gene == gene).map(|r| r.score)
    }

    /// 1-based position of `gene` in the ranking.
    pub fn position(&self, gene: &str) -> Option<usize> {
        self.ranked.iter().position(|r| r.gene == gene).map(|p| p + 1)
    }
}

/// Ranks genes with personalized weighted PageRank.
#[derive(Debug, Clone)]
pub struct GeneRanker {
    config: RankConfig,
}

impl Default for GeneRanker {
    fn default() -> Self {
        Self {
            config: RankConfig::default(),
        }
    }
}

impl GeneRanker {
    /// Validate `config` and build a ranker.
    pub fn new(config: RankConfig) -> Result<Self> {
        let config = RankSpec::from(config).to_config()?;
        Ok(Self { config })
    }

    /// Build a ranker from a spec, validating it first.
    pub fn from_spec(spec: &RankSpec) -> Result<Self> {
        Ok(Self {
            config: spec.to_config()?,
        })
    }

    /// Parse, validate and build from a JSON spec.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_spec(&RankSpec::from_json(json)?)
    }

    pub fn config(&self) -> &RankConfig {
        &self.config
    }

    /// Freeze `builder` and rank it.
    pub fn rank_builder(
        &self,
        builder: &GraphBuilder,
        personalization: &PersonalizationVector,
    ) -> Result<RankOutput> {
        let graph = {
            trace_stage!("freeze");
            builder.freeze()
        };
        self.rank(&graph, personalization)
    }

    /// Rank every node of `graph` given the seed masses.
    pub fn rank(
        &self,
        graph: &CsrGraph,
        personalization: &PersonalizationVector,
    ) -> Result<RankOutput> {
        self.rank_observed(graph, personalization, &mut NoopObserver)
    }

    /// Same as [`rank`](Self::rank), notifying `observer` after every step.
    pub fn rank_observed(
        &self,
        graph: &CsrGraph,
        personalization: &PersonalizationVector,
        observer: &mut impl IterationObserver,
    ) -> Result<RankOutput> {
        if graph.is_empty() {
            log_event!(debug, "empty graph, nothing to rank");
            return Ok(RankOutput::empty());
        }

        let restart = {
            trace_stage!("personalize");
            personalization.project(graph)
        };
        if restart.unmatched > 0 {
            log_event!(
                debug,
                unmatched = restart.unmatched,
                seeds = personalization.len(),
                "personalization entries without a graph node were ignored"
            );
        }

        let result = {
            trace_stage!("rank");
            PersonalizedPageRank::from_config(&self.config).run_observed(
                graph,
                &restart.mass,
                observer,
            )
        };

        if !result.converged {
            log_event!(
                warn,
                iterations = result.iterations,
                delta = result.delta,
                "pagerank hit the iteration cap before converging"
            );
            if !self.config.allow_unconverged {
                return Err(GeneRankError::NotConverged {
                    iterations: result.iterations,
                    delta: result.delta,
                });
            }
        }

        let ranked = {
            trace_stage!("order");
            rank_genes(graph, &result.scores)
        };

        log_event!(
            debug,
            nodes = graph.num_nodes,
            edges = graph.num_edges(),
            iterations = result.iterations,
            strategy = self.config.strategy.as_str(),
            "ranking complete"
        );

        Ok(RankOutput {
            ranked,
            iterations: result.iterations,
            delta: result.delta,
            converged: result.converged,
            unmatched_seeds: restart.unmatched,
        })
    }
}
