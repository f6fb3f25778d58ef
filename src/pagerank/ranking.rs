//! Ranked-list emission
//!
//! Scores are ordered descending with a stable sort, so equal scores keep
//! node ID order (the order genes were first added to the graph).

use std::cmp::Ordering;

use crate::graph::csr::CsrGraph;
use crate::types::RankedGene;

/// Node IDs sorted by descending score, ties in ID order.
pub fn order_by_score(scores: &[f64]) -> Vec<u32> {
    let mut order: Vec<u32> = (0..scores.len() as u32).collect();
    order.sort_by(|&a, &b| {
        scores[b as usize]
            .partial_cmp(&scores[a as usize])
            .unwrap_or(Ordering::Equal)
    });
    order
}

/// Pair every graph node with its score, best first.
pub fn rank_genes(graph: &CsrGraph, scores: &[f64]) -> Vec<RankedGene> {
    order_by_score(scores)
        .into_iter()
        .map(|id| RankedGene::new(graph.gene(id), scores[id as usize]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::GraphBuilder;

    #[test]
    fn test_descending_order() {
        assert_eq!(order_by_score(&[0.1, 0.7, 0.3]), vec![1, 2, 0]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        assert_eq!(order_by_score(&[0.5, 0.2, 0.5, 0.2]), vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_rank_genes_names() {
        let mut builder = GraphBuilder::new();
        for gene in ["BRCA1", "BRCA2", "ATM"] {
            builder.get_or_create_node(gene);
        }
        let graph = builder.freeze();

        let ranked = rank_genes(&graph, &[0.2, 0.2, 0.6]);
        let genes: Vec<_> = ranked.iter().map(|r| r.gene.as_str()).collect();
        assert_eq!(genes, vec!["ATM", "BRCA1", "BRCA2"]);
        assert_eq!(ranked[0].score, 0.6);
    }

    #[test]
    fn test_empty() {
        assert!(rank_genes(&CsrGraph::default(), &[]).is_empty());
    }
}
