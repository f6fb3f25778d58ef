//! Mutable gene interaction graph
//!
//! This module provides a mutable, directed interaction-graph builder that
//! uses FxHashMap for O(1) edge lookups during construction. Once all edges
//! are in, [`GraphBuilder::freeze`] produces the immutable
//! [`CsrGraph`] the ranking engine iterates over.

use rustc_hash::FxHashMap;

use super::csr::CsrGraph;
use crate::errors::{GeneRankError, Result};

/// A node in the graph builder
#[derive(Debug, Clone)]
pub struct BuilderNode {
    /// The gene identifier for this node
    pub gene: String,
    /// Outgoing adjacency: target node ID -> edge weight
    pub edges: FxHashMap<u32, f64>,
}

impl BuilderNode {
    /// Create a new node
    pub fn new(gene: impl Into<String>) -> Self {
        Self {
            gene: gene.into(),
            edges: FxHashMap::default(),
        }
    }
}

/// A mutable directed graph builder optimized for incremental construction
///
/// Node IDs are dense and assigned in insertion order, which is also the
/// tie-break order of the final ranking.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    /// Maps gene -> node ID
    gene_to_id: FxHashMap<String, u32>,
    /// Node storage
    nodes: Vec<BuilderNode>,
}

fn check_weight(from: &str, to: &str, weight: f64) -> Result<()> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(GeneRankError::InvalidWeight {
            from: from.to_string(),
            to: to.to_string(),
            weight,
        })
    }
}

fn check_coefficient(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GeneRankError::InvalidCoefficient { name, value })
    }
}

impl GraphBuilder {
    /// Create a new empty graph builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph builder with pre-allocated capacity
    pub fn with_capacity(node_capacity: usize) -> Self {
        Self {
            gene_to_id: FxHashMap::with_capacity_and_hasher(node_capacity, Default::default()),
            nodes: Vec::with_capacity(node_capacity),
        }
    }

    /// Build a graph from `(source, target, weight)` triples.
    ///
    /// A repeated ordered pair keeps the last weight.
    pub fn from_edges<I, S>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, S, f64)>,
        S: AsRef<str>,
    {
        let mut builder = Self::new();
        for (source, target, weight) in edges {
            builder.add_edge(source.as_ref(), target.as_ref(), Some(weight))?;
        }
        Ok(builder)
    }

    /// Get or create a node for the given gene, returning its ID
    pub fn get_or_create_node(&mut self, gene: &str) -> u32 {
        if let Some(&id) = self.gene_to_id.get(gene) {
            return id;
        }

        let id = self.nodes.len() as u32;
        self.gene_to_id.insert(gene.to_string(), id);
        self.nodes.push(BuilderNode::new(gene));
        id
    }

    /// Add (or overwrite) the directed edge `source -> target`, creating
    /// either endpoint if needed.
    ///
    /// A missing weight defaults to 0: the edge exists but carries no mass.
    pub fn add_edge(&mut self, source: &str, target: &str, weight: Option<f64>) -> Result<()> {
        let weight = weight.unwrap_or(0.0);
        check_weight(source, target, weight)?;
        let from = self.get_or_create_node(source);
        let to = self.get_or_create_node(target);
        self.nodes[from as usize].edges.insert(to, weight);
        Ok(())
    }

    /// Set the weight of the directed edge `from -> to` by node ID.
    ///
    /// IDs that do not name an existing node are ignored, so every stored
    /// edge endpoint is always a node.
    pub fn set_edge(&mut self, from: u32, to: u32, weight: f64) -> Result<()> {
        if (to as usize) >= self.nodes.len() {
            return Ok(());
        }
        if let Some(node) = self.nodes.get(from as usize) {
            check_weight(&node.gene, &self.nodes[to as usize].gene, weight)?;
        }
        if let Some(node) = self.nodes.get_mut(from as usize) {
            node.edges.insert(to, weight);
        }
        Ok(())
    }

    /// Add `weight` to the directed edge `from -> to`, creating it at 0 first
    /// if it does not exist.
    pub fn increment_edge(&mut self, from: u32, to: u32, weight: f64) -> Result<()> {
        if (to as usize) >= self.nodes.len() {
            return Ok(());
        }
        if let Some(node) = self.nodes.get(from as usize) {
            check_weight(&node.gene, &self.nodes[to as usize].gene, weight)?;
        }
        if let Some(node) = self.nodes.get_mut(from as usize) {
            *node.edges.entry(to).or_insert(0.0) += weight;
        }
        Ok(())
    }

    /// Combine two graphs over the union of their nodes and edges:
    /// `w(u, v) = alpha * w_a(u, v) + beta * w_b(u, v)`, a missing edge
    /// counting as weight 0.
    ///
    /// Node order is `a`'s nodes followed by the nodes only `b` has. This is
    /// how a protein-protein interaction network and a co-expression network
    /// are merged into one propagation graph.
    pub fn convex_combination(a: &Self, alpha: f64, b: &Self, beta: f64) -> Result<Self> {
        check_coefficient("alpha", alpha)?;
        check_coefficient("beta", beta)?;

        let mut combined = Self::with_capacity(a.node_count().max(b.node_count()));
        for (factor, graph) in [(alpha, a), (beta, b)] {
            for (_, node) in graph.nodes() {
                combined.get_or_create_node(&node.gene);
            }
            for (_, node) in graph.nodes() {
                let from = combined.get_or_create_node(&node.gene);
                let mut edges: Vec<_> = node.edges.iter().map(|(&k, &v)| (k, v)).collect();
                edges.sort_by_key(|(k, _)| *k);
                for (target, weight) in edges {
                    let to = combined.get_or_create_node(&graph.nodes[target as usize].gene);
                    combined.increment_edge(from, to, factor * weight)?;
                }
            }
        }

        Ok(combined)
    }

    /// Get the number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of directed edges
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges.len()).sum()
    }

    /// Get a node by ID
    pub fn get_node(&self, id: u32) -> Option<&BuilderNode> {
        self.nodes.get(id as usize)
    }

    /// Get a node ID by gene
    pub fn get_node_id(&self, gene: &str) -> Option<u32> {
        self.gene_to_id.get(gene).copied()
    }

    /// Get the gene for a node ID
    pub fn get_gene(&self, id: u32) -> Option<&str> {
        self.nodes.get(id as usize).map(|n| n.gene.as_str())
    }

    /// Weight of the edge `source -> target`, if present
    pub fn edge_weight(&self, source: &str, target: &str) -> Option<f64> {
        let from = self.get_node_id(source)?;
        let to = self.get_node_id(target)?;
        self.nodes[from as usize].edges.get(&to).copied()
    }

    /// Iterate over all nodes
    pub fn nodes(&self) -> impl Iterator<Item = (u32, &BuilderNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (i as u32, n))
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Freeze into the immutable CSR form used by the ranking engine
    pub fn freeze(&self) -> CsrGraph {
        CsrGraph::from_builder(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_builder_basic() {
        let mut builder = GraphBuilder::new();

        let id_a = builder.get_or_create_node("TP53");
        let id_b = builder.get_or_create_node("MDM2");
        let id_c = builder.get_or_create_node("TP53"); // duplicate

        assert_eq!(id_a, id_c);
        assert_ne!(id_a, id_b);
        assert_eq!(builder.node_count(), 2);
    }

    #[test]
    fn test_edges_are_directed() {
        let builder = GraphBuilder::from_edges([("A", "B", 2.0)]).unwrap();

        assert_eq!(builder.edge_weight("A", "B"), Some(2.0));
        assert_eq!(builder.edge_weight("B", "A"), None);
        assert_eq!(builder.edge_count(), 1);
    }

    #[test]
    fn test_add_edge_overwrites() {
        let mut builder = GraphBuilder::new();
        builder.add_edge("A", "B", Some(1.0)).unwrap();
        builder.add_edge("A", "B", Some(3.0)).unwrap();

        assert_eq!(builder.edge_weight("A", "B"), Some(3.0));
        assert_eq!(builder.edge_count(), 1);
    }

    #[test]
    fn test_missing_weight_defaults_to_zero() {
        let mut builder = GraphBuilder::new();
        builder.add_edge("A", "B", None).unwrap();

        assert_eq!(builder.edge_weight("A", "B"), Some(0.0));
    }

    #[test]
    fn test_edge_incrementing() {
        let mut builder = GraphBuilder::new();
        let a = builder.get_or_create_node("A");
        let b = builder.get_or_create_node("B");

        builder.increment_edge(a, b, 1.0).unwrap();
        builder.increment_edge(a, b, 0.5).unwrap();

        assert_eq!(builder.get_node(a).unwrap().edges.get(&b), Some(&1.5));
        assert!(builder.get_node(b).unwrap().edges.is_empty());
    }

    #[test]
    fn test_unknown_ids_ignored() {
        let mut builder = GraphBuilder::new();
        let a = builder.get_or_create_node("A");

        builder.set_edge(a, 7, 1.0).unwrap();
        builder.set_edge(7, a, 1.0).unwrap();

        assert_eq!(builder.edge_count(), 0);
    }

    #[test]
    fn test_invalid_weight_rejected() {
        let mut builder = GraphBuilder::new();
        let err = builder.add_edge("A", "B", Some(-1.0)).unwrap_err();
        assert!(matches!(err, GeneRankError::InvalidWeight { .. }));

        let err = builder.add_edge("A", "B", Some(f64::NAN)).unwrap_err();
        assert!(matches!(err, GeneRankError::InvalidWeight { .. }));

        // Rejected edges do not create nodes.
        assert!(builder.is_empty());
    }

    #[test]
    fn test_self_loop_kept() {
        let builder = GraphBuilder::from_edges([("A", "A", 1.0)]).unwrap();
        assert_eq!(builder.edge_weight("A", "A"), Some(1.0));
    }

    #[test]
    fn test_convex_combination() {
        let ppi = GraphBuilder::from_edges([("A", "B", 1.0), ("B", "C", 1.0)]).unwrap();
        let coexpr = GraphBuilder::from_edges([("A", "B", 0.4), ("C", "D", 0.8)]).unwrap();

        let combined = GraphBuilder::convex_combination(&ppi, 0.5, &coexpr, 0.5).unwrap();

        assert_eq!(combined.node_count(), 4);
        assert_eq!(combined.get_node_id("D"), Some(3));
        assert!((combined.edge_weight("A", "B").unwrap() - 0.7).abs() < 1e-12);
        assert!((combined.edge_weight("B", "C").unwrap() - 0.5).abs() < 1e-12);
        assert!((combined.edge_weight("C", "D").unwrap() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_convex_combination_rejects_negative_coefficient() {
        let g = GraphBuilder::new();
        let err = GraphBuilder::convex_combination(&g, -0.5, &g, 1.5).unwrap_err();
        assert!(matches!(
            err,
            GeneRankError::InvalidCoefficient { name: "alpha", .. }
        ));
    }
}
