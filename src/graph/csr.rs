//! Frozen interaction graph in Compressed Sparse Row layout
//!
//! Power iteration touches every edge once per step, so edges live in flat
//! contiguous arrays indexed by node ID. The graph is directed, so both
//! directions are stored: outgoing rows (for out-weights and dangling
//! detection) and incoming rows (the propagation step pulls mass from
//! predecessors).

use rustc_hash::FxHashMap;

use super::builder::GraphBuilder;

/// A directed, weighted graph in Compressed Sparse Row format
///
/// Immutable once built. Total outgoing weight per node is computed once
/// here and never again during iteration.
#[derive(Debug, Clone)]
pub struct CsrGraph {
    /// Number of nodes
    pub num_nodes: usize,
    /// Row pointers: node i's outgoing edges are at row_ptr[i]..row_ptr[i+1]
    pub row_ptr: Vec<usize>,
    /// Target node for each outgoing edge
    pub col_idx: Vec<u32>,
    /// Weight of each outgoing edge
    pub weights: Vec<f64>,
    /// Row pointers into the incoming edge arrays
    pub in_ptr: Vec<usize>,
    /// Source node for each incoming edge
    pub in_src: Vec<u32>,
    /// Weight of each incoming edge
    pub in_weights: Vec<f64>,
    /// Out-degree for each node
    pub out_degree: Vec<u32>,
    /// Total outgoing weight for each node
    pub total_weight: Vec<f64>,
    /// Gene identifier for each node
    pub genes: Vec<String>,
    gene_index: FxHashMap<String, u32>,
}

impl CsrGraph {
    /// Freeze a builder. Edges of each row are sorted by target ID.
    pub fn from_builder(builder: &GraphBuilder) -> Self {
        let num_nodes = builder.node_count();
        let mut row_ptr = Vec::with_capacity(num_nodes + 1);
        let mut col_idx = Vec::with_capacity(builder.edge_count());
        let mut weights = Vec::with_capacity(builder.edge_count());
        let mut out_degree = Vec::with_capacity(num_nodes);
        let mut genes = Vec::with_capacity(num_nodes);

        row_ptr.push(0);

        for (_, node) in builder.nodes() {
            genes.push(node.gene.clone());

            let mut edges: Vec<_> = node.edges.iter().map(|(&k, &v)| (k, v)).collect();
            edges.sort_by_key(|(k, _)| *k);

            out_degree.push(edges.len() as u32);

            for (target, weight) in edges {
                col_idx.push(target);
                weights.push(weight);
            }

            row_ptr.push(col_idx.len());
        }

        Self::assemble(num_nodes, row_ptr, col_idx, weights, out_degree, genes)
    }

    /// Derive the incoming rows, out-weight table and gene index from the
    /// outgoing rows.
    fn assemble(
        num_nodes: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<u32>,
        weights: Vec<f64>,
        out_degree: Vec<u32>,
        genes: Vec<String>,
    ) -> Self {
        let total_weight: Vec<f64> = (0..num_nodes)
            .map(|u| weights[row_ptr[u]..row_ptr[u + 1]].iter().sum())
            .collect();

        // Counting sort on targets; sources are visited in order so each
        // incoming row ends up sorted by source.
        let mut in_ptr = vec![0usize; num_nodes + 1];
        for &target in &col_idx {
            in_ptr[target as usize + 1] += 1;
        }
        for i in 0..num_nodes {
            in_ptr[i + 1] += in_ptr[i];
        }
        let mut cursor = in_ptr.clone();
        let mut in_src = vec![0u32; col_idx.len()];
        let mut in_weights = vec![0.0; col_idx.len()];
        for source in 0..num_nodes {
            for e in row_ptr[source]..row_ptr[source + 1] {
                let slot = &mut cursor[col_idx[e] as usize];
                in_src[*slot] = source as u32;
                in_weights[*slot] = weights[e];
                *slot += 1;
            }
        }

        let gene_index = genes
            .iter()
            .enumerate()
            .map(|(i, g)| (g.clone(), i as u32))
            .collect();

        Self {
            num_nodes,
            row_ptr,
            col_idx,
            weights,
            in_ptr,
            in_src,
            in_weights,
            out_degree,
            total_weight,
            genes,
            gene_index,
        }
    }

    /// Copy of this graph with positive edge weights min-max rescaled into
    /// `[0, 1]`: `(w - w_min) / (w_max - w_min)`. When every positive weight
    /// is equal they all become 1. Zero weights stay 0.
    pub fn min_max_rescaled(&self) -> Self {
        let (lo, hi) = self
            .weights
            .iter()
            .filter(|&&w| w > 0.0)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &w| {
                (lo.min(w), hi.max(w))
            });
        let span = hi - lo;

        let weights = self
            .weights
            .iter()
            .map(|&w| {
                if w <= 0.0 {
                    0.0
                } else if span > 0.0 {
                    (w - lo) / span
                } else {
                    1.0
                }
            })
            .collect();

        Self::assemble(
            self.num_nodes,
            self.row_ptr.clone(),
            self.col_idx.clone(),
            weights,
            self.out_degree.clone(),
            self.genes.clone(),
        )
    }

    /// Iterate over outgoing neighbors of a node
    pub fn neighbors(&self, node: u32) -> impl Iterator<Item = (u32, f64)> + '_ {
        let start = self.row_ptr[node as usize];
        let end = self.row_ptr[node as usize + 1];
        (start..end).map(move |i| (self.col_idx[i], self.weights[i]))
    }

    /// Iterate over predecessors of a node, i.e. sources `u` of edges `u -> node`
    pub fn predecessors(&self, node: u32) -> impl Iterator<Item = (u32, f64)> + '_ {
        let start = self.in_ptr[node as usize];
        let end = self.in_ptr[node as usize + 1];
        (start..end).map(move |i| (self.in_src[i], self.in_weights[i]))
    }

    /// Get the out-degree of a node
    pub fn degree(&self, node: u32) -> u32 {
        self.out_degree[node as usize]
    }

    /// Get the total outgoing weight of a node
    pub fn node_total_weight(&self, node: u32) -> f64 {
        self.total_weight[node as usize]
    }

    /// Get the gene for a node
    pub fn gene(&self, node: u32) -> &str {
        &self.genes[node as usize]
    }

    /// Get node ID by gene
    pub fn get_node_by_gene(&self, gene: &str) -> Option<u32> {
        self.gene_index.get(gene).copied()
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.num_nodes == 0
    }

    /// Get the number of directed edges
    pub fn num_edges(&self) -> usize {
        self.col_idx.len()
    }

    /// Find dangling nodes (nodes with zero total outgoing weight)
    pub fn dangling_nodes(&self) -> Vec<u32> {
        (0..self.num_nodes as u32)
            .filter(|&n| self.total_weight[n as usize] <= 0.0)
            .collect()
    }
}

impl Default for CsrGraph {
    fn default() -> Self {
        Self {
            num_nodes: 0,
            row_ptr: vec![0],
            col_idx: Vec::new(),
            weights: Vec::new(),
            in_ptr: vec![0],
            in_src: Vec::new(),
            in_weights: Vec::new(),
            out_degree: Vec::new(),
            total_weight: Vec::new(),
            genes: Vec::new(),
            gene_index: FxHashMap::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_test_graph() -> GraphBuilder {
        GraphBuilder::from_edges([("a", "b", 1.0), ("b", "c", 2.0), ("a", "c", 1.5)]).unwrap()
    }

    #[test]
    fn test_csr_conversion() {
        let csr = build_test_graph().freeze();

        assert_eq!(csr.num_nodes, 3);
        assert_eq!(csr.genes, vec!["a", "b", "c"]);
        assert_eq!(csr.num_edges(), 3);
    }

    #[test]
    fn test_neighbor_iteration() {
        let csr = build_test_graph().freeze();

        let neighbors: Vec<_> = csr.neighbors(0).collect();
        assert_eq!(neighbors, vec![(1, 1.0), (2, 1.5)]);
        assert_eq!(csr.neighbors(2).count(), 0);
    }

    #[test]
    fn test_predecessor_iteration() {
        let csr = build_test_graph().freeze();

        // c (id 2) is reached from a and b, listed by source ID
        let preds: Vec<_> = csr.predecessors(2).collect();
        assert_eq!(preds, vec![(0, 1.5), (1, 2.0)]);
        assert_eq!(csr.predecessors(0).count(), 0);
    }

    #[test]
    fn test_degree_and_weight() {
        let csr = build_test_graph().freeze();

        assert_eq!(csr.degree(0), 2);
        assert!((csr.node_total_weight(0) - 2.5).abs() < 1e-10);
        assert_eq!(csr.node_total_weight(2), 0.0);
    }

    #[test]
    fn test_empty_graph() {
        let csr = GraphBuilder::new().freeze();

        assert!(csr.is_empty());
        assert_eq!(csr.num_edges(), 0);
        assert_eq!(csr.in_ptr, vec![0]);
    }

    #[test]
    fn test_dangling_nodes() {
        let mut builder = GraphBuilder::from_edges([("a", "b", 1.0)]).unwrap();
        builder.add_edge("b", "c", None).unwrap(); // zero-weight edge

        let csr = builder.freeze();

        // b has an edge but no weight, c has no edges at all
        assert_eq!(csr.dangling_nodes(), vec![1, 2]);
    }

    #[test]
    fn test_get_node_by_gene() {
        let csr = build_test_graph().freeze();

        assert_eq!(csr.get_node_by_gene("a"), Some(0));
        assert_eq!(csr.get_node_by_gene("c"), Some(2));
        assert_eq!(csr.get_node_by_gene("z"), None);
    }

    #[test]
    fn test_min_max_rescaled() {
        let csr = build_test_graph().freeze().min_max_rescaled();

        // weights 1.0, 1.5, 2.0 -> 0.0, 0.5, 1.0
        assert_eq!(csr.neighbors(0).collect::<Vec<_>>(), vec![(1, 0.0), (2, 0.5)]);
        assert_eq!(csr.neighbors(1).collect::<Vec<_>>(), vec![(2, 1.0)]);
        assert_eq!(csr.predecessors(2).collect::<Vec<_>>(), vec![(0, 0.5), (1, 1.0)]);
        assert!((csr.node_total_weight(0) - 0.5).abs() < 1e-12);
        assert_eq!(csr.get_node_by_gene("b"), Some(1));
    }

    #[test]
    fn test_min_max_rescaled_equal_weights() {
        let csr = GraphBuilder::from_edges([("a", "b", 3.0), ("b", "a", 3.0)])
            .unwrap()
            .freeze()
            .min_max_rescaled();

        assert_eq!(csr.weights, vec![1.0, 1.0]);
    }
}
