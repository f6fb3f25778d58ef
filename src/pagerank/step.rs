//! One synchronous propagation step
//!
//! Each node's new score is its restart term plus the share of mass pulled
//! from every predecessor, split by edge weight over the predecessor's total
//! outgoing weight:
//!
//! ```text
//! p_{t+1}(v) = (1 - d) * p0(v) + d * Σ_{u -> v} p_t(u) * w(u,v) / W(u)
//! ```
//!
//! Predecessors with `W(u) = 0` (dangling) contribute nothing. Their mass is
//! lost rather than redistributed, so the total may shrink from step to step.

use rayon::prelude::*;

use crate::graph::csr::CsrGraph;
use crate::types::PARALLEL_MIN_NODES;

/// New score of node `v` given the frozen previous vector.
#[inline]
fn node_update(graph: &CsrGraph, prev: &[f64], restart: &[f64], damping: f64, v: usize) -> f64 {
    let mut acc = (1.0 - damping) * restart[v];
    for (u, weight) in graph.predecessors(v as u32) {
        let total = graph.node_total_weight(u);
        if total > 0.0 {
            acc += damping * prev[u as usize] * weight / total;
        }
    }
    acc
}

/// Compute one step into `next`, overwriting every slot.
///
/// `prev`, `restart` and `next` must all have one entry per graph node.
/// With `parallel` set and a large enough graph the nodes are split across
/// the rayon pool; every worker reads only `prev` and writes only its own
/// slot, so the output is identical to the sequential step.
pub fn propagate_into(
    graph: &CsrGraph,
    prev: &[f64],
    restart: &[f64],
    damping: f64,
    parallel: bool,
    next: &mut [f64],
) {
    debug_assert_eq!(prev.len(), graph.num_nodes);
    debug_assert_eq!(restart.len(), graph.num_nodes);
    debug_assert_eq!(next.len(), graph.num_nodes);

    if parallel && graph.num_nodes >= PARALLEL_MIN_NODES {
        next.par_iter_mut()
            .enumerate()
            .for_each(|(v, slot)| *slot = node_update(graph, prev, restart, damping, v));
    } else {
        for (v, slot) in next.iter_mut().enumerate() {
            *slot = node_update(graph, prev, restart, damping, v);
        }
    }
}

/// Allocating form of [`propagate_into`]: a pure function of its inputs.
pub fn propagate(graph: &CsrGraph, prev: &[f64], restart: &[f64], damping: f64) -> Vec<f64> {
    let mut next = vec![0.0; graph.num_nodes];
    propagate_into(graph, prev, restart, damping, false, &mut next);
    next
}

/// Sum of absolute per-node differences.
pub fn l1_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}
