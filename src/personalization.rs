//! Personalization (restart) vectors
//!
//! A personalization vector maps genes to non-negative restart mass. It is
//! sparse: genes without an entry carry zero mass. The mass is used as-is by
//! the engine and is never re-normalized to sum to 1.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::errors::{GeneRankError, Result};
use crate::graph::csr::CsrGraph;

/// How several personalization vectors are merged into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationPolicy {
    /// Masses of the same gene are added.
    #[default]
    Sum,
    /// The largest mass for a gene wins.
    Max,
}

/// Sparse gene -> restart mass mapping, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonalizationVector {
    entries: Vec<(String, f64)>,
    index: FxHashMap<String, usize>,
}

/// A personalization vector laid out over the nodes of one graph.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseRestart {
    /// Restart mass per node ID
    pub mass: Vec<f64>,
    /// Number of entries naming genes that are not graph nodes
    pub unmatched: usize,
}

fn check_mass(gene: &str, mass: f64) -> Result<()> {
    if mass.is_finite() && mass >= 0.0 {
        Ok(())
    } else {
        Err(GeneRankError::InvalidMass {
            gene: gene.to_string(),
            mass,
        })
    }
}

impl PersonalizationVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(gene, mass)` pairs; a repeated gene keeps the last mass.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut vector = Self::new();
        for (gene, mass) in pairs {
            vector.insert(gene.as_ref(), mass)?;
        }
        Ok(vector)
    }

    /// Give every seed gene the same mass.
    pub fn from_seeds<I, S>(genes: I, mass: f64) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_pairs(genes.into_iter().map(|g| (g, mass)))
    }

    /// `1/n` on every node of `graph`.
    pub fn uniform(graph: &CsrGraph) -> Self {
        let mut vector = Self::new();
        if graph.is_empty() {
            return vector;
        }
        let mass = 1.0 / graph.num_nodes as f64;
        for gene in &graph.genes {
            vector.set(gene, mass);
        }
        vector
    }

    /// Merge several vectors gene by gene. The result lists genes in order of
    /// first appearance across `vectors`.
    pub fn aggregate(vectors: &[PersonalizationVector], policy: AggregationPolicy) -> Self {
        let mut merged = Self::new();
        for vector in vectors {
            for (gene, mass) in vector.iter() {
                let combined = match (merged.index.get(gene), policy) {
                    (None, _) => mass,
                    (Some(&i), AggregationPolicy::Sum) => merged.entries[i].1 + mass,
                    (Some(&i), AggregationPolicy::Max) => merged.entries[i].1.max(mass),
                };
                merged.set(gene, combined);
            }
        }
        merged
    }

    /// Set the mass of `gene`, replacing any previous value.
    pub fn insert(&mut self, gene: &str, mass: f64) -> Result<()> {
        check_mass(gene, mass)?;
        self.set(gene, mass);
        Ok(())
    }

    fn set(&mut self, gene: &str, mass: f64) {
        match self.index.get(gene) {
            Some(&i) => self.entries[i].1 = mass,
            None => {
                self.index.insert(gene.to_string(), self.entries.len());
                self.entries.push((gene.to_string(), mass));
            }
        }
    }

    /// Mass of `gene`, 0 when absent.
    pub fn get(&self, gene: &str) -> f64 {
        self.index
            .get(gene)
            .map(|&i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    pub fn contains(&self, gene: &str) -> bool {
        self.index.contains_key(gene)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(gene, mass)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(g, m)| (g.as_str(), *m))
    }

    /// Sum of all masses.
    pub fn total_mass(&self) -> f64 {
        self.entries.iter().map(|(_, m)| m).sum()
    }

    /// Lay the vector out over `graph`'s node IDs. Entries for genes that are
    /// not graph nodes are dropped and counted.
    pub fn project(&self, graph: &CsrGraph) -> DenseRestart {
        let mut mass = vec![0.0; graph.num_nodes];
        let mut unmatched = 0;
        for (gene, m) in self.iter() {
            match graph.get_node_by_gene(gene) {
                Some(id) => mass[id as usize] = m,
                None => unmatched += 1,
            }
        }
        DenseRestart { mass, unmatched }
    }
}
