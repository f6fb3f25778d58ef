//! Graph construction and representation
//!
//! This module provides graph building and storage for the directed,
//! weighted gene interaction graph.

pub mod builder;
pub mod csr;
