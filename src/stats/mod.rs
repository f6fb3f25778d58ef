//! Statistical helpers used around the ranking engine.

pub mod fdr;
