//! Rank run configuration
//!
//! A versioned JSON [`spec::RankSpec`] is validated by
//! [`validation::ValidationEngine`] before it becomes a runtime
//! [`RankConfig`](crate::types::RankConfig).

pub mod error_code;
pub mod errors;
pub mod spec;
pub mod validation;
