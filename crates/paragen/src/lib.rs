//! A Rust library for population-based optimization.
//!
//! paragen evolves a population of user-defined individuals through a
//! parent-child generational loop, with selection disciplines ranging from
//! elitist µ+λ to multi-objective pareto modes and simulated annealing.
//! Evaluations run serially, on a local thread pool, or brokered out to
//! remote workers over TCP.

pub use paragen_broker::*;
pub use paragen_core::*;
pub use paragen_engines::*;
pub use paragen_selectors::*;
