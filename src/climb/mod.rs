//! Hill climbing (2-opt driver).
//!
//! Repeatedly adopts the best neighbor of the current tour until no
//! neighbor is strictly cheaper.
//!
//! # References
//!
//! - Croes (1958), "A Method for Solving Traveling-Salesman Problems"

mod runner;

pub use runner::{sweep_best, ClimbResult, HillClimber};
