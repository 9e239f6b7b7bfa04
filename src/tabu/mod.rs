//! Taboo search with a backtracking search tree.
//!
//! A trajectory search that forbids recently moved city pairs, keeps a
//! stack of improving tours, and backtracks to the most recent one once
//! the search stops improving for `max_depth` steps.
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! - Glover, F. (1990). "Tabu Search—Part II", *ORSA Journal on Computing* 2(1), 4-32.

mod config;
mod runner;
mod types;

pub use config::TabuConfig;
pub use runner::{TabuResult, TabuRunner};
pub use types::{ForbiddenMove, SearchTreeNode, TabuList};
