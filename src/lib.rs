//! Travelling salesman tour search.
//!
//! Improves closed tours over a dense, possibly asymmetric, cost matrix:
//!
//! - **Neighborhoods**: Lazy 2-opt style generators (segment inversion for
//!   asymmetric and symmetric costs, position swap) that price each
//!   candidate incrementally from the base tour's cost.
//! - **Hill Climbing**: Best-improvement descent to a local optimum.
//! - **Taboo Search**: Trajectory search with a bounded forbidden-move
//!   memory, aspiration, and a backtracking stack of improving tours.
//! - **Genetic Algorithm (GA)**: Elitist generational GA with order
//!   crossover, three tour mutations, and optional local enhancement, whose
//!   offspring are produced in parallel on a worker pool.
//! - **Starting tours**: Monotonic, random, best-of-k random, and nearest
//!   neighbour constructions.
//!
//! # Example
//!
//! ```
//! use u_tsp::{DistanceMatrix, HillClimber, NeighborhoodKind, Tour};
//!
//! let dm = DistanceMatrix::from_rows(vec![
//!     vec![0u64, 1, 9, 1],
//!     vec![1, 0, 1, 9],
//!     vec![9, 1, 0, 1],
//!     vec![1, 9, 1, 0],
//! ])
//! .unwrap();
//! let start = Tour::from_order(vec![0, 2, 1, 3]);
//! assert_eq!(start.cost(&dm), 20);
//!
//! let best = HillClimber::new(NeighborhoodKind::Swap).run(&dm, &start).unwrap();
//! assert_eq!(best.cost(&dm), 4);
//! ```
//!
//! # Logging
//!
//! Drivers emit [`tracing`] events: `info` at run start and end, `debug`
//! per round or generation, `trace` per backtrack. No subscriber is
//! installed by the library.

pub mod climb;
pub mod cost;
pub mod error;
pub mod ga;
pub mod matrix;
pub mod neighborhood;
pub mod pool;
pub mod progress;
pub mod runner;
pub mod start;
pub mod tabu;
pub mod tour;

pub use climb::{sweep_best, ClimbResult, HillClimber};
pub use cost::Cost;
pub use error::{Result, TspError};
pub use matrix::DistanceMatrix;
pub use neighborhood::{Neighborhood, NeighborhoodKey, NeighborhoodKind};
pub use progress::{PrdReporter, Progress};
pub use tour::{percent_relative_deviation, total_cost, Tour};
