//! Genetic algorithm over closed tours.
//!
//! A generational GA: every generation keeps an elite prefix, draws a
//! parent pool, and breeds the remaining tours in parallel on a
//! [`WorkerPool`](crate::pool::WorkerPool) with independently seeded
//! random streams, so results only depend on the seed.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population, fractions, probabilities)
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Best tour found with run statistics
//!
//! # Submodules
//!
//! - [`operators`]: Order crossover and the three tour mutations
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Larrañaga et al. (1999), "Genetic Algorithms for the Travelling
//!   Salesman Problem: A Review of Representations and Operators"

mod config;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use operators::MutationKind;
pub use runner::{GaResult, GaRunner};
pub use selection::Selection;
pub use types::Individual;
