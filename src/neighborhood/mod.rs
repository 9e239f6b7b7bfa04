//! Neighborhood generators.
//!
//! A neighborhood is the set of tours one move away from a base tour. Moves
//! are addressed by a position pair [`NeighborhoodKey`] and enumerated in a
//! fixed order; [`Neighborhood`] evaluates each candidate's cost
//! incrementally from the base cost whenever the move allows it.
//!
//! # Key Types
//!
//! - [`NeighborhoodKind`]: which move is enumerated (segment reversal or swap)
//! - [`Neighborhood`]: the generator (`valid` / `calculate` / `next`)
//! - [`NeighborhoodKey`]: the `(l, r)` position pair
//!
//! # References
//!
//! - Croes (1958), "A Method for Solving Traveling-Salesman Problems"
//! - Lin (1965), "Computer Solutions of the Traveling Salesman Problem"

mod generator;
mod key;

pub use generator::{Neighborhood, NeighborhoodKind};
pub use key::NeighborhoodKey;
