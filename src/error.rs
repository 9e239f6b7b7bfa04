//! Error types for tour search.

use thiserror::Error;

/// Errors reported before any search work begins.
///
/// The search drivers themselves never fail once they accept their input:
/// every failure mode is a validation failure surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TspError {
    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A starting city does not exist in the matrix.
    #[error("starting position {position} is outside 0..{size}")]
    InvalidStart {
        /// Requested starting city.
        position: usize,
        /// Number of cities in the matrix.
        size: usize,
    },

    /// A tour is not a closed permutation of the matrix cities.
    #[error("invalid tour: {0}")]
    InvalidTour(String),

    /// A matrix has the wrong shape or is too small to search.
    #[error("invalid matrix: {0}")]
    InvalidMatrix(String),

    /// A constructive search finished without producing any candidate.
    #[error("no solution found")]
    NoSolution,

    /// The worker pool could not be created.
    #[error("worker pool error: {0}")]
    Pool(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TspError>;
