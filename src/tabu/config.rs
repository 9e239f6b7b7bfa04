//! Taboo search configuration.

use crate::error::{Result, TspError};
use crate::neighborhood::NeighborhoodKind;

/// Configuration parameters for taboo search.
///
/// # Examples
///
/// ```
/// use u_tsp::tabu::TabuConfig;
/// use u_tsp::NeighborhoodKind;
///
/// let config = TabuConfig::default()
///     .with_tabu_length(10)
///     .with_ignore_ratio(0.95)
///     .with_neighborhood(NeighborhoodKind::InverseSymmetric);
/// assert_eq!(config.tabu_length, 10);
/// assert_eq!(config.max_depth, 25);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TabuConfig {
    /// Capacity of the forbidden-move memory.
    pub tabu_length: usize,

    /// Aspiration ratio in `[0, 1]`.
    ///
    /// A forbidden candidate is still taken when its cost is below
    /// `ignore_ratio` times the best cost seen so far in the same sweep.
    /// `0.0` disables aspiration.
    pub ignore_ratio: f64,

    /// Steps without a new search tree node before backtracking.
    pub max_depth: usize,

    /// Number of backtracks before the search stops.
    pub max_backtracks: usize,

    /// Neighborhood swept at every step.
    pub neighborhood: NeighborhoodKind,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            tabu_length: 7,
            ignore_ratio: 0.9,
            max_depth: 25,
            max_backtracks: 5,
            neighborhood: NeighborhoodKind::Swap,
        }
    }
}

impl TabuConfig {
    /// Sets the forbidden-move memory capacity.
    pub fn with_tabu_length(mut self, n: usize) -> Self {
        self.tabu_length = n;
        self
    }

    /// Sets the aspiration ratio.
    pub fn with_ignore_ratio(mut self, ratio: f64) -> Self {
        self.ignore_ratio = ratio;
        self
    }

    /// Sets the depth budget between tree updates.
    pub fn with_max_depth(mut self, n: usize) -> Self {
        self.max_depth = n;
        self
    }

    /// Sets the number of backtracks.
    pub fn with_max_backtracks(mut self, n: usize) -> Self {
        self.max_backtracks = n;
        self
    }

    /// Sets the neighborhood.
    pub fn with_neighborhood(mut self, kind: NeighborhoodKind) -> Self {
        self.neighborhood = kind;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.ignore_ratio) {
            return Err(TspError::InvalidConfig(format!(
                "ignore_ratio must be in [0, 1], got {}",
                self.ignore_ratio
            )));
        }
        if self.max_depth == 0 {
            return Err(TspError::InvalidConfig(
                "max_depth must be at least 1".into(),
            ));
        }
        if self.max_backtracks == 0 {
            return Err(TspError::InvalidConfig(
                "max_backtracks must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
