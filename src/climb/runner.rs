//! Best-improvement hill climbing over a neighborhood.
//!
//! # Algorithm
//!
//! 1. current = starting tour
//! 2. Sweep the whole neighborhood of current, keeping the best candidate
//! 3. If the best candidate is strictly cheaper, adopt it and go to 2
//! 4. Otherwise current is a local optimum; return it
//!
//! Cost strictly decreases every adopted round, so the loop terminates.

use tracing::debug;

use crate::cost::Cost;
use crate::error::{Result, TspError};
use crate::matrix::DistanceMatrix;
use crate::neighborhood::{Neighborhood, NeighborhoodKind};
use crate::tour::Tour;

/// Result of a hill climb.
#[derive(Debug, Clone)]
pub struct ClimbResult<C> {
    /// The locally optimal tour.
    pub tour: Tour,
    /// Cost of `tour`.
    pub cost: C,
    /// Number of improving rounds adopted.
    pub rounds: usize,
    /// Current cost after each round, starting with the input cost.
    pub cost_history: Vec<f64>,
}

/// 2-opt style hill climber.
///
/// Deterministic: the same starting tour and neighborhood always produce
/// the same local optimum.
///
/// ```
/// use u_tsp::{DistanceMatrix, HillClimber, NeighborhoodKind, Tour};
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0u64, 1, 9, 1],
///     vec![1, 0, 1, 9],
///     vec![9, 1, 0, 1],
///     vec![1, 9, 1, 0],
/// ])
/// .unwrap();
/// let start = Tour::from_order(vec![0, 2, 1, 3]);
/// let result = HillClimber::new(NeighborhoodKind::Swap).climb(&dm, &start).unwrap();
/// assert_eq!(result.cost, 4);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HillClimber {
    kind: NeighborhoodKind,
}

impl HillClimber {
    /// Creates a climber over the given neighborhood.
    pub fn new(kind: NeighborhoodKind) -> Self {
        Self { kind }
    }

    /// The neighborhood this climber sweeps.
    pub fn kind(&self) -> NeighborhoodKind {
        self.kind
    }

    /// Climbs from `start` to a local optimum.
    ///
    /// Fails if the matrix has fewer than two cities, the neighborhood
    /// cannot price moves exactly on it, or `start` is not a valid tour
    /// over its cities.
    pub fn climb<C: Cost>(
        &self,
        matrix: &DistanceMatrix<C>,
        start: &Tour,
    ) -> Result<ClimbResult<C>> {
        if matrix.size() < 2 {
            return Err(TspError::InvalidMatrix(
                "hill climbing needs at least two cities".into(),
            ));
        }
        self.kind.check_matrix(matrix)?;
        start.validate_for(matrix)?;

        let mut current = start.clone();
        let mut current_cost = current.cost(matrix);
        let mut cost_history = vec![current_cost.to_f64()];
        let mut rounds = 0;

        while let Some((best, best_cost)) = sweep_best(matrix, &current, current_cost, self.kind) {
            if best_cost >= current_cost {
                break;
            }
            current = best;
            current_cost = best_cost;
            rounds += 1;
            cost_history.push(current_cost.to_f64());
            debug!(round = rounds, cost = ?current_cost, "climb improved");
        }

        Ok(ClimbResult {
            tour: current,
            cost: current_cost,
            rounds,
            cost_history,
        })
    }

    /// Climbs from `start`, returning only the tour.
    pub fn run<C: Cost>(&self, matrix: &DistanceMatrix<C>, start: &Tour) -> Result<Tour> {
        self.climb(matrix, start).map(|r| r.tour)
    }
}

/// Runs one full sweep and returns the cheapest neighbor of `tour`.
///
/// `cost` must be the exact cost of `tour`. Returns `None` when the tour
/// has no neighbors (fewer than two cities). Ties keep the first candidate
/// in sweep order.
pub fn sweep_best<C: Cost>(
    matrix: &DistanceMatrix<C>,
    tour: &Tour,
    cost: C,
    kind: NeighborhoodKind,
) -> Option<(Tour, C)> {
    let mut hood = Neighborhood::new(matrix, tour, cost, kind);
    let mut best: Option<(Tour, C)> = None;

    while hood.valid() {
        hood.calculate();
        let candidate_cost = hood.candidate_cost();
        match best.as_mut() {
            Some((best_tour, best_cost)) => {
                if candidate_cost < *best_cost {
                    best_tour.clone_from(hood.candidate());
                    *best_cost = candidate_cost;
                }
            }
            None => best = Some((hood.candidate().clone(), candidate_cost)),
        }
        hood.next();
    }

    best
}
