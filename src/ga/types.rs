//! Population members.

use crate::cost::{cmp_cost, Cost};
use crate::matrix::DistanceMatrix;
use crate::tour::Tour;

/// A tour together with its evaluated cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual<C> {
    /// The tour.
    pub tour: Tour,
    /// Its total cost.
    pub cost: C,
}

impl<C: Cost> Individual<C> {
    /// Evaluates `tour` against `matrix`.
    pub fn evaluate(tour: Tour, matrix: &DistanceMatrix<C>) -> Self {
        let cost = tour.cost(matrix);
        Self { tour, cost }
    }
}

/// Moves the `k` cheapest individuals to the front, cheapest first.
///
/// The rest of the slice is left in unspecified order. `k` is clamped to
/// `1..=len`.
pub(crate) fn partial_sort<C: Cost>(population: &mut [Individual<C>], k: usize) {
    if population.is_empty() {
        return;
    }
    let k = k.clamp(1, population.len());
    population.select_nth_unstable_by(k - 1, |a, b| cmp_cost(&a.cost, &b.cost));
    population[..k].sort_by(|a, b| cmp_cost(&a.cost, &b.cost));
}
