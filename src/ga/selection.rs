//! Parent selection strategies.
//!
//! Both strategies minimise: cheaper tours are picked more often. They draw
//! indices into a slice of costs, so callers keep tours and costs side by
//! side.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use rand::Rng;

use crate::cost::Cost;

/// Weight given to the most expensive tour so it stays selectable.
const EPSILON: f64 = 1e-9;

/// Selection strategy for choosing parents.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use u_tsp::ga::Selection;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let picked = Selection::Tournament(3).select(&[30u64, 10, 20], 4, &mut rng);
/// assert_eq!(picked.len(), 4);
/// assert!(picked.iter().all(|&i| i < 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Fitness-proportionate (roulette wheel) selection.
    ///
    /// Weights are `max_cost - cost + ε`, so the cheapest tour has the
    /// largest slice and the most expensive one a sliver.
    ///
    /// # Complexity
    /// O(n) to build the wheel, O(log n) per draw
    #[default]
    Roulette,

    /// Tournament selection: pick `k` tours at random, keep the cheapest.
    ///
    /// # Complexity
    /// O(k) per draw
    Tournament(usize),
}

impl Selection {
    /// Draws `count` indices into `costs`, with replacement.
    ///
    /// Returns an empty vector if `costs` is empty.
    pub fn select<C: Cost, R: Rng>(&self, costs: &[C], count: usize, rng: &mut R) -> Vec<usize> {
        if costs.is_empty() {
            return Vec::new();
        }
        match self {
            Selection::Roulette => roulette(costs, count, rng),
            Selection::Tournament(k) => (0..count).map(|_| tournament(costs, *k, rng)).collect(),
        }
    }
}

/// Roulette wheel over inverted costs.
///
/// The wheel is a normalised prefix-sum table; each draw is a lower-bound
/// search for the first slot whose upper edge exceeds a uniform number.
fn roulette<C: Cost, R: Rng>(costs: &[C], count: usize, rng: &mut R) -> Vec<usize> {
    let n = costs.len();
    let max_cost = costs
        .iter()
        .map(|c| c.to_f64())
        .fold(f64::NEG_INFINITY, f64::max);

    let mut wheel = Vec::with_capacity(n);
    let mut total = 0.0;
    for c in costs {
        total += (max_cost - c.to_f64()).max(0.0) + EPSILON;
        wheel.push(total);
    }
    for slot in &mut wheel {
        *slot /= total;
    }

    (0..count)
        .map(|_| {
            let x: f64 = rng.random();
            wheel.partition_point(|&edge| edge <= x).min(n - 1)
        })
        .collect()
}

fn tournament<C: Cost, R: Rng>(costs: &[C], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = costs.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if costs[idx] < costs[best_idx] {
            best_idx = idx;
        }
    }
    best_idx
}
