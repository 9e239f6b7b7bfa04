//! Tour crossover and mutation operators.
//!
//! Every operator works on the interior visiting order of a [`Tour`] and
//! re-closes it afterwards, so its output is always a valid closed tour
//! when the input was.
//!
//! # Crossover
//!
//! - [`order_crossover`] (OX): Davis (1985), preserves relative order
//!
//! # Mutation
//!
//! - [`swap_mutation`]: exchange two interior positions, O(1)
//! - [`centre_inverse_mutation`]: split once, reverse both halves, O(n)
//! - [`reverse_sequence_mutation`]: reverse one random segment, O(n)
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Abdoun, Abouchabaka & Tajani (2012), "Analyzing the Performance of
//!   Mutation Operators to Solve the Travelling Salesman Problem"

use rand::Rng;

use crate::tour::Tour;

// ============================================================================
// Crossover
// ============================================================================

/// Order Crossover (OX) with random cut points.
///
/// Both cut points are drawn independently from `0..n` and ordered; see
/// [`order_crossover_with_cuts`].
///
/// # Panics
/// Panics if the parents visit a different number of cities.
pub fn order_crossover<R: Rng>(parent_a: &Tour, parent_b: &Tour, rng: &mut R) -> Tour {
    let n = parent_a.len();
    if n < 2 {
        return parent_a.clone();
    }
    let cut_a = rng.random_range(0..n);
    let cut_b = rng.random_range(0..n);
    order_crossover_with_cuts(parent_a, parent_b, cut_a, cut_b)
}

/// Order Crossover (OX) with fixed cut points.
///
/// # Algorithm (Davis, 1985)
///
/// 1. Order the cuts into `lo <= hi`
/// 2. Copy positions `lo..hi` from `parent_a`
/// 3. Walk `parent_b` starting at position `hi`, wrapping around, and fill
///    the remaining positions (also starting at `hi`) with every city not
///    yet placed
///
/// Equal cuts copy nothing from `parent_a`, so the child is `parent_b`.
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if the parents visit a different number of cities or a cut is
/// larger than the number of cities.
///
/// # Examples
///
/// ```
/// use u_tsp::ga::operators::order_crossover_with_cuts;
/// use u_tsp::Tour;
///
/// let a = Tour::from_order(vec![0, 1, 2, 3, 4]);
/// let b = Tour::from_order(vec![4, 3, 2, 1, 0]);
/// let child = order_crossover_with_cuts(&a, &b, 1, 3);
/// assert_eq!(child.as_slice(), &[3, 1, 2, 0, 4, 3]);
/// ```
pub fn order_crossover_with_cuts(
    parent_a: &Tour,
    parent_b: &Tour,
    cut_a: usize,
    cut_b: usize,
) -> Tour {
    let n = parent_a.len();
    assert_eq!(n, parent_b.len(), "parents must visit the same cities");
    if n == 0 {
        return parent_a.clone();
    }

    let (lo, hi) = (cut_a.min(cut_b), cut_a.max(cut_b));
    let template = parent_a.cities();
    let donor = parent_b.cities();

    let mut child = vec![usize::MAX; n];
    let mut used = vec![false; n];

    for i in lo..hi {
        child[i] = template[i];
        used[template[i]] = true;
    }

    let mut pos = hi % n;
    for offset in 0..n {
        let city = donor[(hi + offset) % n];
        if !used[city] {
            used[city] = true;
            child[pos] = city;
            pos = (pos + 1) % n;
        }
    }

    Tour::from_order(child)
}

// ============================================================================
// Mutation
// ============================================================================

/// Mutation operator choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MutationKind {
    /// Pick one of the three operators uniformly on every call.
    #[default]
    Random,
    /// [`swap_mutation`].
    Swap,
    /// [`centre_inverse_mutation`].
    CentreInverse,
    /// [`reverse_sequence_mutation`].
    ReverseSequence,
}

impl MutationKind {
    /// Mutates `tour` in place.
    pub fn apply<R: Rng>(self, tour: &mut Tour, rng: &mut R) {
        let kind = match self {
            MutationKind::Random => match rng.random_range(0..3) {
                0 => MutationKind::Swap,
                1 => MutationKind::CentreInverse,
                _ => MutationKind::ReverseSequence,
            },
            fixed => fixed,
        };
        match kind {
            MutationKind::Swap => swap_mutation(tour, rng),
            MutationKind::CentreInverse => centre_inverse_mutation(tour, rng),
            MutationKind::ReverseSequence | MutationKind::Random => {
                reverse_sequence_mutation(tour, rng)
            }
        }
    }
}

/// Exchanges the cities at two random interior positions.
///
/// The first city of the tour stays in place.
pub fn swap_mutation<R: Rng>(tour: &mut Tour, rng: &mut R) {
    let n = tour.len();
    if n < 3 {
        return;
    }
    let i = rng.random_range(1..n);
    let j = rng.random_range(1..n);
    tour.path_mut().swap(i, j);
    tour.reclose();
}

/// Splits the order at a random `k` and reverses both `0..k` and `k..n`.
pub fn centre_inverse_mutation<R: Rng>(tour: &mut Tour, rng: &mut R) {
    let n = tour.len();
    if n < 2 {
        return;
    }
    let k = rng.random_range(0..=n);
    let path = tour.path_mut();
    path[..k].reverse();
    path[k..n].reverse();
    tour.reclose();
}

/// Reverses the order between two random positions `a..b`.
pub fn reverse_sequence_mutation<R: Rng>(tour: &mut Tour, rng: &mut R) {
    let n = tour.len();
    if n < 2 {
        return;
    }
    let a = rng.random_range(0..=n);
    let b = rng.random_range(0..=n);
    tour.path_mut()[a.min(b)..a.max(b)].reverse();
    tour.reclose();
}
