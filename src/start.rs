//! Starting tour construction.
//!
//! The search drivers improve an existing tour; these strategies build the
//! first one.

use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::cost::{cmp_cost, Cost};
use crate::error::{Result, TspError};
use crate::matrix::DistanceMatrix;
use crate::tour::Tour;

/// How to build a starting tour.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use u_tsp::start::StartStrategy;
/// use u_tsp::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0u64, 1, 9, 1],
///     vec![1, 0, 1, 9],
///     vec![9, 1, 0, 1],
///     vec![1, 9, 1, 0],
/// ])
/// .unwrap();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
/// let tour = StartStrategy::Nearest(0).build(&dm, &mut rng).unwrap();
/// assert_eq!(tour.as_slice(), &[0, 1, 2, 3, 0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StartStrategy {
    /// `0, 1, …, n-1, 0`.
    #[default]
    Monotonic,
    /// A uniformly shuffled order.
    Random,
    /// The cheapest of `k` shuffled orders.
    KRandom(usize),
    /// Greedy nearest neighbour from the given city.
    Nearest(usize),
    /// The cheapest nearest-neighbour tour over every starting city.
    NearestBest,
}

impl StartStrategy {
    /// Builds a starting tour over the matrix cities.
    ///
    /// Fails on an empty matrix, on `KRandom(0)`, and when the starting
    /// city of `Nearest` is out of range.
    pub fn build<C: Cost, R: Rng>(&self, matrix: &DistanceMatrix<C>, rng: &mut R) -> Result<Tour> {
        let n = matrix.size();
        if n == 0 {
            return Err(TspError::InvalidMatrix("matrix has no cities".into()));
        }
        let tour = match *self {
            StartStrategy::Monotonic => Tour::identity(n),
            StartStrategy::Random => shuffled(n, rng),
            StartStrategy::KRandom(k) => k_random(matrix, k, rng)?,
            StartStrategy::Nearest(city) => nearest(matrix, city)?,
            StartStrategy::NearestBest => nearest_best(matrix)?,
        };
        debug!(strategy = ?self, cost = ?tour.cost(matrix), "starting tour built");
        Ok(tour)
    }
}

fn shuffled<R: Rng>(n: usize, rng: &mut R) -> Tour {
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    Tour::from_order(order)
}

fn k_random<C: Cost, R: Rng>(matrix: &DistanceMatrix<C>, k: usize, rng: &mut R) -> Result<Tour> {
    let mut best: Option<(Tour, C)> = None;
    for _ in 0..k {
        let tour = shuffled(matrix.size(), rng);
        let cost = tour.cost(matrix);
        if best.as_ref().map_or(true, |(_, b)| cost < *b) {
            best = Some((tour, cost));
        }
    }
    best.map(|(tour, _)| tour).ok_or(TspError::NoSolution)
}

/// Greedy nearest neighbour; ties go to the lowest city index.
fn nearest<C: Cost>(matrix: &DistanceMatrix<C>, start: usize) -> Result<Tour> {
    let n = matrix.size();
    if start >= n {
        return Err(TspError::InvalidStart {
            position: start,
            size: n,
        });
    }

    let mut visited = vec![false; n];
    visited[start] = true;
    let mut order = Vec::with_capacity(n + 1);
    order.push(start);

    let mut position = start;
    for _ in 1..n {
        let mut closest: Option<(usize, C)> = None;
        for (city, &cost) in matrix.row(position).iter().enumerate() {
            if visited[city] {
                continue;
            }
            if closest.map_or(true, |(_, c)| cost < c) {
                closest = Some((city, cost));
            }
        }
        let Some((city, _)) = closest else {
            return Err(TspError::NoSolution);
        };
        visited[city] = true;
        order.push(city);
        position = city;
    }

    Ok(Tour::from_order(order))
}

fn nearest_best<C: Cost>(matrix: &DistanceMatrix<C>) -> Result<Tour> {
    let tours = (0..matrix.size())
        .into_par_iter()
        .map(|city| {
            nearest(matrix, city).map(|tour| {
                let cost = tour.cost(matrix);
                (city, tour, cost)
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tours
        .into_iter()
        .min_by(|a, b| cmp_cost(&a.2, &b.2).then(a.0.cmp(&b.0)))
        .map(|(_, tour, _)| tour)
        .ok_or(TspError::NoSolution)
}
