//! Closed tours and cost evaluation.

use crate::cost::Cost;
use crate::error::{Result, TspError};
use crate::matrix::DistanceMatrix;

/// A closed visiting order over all cities.
///
/// Stored as `n + 1` city indices: the interior `n` values are a
/// permutation of `0..n` and the last element repeats the first, so every
/// consecutive pair of the path is one edge of the cycle.
///
/// # Examples
///
/// ```
/// use u_tsp::Tour;
///
/// let tour = Tour::from_order(vec![2, 0, 1]);
/// assert_eq!(tour.as_slice(), &[2, 0, 1, 2]);
/// assert_eq!(tour.len(), 3);
/// assert!(tour.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tour {
    path: Vec<usize>,
}

impl Tour {
    /// The tour `0, 1, …, n-1, 0`.
    pub fn identity(size: usize) -> Self {
        Self::from_order((0..size).collect())
    }

    /// Builds a tour from a visiting order, appending the closing city.
    ///
    /// The order is not validated; use [`Tour::validate`] when it comes from
    /// an untrusted source.
    pub fn from_order(mut order: Vec<usize>) -> Self {
        if let Some(&first) = order.first() {
            order.push(first);
        }
        Self { path: order }
    }

    /// Builds a tour from a closed path (`path[0] == path[n]`), validating it.
    pub fn from_closed(path: Vec<usize>) -> Result<Self> {
        let tour = Self { path };
        tour.validate()?;
        Ok(tour)
    }

    /// Number of cities visited.
    pub fn len(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Returns `true` if the tour visits no city.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The closed path including the repeated start city.
    pub fn as_slice(&self) -> &[usize] {
        &self.path
    }

    /// The visiting order without the closing city.
    pub fn cities(&self) -> &[usize] {
        &self.path[..self.len()]
    }

    /// Consumes the tour, returning the closed path.
    pub fn into_vec(self) -> Vec<usize> {
        self.path
    }

    pub(crate) fn path_mut(&mut self) -> &mut Vec<usize> {
        &mut self.path
    }

    /// Restores `path[n] == path[0]` after the interior was rearranged.
    pub(crate) fn reclose(&mut self) {
        let n = self.len();
        if n > 0 {
            self.path[n] = self.path[0];
        }
    }

    /// Checks the closing element and that the interior is a permutation.
    pub fn validate(&self) -> Result<()> {
        let n = self.len();
        if n == 0 {
            return Err(TspError::InvalidTour("tour visits no city".into()));
        }
        if self.path[0] != self.path[n] {
            return Err(TspError::InvalidTour(format!(
                "closing city {} differs from start {}",
                self.path[n], self.path[0]
            )));
        }
        let mut seen = vec![false; n];
        for &city in self.cities() {
            if city >= n {
                return Err(TspError::InvalidTour(format!(
                    "city {city} outside 0..{n}"
                )));
            }
            if seen[city] {
                return Err(TspError::InvalidTour(format!("city {city} repeats")));
            }
            seen[city] = true;
        }
        Ok(())
    }

    /// Returns `true` if [`Tour::validate`] succeeds.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Checks the tour is valid and covers exactly the matrix cities.
    pub fn validate_for<C: Cost>(&self, matrix: &DistanceMatrix<C>) -> Result<()> {
        if self.len() != matrix.size() {
            return Err(TspError::InvalidTour(format!(
                "tour visits {} cities, matrix has {}",
                self.len(),
                matrix.size()
            )));
        }
        self.validate()
    }

    /// Total cost of the cycle under `matrix`.
    pub fn cost<C: Cost>(&self, matrix: &DistanceMatrix<C>) -> C {
        total_cost(matrix, &self.path)
    }
}

impl AsRef<[usize]> for Tour {
    fn as_ref(&self) -> &[usize] {
        &self.path
    }
}

/// Sums `cost(path[i], path[i + 1])` over all consecutive pairs.
///
/// Paths shorter than three entries (fewer than two cities) cost zero.
pub fn total_cost<C: Cost>(matrix: &DistanceMatrix<C>, path: &[usize]) -> C {
    if path.len() <= 2 {
        return C::zero();
    }
    path.windows(2)
        .fold(C::zero(), |acc, w| acc + matrix.cost(w[0], w[1]))
}

/// Percent relative deviation `100 · (value − optimum) / optimum`.
///
/// Defined as `0.0` when `optimum` is zero.
///
/// ```
/// use u_tsp::percent_relative_deviation;
///
/// assert_eq!(percent_relative_deviation(110u64, 100), 10.0);
/// assert_eq!(percent_relative_deviation(5u64, 0), 0.0);
/// ```
pub fn percent_relative_deviation<C: Cost>(value: C, optimum: C) -> f64 {
    let opt = optimum.to_f64();
    if opt == 0.0 {
        return 0.0;
    }
    100.0 * (value.to_f64() - opt) / opt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> DistanceMatrix<u64> {
        DistanceMatrix::from_rows(vec![
            vec![0, 1, 9, 1],
            vec![1, 0, 1, 9],
            vec![9, 1, 0, 1],
            vec![1, 9, 1, 0],
        ])
        .expect("square")
    }

    #[test]
    fn test_identity() {
        let t = Tour::identity(4);
        assert_eq!(t.as_slice(), &[0, 1, 2, 3, 0]);
        assert_eq!(t.cities(), &[0, 1, 2, 3]);
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn test_cost() {
        let dm = square();
        assert_eq!(Tour::identity(4).cost(&dm), 4);
        assert_eq!(Tour::from_order(vec![0, 2, 1, 3]).cost(&dm), 9 + 1 + 9 + 1);
    }

    #[test]
    fn test_cost_asymmetric_direction() {
        let dm = DistanceMatrix::from_rows(vec![
            vec![0u64, 1, 100],
            vec![100, 0, 1],
            vec![1, 100, 0],
        ])
        .expect("square");
        assert_eq!(Tour::from_order(vec![0, 1, 2]).cost(&dm), 3);
        assert_eq!(Tour::from_order(vec![0, 2, 1]).cost(&dm), 300);
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        assert!(Tour::from_closed(vec![0, 1, 1, 0]).is_err());
        assert!(Tour::from_closed(vec![0, 1, 2, 1]).is_err());
        assert!(Tour::from_closed(vec![0, 1, 5, 0]).is_err());
        assert!(Tour::from_closed(vec![]).is_err());
        assert!(Tour::from_closed(vec![1, 2, 0, 1]).is_ok());
    }

    #[test]
    fn test_validate_for_size_mismatch() {
        let dm = square();
        assert!(Tour::identity(3).validate_for(&dm).is_err());
        assert!(Tour::identity(4).validate_for(&dm).is_ok());
    }

    #[test]
    fn test_tiny_paths_cost_zero() {
        let dm = square();
        assert_eq!(total_cost(&dm, &[0, 0]), 0);
        assert_eq!(total_cost(&dm, &[]), 0);
    }

    #[test]
    fn test_prd() {
        let prd = percent_relative_deviation(150.0, 100.0);
        assert!((prd - 50.0).abs() < 1e-12);
        assert_eq!(percent_relative_deviation(3u64, 0), 0.0);
    }
}
