//! Dense distance matrix.

use std::ops::RangeInclusive;

use rand::distr::uniform::SampleUniform;
use rand::Rng;

use crate::cost::Cost;
use crate::error::{Result, TspError};

/// A dense n×n cost table stored in row-major order.
///
/// `cost(from, to)` need not equal `cost(to, from)`. The diagonal is
/// conventionally zero but this is not enforced.
///
/// # Examples
///
/// ```
/// use u_tsp::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0u64, 3, 4],
///     vec![3, 0, 5],
///     vec![4, 5, 0],
/// ])
/// .unwrap();
/// assert_eq!(dm.size(), 3);
/// assert_eq!(dm.cost(1, 2), 5);
/// assert!(dm.is_symmetric());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceMatrix<C = u64> {
    data: Vec<C>,
    size: usize,
}

impl<C: Cost> DistanceMatrix<C> {
    /// Creates a matrix of the given size, filled with zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![C::zero(); size * size],
            size,
        }
    }

    /// Creates a matrix from a flat row-major buffer.
    pub fn from_data(size: usize, data: Vec<C>) -> Result<Self> {
        if data.len() != size * size {
            return Err(TspError::InvalidMatrix(format!(
                "expected {} entries for size {size}, got {}",
                size * size,
                data.len()
            )));
        }
        Ok(Self { data, size })
    }

    /// Creates a matrix from a list of rows; `rows[from][to]` is the cost.
    pub fn from_rows(rows: Vec<Vec<C>>) -> Result<Self> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(TspError::InvalidMatrix(format!(
                    "row {i} has {} entries, expected {size}",
                    row.len()
                )));
            }
            data.extend(row);
        }
        Ok(Self { data, size })
    }

    /// Number of cities.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cost of travelling from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn cost(&self, from: usize, to: usize) -> C {
        self.data[from * self.size + to]
    }

    /// Sets the cost of travelling from `from` to `to`.
    pub fn set(&mut self, from: usize, to: usize, cost: C) {
        self.data[from * self.size + to] = cost;
    }

    /// Outgoing costs of `from`.
    pub fn row(&self, from: usize) -> &[C] {
        &self.data[from * self.size..(from + 1) * self.size]
    }

    /// Returns `true` if `cost(i, j) == cost(j, i)` for every pair.
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| ((i + 1)..self.size).all(|j| self.cost(i, j) == self.cost(j, i)))
    }
}

impl<C: Cost + SampleUniform> DistanceMatrix<C> {
    /// Generates an asymmetric instance: every off-diagonal entry is drawn
    /// independently from `range`, the diagonal is zero.
    pub fn random_asymmetric<R: Rng>(
        size: usize,
        range: RangeInclusive<C>,
        rng: &mut R,
    ) -> Result<Self> {
        check_range(&range)?;
        let mut dm = Self::new(size);
        for from in 0..size {
            for to in 0..size {
                if from != to {
                    dm.set(from, to, rng.random_range(range.clone()));
                }
            }
        }
        Ok(dm)
    }

    /// Generates a symmetric instance: the lower triangle is drawn from
    /// `range` and mirrored, the diagonal is zero.
    pub fn random_symmetric<R: Rng>(
        size: usize,
        range: RangeInclusive<C>,
        rng: &mut R,
    ) -> Result<Self> {
        check_range(&range)?;
        let mut dm = Self::new(size);
        for from in 0..size {
            for to in 0..from {
                let c = rng.random_range(range.clone());
                dm.set(from, to, c);
                dm.set(to, from, c);
            }
        }
        Ok(dm)
    }
}

fn check_range<C: Cost>(range: &RangeInclusive<C>) -> Result<()> {
    if range.start() > range.end() {
        return Err(TspError::InvalidMatrix(format!(
            "empty cost range {:?}..={:?}",
            range.start(),
            range.end()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_from_rows_row_major() {
        let dm = DistanceMatrix::from_rows(vec![vec![0u64, 1, 2], vec![3, 0, 4], vec![5, 6, 0]])
            .expect("square");
        assert_eq!(dm.cost(0, 2), 2);
        assert_eq!(dm.cost(2, 0), 5);
        assert_eq!(dm.row(1), &[3, 0, 4]);
        assert!(!dm.is_symmetric());
    }

    #[test]
    fn test_from_rows_not_square() {
        let err = DistanceMatrix::from_rows(vec![vec![0u64, 1], vec![1]]).unwrap_err();
        assert!(matches!(err, TspError::InvalidMatrix(_)));
    }

    #[test]
    fn test_from_data_invalid_len() {
        assert!(DistanceMatrix::from_data(2, vec![0u64, 1, 2]).is_err());
        let dm = DistanceMatrix::from_data(2, vec![0u64, 7, 9, 0]).expect("valid");
        assert_eq!(dm.cost(0, 1), 7);
        assert_eq!(dm.cost(1, 0), 9);
    }

    #[test]
    fn test_random_symmetric() {
        let mut rng = StdRng::seed_from_u64(42);
        let dm = DistanceMatrix::<u64>::random_symmetric(12, 5..=20, &mut rng).expect("range");
        assert!(dm.is_symmetric());
        for i in 0..12 {
            assert_eq!(dm.cost(i, i), 0);
            for j in 0..12 {
                if i != j {
                    assert!((5..=20).contains(&dm.cost(i, j)));
                }
            }
        }
    }

    #[test]
    fn test_random_asymmetric_diagonal_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        let dm = DistanceMatrix::<u32>::random_asymmetric(10, 1..=1000, &mut rng).expect("range");
        assert!((0..10).all(|i| dm.cost(i, i) == 0));
        assert!(!dm.is_symmetric());
    }

    #[test]
    fn test_random_empty_range() {
        let mut rng = StdRng::seed_from_u64(7);
        #[allow(clippy::reversed_empty_ranges)]
        let result = DistanceMatrix::<u64>::random_symmetric(4, 10..=5, &mut rng);
        assert!(result.is_err());
    }
}
