//! Incrementally evaluated neighborhood generator.

use super::key::NeighborhoodKey;
use crate::cost::Cost;
use crate::error::{Result, TspError};
use crate::matrix::DistanceMatrix;
use crate::tour::{total_cost, Tour};

/// Which single-move mutation a sweep enumerates.
///
/// # Variants
///
/// | Kind | Move at `(l, r)` | Cost update |
/// |------|------------------|-------------|
/// | `InverseAsymmetric` | reverse positions `l..=r` | full recomputation, O(n) |
/// | `InverseSymmetric` | reverse positions `l..=r` | two boundary edges, O(1) |
/// | `Swap` | exchange positions `l` and `r` | up to four edges, O(1) |
///
/// `InverseSymmetric` is only exact on symmetric matrices: it assumes that
/// traversing the reversed segment backwards costs the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NeighborhoodKind {
    /// Segment reversal with full cost recomputation.
    InverseAsymmetric,
    /// Segment reversal with boundary-edge cost update.
    InverseSymmetric,
    /// Pairwise position exchange.
    #[default]
    Swap,
}

impl NeighborhoodKind {
    /// All variants, in declaration order.
    pub const ALL: [NeighborhoodKind; 3] = [
        NeighborhoodKind::InverseAsymmetric,
        NeighborhoodKind::InverseSymmetric,
        NeighborhoodKind::Swap,
    ];

    /// The segment-reversal variant suited to `matrix`.
    pub fn inverse_for<C: Cost>(matrix: &DistanceMatrix<C>) -> Self {
        if matrix.is_symmetric() {
            NeighborhoodKind::InverseSymmetric
        } else {
            NeighborhoodKind::InverseAsymmetric
        }
    }

    /// Checks that this kind prices moves exactly on `matrix`.
    ///
    /// Fails with [`TspError::InvalidConfig`] for `InverseSymmetric` on an
    /// asymmetric matrix.
    pub fn check_matrix<C: Cost>(self, matrix: &DistanceMatrix<C>) -> Result<()> {
        if self == NeighborhoodKind::InverseSymmetric && !matrix.is_symmetric() {
            return Err(TspError::InvalidConfig(
                "InverseSymmetric needs a symmetric matrix".into(),
            ));
        }
        Ok(())
    }
}

/// Enumerates the tours one move away from a base tour.
///
/// The generator owns a candidate buffer, initialised to a copy of the base
/// tour. Each [`calculate`](Self::calculate) writes the candidate for the
/// current key into the buffer together with its cost; the buffer always
/// stays closed (`candidate[n] == candidate[0]`).
///
/// ```
/// use u_tsp::{DistanceMatrix, Neighborhood, NeighborhoodKind, Tour};
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0u64, 1, 9, 1],
///     vec![1, 0, 1, 9],
///     vec![9, 1, 0, 1],
///     vec![1, 9, 1, 0],
/// ])
/// .unwrap();
/// let base = Tour::identity(4);
/// let mut hood = Neighborhood::new(&dm, &base, base.cost(&dm), NeighborhoodKind::Swap);
/// let mut count = 0;
/// while hood.valid() {
///     hood.calculate();
///     assert_eq!(hood.candidate_cost(), hood.candidate().cost(&dm));
///     count += 1;
///     hood.next();
/// }
/// assert_eq!(count, 6);
/// ```
#[derive(Debug)]
pub struct Neighborhood<'a, C: Cost> {
    matrix: &'a DistanceMatrix<C>,
    base: &'a Tour,
    base_cost: C,
    kind: NeighborhoodKind,
    key: NeighborhoodKey,
    /// Swap currently applied to the candidate buffer.
    applied: Option<NeighborhoodKey>,
    candidate: Tour,
    candidate_cost: C,
}

impl<'a, C: Cost> Neighborhood<'a, C> {
    /// Creates a generator over the neighbors of `base`.
    ///
    /// `base_cost` must be the exact cost of `base` under `matrix`.
    pub fn new(
        matrix: &'a DistanceMatrix<C>,
        base: &'a Tour,
        base_cost: C,
        kind: NeighborhoodKind,
    ) -> Self {
        Self::with_buffer(matrix, base, base_cost, kind, base.clone())
    }

    /// Like [`new`](Self::new), reusing `buffer`'s allocation for the
    /// candidate.
    pub fn with_buffer(
        matrix: &'a DistanceMatrix<C>,
        base: &'a Tour,
        base_cost: C,
        kind: NeighborhoodKind,
        mut buffer: Tour,
    ) -> Self {
        buffer.clone_from(base);
        Self {
            matrix,
            base,
            base_cost,
            kind,
            key: NeighborhoodKey::default(),
            applied: None,
            candidate: buffer,
            candidate_cost: base_cost,
        }
    }

    /// Returns `true` while there are keys left in the sweep.
    #[inline]
    pub fn valid(&self) -> bool {
        self.key.in_range(self.base.len())
    }

    /// Advances to the next key.
    #[inline]
    pub fn next(&mut self) {
        self.key.advance();
    }

    /// The current key.
    pub fn key(&self) -> NeighborhoodKey {
        self.key
    }

    /// The cities of the base tour at the current key's positions.
    pub fn moved_cities(&self) -> (usize, usize) {
        let path = self.base.as_slice();
        (path[self.key.l], path[self.key.r])
    }

    /// The variant this generator enumerates.
    pub fn kind(&self) -> NeighborhoodKind {
        self.kind
    }

    /// The last calculated candidate.
    pub fn candidate(&self) -> &Tour {
        &self.candidate
    }

    /// Cost of the last calculated candidate.
    pub fn candidate_cost(&self) -> C {
        self.candidate_cost
    }

    /// Consumes the generator, returning the candidate buffer.
    pub fn into_candidate(self) -> Tour {
        self.candidate
    }

    /// Writes the neighbor at the current key into the candidate buffer and
    /// computes its cost.
    pub fn calculate(&mut self) {
        match self.kind {
            NeighborhoodKind::InverseAsymmetric => {
                self.rebuild_inverse();
                self.candidate_cost = total_cost(self.matrix, self.candidate.as_slice());
            }
            NeighborhoodKind::InverseSymmetric => {
                self.rebuild_inverse();
                let NeighborhoodKey { l, r } = self.key;
                self.candidate_cost = self.incremental_cost(&[self.prev(l), r]);
            }
            NeighborhoodKind::Swap => {
                self.apply_swap();
                let NeighborhoodKey { l, r } = self.key;
                // Adjacent positions share the edge l -> r.
                self.candidate_cost = if r - l == 1 {
                    self.incremental_cost(&[self.prev(l), l, r])
                } else {
                    self.incremental_cost(&[self.prev(l), l, r - 1, r])
                };
            }
        }
    }

    /// Candidate = head `[0, l)` + reversed `[l, r]` + tail `(r, n)`, closed.
    fn rebuild_inverse(&mut self) {
        let NeighborhoodKey { l, r } = self.key;
        let n = self.base.len();
        let src = self.base.as_slice();
        let dst = self.candidate.path_mut();
        dst.clear();
        dst.extend_from_slice(&src[..l]);
        dst.extend(src[l..=r].iter().rev());
        dst.extend_from_slice(&src[r + 1..n]);
        dst.push(dst[0]);
    }

    /// Undoes the previously applied swap, then applies the current one.
    fn apply_swap(&mut self) {
        let path = self.candidate.path_mut();
        if let Some(prev) = self.applied.take() {
            path.swap(prev.l, prev.r);
        }
        path.swap(self.key.l, self.key.r);
        self.candidate.reclose();
        self.applied = Some(self.key);
    }

    /// Position of the edge ending at `pos`; the closing edge for `pos == 0`.
    #[inline]
    fn prev(&self, pos: usize) -> usize {
        if pos == 0 {
            self.base.len() - 1
        } else {
            pos - 1
        }
    }

    /// `base - removed + added` over the distinct edges starting at `edges`.
    ///
    /// Edge `e` joins positions `e` and `e + 1`. Every removed edge belongs
    /// to the base tour, so the subtraction stays non-negative as long as
    /// `base_cost` is the exact cost of the base tour.
    fn incremental_cost(&self, edges: &[usize]) -> C {
        let mut distinct = [0usize; 4];
        let mut count = 0;
        for &e in edges {
            if !distinct[..count].contains(&e) {
                distinct[count] = e;
                count += 1;
            }
        }

        let old = self.base.as_slice();
        let new = self.candidate.as_slice();
        let mut removed = C::zero();
        let mut added = C::zero();
        for &e in &distinct[..count] {
            removed = removed + self.matrix.cost(old[e], old[e + 1]);
            added = added + self.matrix.cost(new[e], new[e + 1]);
        }
        self.base_cost - removed + added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn random_tour(n: usize, rng: &mut StdRng) -> Tour {
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);
        Tour::from_order(order)
    }

    /// Sweeps every key and checks the candidate against full recomputation.
    fn check_sweep(dm: &DistanceMatrix<u64>, base: &Tour, kind: NeighborhoodKind) -> usize {
        let base_cost = base.cost(dm);
        let mut hood = Neighborhood::new(dm, base, base_cost, kind);
        let mut visited = 0;
        while hood.valid() {
            hood.calculate();
            let cand = hood.candidate();
            assert!(cand.is_valid(), "{kind:?} at {:?}: {cand:?}", hood.key());
            assert_eq!(cand.as_slice()[0], cand.as_slice()[cand.len()]);
            assert_eq!(
                hood.candidate_cost(),
                cand.cost(dm),
                "{kind:?} at {:?}",
                hood.key()
            );
            visited += 1;
            hood.next();
        }
        visited
    }

    #[test]
    fn test_inverse_reverses_inclusive_segment() {
        let dm = DistanceMatrix::<u64>::new(5);
        let base = Tour::identity(5);
        let mut hood = Neighborhood::new(&dm, &base, 0, NeighborhoodKind::InverseAsymmetric);
        // (0,1) (0,2) (1,2) (0,3) (1,3)
        for _ in 0..4 {
            hood.next();
        }
        assert_eq!(hood.key(), NeighborhoodKey { l: 1, r: 3 });
        hood.calculate();
        assert_eq!(hood.candidate().as_slice(), &[0, 3, 2, 1, 4, 0]);
        assert_eq!(hood.moved_cities(), (1, 3));
    }

    #[test]
    fn test_inverse_at_start_recloses() {
        let dm = DistanceMatrix::<u64>::new(4);
        let base = Tour::identity(4);
        let mut hood = Neighborhood::new(&dm, &base, 0, NeighborhoodKind::InverseSymmetric);
        hood.next(); // (0,2)
        hood.calculate();
        assert_eq!(hood.candidate().as_slice(), &[2, 1, 0, 3, 2]);
    }

    #[test]
    fn test_swap_undoes_previous_move() {
        let dm = DistanceMatrix::<u64>::new(4);
        let base = Tour::identity(4);
        let mut hood = Neighborhood::new(&dm, &base, 0, NeighborhoodKind::Swap);
        hood.calculate();
        assert_eq!(hood.candidate().as_slice(), &[1, 0, 2, 3, 1]);
        hood.next();
        hood.calculate();
        assert_eq!(hood.candidate().as_slice(), &[2, 1, 0, 3, 2]);
        hood.next();
        hood.calculate();
        assert_eq!(hood.candidate().as_slice(), &[0, 2, 1, 3, 0]);
    }

    #[test]
    fn test_swap_wrap_adjacent_asymmetric() {
        // Positions 0 and n-1 share the closing edge.
        let dm = DistanceMatrix::from_rows(vec![
            vec![0u64, 2, 3, 4],
            vec![5, 0, 7, 8],
            vec![9, 10, 0, 12],
            vec![13, 14, 15, 0],
        ])
        .expect("square");
        let base = Tour::identity(4);
        assert_eq!(check_sweep(&dm, &base, NeighborhoodKind::Swap), 6);
    }

    #[test]
    fn test_two_cities() {
        let dm = DistanceMatrix::from_rows(vec![vec![0u64, 3], vec![8, 0]]).expect("square");
        let base = Tour::identity(2);
        for kind in NeighborhoodKind::ALL {
            if kind == NeighborhoodKind::InverseSymmetric {
                continue;
            }
            assert_eq!(check_sweep(&dm, &base, kind), 1);
        }
    }

    #[test]
    fn test_single_city_has_no_neighbors() {
        let dm = DistanceMatrix::<u64>::new(1);
        let base = Tour::identity(1);
        let hood = Neighborhood::new(&dm, &base, 0, NeighborhoodKind::Swap);
        assert!(!hood.valid());
    }

    #[test]
    fn test_with_buffer_reuses_allocation() {
        let dm = DistanceMatrix::<u64>::new(6);
        let base = Tour::identity(6);
        let buffer = Tour::from_order(vec![5, 4, 3]);
        let hood = Neighborhood::with_buffer(&dm, &base, 0, NeighborhoodKind::Swap, buffer);
        assert_eq!(hood.candidate(), &base);
        assert_eq!(hood.into_candidate(), base);
    }

    #[test]
    fn test_inverse_for() {
        let sym = DistanceMatrix::from_rows(vec![vec![0u64, 1], vec![1, 0]]).expect("square");
        let asym = DistanceMatrix::from_rows(vec![vec![0u64, 1], vec![2, 0]]).expect("square");
        assert_eq!(
            NeighborhoodKind::inverse_for(&sym),
            NeighborhoodKind::InverseSymmetric
        );
        assert_eq!(
            NeighborhoodKind::inverse_for(&asym),
            NeighborhoodKind::InverseAsymmetric
        );
    }

    #[test]
    fn test_check_matrix() {
        let sym = DistanceMatrix::from_rows(vec![vec![0u64, 1], vec![1, 0]]).expect("square");
        let asym = DistanceMatrix::from_rows(vec![vec![0u64, 1], vec![2, 0]]).expect("square");
        for kind in NeighborhoodKind::ALL {
            assert!(kind.check_matrix(&sym).is_ok());
        }
        for kind in [NeighborhoodKind::InverseAsymmetric, NeighborhoodKind::Swap] {
            assert!(kind.check_matrix(&asym).is_ok());
        }
        assert!(matches!(
            NeighborhoodKind::InverseSymmetric.check_matrix(&asym),
            Err(TspError::InvalidConfig(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_asymmetric_matrix_costs_are_exact(n in 2usize..14, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let dm = DistanceMatrix::<u64>::random_asymmetric(n, 1..=1000, &mut rng).unwrap();
            let base = random_tour(n, &mut rng);
            for kind in [NeighborhoodKind::InverseAsymmetric, NeighborhoodKind::Swap] {
                prop_assert_eq!(check_sweep(&dm, &base, kind), NeighborhoodKey::sweep_len(n));
            }
        }

        #[test]
        fn prop_symmetric_matrix_costs_are_exact(n in 2usize..14, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let dm = DistanceMatrix::<u64>::random_symmetric(n, 1..=1000, &mut rng).unwrap();
            let base = random_tour(n, &mut rng);
            for kind in NeighborhoodKind::ALL {
                prop_assert_eq!(check_sweep(&dm, &base, kind), NeighborhoodKey::sweep_len(n));
            }
        }
    }
}
