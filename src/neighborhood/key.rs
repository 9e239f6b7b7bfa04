//! Position pair enumeration for neighborhood sweeps.

/// A pair of tour positions `(l, r)` with `l < r`.
///
/// Keys are visited in a fixed total order: for a fixed `r`, `l` sweeps
/// `0..r`; after `l == r - 1`, `r` increments and `l` resets to zero. The
/// first key is `(0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NeighborhoodKey {
    /// Left position.
    pub l: usize,
    /// Right position.
    pub r: usize,
}

impl Default for NeighborhoodKey {
    fn default() -> Self {
        Self { l: 0, r: 1 }
    }
}

impl NeighborhoodKey {
    /// Advances to the next pair in sweep order.
    #[inline]
    pub fn advance(&mut self) {
        if self.l + 1 < self.r {
            self.l += 1;
        } else {
            self.r += 1;
            self.l = 0;
        }
    }

    /// Returns `true` while the key addresses a pair inside a tour of
    /// `cities` cities. The closing position `cities` is never touched.
    #[inline]
    pub fn in_range(&self, cities: usize) -> bool {
        self.r < cities
    }

    /// Number of keys a full sweep visits for `cities` cities.
    pub fn sweep_len(cities: usize) -> usize {
        cities * cities.saturating_sub(1) / 2
    }
}
