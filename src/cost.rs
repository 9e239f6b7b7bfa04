//! Numeric trait for edge weights and tour costs.

use std::fmt::Debug;
use std::ops::{Add, Sub};

/// Marker trait for matrix entries and tour costs.
///
/// Costs must be cheaply copyable, comparable and closed under addition and
/// subtraction. Lower cost is better (minimization).
///
/// Integer implementations make incremental cost updates exact: a
/// neighborhood step computes `base - removed + added` over edges that are
/// all part of the base tour, so unsigned types never underflow. Floating
/// point implementations agree with full recomputation up to rounding.
pub trait Cost:
    Copy + PartialOrd + Add<Output = Self> + Sub<Output = Self> + Send + Sync + Debug + 'static
{
    /// The additive identity.
    fn zero() -> Self;

    /// Converts the cost to `f64` for selection weights and reporting.
    fn to_f64(self) -> f64;
}

macro_rules! impl_cost_int {
    ($($t:ty),*) => {
        $(
            impl Cost for $t {
                fn zero() -> Self {
                    0
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_cost_int!(u16, u32, u64, usize, i32, i64);

impl Cost for f64 {
    fn zero() -> Self {
        0.0
    }

    fn to_f64(self) -> f64 {
        self
    }
}

impl Cost for f32 {
    fn zero() -> Self {
        0.0
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

/// Total order helper for costs, treating incomparable values as equal.
pub(crate) fn cmp_cost<C: Cost>(a: &C, b: &C) -> std::cmp::Ordering {
    a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
}
