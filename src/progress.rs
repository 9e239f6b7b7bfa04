//! Progress reporting.
//!
//! Drivers accept an optional callback `(iteration, best_cost_so_far)`. It
//! is invoked from the driver's own thread, at most once per generation or
//! search tree update, and only when the best cost strictly improved.

use tracing::info;

use crate::cost::Cost;
use crate::tour::percent_relative_deviation;

/// Optional progress callback accepted by the search drivers.
pub type Progress<'a, C> = Option<&'a mut dyn FnMut(usize, C)>;

pub(crate) fn emit<C>(progress: &mut Progress<'_, C>, iteration: usize, cost: C) {
    if let Some(f) = progress.as_deref_mut() {
        f(iteration, cost);
    }
}

/// Logs every improvement with its percent relative deviation from a known
/// optimum.
///
/// ```
/// use u_tsp::progress::PrdReporter;
///
/// let reporter = PrdReporter::new(100u64);
/// let mut sink = reporter.sink();
/// sink(3, 120);
/// assert_eq!(reporter.prd(120), 20.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PrdReporter<C> {
    optimum: C,
}

impl<C: Cost> PrdReporter<C> {
    /// Creates a reporter against the known optimal cost.
    pub fn new(optimum: C) -> Self {
        Self { optimum }
    }

    /// Percent relative deviation of `cost` from the optimum.
    pub fn prd(&self, cost: C) -> f64 {
        percent_relative_deviation(cost, self.optimum)
    }

    /// Emits one `info` event for an improvement.
    pub fn report(&self, iteration: usize, cost: C) {
        info!(iteration, cost = ?cost, prd = self.prd(cost), "best cost improved");
    }

    /// A callback suitable for passing as [`Progress`].
    pub fn sink(&self) -> impl FnMut(usize, C) + '_ {
        move |iteration, cost| self.report(iteration, cost)
    }
}
