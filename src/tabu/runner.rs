//! Taboo search execution engine.
//!
//! # Algorithm
//!
//! 1. Push the starting tour as the root of the search tree
//! 2. Up to `max_backtracks` times:
//!    a. Continue from the tour on top of the tree
//!    b. Repeat until `max_depth` steps pass without a tree update:
//!       sweep the neighborhood, take the best admissible move (a forbidden
//!       move is admissible only through aspiration), forbid it, and push a
//!       new tree node whenever the move beats the top node
//!    c. Backtrack: restore the top node's taboo memory, forbid the move
//!       first taken from it, and pop it
//! 3. Return the best tour seen
//!
//! # Reference
//!
//! Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.

use tracing::{debug, info, trace};

use super::config::TabuConfig;
use super::types::{ForbiddenMove, SearchTreeNode, TabuList};
use crate::cost::Cost;
use crate::error::{Result, TspError};
use crate::matrix::DistanceMatrix;
use crate::neighborhood::{Neighborhood, NeighborhoodKind};
use crate::progress::{emit, Progress};
use crate::tour::Tour;

/// Result of a taboo search run.
#[derive(Debug, Clone)]
pub struct TabuResult<C> {
    /// Best tour found.
    pub best: Tour,
    /// Cost of the best tour.
    pub best_cost: C,
    /// Neighborhood sweeps executed.
    pub steps: usize,
    /// Backtracks executed.
    pub backtracks: usize,
    /// Forbidden moves taken through aspiration.
    pub aspirations: usize,
    /// Best cost after every step, starting with the input cost.
    pub cost_history: Vec<f64>,
}

/// The move chosen by one sweep.
#[derive(Debug, Clone)]
pub(crate) struct Selected<C> {
    pub tour: Tour,
    pub cost: C,
    pub mv: ForbiddenMove,
    /// The move was forbidden and taken through aspiration.
    pub aspirated: bool,
}

/// Taboo search runner.
pub struct TabuRunner;

impl TabuRunner {
    /// Runs taboo search from `start`.
    ///
    /// Fails before any search work if the configuration or the starting
    /// tour is invalid, the matrix has fewer than two cities, or the
    /// neighborhood cannot price moves exactly on the matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tsp::tabu::{TabuConfig, TabuRunner};
    /// use u_tsp::{DistanceMatrix, Tour};
    ///
    /// let dm = DistanceMatrix::from_rows(vec![
    ///     vec![0u64, 1, 9, 1],
    ///     vec![1, 0, 1, 9],
    ///     vec![9, 1, 0, 1],
    ///     vec![1, 9, 1, 0],
    /// ])
    /// .unwrap();
    /// let start = Tour::from_order(vec![0, 2, 1, 3]);
    /// let result = TabuRunner::run(&dm, &start, &TabuConfig::default(), None).unwrap();
    /// assert_eq!(result.best_cost, 4);
    /// ```
    pub fn run<C: Cost>(
        matrix: &DistanceMatrix<C>,
        start: &Tour,
        config: &TabuConfig,
        mut progress: Progress<'_, C>,
    ) -> Result<TabuResult<C>> {
        config.validate()?;
        if matrix.size() < 2 {
            return Err(TspError::InvalidMatrix(
                "taboo search needs at least two cities".into(),
            ));
        }
        config.neighborhood.check_matrix(matrix)?;
        start.validate_for(matrix)?;

        let start_cost = start.cost(matrix);
        let mut best = start.clone();
        let mut best_cost = start_cost;
        let mut memory = TabuList::new(config.tabu_length);
        let mut tree = vec![SearchTreeNode {
            tour: start.clone(),
            cost: start_cost,
            memory: memory.clone(),
            last_move: None,
        }];

        let mut steps = 0;
        let mut backtracks = 0;
        let mut aspirations = 0;
        let mut cost_history = vec![best_cost.to_f64()];

        info!(
            cities = matrix.size(),
            cost = ?start_cost,
            neighborhood = ?config.neighborhood,
            "taboo search started"
        );

        for _ in 0..config.max_backtracks {
            let Some(top) = tree.last() else {
                break;
            };
            let mut current = top.tour.clone();
            let mut current_cost = top.cost;
            let mut since_update = 0;

            while since_update < config.max_depth {
                steps += 1;
                let Some(chosen) = select_move(
                    matrix,
                    &current,
                    current_cost,
                    config.neighborhood,
                    &memory,
                    config.ignore_ratio,
                ) else {
                    // Every candidate is forbidden.
                    since_update += 1;
                    cost_history.push(best_cost.to_f64());
                    continue;
                };
                if chosen.aspirated {
                    aspirations += 1;
                }

                let improves_top = match tree.last_mut() {
                    Some(top) => {
                        if since_update == 0 {
                            top.last_move = Some(chosen.mv);
                        }
                        chosen.cost < top.cost
                    }
                    None => false,
                };
                if improves_top {
                    tree.push(SearchTreeNode {
                        tour: chosen.tour.clone(),
                        cost: chosen.cost,
                        memory: memory.clone(),
                        last_move: None,
                    });
                    since_update = 0;
                } else {
                    since_update += 1;
                }

                if chosen.cost < best_cost {
                    best.clone_from(&chosen.tour);
                    best_cost = chosen.cost;
                    debug!(step = steps, cost = ?best_cost, depth = tree.len(), "taboo improved");
                    emit(&mut progress, steps, best_cost);
                }

                memory.push(chosen.mv);
                current = chosen.tour;
                current_cost = chosen.cost;
                cost_history.push(best_cost.to_f64());
            }

            if let Some(node) = tree.pop() {
                memory = node.memory;
                if let Some(mv) = node.last_move {
                    memory.push(mv);
                }
                backtracks += 1;
                trace!(backtracks, depth = tree.len(), cost = ?node.cost, "backtracked");
            }
        }

        info!(cost = ?best_cost, steps, backtracks, "taboo search finished");

        Ok(TabuResult {
            best,
            best_cost,
            steps,
            backtracks,
            aspirations,
            cost_history,
        })
    }
}

/// Sweeps the neighborhood of `current` and picks the move to take.
///
/// A candidate is taken when its cost is below `ignore_ratio` times the
/// sweep's best so far (aspiration), or when it is not forbidden and beats
/// the sweep's best. Returns `None` if every candidate is forbidden.
pub(crate) fn select_move<C: Cost>(
    matrix: &DistanceMatrix<C>,
    current: &Tour,
    current_cost: C,
    kind: NeighborhoodKind,
    memory: &TabuList,
    ignore_ratio: f64,
) -> Option<Selected<C>> {
    let mut hood = Neighborhood::new(matrix, current, current_cost, kind);
    let mut chosen: Option<Selected<C>> = None;

    while hood.valid() {
        hood.calculate();
        let cost = hood.candidate_cost();
        let (a, b) = hood.moved_cities();
        let mv = ForbiddenMove::new(a, b);
        let forbidden = memory.contains(&mv);

        let aspiration = chosen
            .as_ref()
            .is_some_and(|c| cost.to_f64() < c.cost.to_f64() * ignore_ratio);
        let accept = if aspiration {
            true
        } else if forbidden {
            false
        } else {
            chosen.as_ref().map_or(true, |c| cost < c.cost)
        };

        if accept {
            match chosen.as_mut() {
                Some(c) => {
                    c.tour.clone_from(hood.candidate());
                    c.cost = cost;
                    c.mv = mv;
                    c.aspirated = forbidden;
                }
                None => {
                    chosen = Some(Selected {
                        tour: hood.candidate().clone(),
                        cost,
                        mv,
                        aspirated: forbidden,
                    })
                }
            }
        }
        hood.next();
    }

    chosen
}
