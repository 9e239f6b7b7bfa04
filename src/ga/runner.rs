//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! evaluation → elitism → selection → parallel reproduction → repeat.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::config::GaConfig;
use super::operators::order_crossover;
use super::types::{partial_sort, Individual};
use crate::climb::sweep_best;
use crate::cost::{cmp_cost, Cost};
use crate::error::{Result, TspError};
use crate::matrix::DistanceMatrix;
use crate::pool::WorkerPool;
use crate::progress::{emit, Progress};
use crate::tour::Tour;

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<C> {
    /// The best tour found during the entire run.
    pub best: Tour,

    /// Cost of `best`.
    pub best_cost: C,

    /// Total number of generations executed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best cost before the first generation and after each one.
    pub cost_history: Vec<f64>,
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```
/// use u_tsp::ga::{GaConfig, GaRunner};
/// use u_tsp::{DistanceMatrix, Tour};
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0u64, 1, 9, 1],
///     vec![1, 0, 1, 9],
///     vec![9, 1, 0, 1],
///     vec![1, 9, 1, 0],
/// ])
/// .unwrap();
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_generations(30)
///     .with_worker_threads(2)
///     .with_seed(42);
/// let start = Tour::from_order(vec![0, 2, 1, 3]);
/// let result = GaRunner::run(&dm, &start, &config, None).unwrap();
/// assert_eq!(result.best_cost, 4);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA seeded with mutated copies of `start`.
    ///
    /// Fails before any search work if the configuration or the starting
    /// tour is invalid, the matrix has fewer than two cities, the
    /// enhancement neighborhood cannot price moves exactly on the matrix, or
    /// the worker pool cannot be started.
    pub fn run<C: Cost>(
        matrix: &DistanceMatrix<C>,
        start: &Tour,
        config: &GaConfig,
        progress: Progress<'_, C>,
    ) -> Result<GaResult<C>> {
        Self::run_with_cancel(matrix, start, config, progress, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA stops
    /// before the next generation and returns the best tour found so far.
    pub fn run_with_cancel<C: Cost>(
        matrix: &DistanceMatrix<C>,
        start: &Tour,
        config: &GaConfig,
        mut progress: Progress<'_, C>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult<C>> {
        config.validate()?;
        if matrix.size() < 2 {
            return Err(TspError::InvalidMatrix(
                "genetic algorithm needs at least two cities".into(),
            ));
        }
        config.enhancement_neighborhood.check_matrix(matrix)?;
        start.validate_for(matrix)?;
        let pool = WorkerPool::new(config.worker_threads)?;

        let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));

        // 1. Initialize population: mutated copies of the start
        let mut population: Vec<Tour> = (0..config.population_size)
            .map(|_| {
                let mut tour = start.clone();
                config.mutation.apply(&mut tour, &mut rng);
                tour
            })
            .collect();

        let mut best = start.clone();
        let mut best_cost = start.cost(matrix);
        let mut cost_history = Vec::with_capacity(config.generations + 2);
        cost_history.push(best_cost.to_f64());

        info!(
            cities = matrix.size(),
            population = config.population_size,
            generations = config.generations,
            threads = pool.threads(),
            "genetic algorithm started"
        );

        let mut generations = 0;
        let mut cancelled = false;

        // 2. Evolutionary loop
        for gen in 0..config.generations {
            if cancel
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
            {
                cancelled = true;
                break;
            }

            let (next, fittest) = next_generation(matrix, population, config, &pool, &mut rng);
            population = next;

            if fittest.cost < best_cost {
                best = fittest.tour;
                best_cost = fittest.cost;
                emit(&mut progress, gen, best_cost);
            }
            cost_history.push(best_cost.to_f64());
            generations = gen + 1;

            debug!(generation = generations, best = ?best_cost, "generation complete");
        }

        // The last generation's offspring have not been evaluated yet
        if let Some(last_best) = population
            .into_iter()
            .map(|tour| Individual::evaluate(tour, matrix))
            .min_by(|a, b| cmp_cost(&a.cost, &b.cost))
        {
            if last_best.cost < best_cost {
                best = last_best.tour;
                best_cost = last_best.cost;
                emit(&mut progress, generations, best_cost);
            }
            cost_history.push(best_cost.to_f64());
        }

        pool.shutdown();
        info!(cost = ?best_cost, generations, cancelled, "genetic algorithm finished");

        Ok(GaResult {
            best,
            best_cost,
            generations,
            cancelled,
            cost_history,
        })
    }
}

/// Evaluates `population` and assembles the next generation: its elites,
/// cheapest first, followed by freshly bred offspring in task order.
///
/// Returns the next population, `config.population_size` long, together
/// with the cheapest member of the evaluated one.
pub(crate) fn next_generation<C: Cost>(
    matrix: &DistanceMatrix<C>,
    population: Vec<Tour>,
    config: &GaConfig,
    pool: &WorkerPool,
    rng: &mut StdRng,
) -> (Vec<Tour>, Individual<C>) {
    let elitism = config.elitism_count();
    let reproduction = config.reproduction_count();

    // Evaluate, then order the elite prefix
    let mut scored: Vec<Individual<C>> = population
        .into_iter()
        .map(|tour| Individual::evaluate(tour, matrix))
        .collect();
    partial_sort(&mut scored, elitism);
    let fittest = scored[0].clone();

    // Selection
    let costs: Vec<C> = scored.iter().map(|i| i.cost).collect();
    let parents = config
        .selection
        .select(&costs, config.selection_count(), rng);

    // Reproduction on the pool, one independently seeded rng per task
    let seeds: Vec<u64> = (0..reproduction).map(|_| rng.random()).collect();
    let offspring = pool.map(reproduction, |i| {
        let mut task_rng = StdRng::seed_from_u64(seeds[i]);
        breed(matrix, &scored, &parents, config, &mut task_rng)
    });

    scored.truncate(elitism);
    let mut next: Vec<Tour> = scored.into_iter().map(|i| i.tour).collect();
    next.extend(offspring);
    (next, fittest)
}

/// Produces one offspring: crossover or clone, then mutation, then
/// enhancement.
fn breed<C: Cost, R: Rng>(
    matrix: &DistanceMatrix<C>,
    population: &[Individual<C>],
    parents: &[usize],
    config: &GaConfig,
    rng: &mut R,
) -> Tour {
    let first = &population[parents[rng.random_range(0..parents.len())]].tour;
    let mut child = if rng.random_bool(config.crossover_probability) {
        let second = &population[parents[rng.random_range(0..parents.len())]].tour;
        order_crossover(first, second, rng)
    } else {
        first.clone()
    };

    if rng.random_bool(config.mutation_probability) {
        config.mutation.apply(&mut child, rng);
    }

    if rng.random_bool(config.enhancement_probability) {
        // One sweep, not a full climb: the best neighbor replaces the child
        let cost = child.cost(matrix);
        let kind = config.enhancement_neighborhood;
        if let Some((polished, _)) = sweep_best(matrix, &child, cost, kind) {
            child = polished;
        }
    }

    child
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{MutationKind, Selection};
    use crate::neighborhood::NeighborhoodKind;

    fn square() -> DistanceMatrix<u64> {
        DistanceMatrix::from_rows(vec![
            vec![0, 1, 9, 1],
            vec![1, 0, 1, 9],
            vec![9, 1, 0, 1],
            vec![1, 9, 1, 0],
        ])
        .expect("square")
    }

    fn small_config() -> GaConfig {
        GaConfig::default()
            .with_population_size(30)
            .with_generations(40)
            .with_worker_threads(2)
            .with_seed(42)
    }

    #[test]
    fn test_square_optimum() {
        let dm = square();
        let result = GaRunner::run(&dm, &Tour::identity(4), &small_config(), None).expect("valid");
        assert_eq!(result.best_cost, 4);
        assert!(result.best.is_valid());
        assert_eq!(result.generations, 40);
        assert!(!result.cancelled);
    }

    #[test]
    fn test_never_worse_than_start_and_valid() {
        let mut rng = StdRng::seed_from_u64(5);
        let dm = DistanceMatrix::<u64>::random_asymmetric(20, 1..=100, &mut rng).expect("range");
        let start = Tour::identity(20);
        for selection in [Selection::Roulette, Selection::Tournament(3)] {
            for mutation in [MutationKind::Random, MutationKind::CentreInverse] {
                let config = small_config()
                    .with_selection(selection)
                    .with_mutation(mutation)
                    .with_enhancement_probability(0.2)
                    .with_enhancement_neighborhood(NeighborhoodKind::InverseAsymmetric);
                let result = GaRunner::run(&dm, &start, &config, None).expect("valid");
                assert!(result.best.is_valid());
                assert_eq!(result.best.cost(&dm), result.best_cost);
                assert!(result.best_cost <= start.cost(&dm));
            }
        }
    }

    #[test]
    fn test_progress_non_increasing() {
        let mut rng = StdRng::seed_from_u64(8);
        let dm = DistanceMatrix::<u64>::random_symmetric(25, 1..=100, &mut rng).expect("range");
        let start = Tour::identity(25);
        let mut reported = Vec::new();
        let mut sink = |gen: usize, cost: u64| reported.push((gen, cost));
        let result = GaRunner::run(&dm, &start, &small_config(), Some(&mut sink)).expect("valid");

        for w in reported.windows(2) {
            assert!(w[1].1 < w[0].1, "{reported:?}");
            assert!(w[1].0 >= w[0].0);
        }
        for w in result.cost_history.windows(2) {
            assert!(w[1] <= w[0]);
        }
        if let Some(&(_, last)) = reported.last() {
            assert_eq!(last, result.best_cost);
        }
    }

    #[test]
    fn test_deterministic_with_seed() {
        let mut rng = StdRng::seed_from_u64(13);
        let dm = DistanceMatrix::<u64>::random_asymmetric(15, 1..=100, &mut rng).expect("range");
        let start = Tour::identity(15);
        let a = GaRunner::run(&dm, &start, &small_config(), None).expect("valid");
        let b = GaRunner::run(&dm, &start, &small_config().with_worker_threads(3), None)
            .expect("valid");
        assert_eq!(a.best, b.best);
        assert_eq!(a.best_cost, b.best_cost);
        assert_eq!(a.cost_history, b.cost_history);
    }

    #[test]
    fn test_population_size_constant_across_generations() {
        let mut rng = StdRng::seed_from_u64(17);
        let dm = DistanceMatrix::<u64>::random_asymmetric(12, 1..=100, &mut rng).expect("range");
        let pool = WorkerPool::new(2).expect("pool");

        for elitism in [0.0, 0.1, 0.5, 0.9] {
            let config = small_config()
                .with_population_size(25)
                .with_elitism_fraction(elitism);
            assert!(config.validate().is_ok());

            let mut population: Vec<Tour> = (0..config.population_size)
                .map(|_| Tour::identity(12))
                .collect();
            let mut previous_best = u64::MAX;
            for gen in 0..8 {
                let (next, fittest) = next_generation(&dm, population, &config, &pool, &mut rng);
                assert_eq!(
                    next.len(),
                    config.population_size,
                    "elitism {elitism}, generation {gen}"
                );
                assert!(next.iter().all(|t| t.validate_for(&dm).is_ok()));
                assert_eq!(fittest.tour.cost(&dm), fittest.cost);
                if config.elitism_count() > 0 {
                    assert!(fittest.cost <= previous_best);
                }
                previous_best = fittest.cost;
                population = next;
            }
        }
    }

    #[test]
    fn test_cancellation() {
        let dm = square();
        let flag = Arc::new(AtomicBool::new(true));
        let result =
            GaRunner::run_with_cancel(&dm, &Tour::identity(4), &small_config(), None, Some(flag))
                .expect("valid");
        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert_eq!(result.best_cost, 4);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let dm = square();
        let bad = small_config().with_population_size(1);
        assert!(GaRunner::run(&dm, &Tour::identity(4), &bad, None).is_err());
        let err = GaRunner::run(&dm, &Tour::identity(3), &small_config(), None).unwrap_err();
        assert!(matches!(err, TspError::InvalidTour(_)));
        let tiny = DistanceMatrix::<u64>::new(1);
        let err = GaRunner::run(&tiny, &Tour::identity(1), &small_config(), None).unwrap_err();
        assert!(matches!(err, TspError::InvalidMatrix(_)));
    }

    #[test]
    fn test_rejects_symmetric_inverse_enhancement_on_asymmetric_matrix() {
        let mut rng = StdRng::seed_from_u64(31);
        let config = small_config()
            .with_enhancement_probability(1.0)
            .with_enhancement_neighborhood(NeighborhoodKind::InverseSymmetric);
        for _ in 0..20 {
            let dm =
                DistanceMatrix::<u64>::random_asymmetric(8, 1..=1000, &mut rng).expect("range");
            let err = GaRunner::run(&dm, &Tour::identity(8), &config, None).unwrap_err();
            assert!(matches!(err, TspError::InvalidConfig(_)));
        }

        let sym = DistanceMatrix::<u64>::random_symmetric(8, 1..=1000, &mut rng).expect("range");
        let result = GaRunner::run(&sym, &Tour::identity(8), &config, None).expect("valid");
        assert_eq!(result.best.cost(&sym), result.best_cost);
    }
}
