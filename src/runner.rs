//! Batch execution of independent searches.
//!
//! A [`Runner`] pairs a starting strategy with one search algorithm and
//! repeats it `runs` times on a [`WorkerPool`], each run with its own seed
//! derived from the batch seed.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::climb::HillClimber;
use crate::cost::{cmp_cost, Cost};
use crate::error::{Result, TspError};
use crate::ga::{GaConfig, GaRunner};
use crate::matrix::DistanceMatrix;
use crate::neighborhood::NeighborhoodKind;
use crate::pool::WorkerPool;
use crate::start::StartStrategy;
use crate::tabu::{TabuConfig, TabuRunner};
use crate::tour::Tour;

/// Search applied to the starting tour.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    /// Return the starting tour unchanged.
    Start,
    /// Hill climbing over the given neighborhood.
    Climb(NeighborhoodKind),
    /// Taboo search.
    Tabu(TabuConfig),
    /// Genetic algorithm. The per-run seed replaces `GaConfig::seed`.
    Genetic(GaConfig),
}

/// Batch parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunnerConfig {
    /// Number of independent runs.
    pub runs: usize,
    /// Worker threads shared by the runs; `0` uses every available core.
    pub threads: usize,
    /// Batch seed. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            runs: 1,
            threads: 0,
            seed: None,
        }
    }
}

impl RunnerConfig {
    /// Sets the number of runs.
    pub fn with_runs(mut self, n: usize) -> Self {
        self.runs = n;
        self
    }

    /// Sets the number of worker threads.
    pub fn with_threads(mut self, n: usize) -> Self {
        self.threads = n;
        self
    }

    /// Sets the batch seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.runs == 0 {
            return Err(TspError::InvalidConfig("runs must be at least 1".into()));
        }
        Ok(())
    }
}

/// Outcome of one run.
#[derive(Debug, Clone)]
pub struct RunOutcome<C> {
    /// Seed the run was started with.
    pub seed: u64,
    /// Best tour of the run.
    pub tour: Tour,
    /// Its cost.
    pub cost: C,
    /// Wall-clock time of the run, including the starting tour.
    pub elapsed: Duration,
}

/// All runs of a batch.
#[derive(Debug, Clone)]
pub struct RunReport<C> {
    /// Outcomes in run order.
    pub runs: Vec<RunOutcome<C>>,
    /// Index of the cheapest run; ties go to the earliest.
    pub best_index: usize,
}

impl<C> RunReport<C> {
    /// The cheapest run.
    pub fn best(&self) -> &RunOutcome<C> {
        &self.runs[self.best_index]
    }
}

/// Runs one algorithm repeatedly with independent seeds.
///
/// # Examples
///
/// ```
/// use u_tsp::runner::{Algorithm, Runner, RunnerConfig};
/// use u_tsp::start::StartStrategy;
/// use u_tsp::{DistanceMatrix, NeighborhoodKind};
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0u64, 1, 9, 1],
///     vec![1, 0, 1, 9],
///     vec![9, 1, 0, 1],
///     vec![1, 9, 1, 0],
/// ])
/// .unwrap();
/// let runner = Runner::new(
///     Algorithm::Climb(NeighborhoodKind::Swap),
///     StartStrategy::Random,
///     RunnerConfig::default().with_runs(4).with_threads(2).with_seed(1),
/// );
/// let report = runner.run(&dm).unwrap();
/// assert_eq!(report.runs.len(), 4);
/// assert_eq!(report.best().cost, 4);
/// ```
#[derive(Debug, Clone)]
pub struct Runner {
    algorithm: Algorithm,
    start: StartStrategy,
    config: RunnerConfig,
}

impl Runner {
    /// Creates a runner.
    pub fn new(algorithm: Algorithm, start: StartStrategy, config: RunnerConfig) -> Self {
        Self {
            algorithm,
            start,
            config,
        }
    }

    /// Executes every run and collects the outcomes.
    ///
    /// Fails if any configuration is invalid, the algorithm's neighborhood
    /// cannot price moves exactly on `matrix`, or any run fails.
    pub fn run<C: Cost>(&self, matrix: &DistanceMatrix<C>) -> Result<RunReport<C>> {
        self.config.validate()?;
        match &self.algorithm {
            Algorithm::Start => {}
            Algorithm::Climb(kind) => kind.check_matrix(matrix)?,
            Algorithm::Tabu(config) => {
                config.validate()?;
                config.neighborhood.check_matrix(matrix)?;
            }
            Algorithm::Genetic(config) => {
                config.validate()?;
                config.enhancement_neighborhood.check_matrix(matrix)?;
            }
        }

        let pool = WorkerPool::new(self.config.threads)?;
        let mut rng = StdRng::seed_from_u64(self.config.seed.unwrap_or_else(rand::random));
        let seeds: Vec<u64> = (0..self.config.runs).map(|_| rng.random()).collect();

        info!(
            runs = self.config.runs,
            threads = pool.threads(),
            algorithm = ?self.algorithm,
            start = ?self.start,
            "batch started"
        );

        let runs = pool
            .map(self.config.runs, |i| self.run_once(matrix, seeds[i]))
            .into_iter()
            .collect::<Result<Vec<_>>>()?;
        pool.shutdown();

        let best_index = runs
            .iter()
            .enumerate()
            .min_by(|(i, a), (j, b)| cmp_cost(&a.cost, &b.cost).then(i.cmp(j)))
            .map(|(i, _)| i)
            .ok_or(TspError::NoSolution)?;

        info!(best = ?runs[best_index].cost, best_index, "batch finished");
        Ok(RunReport { runs, best_index })
    }

    fn run_once<C: Cost>(&self, matrix: &DistanceMatrix<C>, seed: u64) -> Result<RunOutcome<C>> {
        let started = Instant::now();
        let mut rng = StdRng::seed_from_u64(seed);
        let start = self.start.build(matrix, &mut rng)?;

        let (tour, cost) = match &self.algorithm {
            Algorithm::Start => {
                let cost = start.cost(matrix);
                (start, cost)
            }
            Algorithm::Climb(kind) => {
                let result = HillClimber::new(*kind).climb(matrix, &start)?;
                (result.tour, result.cost)
            }
            Algorithm::Tabu(config) => {
                let result = TabuRunner::run(matrix, &start, config, None)?;
                (result.best, result.best_cost)
            }
            Algorithm::Genetic(config) => {
                let config = config.clone().with_seed(rng.random());
                let result = GaRunner::run(matrix, &start, &config, None)?;
                (result.best, result.best_cost)
            }
        };

        Ok(RunOutcome {
            seed,
            tour,
            cost,
            elapsed: started.elapsed(),
        })
    }
}
