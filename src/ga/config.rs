//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use super::operators::MutationKind;
use super::selection::Selection;
use crate::error::{Result, TspError};
use crate::neighborhood::NeighborhoodKind;

/// Configuration for the genetic algorithm.
///
/// # Defaults
///
/// ```
/// use u_tsp::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.generations, 1000);
/// assert_eq!(config.elitism_count(), 5);
/// assert_eq!(config.selection_count(), 50);
/// assert_eq!(config.reproduction_count(), 95);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_tsp::ga::{GaConfig, MutationKind, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_selection(Selection::Tournament(4))
///     .with_mutation(MutationKind::ReverseSequence)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of tours in every generation.
    pub population_size: usize,

    /// Number of generations to run.
    pub generations: usize,

    /// Fraction of the population drawn into the parent pool (0.0–1.0).
    pub selection_fraction: f64,

    /// Fraction of the population copied unchanged into the next
    /// generation, cheapest first (0.0–1.0).
    pub elitism_fraction: f64,

    /// Probability that an offspring comes from order crossover rather
    /// than a copy of one parent.
    pub crossover_probability: f64,

    /// Probability that an offspring is mutated.
    pub mutation_probability: f64,

    /// Probability that an offspring gets one hill-climbing sweep.
    pub enhancement_probability: f64,

    /// Worker threads producing offspring; `0` uses every available core.
    pub worker_threads: usize,

    /// Parent selection strategy.
    pub selection: Selection,

    /// Mutation operator.
    pub mutation: MutationKind,

    /// Neighborhood swept by the enhancement step.
    pub enhancement_neighborhood: NeighborhoodKind,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 1000,
            selection_fraction: 0.5,
            elitism_fraction: 0.05,
            crossover_probability: 0.25,
            mutation_probability: 0.9,
            enhancement_probability: 0.05,
            worker_threads: 0,
            selection: Selection::default(),
            mutation: MutationKind::default(),
            enhancement_neighborhood: NeighborhoodKind::Swap,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the selection fraction.
    pub fn with_selection_fraction(mut self, fraction: f64) -> Self {
        self.selection_fraction = fraction;
        self
    }

    /// Sets the elitism fraction.
    pub fn with_elitism_fraction(mut self, fraction: f64) -> Self {
        self.elitism_fraction = fraction;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p;
        self
    }

    /// Sets the enhancement probability.
    pub fn with_enhancement_probability(mut self, p: f64) -> Self {
        self.enhancement_probability = p;
        self
    }

    /// Sets the number of worker threads (0 = all cores).
    pub fn with_worker_threads(mut self, n: usize) -> Self {
        self.worker_threads = n;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Sets the mutation operator.
    pub fn with_mutation(mut self, kind: MutationKind) -> Self {
        self.mutation = kind;
        self
    }

    /// Sets the enhancement neighborhood.
    pub fn with_enhancement_neighborhood(mut self, kind: NeighborhoodKind) -> Self {
        self.enhancement_neighborhood = kind;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Tours carried over unchanged: `floor(population_size * elitism_fraction)`.
    pub fn elitism_count(&self) -> usize {
        (self.population_size as f64 * self.elitism_fraction) as usize
    }

    /// Offspring produced per generation.
    pub fn reproduction_count(&self) -> usize {
        self.population_size.saturating_sub(self.elitism_count())
    }

    /// Size of the parent pool: `floor(population_size * selection_fraction)`.
    pub fn selection_count(&self) -> usize {
        (self.population_size as f64 * self.selection_fraction) as usize
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(TspError::InvalidConfig(
                "population_size must be at least 2".into(),
            ));
        }
        if self.generations == 0 {
            return Err(TspError::InvalidConfig(
                "generations must be at least 1".into(),
            ));
        }
        for (name, value) in [
            ("selection_fraction", self.selection_fraction),
            ("elitism_fraction", self.elitism_fraction),
            ("crossover_probability", self.crossover_probability),
            ("mutation_probability", self.mutation_probability),
            ("enhancement_probability", self.enhancement_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TspError::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }
        if self.selection_count() == 0 {
            return Err(TspError::InvalidConfig(
                "selection_fraction selects no parents".into(),
            ));
        }
        if self.elitism_count() >= self.population_size {
            return Err(TspError::InvalidConfig(
                "elitism_fraction too high: elites fill entire population".into(),
            ));
        }
        if self.selection == Selection::Tournament(0) {
            return Err(TspError::InvalidConfig(
                "tournament size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.generations, 1000);
        assert!((config.selection_fraction - 0.5).abs() < 1e-10);
        assert!((config.elitism_fraction - 0.05).abs() < 1e-10);
        assert!((config.crossover_probability - 0.25).abs() < 1e-10);
        assert!((config.mutation_probability - 0.9).abs() < 1e-10);
        assert!((config.enhancement_probability - 0.05).abs() < 1e-10);
        assert_eq!(config.worker_threads, 0);
        assert_eq!(config.selection, Selection::Roulette);
        assert_eq!(config.mutation, MutationKind::Random);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_population_size(40)
            .with_generations(20)
            .with_selection_fraction(0.25)
            .with_elitism_fraction(0.1)
            .with_crossover_probability(0.5)
            .with_mutation_probability(0.3)
            .with_enhancement_probability(0.0)
            .with_worker_threads(2)
            .with_selection(Selection::Tournament(3))
            .with_mutation(MutationKind::Swap)
            .with_enhancement_neighborhood(NeighborhoodKind::InverseAsymmetric)
            .with_seed(42);

        assert_eq!(config.population_size, 40);
        assert_eq!(config.generations, 20);
        assert_eq!(config.selection_count(), 10);
        assert_eq!(config.elitism_count(), 4);
        assert_eq!(config.reproduction_count(), 36);
        assert_eq!(config.worker_threads, 2);
        assert_eq!(config.selection, Selection::Tournament(3));
        assert_eq!(config.mutation, MutationKind::Swap);
        assert_eq!(
            config.enhancement_neighborhood,
            NeighborhoodKind::InverseAsymmetric
        );
        assert_eq!(config.seed, Some(42));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = GaConfig::default().with_population_size(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_generations() {
        assert!(GaConfig::default().with_generations(0).validate().is_err());
    }

    #[test]
    fn test_validate_probabilities() {
        assert!(GaConfig::default()
            .with_mutation_probability(1.5)
            .validate()
            .is_err());
        assert!(GaConfig::default()
            .with_crossover_probability(-0.1)
            .validate()
            .is_err());
        assert!(GaConfig::default()
            .with_enhancement_probability(2.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_empty_selection() {
        let config = GaConfig::default()
            .with_population_size(10)
            .with_selection_fraction(0.05);
        assert_eq!(config.selection_count(), 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_elitism_too_high() {
        let config = GaConfig::default()
            .with_population_size(10)
            .with_elitism_fraction(1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_tournament_zero() {
        let config = GaConfig::default().with_selection(Selection::Tournament(0));
        assert!(config.validate().is_err());
    }
}
