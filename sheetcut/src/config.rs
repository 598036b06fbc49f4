use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CuttingError;
use crate::placement::PlacerKind;
use crate::util::Tolerance;

/// Algorithm used to solve a cutting problem. Dispatched once, at the start of an optimization call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    FirstFit,
    BestFit,
    BottomLeft,
    #[default]
    Genetic,
    SimulatedAnnealing,
    /// Column generation through an external [`ExactSolver`](crate::oracle::ExactSolver),
    /// falls back to [`Algorithm::Genetic`] when unavailable or when the problem is too large.
    Exact,
}

/// Configuration for the optimizer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub algorithm: Algorithm,
    /// Placer used to decode candidates of the search engines
    pub placer: PlacerKind,
    /// Default rotation policy for orders which do not specify one
    pub allow_rotation: bool,
    /// Absolute tolerance for all geometric predicates, in the unit of measurement of the instance
    pub precision_tolerance: f64,
    /// Wall-clock budget of the search engines in seconds
    pub max_computation_time: f64,
    /// Search stops as soon as the utilization of the best candidate reaches this value.
    /// If undefined, the search only stops on convergence, time or generation limits
    pub target_efficiency: Option<f64>,
    /// Seed for the PRNG. If undefined, the algorithm will run in non-deterministic mode using entropy
    pub prng_seed: Option<u64>,
    /// Maximum number of feasible options evaluated by the best-fit placer per unit
    pub best_fit_sample: usize,
    pub fitness: FitnessWeights,
    pub genetic: GeneticConfig,
    pub annealing: AnnealingConfig,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Genetic,
            placer: PlacerKind::BottomLeft,
            allow_rotation: true,
            precision_tolerance: 1e-3,
            max_computation_time: 60.0,
            target_efficiency: Some(0.99),
            prng_seed: Some(0),
            best_fit_sample: 64,
            fitness: FitnessWeights::default(),
            genetic: GeneticConfig::default(),
            annealing: AnnealingConfig::default(),
        }
    }
}

impl OptimizerConfig {
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn tolerance(&self) -> Tolerance {
        Tolerance(self.precision_tolerance)
    }

    /// Wall-clock budget of the search engines, saturated at [`Duration::MAX`].
    pub fn time_budget(&self) -> Duration {
        Duration::try_from_secs_f64(self.max_computation_time).unwrap_or(Duration::MAX)
    }

    /// Rejects configurations that would make the search meaningless, before any work is done.
    pub fn validate(&self) -> Result<(), CuttingError> {
        let invalid = |msg: String| Err(CuttingError::InvalidConfig(msg));

        if !(self.precision_tolerance.is_finite() && self.precision_tolerance > 0.0) {
            return invalid(format!(
                "precision_tolerance must be positive, got {}",
                self.precision_tolerance
            ));
        }
        if !(self.max_computation_time.is_finite() && self.max_computation_time > 0.0) {
            return invalid(format!(
                "max_computation_time must be positive, got {}",
                self.max_computation_time
            ));
        }
        if Duration::try_from_secs_f64(self.max_computation_time).is_err() {
            return invalid(format!(
                "max_computation_time of {}s is too large to be represented",
                self.max_computation_time
            ));
        }
        if let Some(target) = self.target_efficiency {
            if !(target > 0.0 && target <= 1.0) {
                return invalid(format!("target_efficiency must be in (0, 1], got {target}"));
            }
        }
        if self.best_fit_sample == 0 {
            return invalid("best_fit_sample must be at least 1".into());
        }
        self.fitness.validate()?;
        self.genetic.validate()?;
        self.annealing.validate()
    }
}

/// Weights of the fitness function:
/// `utilization * w_util - waste_fraction * w_waste - unplaced_fraction * w_unplaced`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FitnessWeights {
    pub utilization: f64,
    pub waste: f64,
    pub unplaced: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            utilization: 0.7,
            waste: 0.1,
            unplaced: 0.2,
        }
    }
}

impl FitnessWeights {
    fn validate(&self) -> Result<(), CuttingError> {
        let weights = [self.utilization, self.waste, self.unplaced];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(CuttingError::InvalidConfig(format!(
                "fitness weights must be non-negative, got {weights:?}"
            )));
        }
        if self.utilization == 0.0 {
            return Err(CuttingError::InvalidConfig(
                "the utilization weight must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Proportions of the initial population built by each seeding strategy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SeedingMix {
    /// Deterministic greedy orderings (descending area and alternative keys)
    pub greedy: f64,
    /// Greedy orderings perturbed by a few local swaps
    pub semi_random: f64,
    /// Uniformly random permutations
    pub random: f64,
}

impl Default for SeedingMix {
    fn default() -> Self {
        Self {
            greedy: 0.3,
            semi_random: 0.4,
            random: 0.3,
        }
    }
}

/// Configuration of the genetic search engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticConfig {
    /// Derive population size, generation cap and elite count from the problem size
    pub auto_scale: bool,
    /// Overrides the (auto-scaled) population size
    pub population_size: Option<usize>,
    /// Overrides the (auto-scaled) generation cap
    pub max_generations: Option<usize>,
    /// Overrides the (auto-scaled) fraction of the population carried over unchanged
    pub elite_fraction: Option<f64>,
    /// Mutation probability at the first generation
    pub mutation_rate: f64,
    /// Mutation probability reached at the generation cap, decaying linearly
    pub final_mutation_rate: f64,
    pub crossover_rate: f64,
    pub tournament_size: usize,
    /// Number of generations without improvement after which the search has converged
    pub patience: usize,
    /// Smallest fitness increase that counts as an improvement
    pub min_improvement: f64,
    pub seeding: SeedingMix,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            auto_scale: true,
            population_size: None,
            max_generations: None,
            elite_fraction: None,
            mutation_rate: 0.1,
            final_mutation_rate: 0.01,
            crossover_rate: 0.8,
            tournament_size: 3,
            patience: 15,
            min_improvement: 1e-6,
            seeding: SeedingMix::default(),
        }
    }
}

impl GeneticConfig {
    fn validate(&self) -> Result<(), CuttingError> {
        let invalid = |msg: String| Err(CuttingError::InvalidConfig(msg));
        for (name, rate) in [
            ("mutation_rate", self.mutation_rate),
            ("final_mutation_rate", self.final_mutation_rate),
            ("crossover_rate", self.crossover_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return invalid(format!("{name} must be in [0, 1], got {rate}"));
            }
        }
        if let Some(f) = self.elite_fraction {
            if !(0.0..1.0).contains(&f) {
                return invalid(format!("elite_fraction must be in [0, 1), got {f}"));
            }
        }
        if self.population_size.is_some_and(|p| p < 2) {
            return invalid("population_size must be at least 2".into());
        }
        if self.max_generations == Some(0) {
            return invalid("max_generations must be at least 1".into());
        }
        if self.tournament_size == 0 {
            return invalid("tournament_size must be at least 1".into());
        }
        let SeedingMix {
            greedy,
            semi_random,
            random,
        } = self.seeding;
        if [greedy, semi_random, random]
            .iter()
            .any(|p| !p.is_finite() || *p < 0.0)
            || greedy + semi_random + random <= 0.0
        {
            return invalid(format!("invalid seeding mix: {:?}", self.seeding));
        }
        if !(self.min_improvement.is_finite() && self.min_improvement >= 0.0) {
            return invalid(format!(
                "min_improvement must be non-negative, got {}",
                self.min_improvement
            ));
        }
        Ok(())
    }
}

/// Configuration of the simulated annealing search engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingConfig {
    /// Derive the temperature schedule and iteration budget from the problem size
    pub auto_scale: bool,
    /// Overrides the (auto-scaled) starting temperature
    pub initial_temperature: Option<f64>,
    /// Overrides the (auto-scaled) final temperature
    pub final_temperature: Option<f64>,
    /// Overrides the (auto-scaled) total number of iterations
    pub max_iterations: Option<usize>,
    /// Overrides the (auto-scaled) number of iterations per temperature step
    pub iterations_per_temperature: Option<usize>,
    /// Geometric cooling factor applied after every temperature step
    pub cooling_rate: f64,
    /// Number of temperature steps without improvement after which the search has converged
    pub patience: usize,
    /// Smallest fitness increase that counts as an improvement
    pub min_improvement: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            auto_scale: true,
            initial_temperature: None,
            final_temperature: None,
            max_iterations: None,
            iterations_per_temperature: None,
            cooling_rate: 0.95,
            patience: 20,
            min_improvement: 1e-6,
        }
    }
}

impl AnnealingConfig {
    fn validate(&self) -> Result<(), CuttingError> {
        let invalid = |msg: String| Err(CuttingError::InvalidConfig(msg));
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return invalid(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            ));
        }
        let t0 = self.initial_temperature;
        let t_min = self.final_temperature;
        for t in [t0, t_min].into_iter().flatten() {
            if !(t.is_finite() && t > 0.0) {
                return invalid(format!("temperatures must be positive, got {t}"));
            }
        }
        if let (Some(t0), Some(t_min)) = (t0, t_min) {
            if t_min >= t0 {
                return invalid(format!(
                    "final_temperature ({t_min}) must be below initial_temperature ({t0})"
                ));
            }
        }
        if self.max_iterations == Some(0) || self.iterations_per_temperature == Some(0) {
            return invalid("iteration budgets must be at least 1".into());
        }
        if !(self.min_improvement.is_finite() && self.min_improvement >= 0.0) {
            return invalid(format!(
                "min_improvement must be non-negative, got {}",
                self.min_improvement
            ));
        }
        Ok(())
    }
}
