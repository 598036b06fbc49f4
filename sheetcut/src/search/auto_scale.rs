use serde::{Deserialize, Serialize};

use crate::config::{AnnealingConfig, GeneticConfig};

/// Upper complexity bound of a small problem
pub const SMALL_COMPLEXITY: usize = 50;
/// Upper complexity bound of a medium problem
pub const MEDIUM_COMPLEXITY: usize = 200;

/// Size class of a problem, derived from its complexity
/// (number of demand units times number of available stock sheets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemSize {
    Small,
    Medium,
    Large,
}

impl ProblemSize {
    pub fn classify(complexity: usize) -> Self {
        match complexity {
            c if c <= SMALL_COMPLEXITY => ProblemSize::Small,
            c if c <= MEDIUM_COMPLEXITY => ProblemSize::Medium,
            _ => ProblemSize::Large,
        }
    }
}

/// Population size, generation cap and number of elites of the genetic search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneticScale {
    pub population: usize,
    pub generations: usize,
    pub elites: usize,
}

/// Genetic search parameters as a pure function of the problem complexity
pub fn genetic_scale(complexity: usize) -> GeneticScale {
    let c = complexity;
    match ProblemSize::classify(c) {
        ProblemSize::Small => {
            let population = c.clamp(10, 20);
            GeneticScale {
                population,
                generations: (2 * c).clamp(20, 50),
                elites: usize::max(2, population / 10),
            }
        }
        ProblemSize::Medium => {
            let population = (c / 3).clamp(20, 40);
            GeneticScale {
                population,
                generations: c.clamp(30, 100),
                elites: usize::max(3, population / 8),
            }
        }
        ProblemSize::Large => {
            let sqrt_c = (c as f64).sqrt();
            let population = ((sqrt_c * 5.0) as usize).clamp(30, 100);
            GeneticScale {
                population,
                generations: ((sqrt_c * 10.0) as usize).clamp(50, 200),
                elites: usize::max(5, population / 6),
            }
        }
    }
}

/// Applies the configuration on top of the auto-scaled parameters. Explicit overrides always win.
pub fn resolve_genetic(config: &GeneticConfig, complexity: usize) -> GeneticScale {
    let base = match config.auto_scale {
        true => genetic_scale(complexity),
        false => GeneticScale {
            population: 50,
            generations: 100,
            elites: 5,
        },
    };
    let population = config.population_size.unwrap_or(base.population);
    let generations = config.max_generations.unwrap_or(base.generations);
    let elites = match config.elite_fraction {
        Some(f) => (population as f64 * f).round() as usize,
        //keep the same elite proportion when only the population is overridden
        None => base.elites * population / base.population,
    };
    GeneticScale {
        population,
        generations,
        elites: elites.min(population - 1),
    }
}

/// Temperature schedule and iteration budget of simulated annealing.
/// Temperatures are expressed in fitness units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnealingSchedule {
    pub initial_temperature: f64,
    pub final_temperature: f64,
    pub max_iterations: usize,
    pub iterations_per_temperature: usize,
}

/// Annealing schedule as a pure function of the problem complexity
pub fn annealing_schedule(complexity: usize) -> AnnealingSchedule {
    let c = complexity;
    let sqrt_c = (c as f64).sqrt();
    match ProblemSize::classify(c) {
        ProblemSize::Small => AnnealingSchedule {
            initial_temperature: 0.05,
            final_temperature: 1e-4,
            max_iterations: usize::max(100, 10 * c),
            iterations_per_temperature: usize::max(10, c / 2),
        },
        ProblemSize::Medium => AnnealingSchedule {
            initial_temperature: 0.1,
            final_temperature: 5e-4,
            max_iterations: usize::max(300, 5 * c),
            iterations_per_temperature: usize::max(20, c / 5),
        },
        ProblemSize::Large => AnnealingSchedule {
            initial_temperature: 0.2,
            final_temperature: 1e-3,
            max_iterations: usize::max(500, (sqrt_c * 50.0) as usize),
            iterations_per_temperature: usize::max(30, (sqrt_c * 5.0) as usize),
        },
    }
}

pub fn resolve_annealing(config: &AnnealingConfig, complexity: usize) -> AnnealingSchedule {
    let base = match config.auto_scale {
        true => annealing_schedule(complexity),
        false => AnnealingSchedule {
            initial_temperature: 0.1,
            final_temperature: 1e-4,
            max_iterations: 1000,
            iterations_per_temperature: 20,
        },
    };
    let initial_temperature = config
        .initial_temperature
        .unwrap_or(base.initial_temperature);
    AnnealingSchedule {
        initial_temperature,
        final_temperature: config
            .final_temperature
            .unwrap_or(base.final_temperature)
            .min(initial_temperature),
        max_iterations: config.max_iterations.unwrap_or(base.max_iterations),
        iterations_per_temperature: config
            .iterations_per_temperature
            .unwrap_or(base.iterations_per_temperature),
    }
}
