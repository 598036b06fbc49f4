use std::time::Instant;

use log::{debug, info};
use rand::Rng;
use rand::prelude::SmallRng;
use thousands::Separable;

use crate::config::OptimizerConfig;
use crate::entities::Instance;
use crate::search::auto_scale::{AnnealingSchedule, resolve_annealing};
use crate::search::{Candidate, Fitness, SearchReport, SearchState, SearchStats, Termination};

/// Simulated annealing over the same encoding, fitness and decoder as the genetic search.
/// A single candidate walks through its neighborhood (one mutation per step), accepting worse
/// neighbors with the Metropolis probability `exp(delta / temperature)`.
pub struct AnnealingSearch<'a> {
    instance: &'a Instance,
    config: &'a OptimizerConfig,
    schedule: AnnealingSchedule,
    rng: SmallRng,
    state: SearchState,
    evaluations: usize,
}

impl<'a> AnnealingSearch<'a> {
    pub fn new(instance: &'a Instance, config: &'a OptimizerConfig, rng: SmallRng) -> Self {
        let schedule = resolve_annealing(&config.annealing, instance.complexity());
        Self {
            instance,
            config,
            schedule,
            rng,
            state: SearchState::Initializing,
            evaluations: 0,
        }
    }

    pub fn schedule(&self) -> AnnealingSchedule {
        self.schedule
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    fn evaluate(&mut self, candidate: &Candidate) -> Fitness {
        self.evaluations += 1;
        let outcome = candidate.decode(
            self.instance,
            self.config.placer,
            self.config.best_fit_sample,
        );
        Fitness::evaluate(self.instance, &outcome, &self.config.fitness)
    }

    pub fn run(&mut self) -> SearchReport {
        let start = Instant::now();
        let config = self.config;
        let ac = &config.annealing;
        let budget = config.time_budget();
        let schedule = self.schedule;

        info!(
            "[SA] starting search: complexity {}, temperature {} -> {}, {} iterations ({} per step)",
            self.instance.complexity().separate_with_commas(),
            schedule.initial_temperature,
            schedule.final_temperature,
            schedule.max_iterations.separate_with_commas(),
            schedule.iterations_per_temperature
        );

        self.state = SearchState::Initializing;
        let mut current = Candidate::greedy(self.instance);
        let mut current_fitness = self.evaluate(&current);
        let mut best = (current.clone(), current_fitness);
        let mut history = vec![current_fitness.value()];

        let mut temperature = schedule.initial_temperature;
        let mut iterations = 0;
        let mut step = 0;
        let mut stagnant = 0;

        let termination = loop {
            if config
                .target_efficiency
                .is_some_and(|target| best.1.utilization >= target)
            {
                break Termination::TargetReached;
            }
            if start.elapsed() >= budget {
                break Termination::TimeExpired;
            }
            if stagnant >= ac.patience {
                break Termination::Converged;
            }
            if iterations >= schedule.max_iterations || temperature < schedule.final_temperature {
                break Termination::GenerationLimit;
            }

            step += 1;
            self.state = SearchState::Evolving { generation: step };
            let best_before = best.1.value();

            for _ in 0..schedule.iterations_per_temperature {
                if iterations >= schedule.max_iterations {
                    break;
                }
                iterations += 1;

                let mut neighbor = current.clone();
                neighbor.mutate(self.instance, &mut self.rng);
                let neighbor_fitness = self.evaluate(&neighbor);

                let delta = neighbor_fitness.value() - current_fitness.value();
                let accept = delta >= 0.0 || self.rng.random::<f64>() < (delta / temperature).exp();
                if accept {
                    current = neighbor;
                    current_fitness = neighbor_fitness;
                    if current_fitness.value > best.1.value {
                        best = (current.clone(), current_fitness);
                    }
                }
            }

            match best.1.value() - best_before > ac.min_improvement {
                true => stagnant = 0,
                false => stagnant += 1,
            }
            history.push(best.1.value());
            temperature *= ac.cooling_rate;

            debug!(
                "[SA] step {step}: temperature {temperature:.6}, current {:.5}, best {:.5}",
                current_fitness.value(),
                best.1.value()
            );
        };

        self.state = SearchState::Finished(termination);
        info!(
            "[SA] {termination:?} after {step} temperature steps and {} evaluations in {:.3}ms, best fitness {:.5} (utilization {:.3}%)",
            self.evaluations.separate_with_commas(),
            start.elapsed().as_secs_f64() * 1000.0,
            best.1.value(),
            best.1.utilization * 100.0
        );

        let (best, best_fitness) = best;
        SearchReport {
            best,
            best_fitness,
            termination,
            stats: SearchStats {
                generations: step,
                evaluations: self.evaluations,
                best_history: history,
            },
        }
    }
}
