use std::cmp::Reverse;
use std::time::Instant;

use itertools::Itertools;
use log::{debug, info};
use ordered_float::OrderedFloat;
use rand::Rng;
use rand::prelude::SmallRng;
use rayon::prelude::*;
use thousands::Separable;

use crate::config::OptimizerConfig;
use crate::entities::Instance;
use crate::search::auto_scale::{GeneticScale, resolve_genetic};
use crate::search::candidate::random_orientations;
use crate::search::{Candidate, Fitness, SearchReport, SearchState, SearchStats, Termination};

/// An evaluated member of the population
#[derive(Debug, Clone)]
struct Individual {
    candidate: Candidate,
    fitness: Fitness,
}

/// A member of the next generation. Candidates copied unchanged keep their fitness.
struct Offspring {
    candidate: Candidate,
    fitness: Option<Fitness>,
}

/// Genetic search over permutations of demand units, decoded by a greedy placer.
pub struct GeneticSearch<'a> {
    instance: &'a Instance,
    config: &'a OptimizerConfig,
    scale: GeneticScale,
    /// SmallRng is a fast, non-cryptographic PRNG <https://rust-random.github.io/book/guide-rngs.html>
    rng: SmallRng,
    state: SearchState,
    evaluations: usize,
}

impl<'a> GeneticSearch<'a> {
    pub fn new(instance: &'a Instance, config: &'a OptimizerConfig, rng: SmallRng) -> Self {
        let scale = resolve_genetic(&config.genetic, instance.complexity());
        Self {
            instance,
            config,
            scale,
            rng,
            state: SearchState::Initializing,
            evaluations: 0,
        }
    }

    pub fn scale(&self) -> GeneticScale {
        self.scale
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn run(&mut self) -> SearchReport {
        let start = Instant::now();
        let config = self.config;
        let budget = config.time_budget();
        let gc = &config.genetic;

        info!(
            "[GA] starting search: complexity {}, population {}, max {} generations, {} elites",
            self.instance.complexity().separate_with_commas(),
            self.scale.population,
            self.scale.generations,
            self.scale.elites
        );

        self.state = SearchState::Initializing;
        let seeds = self.seed_population();
        let mut population = self.evaluate(seeds);
        let mut best = fittest(&population).clone();
        let mut history = vec![best.fitness.value()];
        let mut stagnant = 0;
        let mut generation = 0;

        let termination = loop {
            if config
                .target_efficiency
                .is_some_and(|target| best.fitness.utilization >= target)
            {
                break Termination::TargetReached;
            }
            if start.elapsed() >= budget {
                break Termination::TimeExpired;
            }
            if stagnant >= gc.patience {
                break Termination::Converged;
            }
            if generation >= self.scale.generations {
                break Termination::GenerationLimit;
            }

            generation += 1;
            self.state = SearchState::Evolving { generation };

            let offspring = self.next_generation(&population, generation);
            population = self.evaluate(offspring);

            let gen_best = fittest(&population);
            match gen_best.fitness.value() - best.fitness.value() > gc.min_improvement {
                true => stagnant = 0,
                false => stagnant += 1,
            }
            if gen_best.fitness.value > best.fitness.value {
                best = gen_best.clone();
            }
            history.push(best.fitness.value());

            debug!(
                "[GA] generation {generation}: best {:.5} (utilization {:.3}%, {} unplaced), generation best {:.5}",
                best.fitness.value(),
                best.fitness.utilization * 100.0,
                best.fitness.n_unplaced,
                gen_best.fitness.value()
            );
        };

        self.state = SearchState::Finished(termination);
        info!(
            "[GA] {termination:?} after {generation} generations and {} evaluations in {:.3}ms, best fitness {:.5} (utilization {:.3}%)",
            self.evaluations.separate_with_commas(),
            start.elapsed().as_secs_f64() * 1000.0,
            best.fitness.value(),
            best.fitness.utilization * 100.0
        );

        SearchReport {
            best: best.candidate,
            best_fitness: best.fitness,
            termination,
            stats: SearchStats {
                generations: generation,
                evaluations: self.evaluations,
                best_history: history,
            },
        }
    }

    /// Mix of greedy orderings, perturbed greedy orderings and random permutations.
    fn seed_population(&mut self) -> Vec<Offspring> {
        let pop_size = self.scale.population;
        let mix = self.config.genetic.seeding;
        let total = mix.greedy + mix.semi_random + mix.random;
        let n_greedy = (((pop_size as f64) * mix.greedy / total).round() as usize).clamp(1, pop_size);
        let n_semi = (((pop_size as f64) * mix.semi_random / total).round() as usize)
            .min(pop_size - n_greedy);
        let n_random = pop_size - n_greedy - n_semi;

        let instance = self.instance;
        let n_units = instance.n_units();
        let greedy_orders = greedy_orderings(instance);

        let greedy = (0..n_greedy).map(|i| {
            let sequence = greedy_orders[i % greedy_orders.len()].clone();
            //later rounds through the orderings prefer the other orientations
            let round = i / greedy_orders.len();
            let orientations = (0..n_units)
                .map(|uid| (round % instance.n_orientations(uid)) as u8)
                .collect();
            Candidate::new(sequence, orientations)
        });
        let mut seeds = greedy.collect_vec();

        let n_swaps = usize::max(1, n_units / 5);
        for _ in 0..n_semi {
            let mut sequence = greedy_orders[0].clone();
            if n_units >= 2 {
                for _ in 0..n_swaps {
                    let i = self.rng.random_range(0..n_units - 1);
                    sequence.swap(i, i + 1);
                }
            }
            let orientations = random_orientations(instance, &mut self.rng);
            seeds.push(Candidate::new(sequence, orientations));
        }

        for _ in 0..n_random {
            seeds.push(Candidate::random(instance, &mut self.rng));
        }

        debug!("[GA] seeded population: {n_greedy} greedy, {n_semi} semi-random, {n_random} random");

        seeds
            .into_iter()
            .map(|candidate| Offspring {
                candidate,
                fitness: None,
            })
            .collect()
    }

    /// Decodes and evaluates all offspring without a known fitness, in parallel.
    fn evaluate(&mut self, offspring: Vec<Offspring>) -> Vec<Individual> {
        let (instance, config) = (self.instance, self.config);
        self.evaluations += offspring.iter().filter(|o| o.fitness.is_none()).count();

        offspring
            .into_par_iter()
            .map(|Offspring { candidate, fitness }| {
                let fitness = fitness.unwrap_or_else(|| {
                    let outcome =
                        candidate.decode(instance, config.placer, config.best_fit_sample);
                    Fitness::evaluate(instance, &outcome, &config.fitness)
                });
                Individual { candidate, fitness }
            })
            .collect()
    }

    fn next_generation(&mut self, population: &[Individual], generation: usize) -> Vec<Offspring> {
        let config = self.config;
        let gc = &config.genetic;
        let progress = (generation as f64 / self.scale.generations.max(1) as f64).min(1.0);
        let mutation_rate =
            gc.mutation_rate + (gc.final_mutation_rate - gc.mutation_rate) * progress;

        let elites = population
            .iter()
            .sorted_by_key(|ind| Reverse(ind.fitness.value))
            .take(self.scale.elites)
            .map(|ind| Offspring {
                candidate: ind.candidate.clone(),
                fitness: Some(ind.fitness),
            });

        let mut next = elites.collect_vec();
        while next.len() < self.scale.population {
            let p1 = self.tournament_select(population);
            let p2 = self.tournament_select(population);

            let (mut child, mut changed) = match self.rng.random_bool(gc.crossover_rate) {
                true => (p1.candidate.crossover(&p2.candidate, &mut self.rng), true),
                false => (p1.candidate.clone(), false),
            };
            if self.rng.random_bool(mutation_rate) {
                child.mutate(self.instance, &mut self.rng);
                changed = true;
            }

            let fitness = match changed {
                true => None,
                false => Some(p1.fitness),
            };
            next.push(Offspring {
                candidate: child,
                fitness,
            });
        }
        next
    }

    fn tournament_select<'p>(&mut self, population: &'p [Individual]) -> &'p Individual {
        (0..self.config.genetic.tournament_size)
            .map(|_| &population[self.rng.random_range(0..population.len())])
            .max_by_key(|ind| ind.fitness.value)
            .unwrap_or(&population[0])
    }
}

/// Fittest individual, the first one among equals
fn fittest(population: &[Individual]) -> &Individual {
    population
        .iter()
        .rev()
        .max_by_key(|ind| ind.fitness.value)
        .unwrap_or(&population[0])
}

/// Greedy sequences used to seed the population: descending area, priority then area,
/// longest side and height.
fn greedy_orderings(instance: &Instance) -> Vec<Vec<usize>> {
    let dims = |uid: usize| {
        let order_idx = instance.unit(uid).order_idx;
        let o = &instance.orientations(order_idx)[0];
        (o.width, o.height)
    };
    let area = |uid: usize| OrderedFloat(instance.unit_area(uid));
    let priority = |uid: usize| instance.order(instance.unit(uid).order_idx).priority;

    vec![
        instance.greedy_sequence(),
        instance.sequence_by(|uid| (Reverse(priority(uid)), Reverse(area(uid)))),
        instance.sequence_by(|uid| {
            let (w, h) = dims(uid);
            (Reverse(OrderedFloat(f64::max(w, h))), Reverse(area(uid)))
        }),
        instance.sequence_by(|uid| {
            let (w, h) = dims(uid);
            (Reverse(OrderedFloat(h)), Reverse(OrderedFloat(w)))
        }),
    ]
}
