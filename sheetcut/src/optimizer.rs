use std::time::Instant;

use log::{info, warn};
use rand::SeedableRng;
use rand::prelude::SmallRng;
use thousands::Separable;

use crate::config::{Algorithm, OptimizerConfig};
use crate::entities::{Instance, Order, Stock};
use crate::error::CuttingError;
use crate::oracle::{self, EXACT_COMPLEXITY_LIMIT, ExactSolver};
use crate::placement::{PlacementOutcome, PlacerKind};
use crate::result::{CuttingResult, Provenance, ResultAssembler};
use crate::search::annealing::AnnealingSearch;
use crate::search::genetic::GeneticSearch;
use crate::search::{Candidate, SearchReport, SearchStats};

/// Places the orders onto the stock sheets with the configured algorithm.
/// Shorthand for `Optimizer::new(config.clone()).optimize(stocks, orders)`.
pub fn optimize(
    stocks: &[Stock],
    orders: &[Order],
    config: &OptimizerConfig,
) -> Result<CuttingResult, CuttingError> {
    Optimizer::new(config.clone()).optimize(stocks, orders)
}

/// Entry point of the engine. Holds no state between calls, concurrent calls are independent.
pub struct Optimizer {
    config: OptimizerConfig,
    exact_solver: Option<Box<dyn ExactSolver>>,
}

impl Optimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Optimizer {
            config,
            exact_solver: None,
        }
    }

    /// Registers the solver consulted when [`Algorithm::Exact`] is configured
    pub fn with_exact_solver(mut self, solver: impl ExactSolver + 'static) -> Self {
        self.exact_solver = Some(Box::new(solver));
        self
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn optimize(
        &self,
        stocks: &[Stock],
        orders: &[Order],
    ) -> Result<CuttingResult, CuttingError> {
        let start = Instant::now();
        let config = &self.config;
        config.validate()?;
        let instance = Instance::new(stocks, orders, config.allow_rotation, config.tolerance())?;

        info!(
            "[OPT] {:?} on {} units and {} stock sheets (complexity {}), demand area {}, available stock area {}",
            config.algorithm,
            instance.n_units().separate_with_commas(),
            instance.stocks().len(),
            instance.complexity().separate_with_commas(),
            instance.total_demand_area(),
            instance.eligible_stock_area()
        );

        let (outcome, provenance) = match config.algorithm {
            Algorithm::FirstFit => self.greedy(&instance, PlacerKind::FirstFit, start),
            Algorithm::BestFit => self.greedy(&instance, PlacerKind::BestFit, start),
            Algorithm::BottomLeft => self.greedy(&instance, PlacerKind::BottomLeft, start),
            Algorithm::Genetic => self.genetic(&instance, start),
            Algorithm::SimulatedAnnealing => {
                let report = AnnealingSearch::new(&instance, config, self.rng()).run();
                self.decode_report(&instance, report, Algorithm::SimulatedAnnealing, start)
            }
            Algorithm::Exact => self.exact(&instance, start),
        };

        ResultAssembler::new(&instance).assemble(outcome, provenance)
    }

    fn rng(&self) -> SmallRng {
        match self.config.prng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        }
    }

    fn greedy(
        &self,
        instance: &Instance,
        kind: PlacerKind,
        start: Instant,
    ) -> (PlacementOutcome, Provenance) {
        let algorithm = match kind {
            PlacerKind::FirstFit => Algorithm::FirstFit,
            PlacerKind::BestFit => Algorithm::BestFit,
            PlacerKind::BottomLeft => Algorithm::BottomLeft,
        };
        let outcome =
            Candidate::greedy(instance).decode(instance, kind, self.config.best_fit_sample);
        let provenance = Provenance {
            algorithm,
            termination: None,
            stats: SearchStats {
                generations: 0,
                evaluations: 1,
                best_history: vec![],
            },
            start,
        };
        (outcome, provenance)
    }

    fn genetic(&self, instance: &Instance, start: Instant) -> (PlacementOutcome, Provenance) {
        let report = GeneticSearch::new(instance, &self.config, self.rng()).run();
        self.decode_report(instance, report, Algorithm::Genetic, start)
    }

    fn decode_report(
        &self,
        instance: &Instance,
        report: SearchReport,
        algorithm: Algorithm,
        start: Instant,
    ) -> (PlacementOutcome, Provenance) {
        let outcome = report
            .best
            .decode(instance, self.config.placer, self.config.best_fit_sample);
        let provenance = Provenance {
            algorithm,
            termination: Some(report.termination),
            stats: report.stats,
            start,
        };
        (outcome, provenance)
    }

    fn exact(&self, instance: &Instance, start: Instant) -> (PlacementOutcome, Provenance) {
        let complexity = instance.complexity();
        let solver = match &self.exact_solver {
            None => {
                warn!("[OPT] no exact solver registered, falling back to the genetic search");
                return self.genetic(instance, start);
            }
            Some(_) if complexity > EXACT_COMPLEXITY_LIMIT => {
                warn!(
                    "[OPT] complexity {complexity} exceeds the exact solver limit of {EXACT_COMPLEXITY_LIMIT}, falling back to the genetic search"
                );
                return self.genetic(instance, start);
            }
            Some(solver) => solver,
        };

        let capacity = oracle::capacities(instance);
        let demand = oracle::demand_profiles(instance);
        match solver.solve(&capacity, &demand) {
            Ok(patterns) => {
                info!("[OPT] exact solver returned {} cutting patterns", patterns.len());
                let outcome = oracle::realize(instance, &patterns);
                let provenance = Provenance {
                    algorithm: Algorithm::Exact,
                    termination: None,
                    stats: SearchStats {
                        generations: 0,
                        evaluations: 1,
                        best_history: vec![],
                    },
                    start,
                };
                (outcome, provenance)
            }
            Err(infeasible) => {
                warn!("[OPT] exact solver failed ({infeasible}), falling back to the genetic search");
                self.genetic(instance, start)
            }
        }
    }
}
