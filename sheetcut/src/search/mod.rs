use serde::{Deserialize, Serialize};

/// Pure functions deriving search parameters from the problem size
pub mod auto_scale;

/// Simulated annealing over the candidate encoding
pub mod annealing;

/// Genetic search over the candidate encoding
pub mod genetic;

mod candidate;
mod fitness;

#[doc(inline)]
pub use candidate::Candidate;
#[doc(inline)]
pub use fitness::Fitness;

/// Why a search engine stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The utilization of the best candidate reached the configured target
    TargetReached,
    /// No significant improvement for the configured number of generations
    Converged,
    /// The wall-clock budget ran out
    TimeExpired,
    /// The generation (or iteration) cap was exhausted
    GenerationLimit,
}

/// Lifecycle of a search engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Initializing,
    Evolving { generation: usize },
    Finished(Termination),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Generations (or temperature steps) completed after initialization
    pub generations: usize,
    /// Number of decoded and evaluated candidates
    pub evaluations: usize,
    /// Best fitness found so far, recorded once after initialization and after every generation.
    /// Never decreases.
    pub best_history: Vec<f64>,
}

/// Best candidate found by a search engine, with how and why the search ended
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub best: Candidate,
    pub best_fitness: Fitness,
    pub termination: Termination,
    pub stats: SearchStats,
}
