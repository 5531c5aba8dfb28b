//! Policy search for the Robby agent.
//!
//! This crate finds good lookup-table policies by randomized mutation and greedy
//! selection.
//!
//! # How Training Works
//!
//! 1. **Population** - Build candidates from the current best policy: candidate
//!    `i` is the best policy with `i` random table entries reassigned
//! 2. **Evaluation** - Each candidate plays many episodes on freshly randomized
//!    worlds, in parallel on a fixed-size worker pool
//! 3. **Fitness** - The mean fraction of items collected per episode
//! 4. **Selection** - The candidate with the highest fitness becomes the new best
//! 5. **Repeat** - For a fixed number of generations
//!
//! # Architecture
//!
//! ```text
//! Optimizer
//!     ↓ mutates
//! Policy (candidates)
//!     ↓ scored by
//! Fitness Function (many episodes on random worlds)
//!     ↓ produces
//! Fitness
//!     ↓ guides
//! Selection
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use robby_engine::WorldConfig;
//! use robby_policy::Policy;
//! use robby_training::{
//!     fitness::{FitnessParams, TrialFitnessEvaluator},
//!     optimizer::{self, EvolutionParams},
//! };
//!
//! let evaluator = TrialFitnessEvaluator::new(FitnessParams::new(WorldConfig::new(10, 50)))?;
//! let best = optimizer::evolve(
//!     &evaluator,
//!     EvolutionParams::default(),
//!     Policy::default_strategy(),
//!     100,
//! )?;
//! # Ok::<(), robby_training::TrainingError>(())
//! ```
//!
//! # Current Limitations
//!
//! - **Greedy only**: the best candidate always wins; a worse candidate is never
//!   accepted, so the search can stall in a local optimum
//! - **Fixed mutation schedule**: candidate `i` always receives `i` mutations
//! - **Noisy selection**: fitness is re-measured from scratch every generation, so
//!   a lucky measurement can win over a genuinely better policy

use robby_engine::InvalidConfigurationError;

pub mod fitness;
pub mod optimizer;
pub mod stats;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TrainingError {
    #[display("invalid world configuration")]
    InvalidConfiguration(InvalidConfigurationError),
    #[display("fitness is undefined for a world without items")]
    NoItems,
    #[display("fitness evaluation needs at least one trial")]
    NoTrials,
    #[display("population must contain at least one candidate")]
    EmptyPopulation,
    #[display("worker pool must have at least one worker")]
    NoWorkers,
    #[display("failed to build worker pool")]
    WorkerPool(rayon::ThreadPoolBuildError),
}

impl From<InvalidConfigurationError> for TrainingError {
    fn from(err: InvalidConfigurationError) -> Self {
        Self::InvalidConfiguration(err)
    }
}

impl From<rayon::ThreadPoolBuildError> for TrainingError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Self::WorkerPool(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_wrapped_error_is_reported_as_source() {
        let err = TrainingError::from(InvalidConfigurationError::EmptyGrid);
        let source = err.source().unwrap().to_string();
        assert_eq!(source, "grid side must be positive");
        assert!(!err.to_string().contains(&source), "{err}");
    }
}
