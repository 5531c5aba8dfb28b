//! Fitness evaluation: how well a policy collects items.
//!
//! # How It Works
//!
//! For each of `trials` independent trials:
//!
//! 1. **Build World** - A fresh `side × side` world with `item_count` items at
//!    random positions and the agent at a random cell
//! 2. **Play Episode** - Run the policy for exactly `max_steps` steps
//! 3. **Count** - Add the number of items collected
//!
//! ```text
//! fitness = total_collected / (item_count × trials)
//! ```
//!
//! Fitness is the mean fraction of items collected per episode and always lies in
//! `[0, 1]`.
//!
//! # Noise
//!
//! Fitness is stochastic: evaluating the same policy twice gives different values
//! because world layouts and random moves are drawn afresh. The number of trials
//! controls the variance; there is no fixed-seed reproducibility across calls of
//! [`FitnessFunction::evaluate`]. For reproducible measurements use
//! [`TrialFitnessEvaluator::evaluate_with_rng`] with a seeded generator.

use std::fmt;

use rand::Rng;
use robby_engine::{GridWorld, WorldConfig};
use robby_policy::{Policy, episode};

use crate::TrainingError;

/// Scores a policy. Higher is better.
///
/// Implementations are shared by reference across the optimizer's worker pool.
pub trait FitnessFunction: fmt::Debug + Send + Sync {
    fn evaluate(&self, policy: &Policy) -> Result<f64, TrainingError>;
}

/// Parameters of the trial-based fitness measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitnessParams {
    /// World size and item count used for every trial.
    pub world: WorldConfig,
    /// Number of independent episodes per evaluation.
    pub trials: usize,
    /// Step budget of each episode.
    pub max_steps: usize,
}

impl FitnessParams {
    pub const DEFAULT_TRIALS: usize = 1000;
    pub const DEFAULT_MAX_STEPS: usize = 150;

    /// Parameters with the default trial count and step budget.
    #[must_use]
    pub const fn new(world: WorldConfig) -> Self {
        Self {
            world,
            trials: Self::DEFAULT_TRIALS,
            max_steps: Self::DEFAULT_MAX_STEPS,
        }
    }
}

/// Measures fitness by playing episodes on freshly randomized worlds.
#[derive(Debug, Clone)]
pub struct TrialFitnessEvaluator {
    params: FitnessParams,
}

impl TrialFitnessEvaluator {
    /// Creates an evaluator, rejecting parameters for which fitness is undefined.
    ///
    /// # Errors
    ///
    /// - [`TrainingError::InvalidConfiguration`] if the world cannot be built
    /// - [`TrainingError::NoItems`] if `item_count` is zero
    /// - [`TrainingError::NoTrials`] if `trials` is zero
    pub fn new(params: FitnessParams) -> Result<Self, TrainingError> {
        params.world.validate()?;
        if params.world.item_count == 0 {
            return Err(TrainingError::NoItems);
        }
        if params.trials == 0 {
            return Err(TrainingError::NoTrials);
        }
        Ok(Self { params })
    }

    /// Evaluates `policy` drawing all randomness from `rng`.
    #[expect(clippy::cast_precision_loss)]
    pub fn evaluate_with_rng<R>(&self, policy: &Policy, rng: &mut R) -> Result<f64, TrainingError>
    where
        R: Rng + ?Sized,
    {
        let FitnessParams {
            world: config,
            trials,
            max_steps,
        } = self.params;

        let mut total_collected = 0;
        for _ in 0..trials {
            let mut world = GridWorld::random(config, rng)?;
            total_collected += episode::run_episode(&mut world, policy, max_steps);
        }
        let fitness = total_collected as f64 / (config.item_count * trials) as f64;
        log::trace!("evaluated policy over {trials} trials: {fitness:.4}");
        Ok(fitness)
    }
}

impl FitnessFunction for TrialFitnessEvaluator {
    fn evaluate(&self, policy: &Policy) -> Result<f64, TrainingError> {
        self.evaluate_with_rng(policy, &mut rand::rng())
    }
}
