use std::path::PathBuf;

use robby_training::fitness::{FitnessFunction as _, FitnessParams, TrialFitnessEvaluator};

use crate::{command::WorldArg, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    #[clap(flatten)]
    world: WorldArg,
    /// Episodes to average over
    #[arg(long, default_value_t = FitnessParams::DEFAULT_TRIALS)]
    trials: usize,
    /// Policy file (defaults to the built-in heuristic)
    #[arg(long)]
    policy: Option<PathBuf>,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg {
        world,
        trials,
        policy,
    } = arg;

    let policy = util::load_policy(policy.as_deref())?;
    let evaluator = TrialFitnessEvaluator::new(world.fitness_params(*trials))?;
    let fitness = evaluator.evaluate(&policy)?;

    println!("{fitness:.4}");
    Ok(())
}
