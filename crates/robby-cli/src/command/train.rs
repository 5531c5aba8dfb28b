use std::path::PathBuf;

use chrono::Utc;
use robby_training::{
    fitness::{FitnessParams, TrialFitnessEvaluator},
    optimizer::{EvolutionParams, Optimizer},
};

use crate::{command::WorldArg, model::policy_model::PolicyModel, util};

const DEFAULT_GENERATIONS: usize = 500;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    #[clap(flatten)]
    world: WorldArg,
    /// Episodes per fitness evaluation
    #[arg(long, default_value_t = FitnessParams::DEFAULT_TRIALS)]
    trials: usize,
    /// Number of generations to run
    #[arg(long, default_value_t = DEFAULT_GENERATIONS)]
    generations: usize,
    /// Candidates per generation
    #[arg(long, default_value_t = EvolutionParams::DEFAULT_POPULATION_SIZE)]
    population: usize,
    /// Threads evaluating candidates
    #[arg(long, default_value_t = EvolutionParams::DEFAULT_WORKER_COUNT)]
    workers: usize,
    /// Policy to start from (defaults to the built-in heuristic)
    #[arg(long)]
    seed_policy: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        world,
        trials,
        generations,
        population,
        workers,
        seed_policy,
        output,
    } = arg;

    let fitness_params = world.fitness_params(*trials);
    let evaluator = TrialFitnessEvaluator::new(fitness_params)?;
    let params = EvolutionParams {
        population_size: *population,
        worker_count: *workers,
    };
    let seed = util::load_policy(seed_policy.as_deref())?;

    eprintln!(
        "Training on a {side}x{side} grid with {items} items, {steps} steps per episode, {trials} trials",
        side = fitness_params.world.side,
        items = fitness_params.world.item_count,
        steps = fitness_params.max_steps,
    );

    let mut optimizer = Optimizer::new(&evaluator, params, seed)?;
    let mut best_ever = f64::MIN;
    optimizer.run(*generations, |report| {
        if report.best_fitness > best_ever {
            best_ever = report.best_fitness;
            log::info!(
                "new best fitness {best_ever:.4} at generation #{}",
                report.generation
            );
        }
    })?;

    let model = PolicyModel {
        name: "robby".to_owned(),
        trained_at: Utc::now(),
        final_fitness: optimizer.best_fitness(),
        generations: optimizer.generation(),
        world: fitness_params.world,
        max_steps: fitness_params.max_steps,
        policy: optimizer.into_best(),
    };
    util::save_json(&model, output.as_deref())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Generations: {}", model.generations);
    if let Some(fitness) = model.final_fitness {
        eprintln!("  Final fitness: {fitness:.4}");
    }

    Ok(())
}
