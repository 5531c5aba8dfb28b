use clap::{Parser, Subcommand};
use robby_engine::WorldConfig;
use robby_training::fitness::FitnessParams;

use self::{evaluate::EvaluateArg, play::PlayArg, train::TrainArg};

mod evaluate;
mod play;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Search for a better policy by mutation and selection
    Train(#[clap(flatten)] TrainArg),
    /// Measure the fitness of a policy
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Run a single episode and show the grid
    Play(#[clap(flatten)] PlayArg),
}

/// World and episode settings shared by every command.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct WorldArg {
    /// Side length of the square grid
    #[arg(long, default_value_t = WorldConfig::DEFAULT_SIDE)]
    side: usize,
    /// Number of items placed on the grid
    #[arg(long, default_value_t = 50)]
    items: usize,
    /// Steps per episode
    #[arg(long, default_value_t = FitnessParams::DEFAULT_MAX_STEPS)]
    steps: usize,
}

impl WorldArg {
    pub(crate) fn world_config(&self) -> WorldConfig {
        WorldConfig::new(self.side, self.items)
    }

    pub(crate) fn fitness_params(&self, trials: usize) -> FitnessParams {
        FitnessParams {
            world: self.world_config(),
            trials,
            max_steps: self.steps,
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::Play(arg) => play::run(&arg)?,
    }
    Ok(())
}
