use std::path::PathBuf;

use robby_engine::GridWorld;
use robby_policy::episode;

use crate::{command::WorldArg, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    world: WorldArg,
    /// Policy file (defaults to the built-in heuristic)
    #[arg(long)]
    policy: Option<PathBuf>,
    /// Print every step taken
    #[arg(long)]
    trace: bool,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        world: world_arg,
        policy,
        trace,
    } = arg;

    let policy = util::load_policy(policy.as_deref())?;
    let mut world = GridWorld::random(world_arg.world_config(), &mut rand::rng())?;

    println!("Start:");
    print!("{world}");

    let collected = episode::run_episode_with(&mut world, &policy, world_arg.steps, |step, w| {
        if *trace {
            println!(
                "{:4}: {} -> {:<11} at {}",
                step.step,
                step.observation,
                step.action,
                w.agent()
            );
        }
    });

    println!("End:");
    print!("{world}");
    println!(
        "Collected {collected}/{} items in {} steps",
        world.item_count(),
        world_arg.steps
    );
    Ok(())
}
