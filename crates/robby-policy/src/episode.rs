//! Running a policy against a world.
//!
//! An episode always consumes its full step budget: there is no early exit once
//! every item has been collected. Given a world (including the state of its
//! generator) and a policy, an episode is fully deterministic; only `MoveRandom`
//! consumes randomness.

use robby_engine::{Action, GridWorld, Observation};

use crate::Policy;

/// A single step taken during an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeStep {
    /// Zero-based step number.
    pub step: usize,
    /// What the agent saw before acting.
    pub observation: Observation,
    /// The action the policy chose.
    pub action: Action,
}

/// Runs `policy` on `world` for exactly `max_steps` steps.
///
/// Returns the number of items collected by the end of the episode.
pub fn run_episode(world: &mut GridWorld, policy: &Policy, max_steps: usize) -> usize {
    run_episode_with(world, policy, max_steps, |_, _| {})
}

/// Like [`run_episode`], but calls `on_step` after every step with the step taken
/// and the resulting world.
pub fn run_episode_with<F>(
    world: &mut GridWorld,
    policy: &Policy,
    max_steps: usize,
    mut on_step: F,
) -> usize
where
    F: FnMut(&EpisodeStep, &GridWorld),
{
    for step in 0..max_steps {
        let observation = world.observe();
        let action = policy.action_for(observation);
        world.apply(action);
        on_step(
            &EpisodeStep {
                step,
                observation,
                action,
            },
            world,
        );
    }
    world.items_collected()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;
    use robby_engine::{Position, WorldConfig, WorldSeed};

    use super::*;

    #[test]
    fn test_saturated_world_is_cleared() {
        let mut rng = rand::rng();
        let side = 10;
        let mut world = GridWorld::random(WorldConfig::new(side, side * side), &mut rng).unwrap();
        let policy = Policy::default_strategy();

        assert_eq!(world.items_collected(), 0);
        let collected = run_episode(&mut world, &policy, 100_000);
        assert_eq!(collected, side * side);
        assert_eq!(world.items_remaining(), 0);
    }

    #[test]
    fn test_consumes_full_step_budget() {
        let mut world = GridWorld::from_parts(
            2,
            Position::new(0, 0),
            [Position::new(0, 0)],
            WorldSeed::from([3; 16]),
        )
        .unwrap();
        let policy = Policy::default_strategy();

        let mut steps = 0;
        let collected = run_episode_with(&mut world, &policy, 25, |step, _| {
            assert_eq!(step.step, steps);
            steps += 1;
        });
        assert_eq!(collected, 1);
        assert_eq!(steps, 25);
    }

    #[test]
    fn test_zero_steps_collects_nothing() {
        let mut rng = rand::rng();
        let mut world = GridWorld::random(WorldConfig::new(10, 50), &mut rng).unwrap();
        assert_eq!(run_episode(&mut world, &Policy::default_strategy(), 0), 0);
    }

    #[test]
    fn test_no_op_policy_never_moves() {
        let mut rng = rand::rng();
        let mut world = GridWorld::random(WorldConfig::new(10, 50), &mut rng).unwrap();
        let start = world.agent();
        assert_eq!(run_episode(&mut world, &Policy::uniform(Action::NoOp), 150), 0);
        assert_eq!(world.agent(), start);
    }

    #[test]
    fn test_deterministic_for_same_world() {
        let mut rng = Pcg32::seed_from_u64(11);
        let world = GridWorld::random(WorldConfig::new(10, 50), &mut rng).unwrap();
        let policy = Policy::default_strategy();

        let mut a = world.clone();
        let mut b = world;
        let mut trace_a = vec![];
        let mut trace_b = vec![];
        run_episode_with(&mut a, &policy, 200, |step, w| trace_a.push((*step, w.agent())));
        run_episode_with(&mut b, &policy, 200, |step, w| trace_b.push((*step, w.agent())));
        assert_eq!(trace_a, trace_b);
        assert_eq!(a.items_collected(), b.items_collected());
    }
}
