//! Hand-written rules for seeding policies.
//!
//! A rule is a pure function from an observation to an action. Applying it to every
//! observation with [`Policy::from_fn`](crate::Policy::from_fn) yields a complete
//! policy table.

use std::iter;

use robby_engine::{Action, Direction, Observation};

/// The reference heuristic.
///
/// 1. If the agent stands on an item, pick it up.
/// 2. Otherwise, if no neighbor holds an item, move in a random direction.
/// 3. Otherwise, move toward the first item found scanning left, top, right,
///    bottom.
///
/// ```
/// use robby_engine::{Action, Cell, Observation};
/// use robby_policy::rule::default_rule;
///
/// let e = Cell::Empty;
/// let obs = Observation::new(e, Cell::Item, Cell::Item, e, e);
/// assert_eq!(default_rule(obs), Action::MoveUp);
/// ```
#[must_use]
pub fn default_rule(observation: Observation) -> Action {
    if observation.center.is_item() {
        return Action::PickUp;
    }
    let scan_order = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];
    iter::zip(observation.neighbors(), scan_order)
        .find(|(cell, _)| cell.is_item())
        .map_or(Action::MoveRandom, |(_, direction)| direction.to_action())
}

#[cfg(test)]
mod tests {
    use robby_engine::Cell;

    use super::*;

    #[test]
    fn test_pick_up_wins_over_neighbors() {
        let i = Cell::Item;
        assert_eq!(
            default_rule(Observation::new(i, i, i, i, i)),
            Action::PickUp
        );
    }

    #[test]
    fn test_scan_order() {
        let (e, i, w) = (Cell::Empty, Cell::Item, Cell::Wall);
        let cases = [
            (Observation::new(i, i, i, i, e), Action::MoveLeft),
            (Observation::new(w, i, i, i, e), Action::MoveUp),
            (Observation::new(e, e, i, i, e), Action::MoveRight),
            (Observation::new(w, w, e, i, w), Action::MoveDown),
            (Observation::new(w, e, w, e, e), Action::MoveRandom),
        ];
        for (obs, expected) in cases {
            assert_eq!(default_rule(obs), expected, "{obs}");
        }
    }
}
