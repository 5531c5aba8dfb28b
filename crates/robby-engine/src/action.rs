use std::fmt;

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

use crate::UnrecognizedActionError;

/// An action the agent can take in a single step.
///
/// The discriminants are stable and used as the raw action codes accepted by
/// [`GridWorld::apply_code`](crate::GridWorld::apply_code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Action {
    MoveUp = 0,
    MoveDown = 1,
    MoveLeft = 2,
    MoveRight = 3,
    /// Move one cell in a direction drawn uniformly at random.
    MoveRandom = 4,
    /// Pick up the item under the agent, if any.
    PickUp = 5,
    NoOp = 6,
}

impl Action {
    /// Number of actions (7).
    pub const LEN: usize = 7;

    /// All actions in code order.
    pub const ALL: [Action; Self::LEN] = [
        Action::MoveUp,
        Action::MoveDown,
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveRandom,
        Action::PickUp,
        Action::NoOp,
    ];

    /// Actions a policy mutation may assign. `NoOp` is never a mutation target.
    pub const MUTATION_TARGETS: [Action; 6] = [
        Action::PickUp,
        Action::MoveRandom,
        Action::MoveLeft,
        Action::MoveUp,
        Action::MoveRight,
        Action::MoveDown,
    ];

    /// Returns the raw code of this action.
    ///
    /// ```
    /// use robby_engine::Action;
    ///
    /// assert_eq!(Action::MoveUp.code(), 0);
    /// assert_eq!(Action::NoOp.code(), 6);
    /// ```
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::MoveUp => "move_up",
            Action::MoveDown => "move_down",
            Action::MoveLeft => "move_left",
            Action::MoveRight => "move_right",
            Action::MoveRandom => "move_random",
            Action::PickUp => "pick_up",
            Action::NoOp => "no_op",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl TryFrom<u8> for Action {
    type Error = UnrecognizedActionError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Action::MoveUp),
            1 => Ok(Action::MoveDown),
            2 => Ok(Action::MoveLeft),
            3 => Ok(Action::MoveRight),
            4 => Ok(Action::MoveRandom),
            5 => Ok(Action::PickUp),
            6 => Ok(Action::NoOp),
            _ => Err(UnrecognizedActionError { code }),
        }
    }
}

impl From<Action> for u8 {
    fn from(action: Action) -> Self {
        action.code()
    }
}

/// One of the four grid directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    #[must_use]
    pub const fn to_action(self) -> Action {
        match self {
            Direction::Up => Action::MoveUp,
            Direction::Down => Action::MoveDown,
            Direction::Left => Action::MoveLeft,
            Direction::Right => Action::MoveRight,
        }
    }
}

/// Uniform over the four directions; this is how `MoveRandom` is resolved.
impl Distribution<Direction> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        match rng.random_range(0..4) {
            0 => Direction::Up,
            1 => Direction::Down,
            2 => Direction::Left,
            _ => Direction::Right,
        }
    }
}
