//! Grid world simulation for the Robby item-collecting agent.
//!
//! This crate owns the rules that every policy is optimized against:
//!
//! - [`GridWorld`] - A `side × side` grid with items and a single agent
//! - [`Observation`] - What the agent sees: its four neighbors and its own cell
//! - [`Action`] - The closed set of moves the agent can make
//!
//! # Coordinate System
//!
//! Positions are `(x, y)` with `x` the column and `y` the row, counted from the
//! top-left corner. Moving up decrements `y`.
//!
//! # Example
//!
//! ```
//! use robby_engine::{Action, Cell, GridWorld, WorldConfig};
//!
//! let mut rng = rand::rng();
//! let mut world = GridWorld::random(WorldConfig::new(1, 1), &mut rng).unwrap();
//!
//! assert_eq!(world.observe().center, Cell::Item);
//! world.apply(Action::PickUp);
//! assert_eq!(world.items_collected(), 1);
//! ```

pub use self::{action::*, observation::*, world::*};

mod action;
mod observation;
mod world;

/// A world cannot be built from the requested parameters.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvalidConfigurationError {
    #[display("grid side must be positive")]
    EmptyGrid,
    #[display("cannot place {item_count} distinct items on a {side}x{side} grid")]
    TooManyItems { side: usize, item_count: usize },
    #[display("position {position} is outside a {side}x{side} grid")]
    OutOfBounds { side: usize, position: Position },
    #[display("more than one item placed at {position}")]
    DuplicateItem { position: Position },
}

/// A raw action code outside the [`Action`] enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unrecognized action code: {code}")]
pub struct UnrecognizedActionError {
    pub code: u8,
}
