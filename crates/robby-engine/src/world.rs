use std::fmt;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    Action, Cell, Direction, InvalidConfigurationError, Observation, UnrecognizedActionError,
};

/// A cell coordinate on the grid.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display,
)]
#[display("({x}, {y})")]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns the adjacent position in `direction`.
    ///
    /// Returns `None` only when the step would leave the non-negative quadrant;
    /// the upper bounds are checked by the world.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Option<Self> {
        let Self { x, y } = self;
        match direction {
            Direction::Up => Some(Self::new(x, y.checked_sub(1)?)),
            Direction::Down => Some(Self::new(x, y + 1)),
            Direction::Left => Some(Self::new(x.checked_sub(1)?, y)),
            Direction::Right => Some(Self::new(x + 1, y)),
        }
    }
}

/// Size and item density of a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct WorldConfig {
    pub side: usize,
    pub item_count: usize,
}

impl WorldConfig {
    pub const DEFAULT_SIDE: usize = 10;

    #[must_use]
    pub const fn new(side: usize, item_count: usize) -> Self {
        Self { side, item_count }
    }

    #[must_use]
    pub const fn cell_count(self) -> usize {
        self.side * self.side
    }

    /// Checks that `item_count` distinct items fit on a non-empty grid.
    pub fn validate(self) -> Result<(), InvalidConfigurationError> {
        if self.side == 0 {
            return Err(InvalidConfigurationError::EmptyGrid);
        }
        if self.item_count > self.cell_count() {
            return Err(InvalidConfigurationError::TooManyItems {
                side: self.side,
                item_count: self.item_count,
            });
        }
        Ok(())
    }
}

/// Seed for the generator a world uses to resolve `MoveRandom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldSeed([u8; 16]);

impl From<[u8; 16]> for WorldSeed {
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl Distribution<WorldSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> WorldSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        WorldSeed(seed)
    }
}

/// A `side × side` grid holding items and the agent.
///
/// The world is mutated only through [`GridWorld::apply`]. Moves into the grid
/// boundary leave the agent where it is. Random moves draw from a generator
/// owned by the world, so an episode is reproducible from the world's initial
/// state alone.
///
/// # Example
///
/// ```
/// use robby_engine::{Action, GridWorld, Position, WorldSeed};
///
/// let mut world = GridWorld::from_parts(
///     3,
///     Position::new(0, 0),
///     [Position::new(1, 0)],
///     WorldSeed::from([0; 16]),
/// )
/// .unwrap();
///
/// world.apply(Action::MoveLeft); // blocked by the wall
/// assert_eq!(world.agent(), Position::new(0, 0));
///
/// world.apply(Action::MoveRight);
/// world.apply(Action::PickUp);
/// assert_eq!(world.items_collected(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct GridWorld {
    side: usize,
    item_count: usize,
    items: Vec<bool>,
    remaining: usize,
    agent: Position,
    rng: Pcg32,
}

impl GridWorld {
    /// Creates a world with the agent and `config.item_count` distinct items
    /// placed uniformly at random.
    ///
    /// Item cells are drawn by rejection sampling until enough distinct cells are
    /// found, which terminates because the configuration is validated first.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfigurationError`] if the grid is empty or the items do
    /// not fit.
    pub fn random<R>(config: WorldConfig, rng: &mut R) -> Result<Self, InvalidConfigurationError>
    where
        R: Rng + ?Sized,
    {
        config.validate()?;
        let WorldConfig { side, item_count } = config;

        let agent = Position::new(rng.random_range(0..side), rng.random_range(0..side));
        let mut items = vec![false; config.cell_count()];
        let mut placed = 0;
        while placed < item_count {
            let row = rng.random_range(0..side);
            let col = rng.random_range(0..side);
            let cell = &mut items[row * side + col];
            if !*cell {
                *cell = true;
                placed += 1;
            }
        }

        Ok(Self {
            side,
            item_count,
            items,
            remaining: item_count,
            agent,
            rng: Pcg32::from_seed(rng.random::<WorldSeed>().0),
        })
    }

    /// Creates a world with a fixed layout.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfigurationError`] if the grid is empty, a position lies
    /// outside the grid, or two items share a cell.
    pub fn from_parts<I>(
        side: usize,
        agent: Position,
        items: I,
        seed: WorldSeed,
    ) -> Result<Self, InvalidConfigurationError>
    where
        I: IntoIterator<Item = Position>,
    {
        if side == 0 {
            return Err(InvalidConfigurationError::EmptyGrid);
        }
        let out_of_bounds = |position: Position| InvalidConfigurationError::OutOfBounds {
            side,
            position,
        };

        let mut this = Self {
            side,
            item_count: 0,
            items: vec![false; side * side],
            remaining: 0,
            agent,
            rng: Pcg32::from_seed(seed.0),
        };
        if !this.contains(agent) {
            return Err(out_of_bounds(agent));
        }
        for position in items {
            let index = this.cell_index(position).ok_or_else(|| out_of_bounds(position))?;
            if this.items[index] {
                return Err(InvalidConfigurationError::DuplicateItem { position });
            }
            this.items[index] = true;
            this.item_count += 1;
        }
        this.remaining = this.item_count;
        Ok(this)
    }

    #[must_use]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of items placed at construction.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    #[must_use]
    pub fn items_remaining(&self) -> usize {
        self.remaining
    }

    /// Number of items picked up so far.
    #[must_use]
    pub fn items_collected(&self) -> usize {
        self.item_count - self.remaining
    }

    #[must_use]
    pub fn agent(&self) -> Position {
        self.agent
    }

    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position.x < self.side && position.y < self.side
    }

    #[must_use]
    pub fn has_item(&self, position: Position) -> bool {
        self.cell_index(position).is_some_and(|i| self.items[i])
    }

    /// Iterates over the positions that currently hold an item, row by row.
    pub fn item_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| **item)
            .map(|(i, _)| Position::new(i % self.side, i / self.side))
    }

    fn cell_index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y * self.side + position.x)
    }

    fn cell(&self, position: Option<Position>) -> Cell {
        match position {
            Some(p) if self.has_item(p) => Cell::Item,
            Some(p) if self.contains(p) => Cell::Empty,
            _ => Cell::Wall,
        }
    }

    /// Classifies the agent's four neighbors and its own cell.
    #[must_use]
    pub fn observe(&self) -> Observation {
        let neighbor = |direction| self.cell(self.agent.neighbor(direction));
        Observation::new(
            neighbor(Direction::Left),
            neighbor(Direction::Up),
            neighbor(Direction::Right),
            neighbor(Direction::Down),
            self.cell(Some(self.agent)),
        )
    }

    /// Applies one action to the world.
    ///
    /// - Directional moves shift the agent by one cell; moves off the grid are
    ///   ignored.
    /// - `MoveRandom` draws one direction from the world's generator and moves.
    /// - `PickUp` removes the item under the agent, if there is one.
    /// - `NoOp` does nothing.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::MoveUp => self.move_agent(Direction::Up),
            Action::MoveDown => self.move_agent(Direction::Down),
            Action::MoveLeft => self.move_agent(Direction::Left),
            Action::MoveRight => self.move_agent(Direction::Right),
            Action::MoveRandom => {
                let direction = self.rng.random();
                self.move_agent(direction);
            }
            Action::PickUp => {
                self.pick_up();
            }
            Action::NoOp => {}
        }
    }

    /// Applies the action with the given raw code.
    ///
    /// # Errors
    ///
    /// Returns [`UnrecognizedActionError`] if `code` does not name an action. The
    /// world is left untouched in that case.
    pub fn apply_code(&mut self, code: u8) -> Result<(), UnrecognizedActionError> {
        self.apply(Action::try_from(code)?);
        Ok(())
    }

    fn move_agent(&mut self, direction: Direction) {
        if let Some(next) = self.agent.neighbor(direction).filter(|p| self.contains(*p)) {
            self.agent = next;
        }
    }

    /// Removes the item under the agent. Returns whether an item was removed.
    pub fn pick_up(&mut self) -> bool {
        let Some(index) = self.cell_index(self.agent) else {
            return false;
        };
        if !self.items[index] {
            return false;
        }
        self.items[index] = false;
        self.remaining -= 1;
        true
    }
}

/// Renders the grid one row per line: `R` agent, `@` agent on an item,
/// `o` item, `.` empty.
impl fmt::Display for GridWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.side {
            for x in 0..self.side {
                let position = Position::new(x, y);
                let ch = match (position == self.agent, self.has_item(position)) {
                    (true, true) => '@',
                    (true, false) => 'R',
                    (false, true) => 'o',
                    (false, false) => '.',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::iter;

    use super::*;

    const WALLS: [Cell; 4] = [Cell::Wall; 4];

    fn fixed_world(side: usize, agent: Position, items: &[Position]) -> GridWorld {
        GridWorld::from_parts(side, agent, items.iter().copied(), WorldSeed::from([7; 16]))
            .unwrap()
    }

    #[test]
    fn test_random_world_has_distinct_items() {
        let mut rng = rand::rng();
        for (side, item_count) in [(1, 0), (1, 1), (3, 4), (10, 10), (10, 50), (10, 100)] {
            let world = GridWorld::random(WorldConfig::new(side, item_count), &mut rng).unwrap();
            assert_eq!(world.side(), side);
            assert_eq!(world.items.len(), side * side);
            assert_eq!(world.item_count(), item_count);
            assert_eq!(world.items_remaining(), item_count);
            assert_eq!(world.item_positions().count(), item_count);
            assert!(world.contains(world.agent()));
        }
    }

    #[test]
    fn test_too_many_items() {
        let mut rng = rand::rng();
        let err = GridWorld::random(WorldConfig::new(3, 10), &mut rng).unwrap_err();
        assert_eq!(
            err,
            InvalidConfigurationError::TooManyItems {
                side: 3,
                item_count: 10
            }
        );
        let err = GridWorld::random(WorldConfig::new(0, 0), &mut rng).unwrap_err();
        assert_eq!(err, InvalidConfigurationError::EmptyGrid);
    }

    #[test]
    fn test_single_cell_moves_are_no_ops() {
        let mut rng = rand::rng();
        let mut world = GridWorld::random(WorldConfig::new(1, 0), &mut rng).unwrap();
        assert_eq!(world.agent(), Position::new(0, 0));
        for action in [
            Action::MoveUp,
            Action::MoveDown,
            Action::MoveLeft,
            Action::MoveRight,
            Action::MoveRandom,
        ] {
            world.apply(action);
            assert_eq!(world.agent(), Position::new(0, 0));
        }
    }

    #[test]
    fn test_single_cell_pick_up() {
        let mut rng = rand::rng();
        let mut world = GridWorld::random(WorldConfig::new(1, 1), &mut rng).unwrap();
        assert!(world.has_item(Position::new(0, 0)));
        assert_eq!(world.items_collected(), 0);
        assert_eq!(world.observe().neighbors(), WALLS);
        assert_eq!(world.observe().center, Cell::Item);

        world.apply(Action::PickUp);
        assert!(!world.has_item(Position::new(0, 0)));
        assert_eq!(world.items_collected(), 1);
        assert_eq!(world.observe().neighbors(), WALLS);
        assert_eq!(world.observe().center, Cell::Empty);

        // picking up an empty cell changes nothing
        world.apply(Action::PickUp);
        assert_eq!(world.items_collected(), 1);
    }

    #[test]
    fn test_moves_clamp_at_edges() {
        let mut world = fixed_world(3, Position::new(0, 0), &[]);
        world.apply(Action::MoveUp);
        world.apply(Action::MoveLeft);
        assert_eq!(world.agent(), Position::new(0, 0));

        world.apply(Action::MoveRight);
        world.apply(Action::MoveDown);
        assert_eq!(world.agent(), Position::new(1, 1));

        for _ in 0..5 {
            world.apply(Action::MoveRight);
            world.apply(Action::MoveDown);
        }
        assert_eq!(world.agent(), Position::new(2, 2));
    }

    #[test]
    fn test_observe_neighbors() {
        let world = fixed_world(
            3,
            Position::new(1, 0),
            &[Position::new(0, 0), Position::new(1, 1)],
        );
        assert_eq!(
            world.observe(),
            Observation::new(Cell::Item, Cell::Wall, Cell::Empty, Cell::Item, Cell::Empty)
        );
    }

    #[test]
    fn test_random_move_stays_in_bounds() {
        let mut world = fixed_world(4, Position::new(0, 0), &[]);
        let mut visited = vec![false; 16];
        for _ in 0..2000 {
            world.apply(Action::MoveRandom);
            assert!(world.contains(world.agent()));
            let Position { x, y } = world.agent();
            visited[y * 4 + x] = true;
        }
        assert!(visited.iter().all(|v| *v));
    }

    #[test]
    fn test_same_seed_same_random_walk() {
        let mut a = fixed_world(10, Position::new(5, 5), &[]);
        let mut b = fixed_world(10, Position::new(5, 5), &[]);
        for _ in 0..100 {
            a.apply(Action::MoveRandom);
            b.apply(Action::MoveRandom);
            assert_eq!(a.agent(), b.agent());
        }
    }

    #[test]
    fn test_apply_code() {
        let mut world = fixed_world(2, Position::new(0, 0), &[Position::new(1, 0)]);
        world.apply_code(Action::MoveRight.code()).unwrap();
        world.apply_code(Action::PickUp.code()).unwrap();
        assert_eq!(world.items_collected(), 1);

        let err = world.apply_code(7).unwrap_err();
        assert_eq!(err, UnrecognizedActionError { code: 7 });
        assert_eq!(world.agent(), Position::new(1, 0));
    }

    #[test]
    fn test_from_parts_rejects_invalid_layout() {
        let seed = WorldSeed::from([0; 16]);
        let err = GridWorld::from_parts(2, Position::new(2, 0), iter::empty(), seed).unwrap_err();
        assert!(matches!(err, InvalidConfigurationError::OutOfBounds { .. }));

        let err = GridWorld::from_parts(
            2,
            Position::new(0, 0),
            [Position::new(1, 1), Position::new(1, 1)],
            seed,
        )
        .unwrap_err();
        assert_eq!(
            err,
            InvalidConfigurationError::DuplicateItem {
                position: Position::new(1, 1)
            }
        );
    }

    #[test]
    fn test_display() {
        let mut world = fixed_world(
            3,
            Position::new(1, 1),
            &[Position::new(0, 0), Position::new(1, 1)],
        );
        assert_eq!(world.to_string(), "o..\n.@.\n...\n");
        world.apply(Action::PickUp);
        world.apply(Action::MoveDown);
        assert_eq!(world.to_string(), "o..\n...\n.R.\n");
    }
}
