use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Classification of a single cell as seen by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
#[repr(u8)]
pub enum Cell {
    Empty = 0,
    Item = 1,
    /// Outside the grid. Never reported for the agent's own cell.
    Wall = 2,
}

impl Cell {
    /// Number of cell classes (3).
    pub const LEN: usize = 3;

    pub const ALL: [Cell; Self::LEN] = [Cell::Empty, Cell::Item, Cell::Wall];

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Item => 'o',
            Cell::Wall => '#',
        }
    }

    #[must_use]
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(Cell::Empty),
            'o' => Some(Cell::Item),
            '#' => Some(Cell::Wall),
            _ => None,
        }
    }

    const fn from_digit(digit: usize) -> Self {
        match digit {
            0 => Cell::Empty,
            1 => Cell::Item,
            _ => Cell::Wall,
        }
    }
}

/// The agent's view of the grid: its four neighbors and its own cell.
///
/// Every observation has a dense index in `0..Observation::COUNT`, the base-3
/// number whose least significant digit is `left` and most significant digit is
/// `center`. Policies use this index to store one action per observation in a
/// flat table.
///
/// The textual form lists the cells as `left top right bottom center` using
/// `.` (empty), `o` (item) and `#` (wall):
///
/// ```
/// use robby_engine::{Cell, Observation};
///
/// let obs: Observation = "####o".parse().unwrap();
/// assert_eq!(obs.center, Cell::Item);
/// assert_eq!(obs.to_string(), "####o");
/// assert_eq!(Observation::from_index(obs.index()), Some(obs));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Observation {
    pub left: Cell,
    pub top: Cell,
    pub right: Cell,
    pub bottom: Cell,
    pub center: Cell,
}

impl Observation {
    /// Number of distinct observations (3⁵ = 243), reachable or not.
    pub const COUNT: usize = 243;

    #[must_use]
    pub const fn new(left: Cell, top: Cell, right: Cell, bottom: Cell, center: Cell) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            center,
        }
    }

    /// Cells in `left, top, right, bottom, center` order.
    #[must_use]
    pub const fn cells(self) -> [Cell; 5] {
        [self.left, self.top, self.right, self.bottom, self.center]
    }

    #[must_use]
    pub const fn from_cells([left, top, right, bottom, center]: [Cell; 5]) -> Self {
        Self::new(left, top, right, bottom, center)
    }

    /// Neighbor cells in `left, top, right, bottom` order.
    #[must_use]
    pub const fn neighbors(self) -> [Cell; 4] {
        [self.left, self.top, self.right, self.bottom]
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.cells()
            .iter()
            .rev()
            .fold(0, |acc, cell| acc * Cell::LEN + *cell as usize)
    }

    /// Returns the observation with the given index, or `None` if out of range.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        (index < Self::COUNT).then(|| Self::decode(index))
    }

    fn decode(mut index: usize) -> Self {
        let mut cells = [Cell::Empty; 5];
        for cell in &mut cells {
            *cell = Cell::from_digit(index % Cell::LEN);
            index /= Cell::LEN;
        }
        Self::from_cells(cells)
    }

    /// Iterates over all observations in index order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(Self::decode)
    }
}

impl PartialOrd for Observation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Observation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index().cmp(&other.index())
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in self.cells() {
            write!(f, "{}", cell.as_char())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid observation '{input}': expected 5 characters of '.', 'o' or '#'")]
pub struct ParseObservationError {
    input: String,
}

impl FromStr for Observation {
    type Err = ParseObservationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseObservationError {
            input: s.to_owned(),
        };
        let mut cells = [Cell::Empty; 5];
        let mut chars = s.chars();
        for cell in &mut cells {
            *cell = chars.next().and_then(Cell::from_char).ok_or_else(err)?;
        }
        if chars.next().is_some() {
            return Err(err());
        }
        Ok(Self::from_cells(cells))
    }
}

impl Serialize for Observation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Observation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
