//! Fence directions, orientations and per-connector direction slots

use std::fmt;

/// One of the four directions a fence can leave a connector in
///
/// The discriminant is the slot index used by the solution format
/// (`up down left right`). Opposites only pair within an axis:
/// Up with Down and Left with Right.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Towards row 0
    Up = 0,
    /// Towards the last row
    Down = 1,
    /// Towards column 0
    Left = 2,
    /// Towards the last column
    Right = 3,
}

impl Direction {
    /// All directions in slot order
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Slot index of this direction
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction for a slot index
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Up),
            1 => Some(Self::Down),
            2 => Some(Self::Left),
            3 => Some(Self::Right),
            _ => None,
        }
    }

    /// The direction facing back along the same axis
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Orientation of a fence travelling in this direction
    pub const fn orientation(self) -> Orientation {
        match self {
            Self::Up | Self::Down => Orientation::Vertical,
            Self::Left | Self::Right => Orientation::Horizontal,
        }
    }

    /// Row and column deltas of a single step
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}

/// Axis a fence runs along
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Traverses rows
    Vertical,
    /// Traverses columns
    Horizontal,
}

/// Set of directions in which fences leave a single connector
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DirectionSet(u8);

impl DirectionSet {
    /// A set with no directions
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build from the four `up down left right` flags
    pub fn from_flags(flags: [bool; 4]) -> Self {
        let mut set = Self::empty();
        for (direction, flag) in Direction::ALL.into_iter().zip(flags) {
            if flag {
                set.insert(direction);
            }
        }
        set
    }

    /// Add a direction
    pub const fn insert(&mut self, direction: Direction) {
        self.0 |= 1 << direction.index();
    }

    /// Test membership
    pub const fn contains(self, direction: Direction) -> bool {
        self.0 & (1 << direction.index()) != 0
    }

    /// Number of directions present, i.e. the realised degree
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Test if no direction is present
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Directions present, in slot order
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |&direction| self.contains(direction))
    }

    /// The `up down left right` flags as 0/1 integers
    pub fn flags(self) -> [u8; 4] {
        Direction::ALL.map(|direction| u8::from(self.contains(direction)))
    }
}
