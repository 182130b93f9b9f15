//! Compass directions on the triangular grid. The same six values serve two
//! purposes: from a triangle's center they point at its neighbours (across an
//! edge) or at its corners, and from a vertex they point at the triangles that
//! surround it.

use crate::grid::TriVector;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// One of the six directions on the grid, listed clockwise starting at north.
/// The discriminants are the clockwise index, and [Direction::ALL] must stay
/// in the same order.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    EnumIter,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    N = 0,
    NE = 1,
    SE = 2,
    S = 3,
    SW = 4,
    NW = 5,
}

/// Unit address steps, indexed by [Direction] discriminant. This is the only
/// place the direction/step relationship is written down; the reverse lookup
/// in [Direction::from_step] is derived from it.
const STEPS: [TriVector; 6] = [
    TriVector::new(0, 1, 0),  // N
    TriVector::new(0, 0, -1), // NE
    TriVector::new(1, 0, 0),  // SE
    TriVector::new(0, -1, 0), // S
    TriVector::new(0, 0, 1),  // SW
    TriVector::new(-1, 0, 0), // NW
];

impl Direction {
    /// All directions in clockwise order, starting at north
    pub const ALL: [Self; 6] =
        [Self::N, Self::NE, Self::SE, Self::S, Self::SW, Self::NW];

    fn index(self) -> usize {
        self as usize
    }

    /// The next direction clockwise (60 degrees to the right)
    pub fn clockwise(self) -> Self {
        Self::ALL[(self.index() + 1) % 6]
    }

    /// The next direction counter-clockwise (60 degrees to the left). Adding 5
    /// instead of subtracting 1 keeps us out of negative territory.
    pub fn counter_clockwise(self) -> Self {
        Self::ALL[(self.index() + 5) % 6]
    }

    pub fn opposite(self) -> Self {
        Self::ALL[(self.index() + 3) % 6]
    }

    /// The address offset that moves a triangle one step in this direction.
    /// Only half the directions are valid from any given triangle, so the
    /// result of applying this needs to be re-validated.
    pub fn step(self) -> TriVector {
        STEPS[self.index()]
    }

    /// Find the direction whose unit step is exactly `step`. Returns `None` for
    /// anything that isn't one of the six unit steps.
    pub fn from_step(step: TriVector) -> Option<Self> {
        Self::iter().find(|dir| dir.step() == step)
    }
}

/// Which way a triangle's apex points. This is fully determined by the sum of
/// its address components.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Pointing {
    /// Address sum 2. Flat edge on the bottom, apex at the top.
    North,
    /// Address sum 1. Flat edge on top, apex at the bottom.
    South,
}

impl Pointing {
    /// Directions from the triangle's center to its three corners
    pub fn vertex_directions(self) -> [Direction; 3] {
        match self {
            Self::North => [Direction::N, Direction::SE, Direction::SW],
            Self::South => [Direction::NE, Direction::S, Direction::NW],
        }
    }

    /// Directions across the triangle's three edges. Each edge faces away
    /// from a corner, so entry `i` is the opposite of entry `i` in
    /// [Self::vertex_directions].
    pub fn neighbour_directions(self) -> [Direction; 3] {
        self.vertex_directions().map(Direction::opposite)
    }
}

/// A fixed-size map of directions to values. Every slot starts empty. Used for
/// the neighbour/vertex links of a triangle and the triangle links of a
/// vertex, where at most six entries ever exist and lookups need to be cheap.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DirectionMap<T> {
    slots: [Option<T>; 6],
}

impl<T> Default for DirectionMap<T> {
    fn default() -> Self {
        Self {
            slots: [None, None, None, None, None, None],
        }
    }
}

impl<T: Copy> DirectionMap<T> {
    pub fn get(&self, direction: Direction) -> Option<T> {
        self.slots[direction.index()]
    }

    /// Store a value, returning whatever was in the slot before
    pub fn insert(&mut self, direction: Direction, value: T) -> Option<T> {
        self.slots[direction.index()].replace(value)
    }

    pub fn remove(&mut self, direction: Direction) -> Option<T> {
        self.slots[direction.index()].take()
    }

    /// Iterate over populated slots, in clockwise order starting at north
    pub fn iter(&self) -> impl Iterator<Item = (Direction, T)> + '_ {
        Direction::ALL
            .iter()
            .zip(self.slots.iter())
            .filter_map(|(dir, slot)| slot.map(|value| (*dir, value)))
    }

    pub fn values(&self) -> impl Iterator<Item = T> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.iter().map(|(dir, _)| dir)
    }

    /// Number of populated slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply a mapping to every populated slot
    pub(crate) fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> DirectionMap<U> {
        DirectionMap {
            slots: self.slots.map(|slot| slot.map(&f)),
        }
    }
}
