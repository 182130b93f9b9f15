//! Basic coordinate types for the triangular grid. See the parent module
//! documentation for a description of the coordinate systems.

use crate::{
    error::GridError,
    grid::{Direction, Pointing},
};
use derive_more::{Add, AddAssign, Display, Neg, Sub, SubAssign, Sum};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Height of one row of the vertex lattice, for a unit edge length
const ROW_HEIGHT: f64 = 0.866_025_403_784_438_6; // sqrt(3) / 2

/// Any value that occupies a position on the 2D plane. Used by the default
/// Euclidean heuristic and cost functions, and by distance queries.
pub trait Planar {
    /// Cartesian position, in units of one triangle edge
    fn position(&self) -> Point2<f64>;
}

/// An unvalidated triple of address components. This can represent a relative
/// offset (e.g. one [Direction] step, or the shape of a template) or the
/// intermediate result of translating an address. A vector can never be used
/// to look up a triangle directly; convert it with [TriAddress::try_from]
/// first, which re-validates it.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    Eq,
    Hash,
    Add,
    Sub,
    Neg,
    AddAssign,
    SubAssign,
    Sum,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {}, {})", a, b, c)]
pub struct TriVector {
    pub a: i32,
    pub b: i32,
    pub c: i32,
}

impl TriVector {
    pub const fn new(a: i32, b: i32, c: i32) -> Self {
        Self { a, b, c }
    }

    /// Sum of all three components. For a vector that came from an address,
    /// this determines whether it's still a valid address. Widened so that
    /// extreme components can't overflow.
    pub const fn component_sum(self) -> i64 {
        self.a as i64 + self.b as i64 + self.c as i64
    }

    /// Component-wise addition, or `None` if any component overflows
    pub fn checked_add(self, other: Self) -> Option<Self> {
        Some(Self {
            a: self.a.checked_add(other.a)?,
            b: self.b.checked_add(other.b)?,
            c: self.c.checked_add(other.c)?,
        })
    }
}

/// Add up any number of addresses and/or vectors, component-wise. The result
/// is unvalidated, since most sums of addresses are not themselves addresses.
/// Use [TriAddress::translate] when the result has to land on a triangle.
pub fn sum<I>(items: I) -> TriVector
where
    I: IntoIterator,
    I::Item: Into<TriVector>,
{
    items.into_iter().map(Into::into).sum()
}

/// The address of one triangular face on the grid. Each address has three
/// components, and **the components always sum to either 1 or 2**. The sum
/// determines which way the triangle points (see [Pointing]). Any other sum
/// doesn't refer to a triangle, so it can never be constructed.
///
/// Stepping +1 on a single component moves a south-pointing triangle to one
/// of its neighbours; stepping -1 does the same for a north-pointing triangle.
/// That's why any given triangle only has 3 of the 6 directions available.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {}, {})", a, b, c)]
#[serde(try_from = "TriVector", into = "TriVector")]
pub struct TriAddress {
    a: i32,
    b: i32,
    c: i32,
}

impl TriAddress {
    /// Construct a new address, failing if the components don't sum to 1 or 2
    pub fn new(a: i32, b: i32, c: i32) -> Result<Self, GridError> {
        if Self::is_valid(a, b, c) {
            Ok(Self { a, b, c })
        } else {
            Err(GridError::InvalidAddress { a, b, c })
        }
    }

    /// Check whether the given components make up a valid address
    pub const fn is_valid(a: i32, b: i32, c: i32) -> bool {
        let sum = TriVector::new(a, b, c).component_sum();
        sum == 1 || sum == 2
    }

    pub fn a(&self) -> i32 {
        self.a
    }

    pub fn b(&self) -> i32 {
        self.b
    }

    pub fn c(&self) -> i32 {
        self.c
    }

    pub fn pointing(self) -> Pointing {
        if TriVector::from(self).component_sum() == 2 {
            Pointing::North
        } else {
            Pointing::South
        }
    }

    /// Translate this address by the given vector, validating the result. A
    /// translation that overflows any component is invalid; the error then
    /// carries the saturated components.
    pub fn translate(self, vector: TriVector) -> Result<Self, GridError> {
        match TriVector::from(self).checked_add(vector) {
            Some(moved) => Self::try_from(moved),
            None => Err(GridError::InvalidAddress {
                a: self.a.saturating_add(vector.a),
                b: self.b.saturating_add(vector.b),
                c: self.c.saturating_add(vector.c),
            }),
        }
    }

    /// Get the address of the neighbouring triangle in the given direction.
    /// Returns `None` if this triangle has no edge facing that way, i.e. the
    /// direction doesn't apply to a triangle with this pointing.
    pub fn adjacent(self, direction: Direction) -> Option<Self> {
        self.translate(direction.step()).ok()
    }

    /// Iterate over the addresses of all three neighbours of this triangle.
    /// These addresses are not necessarily present on any given board.
    pub fn adjacents(self) -> impl Iterator<Item = (Direction, Self)> {
        self.pointing()
            .neighbour_directions()
            .into_iter()
            .filter_map(move |dir| Some((dir, self.adjacent(dir)?)))
    }

    /// Number of edge crossings between two triangles. 0 if the addresses are
    /// equal, 1 if they are neighbours, etc.
    pub fn distance_to(self, other: Self) -> u64 {
        u64::from(self.a.abs_diff(other.a))
            + u64::from(self.b.abs_diff(other.b))
            + u64::from(self.c.abs_diff(other.c))
    }

    /// Get the lattice point of one of this triangle's corners. Returns `None`
    /// if the direction isn't one of the three corner directions for this
    /// triangle's pointing.
    pub fn vertex_point(self, direction: Direction) -> Option<VertexPoint> {
        self.vertex_points()
            .into_iter()
            .find(|(dir, _)| *dir == direction)
            .map(|(_, point)| point)
    }

    /// Lattice points of all three corners, keyed by direction from the
    /// center. Directions come from [Pointing::vertex_directions], and the
    /// points are listed in the same order.
    pub fn vertex_points(self) -> [(Direction, VertexPoint); 3] {
        // Solve the lattice -> address mapping in reverse. For a north-pointing
        // triangle that gives its south-west corner; for a south-pointing one,
        // its south apex (which is the south-west corner of the triangle
        // across its south-east edge).
        let y = self.b - 1;
        let row_shift = y.div_euclid(2);
        let [first, second, third] = self.pointing().vertex_directions();
        match self.pointing() {
            Pointing::North => {
                let south_west = VertexPoint::new(self.a - 1 + row_shift, y);
                let south_east = VertexPoint::new(south_west.x + 1, y);
                [
                    (first, south_west.upper_right()),
                    (second, south_east),
                    (third, south_west),
                ]
            }
            Pointing::South => {
                let south = VertexPoint::new(self.a + row_shift, y);
                [
                    (first, south.upper_right()),
                    (second, south),
                    (third, south.upper_left()),
                ]
            }
        }
    }
}

impl Planar for TriAddress {
    /// The triangle's centroid: the mean of its three corners
    fn position(&self) -> Point2<f64> {
        let corners = self.vertex_points();
        let (x, y) = corners.iter().fold((0.0, 0.0), |(x, y), (_, point)| {
            let position = point.position();
            (x + position.x, y + position.y)
        });
        Point2::new(x / 3.0, y / 3.0)
    }
}

impl From<TriAddress> for TriVector {
    fn from(address: TriAddress) -> Self {
        Self::new(address.a, address.b, address.c)
    }
}

impl TryFrom<TriVector> for TriAddress {
    type Error = GridError;

    fn try_from(vector: TriVector) -> Result<Self, Self::Error> {
        Self::new(vector.a, vector.b, vector.c)
    }
}

/// A point on the vertex lattice, i.e. a corner shared by up to six triangles.
/// The lattice is made of horizontal rows, where every odd row is shifted half
/// an edge to the east. Any pair of integers is a valid lattice point, but a
/// grid only holds vertices for points within its dimensions.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[display(fmt = "[{}, {}]", x, y)]
pub struct VertexPoint {
    pub x: i32,
    pub y: i32,
}

impl VertexPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn is_odd_row(self) -> bool {
        self.y.rem_euclid(2) == 1
    }

    /// The lattice point up and to the left (north-west) of this one
    pub fn upper_left(self) -> Self {
        if self.is_odd_row() {
            Self::new(self.x, self.y + 1)
        } else {
            Self::new(self.x - 1, self.y + 1)
        }
    }

    /// The lattice point up and to the right (north-east) of this one
    pub fn upper_right(self) -> Self {
        if self.is_odd_row() {
            Self::new(self.x + 1, self.y + 1)
        } else {
            Self::new(self.x, self.y + 1)
        }
    }

    /// Address of the north-pointing triangle that has this point as its
    /// south-west corner, i.e. the triangle north-east of this point
    pub fn north_east_triangle(self) -> TriAddress {
        let a = self.x + 1 - self.y.div_euclid(2);
        let b = self.y + 1;
        TriAddress { a, b, c: 1 - self.y - a }
    }

    /// Address of the south-pointing triangle that has this point as its
    /// south apex, i.e. the triangle directly north of this point
    pub fn north_triangle(self) -> TriAddress {
        let north_east = self.north_east_triangle();
        TriAddress {
            a: north_east.a - 1,
            ..north_east
        }
    }
}

impl Planar for VertexPoint {
    fn position(&self) -> Point2<f64> {
        let shift = if self.is_odd_row() { 0.5 } else { 0.0 };
        Point2::new(self.x as f64 + shift, self.y as f64 * ROW_HEIGHT)
    }
}
