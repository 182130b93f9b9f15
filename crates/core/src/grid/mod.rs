//! This module holds the triangular grid: coordinate types, the tiling engine
//! that links faces together, and the [Grid] container that indexes it all.
//!
//! ## Coordinate Systems
//!
//! There are two kinds of things on a grid, and each has its own coordinates.
//!
//! ### Triangle Addresses
//!
//! Every triangular face is addressed with three integer components, `a`, `b`
//! and `c` (see [TriAddress]). **For any triangle, `a + b + c` is either 1 or
//! 2.** The sum tells you which way the triangle points:
//!
//! - Sum 2: the triangle points north. It has corners to the N, SE and SW of
//!   its center, and neighbours across its NE, S and NW edges.
//! - Sum 1: the triangle points south. It has corners to the NE, S and NW of
//!   its center, and neighbours across its N, SE and SW edges.
//!
//! Moving to a neighbour changes exactly one component by 1, which flips the
//! sum between 1 and 2. A south-pointing triangle can only step +1 on a
//! component, and a north-pointing triangle can only step -1. The full table
//! of steps lives in [Direction::step]; it's the only place the mapping
//! between directions and address offsets is written down.
//!
//! Addresses with any other sum don't refer to a triangle, and can't be
//! constructed. Relative offsets (e.g. the shape of a [Footprint]) are
//! [TriVector]s, which have no sum restriction.
//!
//! ### Vertex Lattice
//!
//! Corners live on a lattice of horizontal rows (see [VertexPoint]). Every
//! odd row is shifted east by half an edge, which is what makes the rows
//! stack into triangles:
//!
//! ```text
//!   [0,2]---[1,2]---[2,2]
//!     \     / \     / \
//!      \   /   \   /   \
//!      [0,1]---[1,1]---[2,1]
//!      /   \   /   \   /
//!     /     \ /     \ /
//!   [0,0]---[1,0]---[2,0]
//! ```
//!
//! A grid of `width` x `height` holds exactly the lattice points with
//! `0 <= x < width` and `0 <= y < height`, and every triangle whose three
//! corners are all on the lattice. That means the left and right edges of a
//! grid are ragged: boundary vertices touch fewer triangles than interior
//! ones. This is expected.
//!
//! ### Planar Positions
//!
//! For distance measurements, everything is projected onto the 2D plane with
//! a unit edge length (see [Planar]). A lattice point `(x, y)` sits at
//! `(x + 0.5 * (y mod 2), y * sqrt(3) / 2)`, and a triangle sits at the
//! centroid of its three corners.

mod coords;
mod direction;
mod footprint;
mod tiling;

pub use self::{coords::*, direction::*, footprint::*, tiling::*};

use crate::{
    config::{GridConfig, SearchConfig},
    error::GridError,
    path::{NodeGraph, PathFinder, UnitId},
    timed,
};
use anyhow::Context;
use derive_more::From;
use fnv::FnvBuildHasher;
use log::info;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

pub type TriAddressMap<T> = HashMap<TriAddress, T, FnvBuildHasher>;

/// A position on the grid that could hold either a vertex or a triangle. For
/// pathfinding and distance purposes, both kinds of entity share one
/// coordinate space.
#[derive(
    Copy, Clone, Debug, From, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum GridPoint {
    Vertex(VertexPoint),
    Triangle(TriAddress),
}

/// A resolved entity on a specific grid. Get one from [Grid::node_at].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Vertex(VertexId),
    Triangle(TriangleId),
}

/// A fully built board. Holds every triangle and vertex, and indexes them by
/// coordinate. The topology (which triangles/vertices exist and how they're
/// linked) is fixed at construction. The only things that can change
/// afterwards are occupant lists and triangle payloads.
///
/// Since nothing about the topology ever changes, a `&Grid` can be shared
/// freely between threads, e.g. to run several path searches at once.
/// Occupant and payload mutation go through `&mut Grid`, so the borrow checker
/// forces any concurrent callers to synchronize externally.
#[derive(Clone, Debug)]
pub struct Grid<P = ()> {
    width: usize,
    height: usize,
    search: SearchConfig,
    triangles: Vec<Triangle<P>>,
    vertices: Vec<Vertex>,
    triangle_index: TriAddressMap<TriangleId>,
    /// Dense row-major lattice index, `width * height` long
    vertex_index: Vec<Option<VertexId>>,
}

impl<P: Default> Grid<P> {
    /// Build a grid over a `width` x `height` vertex lattice. Every triangle
    /// whose corners all fall on the lattice is created, with a default
    /// payload. Fails if either dimension is below 2, since no triangle would
    /// fit.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width < 2
            || height < 2
            || i32::try_from(width).is_err()
            || i32::try_from(height).is_err()
        {
            return Err(GridError::InvalidDimensions { width, height });
        }
        info!("Building {}x{} grid", width, height);

        let in_bounds = |point: VertexPoint| {
            point.x >= 0
                && point.y >= 0
                && (point.x as usize) < width
                && (point.y as usize) < height
        };

        // Each lattice point is the bottom corner of up to two triangles: the
        // one to its north-east, and the one directly north of it. Create each
        // one only if all three of its corners are on the lattice.
        let mut faces = Vec::new();
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let point = VertexPoint::new(x, y);
                let upper_right = point.upper_right();
                let right = VertexPoint::new(x + 1, y);
                if in_bounds(right) && in_bounds(upper_right) {
                    faces.push(Triangle::new(
                        point.north_east_triangle(),
                        P::default(),
                    ));
                }
                if in_bounds(point.upper_left()) && in_bounds(upper_right) {
                    faces.push(Triangle::new(
                        point.north_triangle(),
                        P::default(),
                    ));
                }
            }
        }

        let tiling = timed!("Tiling", Tiling::tile(faces))?;
        let (triangles, vertices, triangle_index) = tiling.into_parts();

        let mut vertex_index = vec![None; width * height];
        for (i, vertex) in vertices.iter().enumerate() {
            let point = vertex.point();
            let slot = &mut vertex_index
                [point.y as usize * width + point.x as usize];
            debug_assert!(slot.is_none(), "two vertices at {}", point);
            *slot = Some(VertexId::from(i));
        }

        info!(
            "Built grid with {} triangles and {} vertices",
            triangles.len(),
            vertices.len()
        );
        Ok(Self {
            width,
            height,
            search: SearchConfig::default(),
            triangles,
            vertices,
            triangle_index,
            vertex_index,
        })
    }

    /// Build a grid from a config. The config is validated first; a
    /// validation failure can be downcast to
    /// [ValidationErrors](validator::ValidationErrors).
    pub fn from_config(config: &GridConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid grid config")?;
        let mut grid = Self::new(config.width, config.height)?;
        grid.search = config.search;
        Ok(grid)
    }
}

impl<P> Grid<P> {
    /// Returned by [Grid::distance] when either point isn't on the grid
    pub const UNREACHABLE: f64 = f64::MAX;

    /// Added to the vertex-to-corner distance when measuring between a vertex
    /// and a triangle. Approximates the half hop from a triangle's center out
    /// to its boundary.
    pub const MIXED_DISTANCE_OFFSET: f64 = 0.5;

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn triangles(&self) -> &[Triangle<P>] {
        &self.triangles
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn triangle(&self, id: TriangleId) -> &Triangle<P> {
        &self.triangles[usize::from(id)]
    }

    pub fn triangle_mut(&mut self, id: TriangleId) -> &mut Triangle<P> {
        &mut self.triangles[usize::from(id)]
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[usize::from(id)]
    }

    pub fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[usize::from(id)]
    }

    pub fn triangle_id_at(&self, address: TriAddress) -> Option<TriangleId> {
        self.triangle_index.get(&address).copied()
    }

    /// Get the triangle at an address. Returns `None` for any address that
    /// isn't on this grid, so it's safe to probe past the edge.
    pub fn triangle_at(&self, address: TriAddress) -> Option<&Triangle<P>> {
        self.triangle_id_at(address).map(|id| self.triangle(id))
    }

    pub fn triangle_at_mut(
        &mut self,
        address: TriAddress,
    ) -> Option<&mut Triangle<P>> {
        let id = self.triangle_id_at(address)?;
        Some(self.triangle_mut(id))
    }

    pub fn vertex_id_at(&self, point: VertexPoint) -> Option<VertexId> {
        if point.x < 0 || point.y < 0 {
            return None;
        }
        let (x, y) = (point.x as usize, point.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        self.vertex_index[y * self.width + x]
    }

    /// Get the vertex at a lattice point. Returns `None` for any point outside
    /// the lattice.
    pub fn vertex_at(&self, point: VertexPoint) -> Option<&Vertex> {
        self.vertex_id_at(point).map(|id| self.vertex(id))
    }

    pub fn vertex_at_mut(&mut self, point: VertexPoint) -> Option<&mut Vertex> {
        let id = self.vertex_id_at(point)?;
        Some(self.vertex_mut(id))
    }

    /// Resolve a point to whichever entity lives there, if any
    pub fn node_at(&self, point: impl Into<GridPoint>) -> Option<NodeRef> {
        match point.into() {
            GridPoint::Vertex(point) => {
                self.vertex_id_at(point).map(NodeRef::Vertex)
            }
            GridPoint::Triangle(address) => {
                self.triangle_id_at(address).map(NodeRef::Triangle)
            }
        }
    }

    /// Cartesian position of an entity on this grid
    pub fn position(&self, node: NodeRef) -> Point2<f64> {
        match node {
            NodeRef::Vertex(id) => self.vertex(id).point().position(),
            NodeRef::Triangle(id) => self.triangle(id).address().position(),
        }
    }

    /// Distance between two points on the grid. Between two vertices or two
    /// triangles this is plain Euclidean distance. Between a vertex and a
    /// triangle, it's the distance from the vertex to the closest corner of
    /// the triangle, plus [Self::MIXED_DISTANCE_OFFSET]. If either point isn't
    /// on the grid, the result is [Self::UNREACHABLE].
    pub fn distance(
        &self,
        from: impl Into<GridPoint>,
        to: impl Into<GridPoint>,
    ) -> f64 {
        let (from, to) = match (self.node_at(from), self.node_at(to)) {
            (Some(from), Some(to)) => (from, to),
            _ => return Self::UNREACHABLE,
        };
        match (from, to) {
            (NodeRef::Vertex(vertex), NodeRef::Triangle(triangle))
            | (NodeRef::Triangle(triangle), NodeRef::Vertex(vertex)) => {
                let position = self.vertex(vertex).point().position();
                let closest = self
                    .triangle(triangle)
                    .vertices()
                    .values()
                    .map(|corner| {
                        nalgebra::distance(
                            &position,
                            &self.vertex(corner).point().position(),
                        )
                    })
                    .fold(f64::INFINITY, f64::min);
                closest + Self::MIXED_DISTANCE_OFFSET
            }
            (from, to) => {
                nalgebra::distance(&self.position(from), &self.position(to))
            }
        }
    }

    /// Step from an entity in a direction. From a triangle, this is the
    /// neighbouring triangle across that edge. From a vertex, it's the
    /// triangle lying in that direction. `None` if there's nothing there.
    pub fn neighbour_of(
        &self,
        node: NodeRef,
        direction: Direction,
    ) -> Option<NodeRef> {
        match node {
            NodeRef::Triangle(id) => {
                self.triangle(id).neighbour(direction).map(NodeRef::Triangle)
            }
            NodeRef::Vertex(id) => {
                self.vertex(id).triangle(direction).map(NodeRef::Triangle)
            }
        }
    }

    /// Units at a point. Empty if the point isn't on the grid.
    pub fn occupants(&self, point: impl Into<GridPoint>) -> &[UnitId] {
        match self.node_at(point) {
            Some(NodeRef::Vertex(id)) => self.vertex(id).occupants(),
            Some(NodeRef::Triangle(id)) => self.triangle(id).occupants(),
            None => &[],
        }
    }

    /// Place a unit at a point. Returns `false` if the point isn't on the grid
    /// or the unit is already there.
    pub fn add_occupant(
        &mut self,
        point: impl Into<GridPoint>,
        unit: UnitId,
    ) -> bool {
        match self.node_at(point) {
            Some(NodeRef::Vertex(id)) => self.vertex_mut(id).add_occupant(unit),
            Some(NodeRef::Triangle(id)) => {
                self.triangle_mut(id).add_occupant(unit)
            }
            None => false,
        }
    }

    /// Take a unit off a point. Returns `false` if the point isn't on the grid
    /// or the unit isn't there.
    pub fn remove_occupant(
        &mut self,
        point: impl Into<GridPoint>,
        unit: UnitId,
    ) -> bool {
        match self.node_at(point) {
            Some(NodeRef::Vertex(id)) => {
                self.vertex_mut(id).remove_occupant(unit)
            }
            Some(NodeRef::Triangle(id)) => {
                self.triangle_mut(id).remove_occupant(unit)
            }
            None => false,
        }
    }

    /// Place a template on the grid. Returns the IDs of every triangle it
    /// covers, or `None` if the placement is invalid or any part of it falls
    /// off the grid.
    pub fn footprint_triangles(
        &self,
        footprint: &Footprint,
        anchor: TriAddress,
    ) -> Option<Vec<TriangleId>> {
        footprint
            .place(anchor)
            .ok()?
            .into_iter()
            .map(|address| self.triangle_id_at(address))
            .collect()
    }

    /// Does a template fit entirely on the grid at the given anchor?
    pub fn fits(&self, footprint: &Footprint, anchor: TriAddress) -> bool {
        self.footprint_triangles(footprint, anchor).is_some()
    }

    /// A path finder using this grid's search limits
    pub fn path_finder(&self) -> PathFinder {
        PathFinder::new(self.search)
    }

    /// View of this grid for face-to-face movement, keyed by [TriAddress]
    pub fn face_graph(&self) -> FaceGraph<'_, P> {
        FaceGraph { grid: self }
    }

    /// View of this grid for vertex-to-vertex movement (i.e. along triangle
    /// edges), keyed by [VertexPoint]
    pub fn vertex_graph(&self) -> VertexGraph<'_, P> {
        VertexGraph { grid: self }
    }
}

/// Triangles as pathfinding nodes. Two triangles are connected if they share
/// an edge.
#[derive(Copy, Clone, Debug)]
pub struct FaceGraph<'a, P> {
    grid: &'a Grid<P>,
}

impl<'a, P> NodeGraph for FaceGraph<'a, P> {
    type Coord = TriAddress;

    fn contains(&self, address: TriAddress) -> bool {
        self.grid.triangle_id_at(address).is_some()
    }

    fn neighbours(&self, address: TriAddress) -> Vec<TriAddress> {
        match self.grid.triangle_at(address) {
            Some(triangle) => triangle
                .neighbours()
                .values()
                .map(|id| self.grid.triangle(id).address())
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Vertices as pathfinding nodes. Two vertices are connected if they're both
/// corners of the same triangle, i.e. they're joined by a triangle edge.
#[derive(Copy, Clone, Debug)]
pub struct VertexGraph<'a, P> {
    grid: &'a Grid<P>,
}

impl<'a, P> NodeGraph for VertexGraph<'a, P> {
    type Coord = VertexPoint;

    fn contains(&self, point: VertexPoint) -> bool {
        self.grid.vertex_id_at(point).is_some()
    }

    fn neighbours(&self, point: VertexPoint) -> Vec<VertexPoint> {
        let vertex = match self.grid.vertex_at(point) {
            Some(vertex) => vertex,
            None => return Vec::new(),
        };
        let mut neighbours = Vec::with_capacity(6);
        for triangle in vertex.triangles().values() {
            for corner in self.grid.triangle(triangle).vertices().values() {
                let corner = self.grid.vertex(corner).point();
                if corner != point && !neighbours.contains(&corner) {
                    neighbours.push(corner);
                }
            }
        }
        neighbours
    }
}
