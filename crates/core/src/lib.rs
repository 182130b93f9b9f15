//! Trigrid is a triangular-grid spatial model for board games. This crate
//! contains the coordinate system, the tiling engine that links triangular
//! faces and their shared vertices, the board container that indexes them, and
//! an A* path planner that runs over the result. Combat, economy and
//! rendering are all implemented elsewhere; they only consume occupant lists,
//! payloads and distance queries from here.
//!
//! ```
//! use trigrid::{find_path_euclidean, Grid, GridConfig, VertexPoint};
//!
//! let grid: Grid = Grid::from_config(&GridConfig::default()).unwrap();
//! let path = find_path_euclidean(
//!     &grid.vertex_graph(),
//!     VertexPoint::new(0, 0),
//!     VertexPoint::new(5, 3),
//! );
//! assert_eq!(path.last(), Some(&VertexPoint::new(5, 3)));
//! ```
//!
//! See the [grid] module for a description of the coordinate systems, and
//! [GridConfig] for the available configuration.

mod config;
mod error;
pub mod grid;
mod path;
mod util;

pub use crate::{
    config::{GridConfig, SearchConfig},
    error::GridError,
    grid::{
        Direction, Footprint, Grid, GridPoint, NodeRef, Planar, Pointing,
        TriAddress, TriVector, Triangle, TriangleId, Vertex, VertexId,
        VertexPoint,
    },
    path::{
        euclidean, find_path, find_path_euclidean, Node, NodeGraph, NodeMap,
        Occupants, PathFinder, UnitId,
    },
};
