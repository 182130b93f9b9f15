//! The tiling engine. Given an unordered set of triangular faces, this links
//! every face to its neighbours and makes sure every physical corner is
//! represented by a single shared [Vertex].
//!
//! All faces and vertices live in flat arenas, and every link between them is
//! an index into one of those arenas. Links run both ways (triangle to vertex
//! and vertex to triangle) but nothing owns anything else, so there are no
//! reference cycles to worry about.

use crate::{
    error::GridError,
    grid::{
        Direction, DirectionMap, Pointing, TriAddress, TriAddressMap,
        VertexPoint,
    },
    path::{Occupants, UnitId},
};
use derive_more::{Display, From, Into};
use fnv::FnvBuildHasher;
use log::{debug, trace};
use std::mem;
use strum::IntoEnumIterator;

/// Arena index of a [Triangle] within a single tiling/grid. Only meaningful
/// for the structure that produced it.
#[derive(Copy, Clone, Debug, Display, From, Into, PartialEq, Eq, Hash)]
pub struct TriangleId(usize);

/// Arena index of a [Vertex] within a single tiling/grid. Only meaningful for
/// the structure that produced it.
#[derive(Copy, Clone, Debug, Display, From, Into, PartialEq, Eq, Hash)]
pub struct VertexId(usize);

/// A single triangular face. Faces are created unlinked, then the tiling
/// engine fills in their neighbours and corners. After that, the links never
/// change; only the occupant list and the payload can be mutated.
///
/// The payload `P` is an attachment point for whatever state the surrounding
/// game keeps per face (terrain, improvements, etc.). This crate never
/// inspects it.
#[derive(Clone, Debug)]
pub struct Triangle<P = ()> {
    address: TriAddress,
    /// Adjacent faces, keyed by the direction of the shared edge. At most 3
    /// slots are populated, and fewer at the edge of a board.
    neighbours: DirectionMap<TriangleId>,
    /// Corners, keyed by direction from the center. Exactly 3 slots are
    /// populated once tiling is done.
    vertices: DirectionMap<VertexId>,
    occupants: Occupants,
    payload: P,
}

impl<P> Triangle<P> {
    /// Create a new face with no links. It becomes useful once it's been
    /// passed through [Tiling::tile].
    pub fn new(address: TriAddress, payload: P) -> Self {
        Self {
            address,
            neighbours: DirectionMap::default(),
            vertices: DirectionMap::default(),
            occupants: Occupants::default(),
            payload,
        }
    }

    pub fn address(&self) -> TriAddress {
        self.address
    }

    pub fn pointing(&self) -> Pointing {
        self.address.pointing()
    }

    /// Get the face across the edge in the given direction, if there is one
    pub fn neighbour(&self, direction: Direction) -> Option<TriangleId> {
        self.neighbours.get(direction)
    }

    pub fn neighbours(&self) -> &DirectionMap<TriangleId> {
        &self.neighbours
    }

    /// Get the corner in the given direction from this face's center
    pub fn vertex(&self, direction: Direction) -> Option<VertexId> {
        self.vertices.get(direction)
    }

    pub fn vertices(&self) -> &DirectionMap<VertexId> {
        &self.vertices
    }

    pub fn occupants(&self) -> &[UnitId] {
        self.occupants.as_slice()
    }

    /// Add a unit to this face. Returns `false` if it was already here.
    pub fn add_occupant(&mut self, unit: UnitId) -> bool {
        self.occupants.add(unit)
    }

    /// Remove a unit from this face. Returns `false` if it wasn't here.
    pub fn remove_occupant(&mut self, unit: UnitId) -> bool {
        self.occupants.remove(unit)
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }
}

/// A corner shared by up to six faces. Every physical corner on a tiling has
/// exactly one [Vertex], no matter how many faces touch it.
#[derive(Clone, Debug)]
pub struct Vertex {
    point: VertexPoint,
    /// Surrounding faces, keyed by direction from this vertex to the face's
    /// center
    triangles: DirectionMap<TriangleId>,
    occupants: Occupants,
}

impl Vertex {
    fn new(point: VertexPoint) -> Self {
        Self {
            point,
            triangles: DirectionMap::default(),
            occupants: Occupants::default(),
        }
    }

    pub fn point(&self) -> VertexPoint {
        self.point
    }

    /// Get the face lying in the given direction from this vertex
    pub fn triangle(&self, direction: Direction) -> Option<TriangleId> {
        self.triangles.get(direction)
    }

    pub fn triangles(&self) -> &DirectionMap<TriangleId> {
        &self.triangles
    }

    pub fn occupants(&self) -> &[UnitId] {
        self.occupants.as_slice()
    }

    /// Add a unit to this vertex. Returns `false` if it was already here.
    pub fn add_occupant(&mut self, unit: UnitId) -> bool {
        self.occupants.add(unit)
    }

    /// Remove a unit from this vertex. Returns `false` if it wasn't here.
    pub fn remove_occupant(&mut self, unit: UnitId) -> bool {
        self.occupants.remove(unit)
    }
}

/// The fully linked output of the tiling engine: an arena of faces, an arena
/// of shared vertices, and an index of faces by address.
#[derive(Clone, Debug)]
pub struct Tiling<P = ()> {
    triangles: Vec<Triangle<P>>,
    vertices: Vec<Vertex>,
    index: TriAddressMap<TriangleId>,
}

impl<P> Tiling<P> {
    /// Link a set of faces together. Every pair of faces that share an edge
    /// become neighbours of each other, and every corner becomes a single
    /// [Vertex] shared by all the faces around it. The result is the same
    /// (up to arena ordering) regardless of the order of the input.
    ///
    /// Corners are only shared through edges. Two faces that touch at a single
    /// point, with the faces between them missing, each get their own vertex
    /// for that point.
    ///
    /// Faces taken from an earlier tiling are accepted. Their old links are
    /// discarded and rebuilt, while occupants and payloads carry over.
    ///
    /// Fails if two faces have the same address. In that case nothing is
    /// linked.
    pub fn tile(
        faces: impl IntoIterator<Item = Triangle<P>>,
    ) -> Result<Self, GridError> {
        let triangles: Vec<Triangle<P>> = faces
            .into_iter()
            .map(|triangle| Triangle {
                neighbours: DirectionMap::default(),
                vertices: DirectionMap::default(),
                ..triangle
            })
            .collect();

        let mut index = TriAddressMap::with_capacity_and_hasher(
            triangles.len(),
            FnvBuildHasher::default(),
        );
        for (i, triangle) in triangles.iter().enumerate() {
            if index.insert(triangle.address, TriangleId(i)).is_some() {
                return Err(GridError::DuplicateAddress(triangle.address));
            }
        }

        let mut tiling = Self {
            triangles,
            vertices: Vec::new(),
            index,
        };
        tiling.link_edges();
        tiling.fill_corners();
        tiling.compact_vertices();

        debug!(
            "Tiled {} triangles with {} vertices",
            tiling.triangles.len(),
            tiling.vertices.len()
        );
        Ok(tiling)
    }

    pub fn triangles(&self) -> &[Triangle<P>] {
        &self.triangles
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Look up a face by address
    pub fn triangle_at(&self, address: TriAddress) -> Option<&Triangle<P>> {
        self.index.get(&address).map(|id| &self.triangles[id.0])
    }

    pub fn triangle(&self, id: TriangleId) -> &Triangle<P> {
        &self.triangles[id.0]
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    /// Break this tiling into its arenas and address index
    pub(crate) fn into_parts(
        self,
    ) -> (Vec<Triangle<P>>, Vec<Vertex>, TriAddressMap<TriangleId>) {
        (self.triangles, self.vertices, self.index)
    }

    /// For every face, for every direction, find the face across that edge
    /// and link the two together along with the two corners they share.
    fn link_edges(&mut self) {
        for i in 0..self.triangles.len() {
            let face = TriangleId(i);
            let address = self.triangles[i].address;

            for direction in Direction::iter() {
                // Already linked from the other side
                if self.triangles[i].neighbours.get(direction).is_some() {
                    continue;
                }
                // Half the directions don't have an edge for this pointing
                let neighbour_address = match address.adjacent(direction) {
                    Some(neighbour_address) => neighbour_address,
                    None => continue,
                };
                let neighbour = match self.index.get(&neighbour_address) {
                    Some(neighbour) => *neighbour,
                    None => continue,
                };

                self.triangles[face.0]
                    .neighbours
                    .insert(direction, neighbour);
                self.triangles[neighbour.0]
                    .neighbours
                    .insert(direction.opposite(), face);

                // The two ends of the shared edge. Our clockwise corner is the
                // neighbour's counter-clockwise one, and vice versa.
                let opposite = direction.opposite();
                self.share_vertex(
                    face,
                    direction.clockwise(),
                    neighbour,
                    opposite.counter_clockwise(),
                );
                self.share_vertex(
                    face,
                    direction.counter_clockwise(),
                    neighbour,
                    opposite.clockwise(),
                );
            }
        }
    }

    /// Make sure the given corner of both faces refers to the same vertex.
    /// Prefer whatever the neighbour already has, then whatever the face
    /// already has, and only allocate a new vertex if neither has one.
    fn share_vertex(
        &mut self,
        face: TriangleId,
        face_direction: Direction,
        neighbour: TriangleId,
        neighbour_direction: Direction,
    ) {
        let face_vertex = self.triangles[face.0].vertices.get(face_direction);
        let neighbour_vertex =
            self.triangles[neighbour.0].vertices.get(neighbour_direction);

        let vertex = match (neighbour_vertex, face_vertex) {
            // Both faces were reached from different sides of the same corner
            // before they were linked to each other. Fold one vertex into the
            // other so the corner ends up with a single identity.
            (Some(kept), Some(retired)) if kept != retired => {
                self.merge_vertex(retired, kept);
                kept
            }
            (Some(vertex), _) | (None, Some(vertex)) => vertex,
            (None, None) => {
                // vertex_direction always applies to the face's pointing, so
                // this only fails if the edge math above is broken
                let point = self.triangles[face.0]
                    .address
                    .vertex_point(face_direction)
                    .expect("shared corner is not a corner of the face");
                self.alloc_vertex(point)
            }
        };

        self.attach(face, face_direction, vertex);
        self.attach(neighbour, neighbour_direction, vertex);
    }

    /// Give every corner that didn't get a vertex from an edge its own vertex.
    /// These are corners that don't lie on any shared edge, e.g. the tip of a
    /// triangle at the edge of a board.
    fn fill_corners(&mut self) {
        for i in 0..self.triangles.len() {
            for (direction, point) in self.triangles[i].address.vertex_points()
            {
                if self.triangles[i].vertices.get(direction).is_none() {
                    let vertex = self.alloc_vertex(point);
                    self.attach(TriangleId(i), direction, vertex);
                }
            }
        }
    }

    fn alloc_vertex(&mut self, point: VertexPoint) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.vertices.push(Vertex::new(point));
        id
    }

    /// Link a face's corner to a vertex, in both directions
    fn attach(
        &mut self,
        triangle: TriangleId,
        direction: Direction,
        vertex: VertexId,
    ) {
        self.triangles[triangle.0].vertices.insert(direction, vertex);
        // From the vertex, the face is in the opposite direction
        self.vertices[vertex.0]
            .triangles
            .insert(direction.opposite(), triangle);
    }

    /// Move every face attached to `from` over to `into`. `from` is left with
    /// no faces, and gets dropped during compaction.
    fn merge_vertex(&mut self, from: VertexId, into: VertexId) {
        debug_assert_eq!(
            self.vertices[from.0].point, self.vertices[into.0].point,
            "merging vertices at different points"
        );
        trace!("Merging vertex {} into {}", from, into);

        let retired = mem::take(&mut self.vertices[from.0].triangles);
        for (direction, triangle) in retired.iter() {
            self.attach(triangle, direction.opposite(), into);
        }
    }

    /// Drop every vertex that was retired by a merge, and re-number the
    /// remaining ones so the arena has no holes
    fn compact_vertices(&mut self) {
        let mut remap: Vec<Option<VertexId>> =
            Vec::with_capacity(self.vertices.len());
        let mut kept = Vec::with_capacity(self.vertices.len());
        for vertex in self.vertices.drain(..) {
            if vertex.triangles.is_empty() {
                remap.push(None);
            } else {
                remap.push(Some(VertexId(kept.len())));
                kept.push(vertex);
            }
        }
        self.vertices = kept;

        for triangle in &mut self.triangles {
            triangle.vertices = triangle.vertices.map(|vertex| {
                // Merging rewrites every face that pointed at the retired
                // vertex, so nothing can still refer to one
                remap[vertex.0].unwrap_or_else(|| {
                    panic!("face still refers to retired vertex {}", vertex)
                })
            });
        }
    }
}
