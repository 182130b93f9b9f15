//! A standalone planning graph, for callers that want to search over something
//! other than a [Grid](crate::Grid)'s faces or vertices (e.g. a road network
//! laid over the board).

use crate::path::NodeGraph;
use derive_more::{Display, From, Into};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, hash::Hash};

/// Opaque identifier for a mobile unit. This crate never looks inside it; it's
/// only stored in occupant lists so that other systems (combat, economy) can
/// find out what's standing where.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    From,
    Into,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
pub struct UnitId(pub u64);

/// An ordered list of units at a single location. A unit can appear at most
/// once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Occupants(Vec<UnitId>);

impl Occupants {
    pub fn as_slice(&self) -> &[UnitId] {
        &self.0
    }

    pub fn contains(&self, unit: UnitId) -> bool {
        self.0.contains(&unit)
    }

    /// Returns `false` if the unit was already present
    pub fn add(&mut self, unit: UnitId) -> bool {
        if self.contains(unit) {
            false
        } else {
            self.0.push(unit);
            true
        }
    }

    /// Returns `false` if the unit wasn't present. Order of the remaining units
    /// is preserved.
    pub fn remove(&mut self, unit: UnitId) -> bool {
        match self.0.iter().position(|other| *other == unit) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }
}

/// One element of a [NodeMap]
#[derive(Clone, Debug)]
pub struct Node<C> {
    coord: C,
    /// Undirected and deduplicated. Kept in insertion order so that searches
    /// over this graph are reproducible.
    neighbours: IndexSet<C>,
    occupants: Occupants,
}

impl<C: Copy + Eq + Hash> Node<C> {
    fn new(coord: C) -> Self {
        Self {
            coord,
            neighbours: IndexSet::new(),
            occupants: Occupants::default(),
        }
    }

    pub fn coord(&self) -> C {
        self.coord
    }

    pub fn neighbours(&self) -> impl Iterator<Item = C> + '_ {
        self.neighbours.iter().copied()
    }

    pub fn occupants(&self) -> &[UnitId] {
        self.occupants.as_slice()
    }
}

/// A generic undirected graph of nodes keyed by coordinate. Each node holds
/// its set of neighbours and a list of occupant units.
#[derive(Clone, Debug)]
pub struct NodeMap<C: Copy + Eq + Hash> {
    nodes: IndexMap<C, Node<C>>,
}

impl<C: Copy + Eq + Hash> Default for NodeMap<C> {
    fn default() -> Self {
        Self {
            nodes: IndexMap::new(),
        }
    }
}

impl<C: Copy + Eq + Hash + Debug> NodeMap<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unconnected node. Returns `false` (and leaves the existing node
    /// alone) if there's already a node at that coordinate.
    pub fn add_node(&mut self, coord: C) -> bool {
        if self.nodes.contains_key(&coord) {
            false
        } else {
            self.nodes.insert(coord, Node::new(coord));
            true
        }
    }

    pub fn node(&self, coord: C) -> Option<&Node<C>> {
        self.nodes.get(&coord)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Connect two nodes in both directions. Returns `false` if either node
    /// doesn't exist, if they're the same node, or if they were already
    /// connected.
    pub fn connect(&mut self, a: C, b: C) -> bool {
        if a == b || !self.nodes.contains_key(&a) || !self.nodes.contains_key(&b)
        {
            return false;
        }
        let inserted = match self.nodes.get_mut(&a) {
            Some(node) => node.neighbours.insert(b),
            None => false,
        };
        if let Some(node) = self.nodes.get_mut(&b) {
            node.neighbours.insert(a);
        }
        inserted
    }

    /// Add a unit to a node. Returns `false` if the node doesn't exist or the
    /// unit is already there.
    pub fn add_occupant(&mut self, coord: C, unit: UnitId) -> bool {
        match self.nodes.get_mut(&coord) {
            Some(node) => node.occupants.add(unit),
            None => false,
        }
    }

    /// Remove a unit from a node. Returns `false` if the node doesn't exist or
    /// the unit isn't there.
    pub fn remove_occupant(&mut self, coord: C, unit: UnitId) -> bool {
        match self.nodes.get_mut(&coord) {
            Some(node) => node.occupants.remove(unit),
            None => false,
        }
    }

    /// Units at the given node. Empty for absent nodes.
    pub fn occupants(&self, coord: C) -> &[UnitId] {
        self.nodes
            .get(&coord)
            .map(Node::occupants)
            .unwrap_or_default()
    }
}

impl<C: Copy + Eq + Hash + Debug> NodeGraph for NodeMap<C> {
    type Coord = C;

    fn contains(&self, coord: C) -> bool {
        self.nodes.contains_key(&coord)
    }

    fn neighbours(&self, coord: C) -> Vec<C> {
        self.nodes
            .get(&coord)
            .map(|node| node.neighbours().collect())
            .unwrap_or_default()
    }
}
