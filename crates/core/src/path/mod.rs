//! Best-first (A*) pathfinding over any graph that can list the neighbours of
//! a coordinate. The search knows nothing about triangles or vertices; a
//! [Grid](crate::Grid) exposes its faces and vertices through [NodeGraph]
//! views, and [NodeMap] covers free-form graphs.
//!
//! ## Termination
//!
//! The search returns as soon as the destination is *discovered* as a
//! neighbour of the node being expanded, rather than when it's popped from
//! the open set. With an admissible heuristic and uniform costs this is still
//! the shortest path. With anything else it can return a longer path than
//! necessary.
//!
//! ## Tie-breaking
//!
//! The open set is kept in insertion order. When several open nodes share the
//! lowest estimated total cost, the one that was opened first wins. A node
//! whose cost improves while it's open keeps its original position. Given the
//! same graph (with the same neighbour ordering), a search always returns the
//! same path.

mod node;

pub use self::node::*;

use crate::{config::SearchConfig, grid::Planar};
use fnv::{FnvHashMap, FnvHashSet};
use indexmap::IndexMap;
use log::{debug, trace};
use std::{fmt::Debug, hash::Hash};

/// The minimal capability the path planner needs from a graph
pub trait NodeGraph {
    /// Identifies a node. Paths are returned as a sequence of these.
    type Coord: Copy + Eq + Hash + Debug;

    /// Does this graph have a node at the given coordinate?
    fn contains(&self, coord: Self::Coord) -> bool;

    /// All nodes directly reachable from the given one. Order matters: it
    /// determines which path wins between equal-cost candidates. Empty if the
    /// node doesn't exist.
    fn neighbours(&self, coord: Self::Coord) -> Vec<Self::Coord>;
}

/// Straight-line distance between two positioned values. This is the default
/// for both the heuristic and the edge cost.
pub fn euclidean<C: Planar>(a: C, b: C) -> f64 {
    nalgebra::distance(&a.position(), &b.position())
}

/// A reusable A* searcher. Holds nothing but configuration, so one instance
/// can be shared across threads and used for any number of concurrent
/// searches.
#[derive(Copy, Clone, Debug, Default)]
pub struct PathFinder {
    config: SearchConfig,
}

impl PathFinder {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Find a path from `start` to `end`. The returned path begins with the
    /// first step after `start` and ends with `end`. It's empty if `start`
    /// and `end` are the same, if either isn't in the graph, if there's no
    /// route between them, or if the search gives up after
    /// [SearchConfig::max_expansions] nodes. None of those are errors.
    ///
    /// `heuristic(node, end)` estimates the remaining cost from a node.
    /// `cost(from, to)` is the price of one step between neighbours; return
    /// [f64::INFINITY] for a step that can't be taken.
    pub fn find_path<G, H, F>(
        &self,
        graph: &G,
        start: G::Coord,
        end: G::Coord,
        heuristic: H,
        cost: F,
    ) -> Vec<G::Coord>
    where
        G: NodeGraph,
        H: Fn(G::Coord, G::Coord) -> f64,
        F: Fn(G::Coord, G::Coord) -> f64,
    {
        if start == end || !graph.contains(start) || !graph.contains(end) {
            return Vec::new();
        }

        // Estimated total cost of each open node, in insertion order
        let mut open: IndexMap<G::Coord, f64> = IndexMap::new();
        // Best known cost from the start to each node
        let mut costs: FnvHashMap<G::Coord, f64> = FnvHashMap::default();
        let mut came_from: FnvHashMap<G::Coord, G::Coord> =
            FnvHashMap::default();
        let mut closed: FnvHashSet<G::Coord> = FnvHashSet::default();

        open.insert(start, heuristic(start, end));
        costs.insert(start, 0.0);

        let mut expansions = 0;
        while let Some(current) = pop_lowest(&mut open) {
            if expansions >= self.config.max_expansions {
                debug!(
                    "Giving up search from {:?} to {:?} after {} expansions",
                    start, end, expansions
                );
                return Vec::new();
            }
            expansions += 1;
            closed.insert(current);

            let current_cost = costs[&current];
            for neighbour in graph.neighbours(current) {
                if closed.contains(&neighbour) {
                    continue;
                }
                let step_cost = cost(current, neighbour);
                // Impassable
                if !step_cost.is_finite() {
                    continue;
                }

                let tentative = current_cost + step_cost;
                let improved = match costs.get(&neighbour) {
                    Some(known) => tentative < *known,
                    None => true,
                };
                if !improved {
                    continue;
                }

                costs.insert(neighbour, tentative);
                came_from.insert(neighbour, current);
                if neighbour == end {
                    trace!(
                        "Found path from {:?} to {:?} after {} expansions",
                        start,
                        end,
                        expansions
                    );
                    return reconstruct_path(&came_from, start, end);
                }

                let estimate = tentative + heuristic(neighbour, end);
                match open.get_mut(&neighbour) {
                    Some(existing) => *existing = estimate,
                    None => {
                        open.insert(neighbour, estimate);
                    }
                }
            }
        }

        Vec::new()
    }

    /// [Self::find_path] with straight-line distance as both the heuristic
    /// and the edge cost
    pub fn find_path_euclidean<G>(
        &self,
        graph: &G,
        start: G::Coord,
        end: G::Coord,
    ) -> Vec<G::Coord>
    where
        G: NodeGraph,
        G::Coord: Planar,
    {
        self.find_path(graph, start, end, euclidean, euclidean)
    }
}

/// Search with the default [SearchConfig]. See [PathFinder::find_path].
pub fn find_path<G, H, F>(
    graph: &G,
    start: G::Coord,
    end: G::Coord,
    heuristic: H,
    cost: F,
) -> Vec<G::Coord>
where
    G: NodeGraph,
    H: Fn(G::Coord, G::Coord) -> f64,
    F: Fn(G::Coord, G::Coord) -> f64,
{
    PathFinder::default().find_path(graph, start, end, heuristic, cost)
}

/// Search with the default [SearchConfig] and Euclidean heuristic/cost
pub fn find_path_euclidean<G>(
    graph: &G,
    start: G::Coord,
    end: G::Coord,
) -> Vec<G::Coord>
where
    G: NodeGraph,
    G::Coord: Planar,
{
    PathFinder::default().find_path_euclidean(graph, start, end)
}

/// Remove and return the open node with the lowest estimate. On a tie, the
/// earliest inserted node wins.
fn pop_lowest<C: Copy + Eq + Hash>(open: &mut IndexMap<C, f64>) -> Option<C> {
    let mut lowest: Option<(usize, f64)> = None;
    for (i, (_, estimate)) in open.iter().enumerate() {
        match lowest {
            Some((_, best)) if *estimate >= best => {}
            _ => lowest = Some((i, *estimate)),
        }
    }
    let (index, _) = lowest?;
    // Shift rather than swap, to keep insertion order intact
    open.shift_remove_index(index).map(|(coord, _)| coord)
}

/// Walk the predecessor chain back from `end`. The result excludes `start`.
fn reconstruct_path<C: Copy + Eq + Hash>(
    came_from: &FnvHashMap<C, C>,
    start: C,
    end: C,
) -> Vec<C> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(previous) = came_from.get(&current) {
        if *previous == start {
            break;
        }
        path.push(*previous);
        current = *previous;
    }
    path.reverse();
    path
}
