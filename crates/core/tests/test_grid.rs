use rand::{seq::SliceRandom, SeedableRng};
use rand_pcg::Pcg64;
use std::collections::BTreeSet;
use trigrid::{
    grid::Tiling, Direction, Grid, GridError, TriAddress, Triangle,
    VertexPoint,
};

/// Everything about a tiling that should be the same no matter what order the
/// faces were given in. IDs are arena positions, so they're swapped out for
/// addresses and lattice points.
#[derive(Debug, PartialEq, Eq)]
struct Topology {
    faces: BTreeSet<(TriAddress, Vec<(Direction, TriAddress)>)>,
    corners: BTreeSet<(TriAddress, Vec<(Direction, VertexPoint)>)>,
    vertices: BTreeSet<(VertexPoint, Vec<(Direction, TriAddress)>)>,
}

impl Topology {
    fn of(tiling: &Tiling) -> Self {
        let address = |id| tiling.triangle(id).address();
        let point = |id| tiling.vertex(id).point();
        Self {
            faces: tiling
                .triangles()
                .iter()
                .map(|t| {
                    let links =
                        t.neighbours().iter().map(|(d, id)| (d, address(id)));
                    (t.address(), links.collect())
                })
                .collect(),
            corners: tiling
                .triangles()
                .iter()
                .map(|t| {
                    let links =
                        t.vertices().iter().map(|(d, id)| (d, point(id)));
                    (t.address(), links.collect())
                })
                .collect(),
            vertices: tiling
                .vertices()
                .iter()
                .map(|v| {
                    let links =
                        v.triangles().iter().map(|(d, id)| (d, address(id)));
                    (v.point(), links.collect())
                })
                .collect(),
        }
    }
}

fn board_addresses(width: usize, height: usize) -> Vec<TriAddress> {
    let grid: Grid = Grid::new(width, height).unwrap();
    grid.triangles().iter().map(Triangle::address).collect()
}

fn tile(addresses: &[TriAddress]) -> Tiling {
    Tiling::tile(addresses.iter().map(|address| Triangle::new(*address, ())))
        .unwrap()
}

#[test]
fn test_grid_size() {
    for (width, height) in [(2, 2), (2, 3), (3, 2), (7, 4), (100, 50)] {
        let grid: Grid = Grid::new(width, height).unwrap();
        assert_eq!(
            grid.triangles().len(),
            2 * (width - 1) * (height - 1),
            "{}x{}",
            width,
            height
        );
        assert_eq!(grid.vertices().len(), width * height);
    }
}

#[test]
fn test_invalid_dimensions() {
    assert_eq!(
        Grid::<()>::new(1, 10).unwrap_err(),
        GridError::InvalidDimensions {
            width: 1,
            height: 10
        }
    );
    assert_eq!(
        Grid::<()>::new(10, 0).unwrap_err(),
        GridError::InvalidDimensions {
            width: 10,
            height: 0
        }
    );
}

#[test]
fn test_shared_vertices() {
    let grid: Grid = Grid::new(8, 6).unwrap();

    for triangle in grid.triangles() {
        assert_eq!(triangle.vertices().len(), 3);
        for (direction, neighbour) in triangle.neighbours().iter() {
            let neighbour = grid.triangle(neighbour);
            assert_eq!(
                neighbour.address(),
                triangle.address().adjacent(direction).unwrap()
            );
            // Both ends of the shared edge are the same vertex from either
            // side
            let opposite = direction.opposite();
            assert_eq!(
                triangle.vertex(direction.clockwise()),
                neighbour.vertex(opposite.counter_clockwise())
            );
            assert_eq!(
                triangle.vertex(direction.counter_clockwise()),
                neighbour.vertex(opposite.clockwise())
            );
        }
    }

    // Interior vertices are surrounded, boundary vertices aren't
    for y in 0..6 {
        for x in 0..8 {
            let vertex = grid.vertex_at(VertexPoint::new(x, y)).unwrap();
            let interior = x > 0 && x < 7 && y > 0 && y < 5;
            if interior {
                assert_eq!(vertex.triangles().len(), 6, "[{}, {}]", x, y);
            } else {
                assert!(vertex.triangles().len() < 6, "[{}, {}]", x, y);
                assert!(!vertex.triangles().is_empty(), "[{}, {}]", x, y);
            }
        }
    }
}

#[test]
fn test_tiling_order_independence() {
    let addresses = board_addresses(9, 7);
    let expected = Topology::of(&tile(&addresses));

    let mut reversed = addresses.clone();
    reversed.reverse();
    assert_eq!(Topology::of(&tile(&reversed)), expected);

    for seed in 0..20 {
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut shuffled = addresses.clone();
        shuffled.shuffle(&mut rng);
        let tiling = tile(&shuffled);
        assert_eq!(tiling.vertices().len(), 9 * 7, "seed {}", seed);
        assert_eq!(Topology::of(&tiling), expected, "seed {}", seed);
    }
}

#[test]
fn test_tiling_irregular_shape() {
    // A board with holes in it, so some vertices have gaps in their fans
    let mut rng = Pcg64::seed_from_u64(7);
    let mut addresses = board_addresses(10, 10);
    addresses.shuffle(&mut rng);
    addresses.truncate(addresses.len() * 2 / 3);

    let expected = Topology::of(&tile(&addresses));
    for _ in 0..10 {
        addresses.shuffle(&mut rng);
        assert_eq!(Topology::of(&tile(&addresses)), expected);
    }
}

#[test]
fn test_retile_grid_faces() {
    let grid: Grid = Grid::new(4, 4).unwrap();

    // A pair of faces lifted out of a built grid still carries its links
    let pair: Vec<Triangle> =
        grid.triangles().iter().skip(5).take(2).cloned().collect();
    let addresses: Vec<TriAddress> =
        pair.iter().map(Triangle::address).collect();
    let retiled = Tiling::tile(pair).unwrap();
    assert_eq!(Topology::of(&retiled), Topology::of(&tile(&addresses)));

    let retiled = Tiling::tile(grid.triangles().iter().cloned()).unwrap();
    assert_eq!(
        Topology::of(&retiled),
        Topology::of(&tile(&board_addresses(4, 4)))
    );
}

#[test]
fn test_grid_matches_tiling() {
    let grid: Grid = Grid::new(5, 5).unwrap();
    for triangle in grid.triangles() {
        let found = grid.triangle_at(triangle.address()).unwrap();
        assert_eq!(found.address(), triangle.address());
        for (direction, vertex) in triangle.vertices().iter() {
            let point = triangle.address().vertex_point(direction).unwrap();
            assert_eq!(grid.vertex_id_at(point), Some(vertex));
        }
    }
}
