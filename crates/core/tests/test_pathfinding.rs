use std::thread;
use trigrid::{
    euclidean, find_path, find_path_euclidean, Grid, GridConfig, NodeGraph,
    SearchConfig, TriAddress, VertexPoint,
};

/// Check that a path is made of legal steps from `start` and ends at `end`
fn assert_walkable<G: NodeGraph>(
    graph: &G,
    start: G::Coord,
    end: G::Coord,
    path: &[G::Coord],
) {
    assert_eq!(path.last(), Some(&end), "path doesn't reach {:?}", end);
    let mut previous = start;
    for step in path {
        assert!(
            graph.neighbours(previous).contains(step),
            "{:?} -> {:?} is not a legal step",
            previous,
            step
        );
        previous = *step;
    }
}

#[test]
fn test_vertex_path_straight_row() {
    let grid: Grid = Grid::new(6, 4).unwrap();
    let path = find_path_euclidean(
        &grid.vertex_graph(),
        VertexPoint::new(0, 0),
        VertexPoint::new(4, 0),
    );
    assert_eq!(
        path,
        vec![
            VertexPoint::new(1, 0),
            VertexPoint::new(2, 0),
            VertexPoint::new(3, 0),
            VertexPoint::new(4, 0),
        ]
    );
}

#[test]
fn test_vertex_path_across_board() {
    let grid: Grid = Grid::new(15, 12).unwrap();
    let graph = grid.vertex_graph();
    let start = VertexPoint::new(0, 0);
    let end = VertexPoint::new(14, 11);

    let path = find_path_euclidean(&graph, start, end);
    assert_walkable(&graph, start, end, &path);
    // Can't do better than one lattice step per row or column
    assert!(path.len() >= 14);

    // Same search, same answer
    for _ in 0..5 {
        assert_eq!(find_path_euclidean(&graph, start, end), path);
    }
}

#[test]
fn test_face_path() {
    let grid: Grid = Grid::new(10, 10).unwrap();
    let graph = grid.face_graph();
    let start = VertexPoint::new(0, 0).north_east_triangle();
    let end = VertexPoint::new(7, 8).north_triangle();
    assert!(graph.contains(start));
    assert!(graph.contains(end));

    let path = find_path_euclidean(&graph, start, end);
    assert_walkable(&graph, start, end, &path);
    // Every step moves one hop, so the path can't beat the hop distance
    assert!(path.len() as u64 >= start.distance_to(end));
}

#[test]
fn test_face_path_off_board() {
    let grid: Grid = Grid::new(4, 4).unwrap();
    let graph = grid.face_graph();
    let start = VertexPoint::new(0, 0).north_east_triangle();
    let off_board = TriAddress::new(50, -20, -29).unwrap();
    assert!(find_path_euclidean(&graph, start, off_board).is_empty());
    assert!(find_path_euclidean(&graph, start, start).is_empty());
}

#[test]
fn test_weighted_face_path() {
    let grid: Grid = Grid::new(8, 3).unwrap();
    let graph = grid.face_graph();
    let start = VertexPoint::new(0, 0).north_east_triangle();
    let end = VertexPoint::new(6, 0).north_east_triangle();

    // Wall off every face in the middle columns of the bottom row, so the path
    // has to climb over it
    let blocked: Vec<TriAddress> = (2..5)
        .flat_map(|x| {
            let point = VertexPoint::new(x, 0);
            [point.north_east_triangle(), point.north_triangle()]
        })
        .collect();
    let cost = |from: TriAddress, to: TriAddress| {
        if blocked.contains(&to) {
            f64::INFINITY
        } else {
            euclidean(from, to)
        }
    };

    let path = find_path(&graph, start, end, euclidean, cost);
    assert_walkable(&graph, start, end, &path);
    assert!(path.iter().all(|step| !blocked.contains(step)));
}

#[test]
fn test_search_limit_from_config() {
    let config = GridConfig {
        width: 30,
        height: 30,
        search: SearchConfig { max_expansions: 3 },
    };
    let grid: Grid = Grid::from_config(&config).unwrap();
    let graph = grid.vertex_graph();
    let start = VertexPoint::new(0, 0);

    let finder = grid.path_finder();
    assert!(finder
        .find_path_euclidean(&graph, start, VertexPoint::new(29, 29))
        .is_empty());
    assert_eq!(
        finder.find_path_euclidean(&graph, start, VertexPoint::new(1, 0)),
        vec![VertexPoint::new(1, 0)]
    );
}

#[test]
fn test_parallel_searches() {
    let grid: Grid = Grid::new(20, 20).unwrap();
    let graph = &grid.vertex_graph();
    let start = VertexPoint::new(0, 0);
    let end = VertexPoint::new(19, 19);
    let expected = find_path_euclidean(graph, start, end);
    assert!(!expected.is_empty());

    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(move || find_path_euclidean(graph, start, end))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
