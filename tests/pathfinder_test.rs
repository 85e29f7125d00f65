/// Drives a [Pathfinder] through commands and checks the published outcomes against direct
/// calls into the search functions.
use grid_graph_search::{
    pathfinder::octile_distance, search, search::path_cost, Command, Graph, Grid,
    ObstacleOverlay, Pathfinder, SearchKind, SearchResult, SearchState, Vec2, DIAGONAL_COST,
};
use grid_util::point::Point;
use rand::prelude::*;

fn world(pf: &Pathfinder, p: Point) -> Vec2 {
    pf.grid().cell(p).unwrap().world
}

fn random_pathfinder(n: i32, rng: &mut StdRng) -> Pathfinder {
    let mut pf = Pathfinder::new(n, n, Vec2::new(10.0, -3.0), Vec2::new(0.5, 2.0)).unwrap();
    for x in 0..n {
        for y in 0..n {
            if rng.gen_bool(0.3) {
                pf.toggle_obstacle(Point::new(x, y));
            }
        }
    }
    pf
}

#[test]
fn commands_match_direct_search() {
    const N: i32 = 7;
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..200 {
        let mut pf = random_pathfinder(N, &mut rng);
        let source = Point::new(rng.gen_range(0..N), rng.gen_range(0..N));
        if !pf.overlay().is_valid(&source) {
            continue;
        }
        assert!(pf.handle(Command::SelectSource(world(&pf, source))));
        for _ in 0..3 {
            let target = Point::new(rng.gen_range(0..N), rng.gen_range(0..N));
            let position = world(&pf, target);
            pf.handle(Command::ToggleTarget(position));
        }
        let targets = pf.targets().copied().collect::<Vec<_>>();
        if targets.is_empty() {
            continue;
        }
        for kind in SearchKind::ALL {
            assert!(pf.handle(Command::SetKind(kind)));
            assert!(pf.handle(Command::RequestSearch));
            while pf.step().unwrap() == SearchState::Computing {}
            let outcome = pf.outcome().unwrap().clone();
            assert_eq!(outcome.targets, targets);

            let cost = pf.overlay().cost_fn(DIAGONAL_COST);
            let direct = search(kind, pf.graph(), &source, &targets, &cost, |p: &Point, t: &Point| {
                octile_distance(p, t, DIAGONAL_COST)
            })
            .unwrap();
            assert_eq!(outcome.paths, direct.paths(), "{kind:?}");
            for (path, target) in outcome.paths.iter().zip(&targets) {
                assert_eq!(path.is_empty(), pf.overlay().unreachable(&source, target));
            }
        }
    }
}

#[test]
fn blocked_row_cuts_every_kind() {
    let grid = Grid::new(5, 5, Vec2::ZERO, Vec2::ONE).unwrap();
    let graph = grid.to_graph();
    let mut overlay = ObstacleOverlay::for_grid(&grid);
    for x in 0..5 {
        overlay.set_valid(Point::new(x, 2), false);
    }
    let (source, target) = (Point::new(0, 0), Point::new(4, 4));
    let cost = overlay.cost_fn(DIAGONAL_COST);
    for kind in SearchKind::ALL {
        let result = search(kind, &graph, &source, &[target], &cost, |p: &Point, t: &Point| {
            octile_distance(p, t, DIAGONAL_COST)
        })
        .unwrap();
        assert_eq!(result.paths(), &[Vec::<Point>::new()], "{kind:?}");
    }

    // Reopening one cell of the row lets every kind through that cell
    overlay.set_valid(Point::new(2, 2), true);
    let cost = overlay.cost_fn(DIAGONAL_COST);
    for kind in SearchKind::ALL {
        let result = search(kind, &graph, &source, &[target], &cost, |p: &Point, t: &Point| {
            octile_distance(p, t, DIAGONAL_COST)
        })
        .unwrap();
        let path = &result.paths()[0];
        assert_eq!(path.first(), Some(&source), "{kind:?}");
        assert_eq!(path.last(), Some(&target), "{kind:?}");
        assert!(path.contains(&Point::new(2, 2)), "{kind:?}");
        assert!(path.iter().all(|p| overlay.is_valid(p)), "{kind:?}");
    }
}

/// A* with the octile heuristic must stay optimal whatever the diagonal move costs, and with
/// a zero heuristic factor it degrades to Dijkstra.
#[test]
fn astar_matches_dijkstra_for_any_diagonal_cost() {
    const N: i32 = 6;
    let mut rng = StdRng::seed_from_u64(5);
    for (diagonal_cost, heuristic_factor) in [(0.5, 1.0), (1.0, 1.0), (3.0, 1.0), (DIAGONAL_COST, 0.0)] {
        for _ in 0..500 {
            let mut pf = random_pathfinder(N, &mut rng);
            pf.diagonal_cost = diagonal_cost;
            pf.heuristic_factor = heuristic_factor;
            let source = Point::new(rng.gen_range(0..N), rng.gen_range(0..N));
            let target = Point::new(rng.gen_range(0..N), rng.gen_range(0..N));
            if source == target || !pf.overlay().is_valid(&source) || !pf.overlay().is_valid(&target) {
                continue;
            }
            pf.select_source(source);
            pf.toggle_target(target);
            let cost = pf.overlay().cost_fn(diagonal_cost);
            let astar = pf.search(SearchKind::AStar).unwrap().cloned().unwrap();
            let dijkstra = pf.search(SearchKind::Dijkstra).unwrap().cloned().unwrap();
            assert_eq!(astar.paths[0].is_empty(), dijkstra.paths[0].is_empty());
            let (a, d) = (path_cost(&astar.paths[0], &cost), path_cost(&dijkstra.paths[0], &cost));
            assert!(
                (a - d).abs() <= 1e-4,
                "{source} -> {target} with diagonal cost {diagonal_cost}: A* {a}, Dijkstra {d}"
            );
        }
    }
}

#[test]
fn stepped_and_batch_searches_agree() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..100 {
        let mut pf = random_pathfinder(6, &mut rng);
        pf.select_source(Point::new(0, 0));
        if !pf.overlay().is_valid(&Point::new(0, 0)) {
            pf.toggle_obstacle(Point::new(0, 0));
        }
        pf.toggle_target(Point::new(5, 5));
        pf.toggle_target(Point::new(5, 0));
        if pf.targets().count() == 0 {
            continue;
        }
        for kind in SearchKind::ALL {
            let batch = pf.search(kind).unwrap().cloned();
            assert!(pf.begin_search(kind));
            let mut steps = 0;
            while pf.step().unwrap() == SearchState::Computing {
                steps += 1;
                // The previous outcome stays published until the new one completes
                assert_eq!(pf.outcome().cloned(), batch);
            }
            assert_eq!(pf.outcome().cloned(), batch);
            // Targets outside the source's component are answered without stepping
            assert!(batch.map_or(0, |o| o.steps) <= steps + 1);
        }
    }
}

#[test]
fn generic_search_over_strings() {
    let mut graph = Graph::new();
    for (from, to) in [
        ("home", "park"),
        ("park", "shop"),
        ("home", "road"),
        ("road", "shop"),
        ("shop", "work"),
    ] {
        graph.add_edge(from.to_owned(), to.to_owned());
    }
    let cost = |from: &String, to: &String| match (from.as_str(), to.as_str()) {
        ("home", "park") => 4.0,
        ("park", "shop") => 4.0,
        _ => 1.0,
    };
    let targets = ["work".to_owned(), "park".to_owned()];
    let home = "home".to_owned();
    for kind in [SearchKind::AStar, SearchKind::Dijkstra] {
        let result = search(kind, &graph, &home, &targets, cost, |_, _| 0.0).unwrap();
        assert_eq!(
            result.paths()[0],
            ["home", "road", "shop", "work"].map(String::from)
        );
        assert_eq!(result.paths()[1], ["home", "park"].map(String::from));
    }
    match search(SearchKind::Dijkstra, &graph, &"work".to_owned(), &[], cost, |_, _| 0.0).unwrap() {
        SearchResult::Field(field) => assert!(field.is_empty()),
        SearchResult::Paths(_) => panic!("expected a field"),
    }
    assert!(search(SearchKind::BreadthFirst, &graph, &"nowhere".to_owned(), &targets, cost, |_, _| 0.0).is_err());
}
