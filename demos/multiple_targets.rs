use grid_graph_search::{Pathfinder, SearchKind, Vec2};
use grid_util::point::Point;

// In this example paths to three targets on a 6x4 grid are found with a single Dijkstra
// pass and compared against one A* search per target. The grid has shape
// .....T
// .###..
// S..#.T
// ...#T.
// where
// - \# marks an obstacle
// - S marks the source
// - T marks a target
fn main() {
    let mut pathfinder = Pathfinder::new(6, 4, Vec2::ZERO, Vec2::ONE).unwrap();
    for p in [(1, 2), (2, 2), (3, 2), (3, 1), (3, 0)] {
        pathfinder.toggle_obstacle(Point::new(p.0, p.1));
    }
    pathfinder.select_source(Point::new(0, 1));
    for p in [(5, 3), (5, 1), (4, 0)] {
        pathfinder.toggle_target(Point::new(p.0, p.1));
    }
    println!("{}", pathfinder);
    for kind in [SearchKind::Dijkstra, SearchKind::AStar] {
        let outcome = pathfinder.search(kind).unwrap().unwrap();
        println!("{:?} finished after {} steps", kind, outcome.steps);
        for (target, path) in outcome.targets.iter().zip(&outcome.paths) {
            let cost = outcome.costs.get(target).copied().unwrap_or(f32::INFINITY);
            println!("  {} ({:.3}): {:?}", target, cost, path);
        }
    }
}
