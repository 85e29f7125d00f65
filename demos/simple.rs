use grid_graph_search::{Pathfinder, SearchKind, Vec2};
use grid_util::point::Point;

// In this example a path is found on a 5x5 grid with shape
// ....T
// .....
// ##.##
// .....
// S....
// S marks the source
// T marks the target
// The only way across the wall is the gap in the middle.
fn main() {
    let mut pathfinder = Pathfinder::new(5, 5, Vec2::ZERO, Vec2::ONE).unwrap();
    for x in [0, 1, 3, 4] {
        pathfinder.toggle_obstacle(Point::new(x, 2));
    }
    pathfinder.select_source(Point::new(0, 0));
    pathfinder.toggle_target(Point::new(4, 4));
    if let Some(outcome) = pathfinder.search(SearchKind::AStar).unwrap() {
        println!("A path has been found:");
        for p in &outcome.paths[0] {
            println!("{:?}", p);
        }
    }
    println!("{}", pathfinder);
}
