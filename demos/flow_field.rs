use grid_graph_search::{Cell, Pathfinder, Vec2};
use grid_util::point::Point;

// In this example a flow field towards the centre of a 7x7 grid is computed and drawn with
// one arrow per cell. Blocked cells are drawn as #, the source as S.
fn arrow(direction: Point) -> char {
    match (direction.x, direction.y) {
        (0, 1) => '↑',
        (0, -1) => '↓',
        (1, 0) => '→',
        (-1, 0) => '←',
        (1, 1) => '↗',
        (-1, 1) => '↖',
        (1, -1) => '↘',
        _ => '↙',
    }
}

fn main() {
    let mut pathfinder = Pathfinder::new(7, 7, Vec2::ZERO, Vec2::ONE).unwrap();
    for y in 1..6 {
        pathfinder.toggle_obstacle(Point::new(4, y));
    }
    pathfinder.select_source(Point::new(3, 3));
    pathfinder.flow_field().unwrap();

    let mut rows = vec![vec![' '; 7]; 7];
    let overlay = pathfinder.overlay();
    pathfinder.render(&mut |cell: &Cell, _: bool, _: Option<f32>, direction: Option<Point>| {
        let c = match direction {
            Some(direction) => arrow(direction),
            None if !overlay.is_valid(&cell.coord) => '#',
            None => 'S',
        };
        rows[cell.coord.y as usize][cell.coord.x as usize] = c;
    });
    for row in rows.iter().rev() {
        println!("{}", row.iter().collect::<String>());
    }
}
