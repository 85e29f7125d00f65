use grid_graph_search::{Command, Pathfinder, SearchKind, SearchState, Vec2};

// In this example a search is driven one step at a time through commands, the way an
// interactive front end would advance it once per frame. Requests made while the search is
// in flight are dropped.
fn main() {
    let mut pathfinder = Pathfinder::new(9, 9, Vec2::new(100.0, 50.0), Vec2::new(2.0, 2.0)).unwrap();
    let commands = [
        Command::SelectSource(Vec2::new(92.0, 42.0)),
        Command::ToggleTarget(Vec2::new(108.0, 58.0)),
        Command::ToggleObstacle(Vec2::new(100.0, 50.0)),
        Command::ToggleObstacle(Vec2::new(102.0, 52.0)),
        Command::ToggleObstacle(Vec2::new(98.0, 48.0)),
        Command::SetKind(SearchKind::AStar),
        Command::RequestSearch,
    ];
    for command in commands {
        println!("{:?}: {}", command, pathfinder.handle(command));
    }
    let mut frame = 0;
    while pathfinder.state() == SearchState::Computing {
        frame += 1;
        if frame == 2 {
            let accepted = pathfinder.handle(Command::RequestSearch);
            println!("Second request while computing accepted: {}", accepted);
        }
        pathfinder.step().unwrap();
    }
    println!("Search finished after {} frames", frame);
    println!("{}", pathfinder);
}
