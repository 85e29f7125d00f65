use grid_graph_search::{search, Graph, SearchKind, SearchResult};

// In this example the search functions run on a hand-built graph of named places instead of a
// grid. Edges are directed; the ferry only runs one way.
fn main() {
    let mut graph = Graph::new();
    for (from, to) in [
        ("harbour", "market"),
        ("market", "harbour"),
        ("market", "station"),
        ("station", "market"),
        ("harbour", "island"),
        ("station", "airport"),
        ("airport", "station"),
    ] {
        graph.add_edge(from, to);
    }
    let minutes = |from: &&str, to: &&str| match (*from, *to) {
        ("harbour", "market") | ("market", "harbour") => 5.0,
        ("market", "station") | ("station", "market") => 12.0,
        ("harbour", "island") => 30.0,
        ("station", "airport") | ("airport", "station") => 25.0,
        _ => f64::INFINITY,
    };
    let targets = ["airport", "island"];
    for kind in SearchKind::ALL {
        let result = search(kind, &graph, &"harbour", &targets, minutes, |_, _| 0.0).unwrap();
        println!("{:?}: {:?}", kind, result.paths());
    }
    if let SearchResult::Field(field) =
        search(SearchKind::Dijkstra, &graph, &"airport", &[], minutes, |_, _| 0.0).unwrap()
    {
        for (place, next) in field.iter() {
            println!("From {} head to {}", place, next);
        }
    }
}
