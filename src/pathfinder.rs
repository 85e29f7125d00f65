//! Orchestration of searches over a grid with an obstacle overlay.
//!
//! A [Pathfinder] owns the [Grid], its [Graph] and the [ObstacleOverlay] and turns a stream of
//! [Command]s into searches. At most one search is in flight: while [SearchState::Computing],
//! further search requests and obstacle toggles are dropped. A search is advanced with
//! [Pathfinder::step] one expanded node at a time, or run to completion with
//! [Pathfinder::finish], and its [SearchOutcome] is only published once it has completed.
use crate::{
    cell::{Cell, Vec2},
    error::{GraphError, GridError},
    graph::Graph,
    grid::Grid,
    overlay::ObstacleOverlay,
    search::{
        astar::AstarSearch,
        dijkstra::{DijkstraSearch, ShortestPaths},
        flow_field::FlowField,
        traversal::{Order, Traversal},
        SearchKind, Searcher, Step,
    },
    FxIndexMap, FxIndexSet, CARDINAL_COST, DIAGONAL_COST,
};
use core::fmt;
use fxhash::FxHashSet;
use grid_util::point::Point;
use log::{debug, info, warn};

type CostFn = Box<dyn Fn(&Point, &Point) -> f32>;
type PassableFn = Box<dyn Fn(&Point) -> bool>;
type EdgeFn = Box<dyn Fn(&Point, &Point) -> bool>;
type HeuristicFn = Box<dyn Fn(&Point) -> f32>;

/// Octile distance between two cells. Straight steps are priced at most a diagonal and
/// diagonal steps at most two straight ones, so the estimate is consistent for any
/// non-negative `diagonal_cost`. On an empty grid it is exact when `diagonal_cost` lies
/// between [CARDINAL_COST] and twice that.
pub fn octile_distance(a: &Point, b: &Point, diagonal_cost: f32) -> f32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    let straight = CARDINAL_COST.min(diagonal_cost);
    let diagonal = diagonal_cost.min(2.0 * straight);
    straight * (dx - dy).abs() as f32 + diagonal * dx.min(dy) as f32
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchState {
    #[default]
    Idle,
    Computing,
}

/// Input to a [Pathfinder], decoupled from whatever device produced it. Positions are in
/// world space and resolve to the cell containing them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    SelectSource(Vec2),
    ToggleTarget(Vec2),
    ToggleObstacle(Vec2),
    /// Selects the strategy used by the next [Command::RequestSearch].
    SetKind(SearchKind),
    RequestSearch,
    /// A Dijkstra pass from the source to every reachable cell, targets or not.
    RequestFlowField,
}

/// The published result of the most recent completed search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    pub kind: SearchKind,
    pub source: Point,
    pub targets: Vec<Point>,
    /// One path per target, in target order. Unreachable targets have empty paths.
    pub paths: Vec<Vec<Point>>,
    /// Cost from the source of every cell the search reached: the cumulative cost for
    /// Dijkstra and the `g` cost for A*. Unweighted searches record no costs.
    pub costs: FxIndexMap<Point, f32>,
    /// Only present for Dijkstra searches.
    pub field: Option<FlowField<Point>>,
    /// Number of search steps taken.
    pub steps: usize,
}

impl SearchOutcome {
    pub fn path_to(&self, target: &Point) -> Option<&[Point]> {
        self.targets
            .iter()
            .position(|t| t == target)
            .and_then(|i| self.paths.get(i))
            .map(Vec::as_slice)
    }

    pub fn on_path(&self, cell: &Point) -> bool {
        self.paths.iter().any(|path| path.contains(cell))
    }
}

/// Receives one call per cell when a [Pathfinder] is rendered.
pub trait CellSink {
    fn draw(&mut self, cell: &Cell, on_path: bool, cost: Option<f32>, direction: Option<Point>);
}

impl<F> CellSink for F
where
    F: FnMut(&Cell, bool, Option<f32>, Option<Point>),
{
    fn draw(&mut self, cell: &Cell, on_path: bool, cost: Option<f32>, direction: Option<Point>) {
        self(cell, on_path, cost, direction)
    }
}

enum Stepper {
    Traversal(Traversal<Point, EdgeFn>),
    Astar(AstarSearch<Point, f32, CostFn, HeuristicFn>),
    Dijkstra(DijkstraSearch<Point, f32, CostFn, PassableFn>),
}

enum Finished {
    Path(Vec<Point>, FxIndexMap<Point, f32>),
    Tree(ShortestPaths<Point, f32>),
}

impl Stepper {
    /// Advances the search by one node, returning its result once it has finished.
    fn step(&mut self, graph: &Graph<Point>) -> Result<Option<Finished>, GraphError> {
        Ok(match self {
            Stepper::Traversal(search) => match search.step(graph)? {
                Step::Continue => None,
                Step::Found(path) => Some(Finished::Path(path, FxIndexMap::default())),
                Step::Exhausted => Some(Finished::Path(Vec::new(), FxIndexMap::default())),
            },
            Stepper::Astar(search) => match search.step(graph)? {
                Step::Continue => None,
                Step::Found(path) => Some(Finished::Path(path, search.cost_maps().g.clone())),
                Step::Exhausted => Some(Finished::Path(Vec::new(), search.cost_maps().g.clone())),
            },
            Stepper::Dijkstra(search) => match search.step(graph)? {
                Step::Continue => None,
                Step::Found(tree) => Some(Finished::Tree(tree)),
                Step::Exhausted => None,
            },
        })
    }
}

/// A search in flight. The overlay is a snapshot taken when the search began.
struct Job {
    kind: SearchKind,
    source: Point,
    targets: Vec<Point>,
    overlay: ObstacleOverlay,
    diagonal_cost: f32,
    heuristic_factor: f32,
    next_target: usize,
    started: bool,
    current: Option<(Point, Stepper)>,
    paths: Vec<Vec<Point>>,
    costs: FxIndexMap<Point, f32>,
    steps: usize,
}

impl Job {
    /// Creates the searcher for the next target, answering targets in another component
    /// directly with an empty path. Dijkstra covers all targets with a single searcher.
    fn next_stepper(&mut self) -> Option<(Point, Stepper)> {
        if self.kind == SearchKind::Dijkstra {
            if self.started {
                return None;
            }
            self.started = true;
            let search = DijkstraSearch::new(
                self.source,
                Box::new(self.overlay.cost_fn(self.diagonal_cost)) as CostFn,
                Box::new(self.overlay.passable_fn()) as PassableFn,
            );
            return Some((self.source, Stepper::Dijkstra(search)));
        }
        while let Some(&target) = self.targets.get(self.next_target) {
            self.next_target += 1;
            if self.overlay.unreachable(&self.source, &target) {
                debug!("Target {} is not connected to {}, skipping search", target, self.source);
                self.paths.push(Vec::new());
                continue;
            }
            let stepper = match self.kind {
                SearchKind::BreadthFirst | SearchKind::DepthFirst => {
                    let order = if self.kind == SearchKind::BreadthFirst {
                        Order::BreadthFirst
                    } else {
                        Order::DepthFirst
                    };
                    let passable = self.overlay.passable_fn();
                    let traversable = Box::new(move |_: &Point, to: &Point| passable(to)) as EdgeFn;
                    Stepper::Traversal(Traversal::new(order, self.source, target, traversable))
                }
                SearchKind::AStar | SearchKind::Dijkstra => {
                    let (diagonal_cost, factor) = (self.diagonal_cost, self.heuristic_factor);
                    let heuristic = move |p: &Point| octile_distance(p, &target, diagonal_cost) * factor;
                    Stepper::Astar(AstarSearch::new(
                        self.source,
                        target,
                        Box::new(self.overlay.cost_fn(diagonal_cost)) as CostFn,
                        Box::new(heuristic) as HeuristicFn,
                    ))
                }
            };
            return Some((target, stepper));
        }
        None
    }

    fn advance(&mut self, graph: &Graph<Point>) -> Result<Option<SearchOutcome>, GraphError> {
        if self.current.is_none() {
            match self.next_stepper() {
                Some(next) => self.current = Some(next),
                None => return Ok(Some(self.finish(None))),
            }
        }
        let Some((target, stepper)) = self.current.as_mut() else {
            return Ok(None);
        };
        let target = *target;
        self.steps += 1;
        let Some(finished) = stepper.step(graph)? else {
            return Ok(None);
        };
        self.current = None;
        match finished {
            Finished::Path(path, costs) => {
                if path.is_empty() {
                    warn!("Reachable target {} could not be pathed to from {}", target, self.source);
                }
                self.paths.push(path);
                self.costs.extend(costs);
                if self.next_target >= self.targets.len() {
                    return Ok(Some(self.finish(None)));
                }
                Ok(None)
            }
            Finished::Tree(tree) => {
                self.paths = tree.paths_to(&self.targets);
                self.costs = tree.costs().clone();
                Ok(Some(self.finish(Some(tree.into_flow_field()))))
            }
        }
    }

    fn finish(&mut self, field: Option<FlowField<Point>>) -> SearchOutcome {
        SearchOutcome {
            kind: self.kind,
            source: self.source,
            targets: std::mem::take(&mut self.targets),
            paths: std::mem::take(&mut self.paths),
            costs: std::mem::take(&mut self.costs),
            field,
            steps: self.steps,
        }
    }
}

/// Grid, graph and overlay together with the current selection and the search guard.
pub struct Pathfinder {
    grid: Grid,
    graph: Graph<Point>,
    overlay: ObstacleOverlay,
    /// Cost of a diagonal move, [DIAGONAL_COST] by default.
    pub diagonal_cost: f32,
    /// Multiplier on the octile heuristic used by A*. Values above 1 trade optimality for
    /// fewer expansions.
    pub heuristic_factor: f32,
    /// Strategy used by [Command::RequestSearch].
    pub kind: SearchKind,
    source: Option<Point>,
    targets: FxIndexSet<Point>,
    state: SearchState,
    job: Option<Job>,
    published: Option<SearchOutcome>,
}

impl Pathfinder {
    pub fn new(width: i32, height: i32, origin: Vec2, cell_size: Vec2) -> Result<Pathfinder, GridError> {
        let grid = Grid::new(width, height, origin, cell_size)?;
        Ok(Pathfinder::from_grid(grid))
    }

    pub fn from_grid(grid: Grid) -> Pathfinder {
        let graph = grid.to_graph();
        let overlay = ObstacleOverlay::for_grid(&grid);
        info!(
            "Built {}x{} grid graph with {} nodes and {} edges",
            grid.width,
            grid.height,
            graph.node_count(),
            graph.edge_count()
        );
        Pathfinder {
            grid,
            graph,
            overlay,
            diagonal_cost: DIAGONAL_COST,
            heuristic_factor: 1.0,
            kind: SearchKind::AStar,
            source: None,
            targets: FxIndexSet::default(),
            state: SearchState::Idle,
            job: None,
            published: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn graph(&self) -> &Graph<Point> {
        &self.graph
    }

    pub fn overlay(&self) -> &ObstacleOverlay {
        &self.overlay
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn is_computing(&self) -> bool {
        self.state == SearchState::Computing
    }

    pub fn source(&self) -> Option<Point> {
        self.source
    }

    pub fn targets(&self) -> impl Iterator<Item = &Point> {
        self.targets.iter()
    }

    /// The most recent completed search, if any.
    pub fn outcome(&self) -> Option<&SearchOutcome> {
        self.published.as_ref()
    }

    /// The cell containing `position`, clamped onto the grid.
    pub fn resolve_cell(&self, position: Vec2) -> &Cell {
        self.grid.world_to_cell(position)
    }

    pub fn neighbors_of(&self, cell: &Cell) -> impl Iterator<Item = &Cell> + '_ {
        self.grid
            .neighbors(cell.coord)
            .into_iter()
            .filter_map(move |p| self.grid.cell(p))
    }

    /// Moves the grid in world space. Cells keep their coordinates, so the graph, overlay and
    /// any published outcome stay valid.
    pub fn update_origin(&mut self, origin: Vec2) {
        self.grid.update_origin(origin);
    }

    /// Applies a command and returns whether it had an effect.
    pub fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::SelectSource(position) => {
                let cell = self.grid.world_to_grid(position);
                self.select_source(cell)
            }
            Command::ToggleTarget(position) => {
                let cell = self.grid.world_to_grid(position);
                self.toggle_target(cell)
            }
            Command::ToggleObstacle(position) => {
                let cell = self.grid.world_to_grid(position);
                self.toggle_obstacle(cell)
            }
            Command::SetKind(kind) => {
                self.kind = kind;
                true
            }
            Command::RequestSearch => self.begin_search(self.kind),
            Command::RequestFlowField => self.begin_flow_field(),
        }
    }

    /// Makes `cell` the source, removing it from the targets if it was one.
    pub fn select_source(&mut self, cell: Point) -> bool {
        if !self.grid.in_bounds(cell) {
            return false;
        }
        self.targets.shift_remove(&cell);
        self.source = Some(cell);
        true
    }

    /// Adds or removes `cell` as a target. Blocked cells and the source cannot be targets.
    pub fn toggle_target(&mut self, cell: Point) -> bool {
        if !self.overlay.is_valid(&cell) || self.source == Some(cell) {
            debug!("Rejected target toggle at {}", cell);
            return false;
        }
        if !self.targets.shift_remove(&cell) {
            self.targets.insert(cell);
        }
        true
    }

    /// Flips whether `cell` is blocked. Rejected while a search is in flight, since the search
    /// expects a stable overlay.
    pub fn toggle_obstacle(&mut self, cell: Point) -> bool {
        if self.is_computing() {
            debug!("Rejected obstacle toggle at {} while computing", cell);
            return false;
        }
        if !self.grid.in_bounds(cell) {
            return false;
        }
        self.overlay.toggle(cell);
        true
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    /// Starts a search of `kind` from the source to every target. Dropped while another search
    /// is in flight, and rejected without a valid source or without targets.
    pub fn begin_search(&mut self, kind: SearchKind) -> bool {
        let targets = self.targets.iter().copied().collect::<Vec<_>>();
        if targets.is_empty() {
            debug!("Rejected {:?} search without targets", kind);
            return false;
        }
        self.begin(kind, targets)
    }

    /// Starts a Dijkstra pass that covers every cell reachable from the source. Current
    /// targets get their paths as well.
    pub fn begin_flow_field(&mut self) -> bool {
        let targets = self.targets.iter().copied().collect::<Vec<_>>();
        self.begin(SearchKind::Dijkstra, targets)
    }

    fn begin(&mut self, kind: SearchKind, targets: Vec<Point>) -> bool {
        if self.is_computing() {
            debug!("Dropped {:?} search request while computing", kind);
            return false;
        }
        let Some(source) = self.source else {
            debug!("Rejected {:?} search without a source", kind);
            return false;
        };
        if !self.overlay.is_valid(&source) {
            debug!("Rejected {:?} search from blocked source {}", kind, source);
            return false;
        }
        if targets.contains(&source) {
            debug!("Rejected {:?} search with source {} among the targets", kind, source);
            return false;
        }
        self.overlay.update();
        info!("Starting {:?} search from {} to {} targets", kind, source, targets.len());
        self.job = Some(Job {
            kind,
            source,
            targets,
            overlay: self.overlay.clone(),
            diagonal_cost: self.diagonal_cost,
            heuristic_factor: self.heuristic_factor,
            next_target: 0,
            started: false,
            current: None,
            paths: Vec::new(),
            costs: FxIndexMap::default(),
            steps: 0,
        });
        self.state = SearchState::Computing;
        true
    }

    /// Advances the search in flight by one step. Once it completes its outcome is published
    /// and the state returns to [SearchState::Idle]; on error the search is abandoned.
    pub fn step(&mut self) -> Result<SearchState, GraphError> {
        let Some(job) = self.job.as_mut() else {
            self.state = SearchState::Idle;
            return Ok(self.state);
        };
        match job.advance(&self.graph) {
            Ok(None) => {}
            Ok(Some(outcome)) => {
                info!(
                    "Finished {:?} search from {} after {} steps, {} of {} targets reached",
                    outcome.kind,
                    outcome.source,
                    outcome.steps,
                    outcome.paths.iter().filter(|p| !p.is_empty()).count(),
                    outcome.targets.len()
                );
                self.published = Some(outcome);
                self.job = None;
                self.state = SearchState::Idle;
            }
            Err(e) => {
                self.job = None;
                self.state = SearchState::Idle;
                return Err(e);
            }
        }
        Ok(self.state)
    }

    /// Steps the search in flight until it completes.
    pub fn finish(&mut self) -> Result<Option<&SearchOutcome>, GraphError> {
        while self.step()? == SearchState::Computing {}
        Ok(self.published.as_ref())
    }

    /// Runs a search of `kind` to completion. Returns `None` if the request was rejected.
    pub fn search(&mut self, kind: SearchKind) -> Result<Option<&SearchOutcome>, GraphError> {
        if !self.begin_search(kind) {
            return Ok(None);
        }
        self.finish()
    }

    /// Runs a flow field pass to completion. Returns `None` if the request was rejected.
    pub fn flow_field(&mut self) -> Result<Option<&FlowField<Point>>, GraphError> {
        if !self.begin_flow_field() {
            return Ok(None);
        }
        Ok(self.finish()?.and_then(|outcome| outcome.field.as_ref()))
    }

    /// Hands every cell to `sink` together with what the published outcome says about it.
    pub fn render<S: CellSink>(&self, sink: &mut S) {
        let on_path = self
            .published
            .iter()
            .flat_map(|outcome| outcome.paths.iter().flatten())
            .copied()
            .collect::<FxHashSet<Point>>();
        for cell in self.grid.cells() {
            let outcome = self.published.as_ref();
            let cost = outcome.and_then(|o| o.costs.get(&cell.coord).copied());
            let direction = outcome
                .and_then(|o| o.field.as_ref())
                .and_then(|field| field.direction(&cell.coord));
            sink.draw(cell, on_path.contains(&cell.coord), cost, direction);
        }
    }
}

impl fmt::Display for Pathfinder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in (0..self.grid.height as i32).rev() {
            let row = (0..self.grid.width as i32)
                .map(|x| {
                    let p = Point::new(x, y);
                    if self.source == Some(p) {
                        'S'
                    } else if self.targets.contains(&p) {
                        'T'
                    } else if !self.overlay.is_valid(&p) {
                        '#'
                    } else if self.published.as_ref().is_some_and(|o| o.on_path(&p)) {
                        '*'
                    } else {
                        '.'
                    }
                })
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::path_cost;

    fn pathfinder(width: i32, height: i32) -> Pathfinder {
        Pathfinder::new(width, height, Vec2::ZERO, Vec2::ONE).unwrap()
    }

    /// World position of the cell at `(x, y)`.
    fn world(pf: &Pathfinder, x: i32, y: i32) -> Vec2 {
        pf.grid().cell(Point::new(x, y)).unwrap().world
    }

    fn corner_to_corner(kind: SearchKind) -> Pathfinder {
        let mut pf = pathfinder(5, 5);
        assert!(pf.handle(Command::SelectSource(world(&pf, 0, 0))));
        assert!(pf.handle(Command::ToggleTarget(world(&pf, 4, 4))));
        pf.kind = kind;
        pf
    }

    #[test]
    fn open_grid_takes_the_diagonal() {
        let diagonal = (0..5).map(|i| Point::new(i, i)).collect::<Vec<_>>();
        for kind in SearchKind::ALL {
            let mut pf = corner_to_corner(kind);
            let outcome = pf.search(kind).unwrap().unwrap();
            assert_eq!(outcome.paths.len(), 1);
            if kind == SearchKind::DepthFirst {
                assert_eq!(outcome.paths[0].last(), Some(&Point::new(4, 4)));
                continue;
            }
            assert_eq!(outcome.paths[0], diagonal, "{:?}", kind);
        }
        let mut pf = corner_to_corner(SearchKind::Dijkstra);
        let outcome = pf.search(SearchKind::Dijkstra).unwrap().cloned().unwrap();
        let cost = path_cost(&outcome.paths[0], pf.overlay().cost_fn(DIAGONAL_COST));
        assert!((cost - 4.0 * DIAGONAL_COST).abs() < 1e-5);
        assert!((outcome.costs[&Point::new(4, 4)] - cost).abs() < 1e-5);
    }

    #[test]
    fn wall_with_gap_forces_path_through_gap() {
        for kind in [SearchKind::AStar, SearchKind::Dijkstra, SearchKind::BreadthFirst] {
            let mut pf = corner_to_corner(kind);
            for x in [0, 1, 3, 4] {
                assert!(pf.toggle_obstacle(Point::new(x, 2)));
            }
            let outcome = pf.search(kind).unwrap().unwrap();
            assert!(outcome.paths[0].contains(&Point::new(2, 2)), "{:?}", kind);
            // Closing the gap leaves no route
            pf.toggle_obstacle(Point::new(2, 2));
            let outcome = pf.search(kind).unwrap().unwrap();
            assert!(outcome.paths[0].is_empty(), "{:?}", kind);
        }
    }

    #[test]
    fn source_and_targets_stay_disjoint() {
        let mut pf = pathfinder(3, 3);
        let a = world(&pf, 0, 0);
        let b = world(&pf, 2, 1);
        assert!(pf.handle(Command::ToggleTarget(a)));
        assert!(pf.handle(Command::ToggleTarget(b)));
        assert!(pf.handle(Command::SelectSource(a)));
        assert_eq!(pf.targets().copied().collect::<Vec<_>>(), vec![Point::new(2, 1)]);
        assert!(!pf.handle(Command::ToggleTarget(a)));
        // Toggling again removes the target
        assert!(pf.handle(Command::ToggleTarget(b)));
        assert_eq!(pf.targets().count(), 0);
    }

    #[test]
    fn blocked_cells_cannot_be_targets() {
        let mut pf = pathfinder(3, 3);
        let p = world(&pf, 1, 1);
        assert!(pf.handle(Command::ToggleObstacle(p)));
        assert!(!pf.handle(Command::ToggleTarget(p)));
    }

    #[test]
    fn malformed_requests_are_rejected() {
        let mut pf = pathfinder(3, 3);
        // No source
        assert!(!pf.handle(Command::RequestSearch));
        pf.select_source(Point::new(0, 0));
        // No targets
        assert!(!pf.handle(Command::RequestSearch));
        assert!(pf.search(SearchKind::Dijkstra).unwrap().is_none());
        pf.toggle_target(Point::new(2, 2));
        // Blocked source
        pf.toggle_obstacle(Point::new(0, 0));
        assert!(!pf.handle(Command::RequestSearch));
        assert!(!pf.handle(Command::RequestFlowField));
        assert_eq!(pf.state(), SearchState::Idle);
        assert!(pf.outcome().is_none());
    }

    #[test]
    fn requests_while_computing_are_dropped() {
        let mut pf = corner_to_corner(SearchKind::Dijkstra);
        assert!(pf.handle(Command::RequestSearch));
        assert_eq!(pf.state(), SearchState::Computing);
        assert!(!pf.handle(Command::RequestSearch));
        assert!(!pf.handle(Command::RequestFlowField));
        assert!(!pf.handle(Command::ToggleObstacle(world(&pf, 2, 2))));
        assert!(pf.overlay().is_valid(&Point::new(2, 2)));
        // Nothing is published before the search completes
        assert_eq!(pf.step().unwrap(), SearchState::Computing);
        assert!(pf.outcome().is_none());
        let outcome = pf.finish().unwrap().unwrap();
        assert_eq!(outcome.kind, SearchKind::Dijkstra);
        // One step per settled cell and a final one to find the frontier empty
        assert_eq!(outcome.steps, 26);
        assert_eq!(pf.state(), SearchState::Idle);
        assert!(pf.handle(Command::ToggleObstacle(world(&pf, 2, 2))));
    }

    #[test]
    fn unconnected_targets_skip_the_search() {
        let mut pf = pathfinder(5, 3);
        pf.select_source(Point::new(0, 1));
        pf.toggle_target(Point::new(4, 1));
        pf.toggle_target(Point::new(1, 1));
        for y in 0..3 {
            pf.toggle_obstacle(Point::new(2, y));
        }
        let outcome = pf.search(SearchKind::AStar).unwrap().unwrap().clone();
        assert!(outcome.path_to(&Point::new(4, 1)).unwrap().is_empty());
        assert_eq!(
            outcome.path_to(&Point::new(1, 1)).unwrap(),
            &[Point::new(0, 1), Point::new(1, 1)]
        );
        // Only the connected target was searched: start and target expansions
        assert_eq!(outcome.steps, 2);
    }

    #[test]
    fn flow_field_covers_reachable_cells() {
        let mut pf = pathfinder(3, 3);
        pf.select_source(Point::new(1, 1));
        pf.toggle_obstacle(Point::new(0, 0));
        let field = pf.flow_field().unwrap().unwrap();
        assert_eq!(field.len(), 7);
        assert_eq!(field.direction(&Point::new(2, 2)), Some(Point::new(-1, -1)));
        assert_eq!(field.direction(&Point::new(1, 0)), Some(Point::new(0, 1)));
        assert!(!field.reaches(&Point::new(0, 0)));
        let mut directions = 0;
        pf.render(&mut |_: &Cell, _: bool, _: Option<f32>, direction: Option<Point>| {
            directions += direction.is_some() as usize;
        });
        assert_eq!(directions, 7);
    }

    #[test]
    fn repeated_searches_are_identical() {
        let mut pf = corner_to_corner(SearchKind::AStar);
        pf.toggle_obstacle(Point::new(2, 2));
        pf.toggle_target(Point::new(4, 0));
        let first = pf.search(SearchKind::AStar).unwrap().cloned();
        let second = pf.search(SearchKind::AStar).unwrap().cloned();
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn display_marks_cells() {
        let mut pf = pathfinder(3, 3);
        pf.select_source(Point::new(0, 0));
        pf.toggle_target(Point::new(2, 2));
        pf.toggle_obstacle(Point::new(1, 0));
        pf.search(SearchKind::Dijkstra).unwrap();
        assert_eq!(format!("{}", pf), "..T\n.*.\nS#.\n");
    }

    #[test]
    fn render_reports_path_and_costs() {
        let mut pf = corner_to_corner(SearchKind::Dijkstra);
        pf.search(SearchKind::Dijkstra).unwrap();
        let mut on_path = 0;
        let mut costed = 0;
        pf.render(&mut |_: &Cell, path: bool, cost: Option<f32>, _: Option<Point>| {
            on_path += path as usize;
            costed += cost.is_some() as usize;
        });
        assert_eq!(on_path, 5);
        assert_eq!(costed, 25);
    }

    #[test]
    fn resolves_and_lists_neighbours() {
        let pf = pathfinder(3, 3);
        let cell = pf.resolve_cell(Vec2::new(100.0, -100.0));
        assert_eq!(cell.coord, Point::new(2, 0));
        assert_eq!(pf.neighbors_of(cell).count(), 3);
    }

    #[test]
    fn octile_distance_is_exact_on_open_grid() {
        let a = Point::new(0, 0);
        assert_eq!(octile_distance(&a, &Point::new(3, 1), 1.5), 3.5);
        assert_eq!(octile_distance(&a, &Point::new(-2, 2), 1.0), 2.0);
        assert_eq!(octile_distance(&a, &Point::new(1, 1), 5.0), 2.0);
        // Cheap diagonals can zig-zag along a row
        assert_eq!(octile_distance(&a, &Point::new(3, 1), 0.5), 1.5);
        assert!(octile_distance(&a, &Point::new(3, 0), 0.5) <= 2.0);
    }
}
