use crate::{
    error::GraphError,
    graph::Graph,
    search::{reconstruct_path, Searcher, Step},
    FxIndexMap,
};
use core::fmt::Debug;
use fxhash::FxHashSet;
use std::collections::VecDeque;
use std::hash::Hash;

/// Frontier discipline of an unweighted [Traversal].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    /// FIFO frontier. Paths are shortest in edge count.
    BreadthFirst,
    /// LIFO frontier. Paths are valid but carry no length guarantee.
    DepthFirst,
}

/// Unweighted search from `start` to `target`. An edge is only followed when
/// `traversable(from, to)` accepts it, which lets a caller honour an obstacle mask or a cost
/// function without weighing the path.
pub struct Traversal<N, P> {
    order: Order,
    start: N,
    target: N,
    frontier: VecDeque<N>,
    // Breadth-first marks nodes when they are queued, depth-first when they are expanded
    seen: FxHashSet<N>,
    came_from: FxIndexMap<N, N>,
    traversable: P,
    finished: bool,
}

impl<N, P> Traversal<N, P>
where
    N: Eq + Hash + Clone + Debug,
    P: FnMut(&N, &N) -> bool,
{
    pub fn new(order: Order, start: N, target: N, traversable: P) -> Traversal<N, P> {
        let mut seen = FxHashSet::default();
        if order == Order::BreadthFirst {
            seen.insert(start.clone());
        }
        Traversal {
            order,
            frontier: VecDeque::from([start.clone()]),
            start,
            target,
            seen,
            came_from: FxIndexMap::default(),
            traversable,
            finished: false,
        }
    }

    /// Nodes queued but not yet expanded, in the order they would be expanded.
    pub fn frontier(&self) -> Vec<&N> {
        let mut nodes = self.frontier.iter().collect::<Vec<_>>();
        if self.order == Order::DepthFirst {
            nodes.reverse();
        }
        nodes
    }

    pub fn came_from(&self) -> &FxIndexMap<N, N> {
        &self.came_from
    }

    fn pop(&mut self) -> Option<N> {
        match self.order {
            Order::BreadthFirst => self.frontier.pop_front(),
            Order::DepthFirst => self.frontier.pop_back(),
        }
    }
}

impl<N, P> Searcher<N> for Traversal<N, P>
where
    N: Eq + Hash + Clone + Debug,
    P: FnMut(&N, &N) -> bool,
{
    type Output = Vec<N>;

    fn step(&mut self, graph: &Graph<N>) -> Result<Step<Vec<N>>, GraphError> {
        if self.finished {
            return Ok(Step::Exhausted);
        }
        let node = loop {
            let Some(node) = self.pop() else {
                self.finished = true;
                return Ok(Step::Exhausted);
            };
            match self.order {
                Order::BreadthFirst => break node,
                // A node can sit on the stack several times; expand it only once
                Order::DepthFirst => {
                    if self.seen.insert(node.clone()) {
                        break node;
                    }
                }
            }
        };
        if node == self.target {
            self.finished = true;
            return Ok(Step::Found(reconstruct_path(
                &self.came_from,
                &self.start,
                &self.target,
            )));
        }
        for neighbour in graph.neighbors(&node)? {
            if !(self.traversable)(&node, neighbour) {
                continue;
            }
            match self.order {
                Order::BreadthFirst => {
                    if self.seen.insert(neighbour.clone()) {
                        self.came_from.insert(neighbour.clone(), node.clone());
                        self.frontier.push_back(neighbour.clone());
                    }
                }
                Order::DepthFirst => {
                    if !self.seen.contains(neighbour) {
                        self.came_from.insert(neighbour.clone(), node.clone());
                        self.frontier.push_back(neighbour.clone());
                    }
                }
            }
        }
        Ok(Step::Continue)
    }
}

/// Runs a [Traversal] to completion, returning an empty path if `target` is unreachable.
pub fn traverse<N, P>(
    order: Order,
    graph: &Graph<N>,
    start: &N,
    target: &N,
    traversable: P,
) -> Result<Vec<N>, GraphError>
where
    N: Eq + Hash + Clone + Debug,
    P: FnMut(&N, &N) -> bool,
{
    Traversal::new(order, start.clone(), target.clone(), traversable)
        .run(graph)
        .map(Option::unwrap_or_default)
}

/// Breadth-first path from `start` to `target`, empty if unreachable.
pub fn breadth_first<N>(graph: &Graph<N>, start: &N, target: &N) -> Result<Vec<N>, GraphError>
where
    N: Eq + Hash + Clone + Debug,
{
    breadth_first_filtered(graph, start, target, |_| true)
}

/// Breadth-first path that only enters nodes accepted by `passable`.
pub fn breadth_first_filtered<N, P>(
    graph: &Graph<N>,
    start: &N,
    target: &N,
    mut passable: P,
) -> Result<Vec<N>, GraphError>
where
    N: Eq + Hash + Clone + Debug,
    P: FnMut(&N) -> bool,
{
    traverse(Order::BreadthFirst, graph, start, target, |_: &N, to: &N| passable(to))
}

/// Depth-first path from `start` to `target`, empty if unreachable.
pub fn depth_first<N>(graph: &Graph<N>, start: &N, target: &N) -> Result<Vec<N>, GraphError>
where
    N: Eq + Hash + Clone + Debug,
{
    depth_first_filtered(graph, start, target, |_| true)
}

/// Depth-first path that only enters nodes accepted by `passable`.
pub fn depth_first_filtered<N, P>(
    graph: &Graph<N>,
    start: &N,
    target: &N,
    mut passable: P,
) -> Result<Vec<N>, GraphError>
where
    N: Eq + Hash + Clone + Debug,
    P: FnMut(&N) -> bool,
{
    traverse(Order::DepthFirst, graph, start, target, |_: &N, to: &N| passable(to))
}
