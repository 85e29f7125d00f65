//! Search strategies over a [Graph].
//!
//! Each strategy is a [Searcher] that advances one expanded node per [step](Searcher::step),
//! so a caller can interleave observation (e.g. drawing the frontier) between steps without
//! the algorithm knowing about scheduling. The free functions in the submodules run a
//! searcher to completion.
use crate::{error::GraphError, graph::Graph, FxIndexMap};
use core::fmt::Debug;
use itertools::Itertools;
use num_traits::Float;
use std::cmp::Ordering;
use std::hash::Hash;

pub mod astar;
pub mod dijkstra;
pub mod flow_field;
pub mod traversal;

use flow_field::FlowField;

/// Outcome of a single search step.
#[derive(Clone, Debug, PartialEq)]
pub enum Step<T> {
    /// A node was expanded and the search has more work to do.
    Continue,
    /// The search finished with a result.
    Found(T),
    /// The frontier ran dry without reaching the target.
    Exhausted,
}

/// A search that can be advanced one node at a time. Results are only handed out through
/// [Step::Found]; once a searcher has returned [Step::Found] or [Step::Exhausted] every
/// further step returns [Step::Exhausted].
pub trait Searcher<N> {
    type Output;

    fn step(&mut self, graph: &Graph<N>) -> Result<Step<Self::Output>, GraphError>;

    /// Steps until the search finishes.
    fn run(&mut self, graph: &Graph<N>) -> Result<Option<Self::Output>, GraphError> {
        loop {
            match self.step(graph)? {
                Step::Continue => {}
                Step::Found(output) => return Ok(Some(output)),
                Step::Exhausted => return Ok(None),
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchKind {
    BreadthFirst,
    DepthFirst,
    AStar,
    Dijkstra,
}

impl SearchKind {
    pub const ALL: [SearchKind; 4] = [
        SearchKind::BreadthFirst,
        SearchKind::DepthFirst,
        SearchKind::AStar,
        SearchKind::Dijkstra,
    ];
}

#[derive(Clone, Debug)]
pub enum SearchResult<N> {
    /// One path per requested target, in request order. Unreachable targets give empty paths.
    Paths(Vec<Vec<N>>),
    /// The full predecessor field of a Dijkstra pass without targets.
    Field(FlowField<N>),
}

impl<N> PartialEq for SearchResult<N>
where
    N: Eq + Hash,
{
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SearchResult::Paths(a), SearchResult::Paths(b)) => a == b,
            (SearchResult::Field(a), SearchResult::Field(b)) => a == b,
            _ => false,
        }
    }
}

impl<N> SearchResult<N> {
    pub fn paths(&self) -> &[Vec<N>] {
        match self {
            SearchResult::Paths(paths) => paths,
            SearchResult::Field(_) => &[],
        }
    }
}

/// Runs the search of the given kind from `source`.
///
/// With targets, every kind returns one path per target; breadth-first, depth-first and A*
/// search each target separately while Dijkstra settles the graph once and reconstructs all
/// paths from that single pass. Without targets, Dijkstra returns its [FlowField] and the
/// other kinds return no paths. A request that names `source` as one of its targets is
/// rejected with an empty result.
///
/// `heuristic(node, target)` is only consulted by A*. Breadth-first and depth-first search
/// do not weigh paths by `cost`, but like the weighted kinds never follow an edge whose cost
/// is infinite or NaN.
pub fn search<N, C, F, H>(
    kind: SearchKind,
    graph: &Graph<N>,
    source: &N,
    targets: &[N],
    mut cost: F,
    mut heuristic: H,
) -> Result<SearchResult<N>, GraphError>
where
    N: Eq + Hash + Clone + Debug,
    C: Float,
    F: FnMut(&N, &N) -> C,
    H: FnMut(&N, &N) -> C,
{
    if targets.contains(source) {
        return Ok(SearchResult::Paths(Vec::new()));
    }
    if targets.is_empty() {
        return Ok(match kind {
            SearchKind::Dijkstra => SearchResult::Field(flow_field::flow_field(graph, source, cost)?),
            _ => SearchResult::Paths(Vec::new()),
        });
    }
    let paths = match kind {
        SearchKind::BreadthFirst | SearchKind::DepthFirst => {
            let order = if kind == SearchKind::BreadthFirst {
                traversal::Order::BreadthFirst
            } else {
                traversal::Order::DepthFirst
            };
            targets
                .iter()
                .map(|target| {
                    traversal::traverse(order, graph, source, target, |from: &N, to: &N| {
                        cost(from, to).is_finite()
                    })
                })
                .collect::<Result<Vec<_>, _>>()?
        }
        SearchKind::AStar => targets
            .iter()
            .map(|target| {
                astar::astar(graph, source, target, &mut cost, |n: &N| heuristic(n, target))
            })
            .collect::<Result<Vec<_>, _>>()?,
        SearchKind::Dijkstra => dijkstra::dijkstra_multiple(graph, source, targets, cost)?,
    };
    Ok(SearchResult::Paths(paths))
}

/// Walks `came_from` back from `target`, reverses the walk and puts `start` in front. The
/// start itself has no predecessor entry. Returns an empty path if `target` was never reached.
pub fn reconstruct_path<N>(came_from: &FxIndexMap<N, N>, start: &N, target: &N) -> Vec<N>
where
    N: Eq + Hash + Clone,
{
    if !came_from.contains_key(target) {
        return Vec::new();
    }
    let mut path = Vec::new();
    let mut current = target;
    while let Some(previous) = came_from.get(current) {
        path.push(current.clone());
        current = previous;
    }
    path.push(start.clone());
    path.reverse();
    path
}

/// Total cost of following `path` under `cost`. Empty and single-node paths cost zero.
pub fn path_cost<N, C, F>(path: &[N], mut cost: F) -> C
where
    C: Float,
    F: FnMut(&N, &N) -> C,
{
    path.iter()
        .tuple_windows()
        .fold(C::zero(), |total, (from, to)| total + cost(from, to))
}

/// Open-set entry ordered so that a max-heap pops the smallest estimated cost first, and
/// among equal estimates the node that was discovered first. `cost` is the known cost at
/// push time and lets stale entries be skipped after a node was improved.
pub(crate) struct SmallestCostHolder<C> {
    pub estimated_cost: C,
    pub cost: C,
    pub index: usize,
}

impl<C: PartialOrd> Eq for SmallestCostHolder<C> {}

impl<C: PartialOrd> PartialEq for SmallestCostHolder<C> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<C: PartialOrd> PartialOrd for SmallestCostHolder<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: PartialOrd> Ord for SmallestCostHolder<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Costs are never NaN: non-finite edge costs are rejected before being pushed
        match other
            .estimated_cost
            .partial_cmp(&self.estimated_cost)
            .unwrap_or(Ordering::Equal)
        {
            Ordering::Equal => other.index.cmp(&self.index),
            s => s,
        }
    }
}
