use crate::{
    error::GraphError,
    graph::Graph,
    search::{flow_field::FlowField, reconstruct_path, Searcher, SmallestCostHolder, Step},
    FxIndexMap,
};
use core::fmt::Debug;
use fxhash::FxHashSet;
use num_traits::Float;
use std::collections::BinaryHeap;
use std::hash::Hash;

/// Everything a Dijkstra pass learned about the graph: the cheapest known cost of every
/// reached node and the predecessor it was reached from.
#[derive(Clone, Debug)]
pub struct ShortestPaths<N, C> {
    start: N,
    costs: FxIndexMap<N, C>,
    came_from: FxIndexMap<N, N>,
}

impl<N, C> ShortestPaths<N, C>
where
    N: Eq + Hash + Clone,
    C: Float,
{
    /// A result in which nothing besides `start` was reached.
    pub(crate) fn unreached(start: N) -> ShortestPaths<N, C> {
        ShortestPaths {
            start,
            costs: FxIndexMap::default(),
            came_from: FxIndexMap::default(),
        }
    }

    pub fn start(&self) -> &N {
        &self.start
    }

    /// Cumulative cost from the start, `None` if `node` was not reached.
    pub fn cost_to(&self, node: &N) -> Option<C> {
        self.costs.get(node).copied()
    }

    pub fn costs(&self) -> &FxIndexMap<N, C> {
        &self.costs
    }

    pub fn came_from(&self) -> &FxIndexMap<N, N> {
        &self.came_from
    }

    pub fn is_reachable(&self, node: &N) -> bool {
        *node == self.start || self.came_from.contains_key(node)
    }

    /// Path from the start to `target`, empty if it was not reached or is the start itself.
    pub fn path_to(&self, target: &N) -> Vec<N> {
        reconstruct_path(&self.came_from, &self.start, target)
    }

    /// One path per target, in the order given.
    pub fn paths_to(&self, targets: &[N]) -> Vec<Vec<N>> {
        targets.iter().map(|target| self.path_to(target)).collect()
    }

    pub fn flow_field(&self) -> FlowField<N> {
        FlowField::new(self.start.clone(), self.came_from.clone())
    }

    pub fn into_flow_field(self) -> FlowField<N> {
        FlowField::new(self.start, self.came_from)
    }
}

/// Single-source Dijkstra over every node reachable from `start`.
///
/// Of the unsettled nodes, the one with the lowest known cost is settled next; ties go to the
/// node that comes first in the graph's node order. Nodes rejected by `passable` are left out
/// of the search entirely and edges with a non-finite cost are treated as absent. The search
/// finishes with [Step::Found] once no unsettled node is reachable.
pub struct DijkstraSearch<N, C, F, P> {
    start: N,
    cost: F,
    passable: P,
    open: BinaryHeap<SmallestCostHolder<C>>,
    settled: FxHashSet<N>,
    costs: FxIndexMap<N, C>,
    came_from: FxIndexMap<N, N>,
    started: bool,
    finished: bool,
}

impl<N, C, F, P> DijkstraSearch<N, C, F, P>
where
    N: Eq + Hash + Clone + Debug,
    C: Float,
    F: FnMut(&N, &N) -> C,
    P: FnMut(&N) -> bool,
{
    pub fn new(start: N, cost: F, passable: P) -> DijkstraSearch<N, C, F, P> {
        DijkstraSearch {
            start,
            cost,
            passable,
            open: BinaryHeap::new(),
            settled: FxHashSet::default(),
            costs: FxIndexMap::default(),
            came_from: FxIndexMap::default(),
            started: false,
            finished: false,
        }
    }

    /// Costs known so far. Only final once the search has finished.
    pub fn costs(&self) -> &FxIndexMap<N, C> {
        &self.costs
    }

    pub fn settled(&self) -> &FxHashSet<N> {
        &self.settled
    }

    fn pop_open(&mut self, graph: &Graph<N>) -> Option<(N, C)> {
        while let Some(SmallestCostHolder { cost, index, .. }) = self.open.pop() {
            let Some(node) = graph.node_at(index) else {
                continue;
            };
            if self.settled.contains(node) {
                continue;
            }
            match self.costs.get(node) {
                Some(&known) if cost <= known => return Some((node.clone(), known)),
                _ => continue,
            }
        }
        None
    }

    fn push(&mut self, graph: &Graph<N>, node: &N, cost: C) -> Result<(), GraphError> {
        let index = graph.index_of(node).ok_or_else(|| GraphError::missing(node))?;
        self.open.push(SmallestCostHolder {
            estimated_cost: cost,
            cost,
            index,
        });
        Ok(())
    }
}

impl<N, C, F, P> Searcher<N> for DijkstraSearch<N, C, F, P>
where
    N: Eq + Hash + Clone + Debug,
    C: Float,
    F: FnMut(&N, &N) -> C,
    P: FnMut(&N) -> bool,
{
    type Output = ShortestPaths<N, C>;

    fn step(&mut self, graph: &Graph<N>) -> Result<Step<ShortestPaths<N, C>>, GraphError> {
        if self.finished {
            return Ok(Step::Exhausted);
        }
        if !self.started {
            self.started = true;
            let start = self.start.clone();
            self.costs.insert(start.clone(), C::zero());
            self.push(graph, &start, C::zero())?;
        }
        let Some((node, cost)) = self.pop_open(graph) else {
            self.finished = true;
            return Ok(Step::Found(ShortestPaths {
                start: self.start.clone(),
                costs: std::mem::take(&mut self.costs),
                came_from: std::mem::take(&mut self.came_from),
            }));
        };
        self.settled.insert(node.clone());
        for neighbour in graph.neighbors(&node)? {
            if self.settled.contains(neighbour) || !(self.passable)(neighbour) {
                continue;
            }
            let move_cost = (self.cost)(&node, neighbour);
            if !move_cost.is_finite() {
                continue;
            }
            let new_cost = cost + move_cost;
            let improved = self
                .costs
                .get(neighbour)
                .map_or(true, |&known| new_cost < known);
            if improved {
                self.costs.insert(neighbour.clone(), new_cost);
                self.came_from.insert(neighbour.clone(), node.clone());
                self.push(graph, neighbour, new_cost)?;
            }
        }
        Ok(Step::Continue)
    }
}

/// Runs Dijkstra from `start` over the whole graph.
pub fn dijkstra_all<N, C, F>(
    graph: &Graph<N>,
    start: &N,
    cost: F,
) -> Result<ShortestPaths<N, C>, GraphError>
where
    N: Eq + Hash + Clone + Debug,
    C: Float,
    F: FnMut(&N, &N) -> C,
{
    dijkstra_all_filtered(graph, start, cost, |_| true)
}

/// Runs Dijkstra from `start`, only considering nodes accepted by `passable`. Excluding
/// blocked nodes up front gives the same result as pricing them out in `cost` but keeps them
/// off the frontier.
pub fn dijkstra_all_filtered<N, C, F, P>(
    graph: &Graph<N>,
    start: &N,
    cost: F,
    passable: P,
) -> Result<ShortestPaths<N, C>, GraphError>
where
    N: Eq + Hash + Clone + Debug,
    C: Float,
    F: FnMut(&N, &N) -> C,
    P: FnMut(&N) -> bool,
{
    let result = DijkstraSearch::new(start.clone(), cost, passable).run(graph)?;
    Ok(result.unwrap_or_else(|| ShortestPaths::unreached(start.clone())))
}

/// Cheapest path from `start` to `target`, empty if unreachable.
pub fn dijkstra<N, C, F>(
    graph: &Graph<N>,
    start: &N,
    target: &N,
    cost: F,
) -> Result<Vec<N>, GraphError>
where
    N: Eq + Hash + Clone + Debug,
    C: Float,
    F: FnMut(&N, &N) -> C,
{
    Ok(dijkstra_all(graph, start, cost)?.path_to(target))
}

/// Cheapest paths from `start` to each of `targets`, computed from a single Dijkstra pass.
pub fn dijkstra_multiple<N, C, F>(
    graph: &Graph<N>,
    start: &N,
    targets: &[N],
    cost: F,
) -> Result<Vec<Vec<N>>, GraphError>
where
    N: Eq + Hash + Clone + Debug,
    C: Float,
    F: FnMut(&N, &N) -> C,
{
    Ok(dijkstra_all(graph, start, cost)?.paths_to(targets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::path_cost;

    /// Directed weighted graph:
    ///
    /// ```text
    /// 0 -1-> 1 -1-> 2 -1-> 3
    /// 0 -5-> 3      1 -4-> 4
    /// ```
    /// plus an isolated node 5.
    fn weighted() -> (Graph<u8>, impl Fn(&u8, &u8) -> f32 + Copy) {
        let graph = Graph::from_adjacency(
            0..6,
            vec![(0, vec![3, 1]), (1, vec![2, 4]), (2, vec![3])],
        );
        let cost = |from: &u8, to: &u8| match (*from, *to) {
            (0, 3) => 5.0,
            (1, 4) => 4.0,
            _ => 1.0,
        };
        (graph, cost)
    }

    #[test]
    fn settles_every_reachable_node() {
        let (graph, cost) = weighted();
        let tree = dijkstra_all(&graph, &0, cost).unwrap();
        assert_eq!(tree.cost_to(&0), Some(0.0));
        assert_eq!(tree.cost_to(&3), Some(3.0));
        assert_eq!(tree.cost_to(&4), Some(5.0));
        assert_eq!(tree.cost_to(&5), None);
        assert!(tree.is_reachable(&0));
        assert!(!tree.is_reachable(&5));
        assert_eq!(tree.path_to(&3), vec![0, 1, 2, 3]);
        assert!(tree.path_to(&5).is_empty());
        assert!(tree.path_to(&0).is_empty());
    }

    #[test]
    fn multiple_targets_match_single_runs() {
        let (graph, cost) = weighted();
        let targets = [4, 3, 5, 2];
        let many = dijkstra_multiple(&graph, &0, &targets, cost).unwrap();
        let single = targets
            .iter()
            .map(|t| dijkstra(&graph, &0, t, cost).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(many, single);
        assert_eq!(path_cost(&many[0], cost), 5.0);
    }

    #[test]
    fn filtered_nodes_are_never_entered() {
        let (graph, cost) = weighted();
        let tree = dijkstra_all_filtered(&graph, &0, cost, |n| *n != 2).unwrap();
        assert_eq!(tree.path_to(&3), vec![0, 3]);
        assert_eq!(tree.cost_to(&2), None);
        // Pricing the node out through the cost function gives the same tree
        let priced = dijkstra_all(&graph, &0, |a: &u8, b: &u8| {
            if *b == 2 {
                f32::INFINITY
            } else {
                cost(a, b)
            }
        })
        .unwrap();
        assert_eq!(tree.came_from(), priced.came_from());
        assert_eq!(tree.costs(), priced.costs());
    }

    #[test]
    fn equal_costs_prefer_graph_order() {
        // Both 1 and 2 reach 3 at cost 2; 1 comes first in node order and settles first
        let graph = Graph::from_adjacency(0..4, vec![(0, vec![2, 1]), (1, vec![3]), (2, vec![3])]);
        let tree = dijkstra_all(&graph, &0, |_: &i32, _: &i32| 1.0f32).unwrap();
        assert_eq!(tree.path_to(&3), vec![0, 1, 3]);
    }

    #[test]
    fn stepping_settles_one_node_per_step() {
        let (graph, cost) = weighted();
        let mut search = DijkstraSearch::new(0, cost, |_: &u8| true);
        let mut steps = 0;
        let tree = loop {
            match search.step(&graph).unwrap() {
                Step::Continue => {
                    steps += 1;
                    assert_eq!(search.settled().len(), steps);
                }
                Step::Found(tree) => break tree,
                Step::Exhausted => panic!("dijkstra always produces a tree"),
            }
        };
        // Nodes 0 to 4 are reachable
        assert_eq!(steps, 5);
        assert_eq!(tree.costs().len(), 5);
        assert!(matches!(search.step(&graph).unwrap(), Step::Exhausted));
    }

    #[test]
    fn missing_start_is_an_error() {
        let (graph, cost) = weighted();
        assert_eq!(
            dijkstra_all(&graph, &42, cost).unwrap_err(),
            GraphError::MissingNode("42".to_owned())
        );
    }
}
