use crate::{
    error::GraphError,
    graph::Graph,
    search::{reconstruct_path, Searcher, SmallestCostHolder, Step},
    FxIndexMap,
};
use core::fmt::Debug;
use fxhash::FxHashSet;
use indexmap::map::Entry::{Occupied, Vacant};
use num_traits::Float;
use std::collections::BinaryHeap;
use std::hash::Hash;

/// The bookkeeping of one A* run: known cost from the start (`g`), heuristic estimate to the
/// target (`h`) and their sum (`f`). Nodes never reached have no entry.
#[derive(Clone, Debug, Default)]
pub struct CostMaps<N, C> {
    pub g: FxIndexMap<N, C>,
    pub h: FxIndexMap<N, C>,
    pub f: FxIndexMap<N, C>,
}

/// A* from `start` to `target`.
///
/// The open node with the lowest `f` cost is expanded next; ties go to the node that was
/// discovered first. Expanded nodes are closed for good and never reopened, so the result is
/// only guaranteed optimal for a consistent heuristic. Edges whose cost is not finite are
/// treated as absent.
pub struct AstarSearch<N, C, F, H> {
    start: N,
    target: N,
    cost: F,
    heuristic: H,
    open: BinaryHeap<SmallestCostHolder<C>>,
    closed: FxHashSet<N>,
    came_from: FxIndexMap<N, N>,
    maps: CostMaps<N, C>,
    finished: bool,
}

impl<N, C, F, H> AstarSearch<N, C, F, H>
where
    N: Eq + Hash + Clone + Debug,
    C: Float,
    F: FnMut(&N, &N) -> C,
    H: FnMut(&N) -> C,
{
    pub fn new(start: N, target: N, cost: F, mut heuristic: H) -> AstarSearch<N, C, F, H> {
        let mut maps = CostMaps {
            g: FxIndexMap::default(),
            h: FxIndexMap::default(),
            f: FxIndexMap::default(),
        };
        let h = heuristic(&start);
        maps.g.insert(start.clone(), C::zero());
        maps.h.insert(start.clone(), h);
        maps.f.insert(start.clone(), h);
        let mut open = BinaryHeap::new();
        open.push(SmallestCostHolder {
            estimated_cost: h,
            cost: C::zero(),
            index: 0,
        });
        AstarSearch {
            start,
            target,
            cost,
            heuristic,
            open,
            closed: FxHashSet::default(),
            came_from: FxIndexMap::default(),
            maps,
            finished: false,
        }
    }

    pub fn cost_maps(&self) -> &CostMaps<N, C> {
        &self.maps
    }

    pub fn into_cost_maps(self) -> CostMaps<N, C> {
        self.maps
    }

    pub fn closed(&self) -> &FxHashSet<N> {
        &self.closed
    }

    pub fn came_from(&self) -> &FxIndexMap<N, N> {
        &self.came_from
    }

    /// Pops open entries until one refers to an open node at its current cost.
    fn pop_open(&mut self) -> Option<(N, C)> {
        while let Some(SmallestCostHolder { cost, index, .. }) = self.open.pop() {
            let Some((node, &g)) = self.maps.g.get_index(index) else {
                continue;
            };
            // The node may have been pushed again after its cost improved; only the entry
            // matching the best known cost counts
            if self.closed.contains(node) || cost > g {
                continue;
            }
            return Some((node.clone(), g));
        }
        None
    }
}

impl<N, C, F, H> Searcher<N> for AstarSearch<N, C, F, H>
where
    N: Eq + Hash + Clone + Debug,
    C: Float,
    F: FnMut(&N, &N) -> C,
    H: FnMut(&N) -> C,
{
    type Output = Vec<N>;

    fn step(&mut self, graph: &Graph<N>) -> Result<Step<Vec<N>>, GraphError> {
        if self.finished {
            return Ok(Step::Exhausted);
        }
        let Some((node, g)) = self.pop_open() else {
            self.finished = true;
            return Ok(Step::Exhausted);
        };
        if node == self.target {
            self.finished = true;
            return Ok(Step::Found(reconstruct_path(
                &self.came_from,
                &self.start,
                &self.target,
            )));
        }
        self.closed.insert(node.clone());
        for neighbour in graph.neighbors(&node)? {
            if self.closed.contains(neighbour) {
                continue;
            }
            let move_cost = (self.cost)(&node, neighbour);
            if !move_cost.is_finite() {
                continue;
            }
            let new_cost = g + move_cost;
            let index;
            match self.maps.g.entry(neighbour.clone()) {
                Vacant(e) => {
                    index = e.index();
                    e.insert(new_cost);
                }
                Occupied(mut e) => {
                    if *e.get() > new_cost {
                        index = e.index();
                        e.insert(new_cost);
                    } else {
                        continue;
                    }
                }
            }
            let h = match self.maps.h.get(neighbour) {
                Some(&h) => h,
                None => {
                    let h = (self.heuristic)(neighbour);
                    self.maps.h.insert(neighbour.clone(), h);
                    h
                }
            };
            self.maps.f.insert(neighbour.clone(), new_cost + h);
            self.came_from.insert(neighbour.clone(), node.clone());
            self.open.push(SmallestCostHolder {
                estimated_cost: new_cost + h,
                cost: new_cost,
                index,
            });
        }
        Ok(Step::Continue)
    }
}

/// A* path from `start` to `target`, empty if unreachable.
pub fn astar<N, C, F, H>(
    graph: &Graph<N>,
    start: &N,
    target: &N,
    cost: F,
    heuristic: H,
) -> Result<Vec<N>, GraphError>
where
    N: Eq + Hash + Clone + Debug,
    C: Float,
    F: FnMut(&N, &N) -> C,
    H: FnMut(&N) -> C,
{
    AstarSearch::new(start.clone(), target.clone(), cost, heuristic)
        .run(graph)
        .map(Option::unwrap_or_default)
}
