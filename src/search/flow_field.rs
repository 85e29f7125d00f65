use crate::{
    error::GraphError,
    graph::Graph,
    search::dijkstra::{dijkstra_all, dijkstra_all_filtered},
    FxIndexMap,
};
use core::fmt::Debug;
use grid_util::point::Point;
use num_traits::Float;
use std::hash::Hash;

/// For every node reached from a single source, the neighbour one step closer to that source.
///
/// The field is the predecessor map of a Dijkstra pass read the other way round: instead of
/// reconstructing one path, any number of agents can follow it from wherever they stand.
#[derive(Clone, Debug)]
pub struct FlowField<N> {
    source: N,
    next: FxIndexMap<N, N>,
}

impl<N> FlowField<N>
where
    N: Eq + Hash + Clone,
{
    pub fn new(source: N, next: FxIndexMap<N, N>) -> FlowField<N> {
        FlowField { source, next }
    }

    pub fn source(&self) -> &N {
        &self.source
    }

    /// The next node towards the source. `None` for the source itself and for nodes that were
    /// not reached.
    pub fn next_step(&self, node: &N) -> Option<&N> {
        self.next.get(node)
    }

    pub fn reaches(&self, node: &N) -> bool {
        *node == self.source || self.next.contains_key(node)
    }

    /// Follows the field from `node` to the source, both ends included. Empty if `node` is not
    /// covered by the field.
    pub fn path_from(&self, node: &N) -> Vec<N> {
        if !self.reaches(node) {
            return Vec::new();
        }
        let mut path = vec![node.clone()];
        let mut current = node;
        while let Some(next) = self.next.get(current) {
            path.push(next.clone());
            current = next;
        }
        path
    }

    pub fn iter(&self) -> impl Iterator<Item = (&N, &N)> {
        self.next.iter()
    }

    /// Number of nodes with a direction, the source excluded.
    pub fn len(&self) -> usize {
        self.next.len()
    }

    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }
}

impl<N> PartialEq for FlowField<N>
where
    N: Eq + Hash,
{
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.next == other.next
    }
}

impl FlowField<Point> {
    /// Grid step from `cell` towards the source, with each component in `-1..=1`.
    pub fn direction(&self, cell: &Point) -> Option<Point> {
        self.next_step(cell)
            .map(|next| Point::new((next.x - cell.x).signum(), (next.y - cell.y).signum()))
    }
}

/// Computes the flow field towards `source` over the whole graph.
pub fn flow_field<N, C, F>(graph: &Graph<N>, source: &N, cost: F) -> Result<FlowField<N>, GraphError>
where
    N: Eq + Hash + Clone + Debug,
    C: Float,
    F: FnMut(&N, &N) -> C,
{
    Ok(dijkstra_all(graph, source, cost)?.into_flow_field())
}

/// Computes the flow field towards `source`, only covering nodes accepted by `passable`.
pub fn flow_field_filtered<N, C, F, P>(
    graph: &Graph<N>,
    source: &N,
    cost: F,
    passable: P,
) -> Result<FlowField<N>, GraphError>
where
    N: Eq + Hash + Clone + Debug,
    C: Float,
    F: FnMut(&N, &N) -> C,
    P: FnMut(&N) -> bool,
{
    Ok(dijkstra_all_filtered(graph, source, cost, passable)?.into_flow_field())
}
