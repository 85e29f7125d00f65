use crate::{error::GraphError, FxIndexMap};
use core::fmt::Debug;
use std::hash::Hash;

/// A generic directed graph. Nodes are kept in insertion order, each with an ordered list of
/// outgoing neighbours. An edge `a -> b` does not imply `b -> a`.
///
/// Every node that appears in a neighbour list is itself a node of the graph; edge insertion
/// adds missing endpoints and node removal drops the edges pointing at it.
#[derive(Clone, Debug)]
pub struct Graph<N> {
    adjacency: FxIndexMap<N, Vec<N>>,
}

impl<N> Default for Graph<N> {
    fn default() -> Graph<N> {
        Graph {
            adjacency: FxIndexMap::default(),
        }
    }
}

impl<N> Graph<N>
where
    N: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Graph<N> {
        Graph::default()
    }

    /// Builds a graph from a full node list and a precomputed adjacency. Neighbours that are
    /// not in `nodes` are appended as nodes; duplicate and parallel entries are dropped.
    pub fn from_adjacency<I, A, L>(nodes: I, adjacency: A) -> Graph<N>
    where
        I: IntoIterator<Item = N>,
        A: IntoIterator<Item = (N, L)>,
        L: IntoIterator<Item = N>,
    {
        let mut graph = Graph::new();
        graph.add_nodes(nodes);
        for (from, neighbours) in adjacency {
            graph.add_node(from.clone());
            for to in neighbours {
                graph.add_edge(from.clone(), to);
            }
        }
        graph
    }

    /// Builds a graph from a node list and a function yielding the neighbours of each node.
    pub fn from_neighbor_fn<I, F, L>(nodes: I, mut neighbors: F) -> Graph<N>
    where
        I: IntoIterator<Item = N>,
        F: FnMut(&N) -> L,
        L: IntoIterator<Item = N>,
    {
        let mut graph = Graph::new();
        graph.add_nodes(nodes);
        for ix in 0..graph.node_count() {
            let from = graph.adjacency.get_index(ix).map(|(n, _)| n.clone());
            if let Some(from) = from {
                for to in neighbors(&from) {
                    graph.add_edge(from.clone(), to);
                }
            }
        }
        graph
    }

    /// Inserts `node` if absent. Returns whether it was inserted.
    pub fn add_node(&mut self, node: N) -> bool {
        if self.adjacency.contains_key(&node) {
            return false;
        }
        self.adjacency.insert(node, Vec::new());
        true
    }

    pub fn add_nodes<I: IntoIterator<Item = N>>(&mut self, nodes: I) {
        for node in nodes {
            self.add_node(node);
        }
    }

    /// Removes `node`, its outgoing edges and every edge pointing at it. Returns `false` if
    /// the node was absent.
    pub fn remove_node(&mut self, node: &N) -> bool {
        if self.adjacency.shift_remove(node).is_none() {
            return false;
        }
        for neighbours in self.adjacency.values_mut() {
            neighbours.retain(|n| n != node);
        }
        true
    }

    /// Adds the directed edge `from -> to`, inserting either endpoint if missing. Returns
    /// `false` if the edge already existed.
    pub fn add_edge(&mut self, from: N, to: N) -> bool {
        if self.contains_edge(&from, &to) {
            return false;
        }
        self.add_node(to.clone());
        self.adjacency.entry(from).or_default().push(to);
        true
    }

    /// Removes the directed edge `from -> to`. Returns `false` if it did not exist.
    pub fn remove_edge(&mut self, from: &N, to: &N) -> bool {
        match self.adjacency.get_mut(from) {
            Some(neighbours) => match neighbours.iter().position(|n| n == to) {
                Some(ix) => {
                    neighbours.remove(ix);
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    pub fn contains_node(&self, node: &N) -> bool {
        self.adjacency.contains_key(node)
    }

    pub fn contains_edge(&self, from: &N, to: &N) -> bool {
        self.adjacency
            .get(from)
            .is_some_and(|neighbours| neighbours.contains(to))
    }

    /// The outgoing neighbours of `node`, in insertion order. Querying a node that was never
    /// added is a topology error.
    pub fn neighbors(&self, node: &N) -> Result<&[N], GraphError> {
        self.adjacency
            .get(node)
            .map(|n| n.as_slice())
            .ok_or_else(|| GraphError::missing(node))
    }

    /// Position of `node` in insertion order.
    pub fn index_of(&self, node: &N) -> Option<usize> {
        self.adjacency.get_index_of(node)
    }

    pub fn node_at(&self, index: usize) -> Option<&N> {
        self.adjacency.get_index(index).map(|(n, _)| n)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.adjacency.keys()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_node_is_idempotent() {
        let mut graph = Graph::new();
        assert!(graph.add_node('a'));
        assert!(!graph.add_node('a'));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn edges_are_directed_and_not_parallel() {
        let mut graph = Graph::new();
        assert!(graph.add_edge('a', 'b'));
        assert!(!graph.add_edge('a', 'b'));
        assert!(graph.contains_edge(&'a', &'b'));
        assert!(!graph.contains_edge(&'b', &'a'));
        // Both endpoints were inserted as nodes
        assert_eq!(graph.neighbors(&'b').unwrap(), &[] as &[char]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn remove_edge_and_node() {
        let mut graph = Graph::new();
        graph.add_edge(1, 2);
        graph.add_edge(2, 3);
        graph.add_edge(3, 2);
        assert!(!graph.remove_edge(&1, &3));
        assert!(!graph.remove_edge(&7, &3));
        assert!(graph.remove_edge(&1, &2));
        assert_eq!(graph.neighbors(&1).unwrap(), &[] as &[i32]);

        assert!(graph.remove_node(&2));
        assert!(!graph.remove_node(&2));
        assert!(!graph.contains_node(&2));
        // The incoming edge 3 -> 2 went with it
        assert_eq!(graph.neighbors(&3).unwrap(), &[] as &[i32]);
        assert_eq!(graph.nodes().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn missing_node_is_an_error() {
        let graph: Graph<&str> = Graph::new();
        assert_eq!(
            graph.neighbors(&"ghost"),
            Err(GraphError::MissingNode("\"ghost\"".to_owned()))
        );
    }

    #[test]
    fn build_from_adjacency() {
        let graph = Graph::from_adjacency(
            vec!["A", "B", "C"],
            vec![("A", vec!["B", "C"]), ("C", vec!["D", "D"])],
        );
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.neighbors(&"A").unwrap(), &["B", "C"]);
        assert_eq!(graph.neighbors(&"C").unwrap(), &["D"]);
        assert_eq!(graph.index_of(&"D"), Some(3));
        assert_eq!(graph.node_at(1), Some(&"B"));
    }

    #[test]
    fn build_from_neighbor_fn() {
        let graph = Graph::from_neighbor_fn(0..5, |&n| {
            if n + 1 < 5 {
                vec![n + 1]
            } else {
                vec![]
            }
        });
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.neighbors(&3).unwrap(), &[4]);
        assert!(!graph.contains_edge(&4, &3));
    }
}
