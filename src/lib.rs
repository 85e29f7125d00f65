//! # grid_graph_search
//!
//! Graph search over a discretized 2D grid. A [Grid] maps continuous world positions onto a
//! bounded lattice of [Cell]s and derives 8-connected (Moore) neighbourhoods with boundary
//! clamping. Those neighbourhoods are loaded into a generic directed [Graph], over which four
//! search strategies run:
//!
//! - breadth-first and depth-first traversal (unweighted),
//! - [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) with a caller-supplied heuristic,
//! - [Dijkstra](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm) from a single source to every
//!   reachable node, from which any number of target paths and a [FlowField] are read off.
//!
//! Obstacles never remove nodes from the graph. An [ObstacleOverlay] marks cells as blocked and
//! the cost function handed to the search returns an infinite cost for blocked destinations.
//! The [Pathfinder] ties everything together and guards against overlapping searches.
pub mod cell;
pub mod error;
pub mod graph;
pub mod grid;
pub mod overlay;
pub mod pathfinder;
pub mod search;

use fxhash::FxBuildHasher;
use indexmap::{IndexMap, IndexSet};

pub use cell::{Cell, Vec2};
pub use error::{GraphError, GridError};
pub use graph::Graph;
pub use grid::Grid;
pub use overlay::ObstacleOverlay;
pub use pathfinder::{Command, Pathfinder, SearchOutcome, SearchState};
pub use search::{
    flow_field::FlowField, search, SearchKind, SearchResult, Searcher, Step,
};

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
pub type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;

/// Cost of a straight (cardinal) move between two grid cells.
pub const CARDINAL_COST: f32 = 1.0;
/// Default cost of a diagonal move between two grid cells.
pub const DIAGONAL_COST: f32 = std::f32::consts::SQRT_2;
/// Inline capacity of neighbour lists, enough for a full Moore neighbourhood.
pub const N_SMALLVEC_SIZE: usize = 8;
