//! Dominance algorithms over [`Graph`](crate::utils::graph::Graph) and the graph traits.
//!
//! # Available Algorithms
//!
//! - [`Dfs`] - One depth-first traversal with preorder/postorder numbering, the
//!   push/pop timeline, spanning-tree parents, depths and subtree sizes
//! - [`compute_dominators`] - Dominator tree using Lengauer-Tarjan
//! - [`DominatorTree`] - Result of dominator computation, with O(1) dominance queries
//! - [`DominatorJoinGraph`] - Join edges, dominance frontiers and iterated dominance
//!   frontiers (Sreedhar-Gao)
//!
//! # Algorithm Selection
//!
//! | Algorithm | Time Complexity | Use Case |
//! |-----------|-----------------|----------|
//! | DFS | O(V + E) | Numbering, ancestry queries |
//! | Dominators | O(E log V) | SSA construction, loop analysis |
//! | Dominance frontier | O(subtree + join edges) | Single-block queries |
//! | Iterated dominance frontier | O(V + E) | Phi placement |
//!
//! # Examples
//!
//! ```rust
//! use ssagraph::utils::graph::{algorithms, Graph, NodeId};
//!
//! // if-then-else: 0 -> {1, 2} -> 3
//! let graph = Graph::new(&[vec![1, 2], vec![3], vec![3], vec![]])?;
//!
//! let dominators = algorithms::compute_dominators(&graph, NodeId::new(0));
//! assert!(dominators.is_dominator_of(NodeId::new(0), NodeId::new(3)));
//!
//! let dj_graph = algorithms::DominatorJoinGraph::new(&graph, NodeId::new(0));
//! assert_eq!(dj_graph.dominator_frontier(NodeId::new(1)), vec![NodeId::new(3)]);
//! # Ok::<(), ssagraph::Error>(())
//! ```

mod dfs;
mod dj_graph;
mod dominators;
mod link_eval;

pub use dfs::{Dfs, TimelineEvent};
pub use dj_graph::DominatorJoinGraph;
pub use dominators::{
    compute_dominators, compute_dominators_rooted, DominatorIterator, DominatorTree,
};
