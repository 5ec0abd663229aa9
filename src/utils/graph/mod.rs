//! Index-based directed graphs and the dominance algorithms built on them.
//!
//! # Architecture
//!
//! - **Core Types**: [`NodeId`] and [`Graph`] provide the fundamental building blocks
//! - **Traits**: [`GraphBase`], [`Successors`], [`Predecessors`] and [`RootedGraph`] let
//!   the algorithms run on any adjacency structure, including
//!   [`ControlFlowGraph`](crate::analysis::ControlFlowGraph)
//! - **Algorithms**: depth-first numbering, Lengauer-Tarjan dominator trees and
//!   DJ-graph dominance frontiers, see [`algorithms`]
//!
//! # Design Principles
//!
//! ## Dense Indices
//!
//! Nodes are numbered `0..n` and never removed. Every per-node table in the algorithms
//! is a plain `Vec` indexed by [`NodeId::index`].
//!
//! ## Immutable After Construction
//!
//! Graphs are built incrementally, then treated as immutable for analysis. Every
//! result type owns its data and can be shared between threads.
//!
//! # Usage Examples
//!
//! ```rust
//! use ssagraph::utils::graph::{algorithms, Graph, NodeId};
//!
//! // Diamond: 0 -> 1, 0 -> 2, 1 -> 3, 2 -> 3
//! let graph = Graph::new(&[vec![1, 2], vec![3], vec![3], vec![]])?;
//! assert_eq!(graph.edge_count(), 4);
//!
//! let dominators = algorithms::compute_dominators(&graph, NodeId::new(0));
//! assert!(dominators.is_dominator_of(NodeId::new(0), NodeId::new(3)));
//! # Ok::<(), ssagraph::Error>(())
//! ```

#[allow(clippy::module_inception)]
mod graph;
mod node;
mod traits;

pub mod algorithms;

#[cfg(test)]
pub(crate) mod test_graphs;

pub use graph::{Graph, Node};
pub use node::NodeId;
pub use traits::{GraphBase, Predecessors, RootedGraph, Successors};
