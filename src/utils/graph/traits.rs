//! Trait definitions for graph abstractions.
//!
//! The traversal and dominance algorithms are written against these traits rather than
//! against [`Graph`](crate::utils::graph::Graph) directly, so the block-level
//! [`ControlFlowGraph`](crate::analysis::ControlFlowGraph) and any caller-side adjacency
//! structure can be analysed without first being copied into a `Graph`.
//!
//! - [`GraphBase`] - node count and node iteration
//! - [`Successors`] - forward edges
//! - [`Predecessors`] - backward edges
//! - [`RootedGraph`] - a graph with a designated entry node
//!
//! Adjacency queries return iterators. Successor order is significant: depth-first
//! numbering, and therefore the dominator tree's child order and the SSA renaming order,
//! follow the order in which an implementation yields successors.

use crate::utils::graph::NodeId;

/// Base trait providing core graph properties.
pub trait GraphBase {
    /// Returns the number of nodes in the graph.
    fn node_count(&self) -> usize;

    /// Returns an iterator over all node identifiers in ascending index order.
    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.node_count()).map(NodeId::new)
    }
}

/// Trait for graphs that support forward edge traversal.
pub trait Successors: GraphBase {
    /// Returns an iterator over the successor nodes of the given node, in edge
    /// insertion order. Parallel edges are yielded once per edge.
    ///
    /// # Panics
    ///
    /// May panic if `node` is not a valid node in the graph.
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs that support backward edge traversal.
pub trait Predecessors: GraphBase {
    /// Returns an iterator over the predecessor nodes of the given node, in edge
    /// insertion order.
    ///
    /// # Panics
    ///
    /// May panic if `node` is not a valid node in the graph.
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs with a designated entry (root) node.
///
/// Control flow graphs implement this with their first basic block, which lets
/// [`compute_dominators_rooted`](crate::utils::graph::algorithms::compute_dominators_rooted)
/// pick the root on its own.
pub trait RootedGraph: Successors + Predecessors {
    /// Returns the entry node of the graph.
    fn entry(&self) -> NodeId;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Edge-list graph, only used to check the default methods and that the traits
    // are implementable outside of `Graph`.
    struct EdgeListGraph {
        node_count: usize,
        edges: Vec<(NodeId, NodeId)>,
    }

    impl GraphBase for EdgeListGraph {
        fn node_count(&self) -> usize {
            self.node_count
        }
    }

    impl Successors for EdgeListGraph {
        fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
            self.edges
                .iter()
                .filter(move |(src, _)| *src == node)
                .map(|(_, dst)| *dst)
        }
    }

    impl Predecessors for EdgeListGraph {
        fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
            self.edges
                .iter()
                .filter(move |(_, dst)| *dst == node)
                .map(|(src, _)| *src)
        }
    }

    impl RootedGraph for EdgeListGraph {
        fn entry(&self) -> NodeId {
            NodeId::new(0)
        }
    }

    #[test]
    fn test_default_node_ids() {
        let graph = EdgeListGraph {
            node_count: 3,
            edges: vec![],
        };
        let ids: Vec<NodeId> = graph.node_ids().collect();
        assert_eq!(ids, vec![NodeId::new(0), NodeId::new(1), NodeId::new(2)]);
    }

    #[test]
    fn test_edge_list_graph_adjacency() {
        let graph = EdgeListGraph {
            node_count: 3,
            edges: vec![
                (NodeId::new(0), NodeId::new(1)),
                (NodeId::new(0), NodeId::new(2)),
                (NodeId::new(1), NodeId::new(2)),
            ],
        };

        let succ: Vec<NodeId> = graph.successors(NodeId::new(0)).collect();
        assert_eq!(succ, vec![NodeId::new(1), NodeId::new(2)]);

        let pred: Vec<NodeId> = graph.predecessors(NodeId::new(2)).collect();
        assert_eq!(pred, vec![NodeId::new(0), NodeId::new(1)]);
        assert_eq!(graph.entry(), NodeId::new(0));
    }
}
