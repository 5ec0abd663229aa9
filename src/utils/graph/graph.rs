//! Index-based adjacency graph.
//!
//! [`Graph`] stores, for every node, its forward (outgoing) and backward (incoming)
//! edge lists. The shape only ever grows: nodes and edges are appended, never removed,
//! so a [`NodeId`] handed out once stays valid. All analyses in this crate (depth-first
//! numbering, dominator trees, join graphs, basic-block coalescing) run on it.

use crate::{
    utils::graph::{GraphBase, NodeId, Predecessors, Successors},
    Error, Result,
};

/// Adjacency lists of a single graph node.
#[derive(Debug, Clone, Default)]
pub struct Node {
    forward_edges: Vec<NodeId>,
    backward_edges: Vec<NodeId>,
}

impl Node {
    /// Targets of the edges leaving this node, in insertion order.
    #[must_use]
    pub fn forward_edges(&self) -> &[NodeId] {
        &self.forward_edges
    }

    /// Sources of the edges entering this node, in insertion order.
    #[must_use]
    pub fn backward_edges(&self) -> &[NodeId] {
        &self.backward_edges
    }
}

/// A directed graph over the dense node indices `0..size()`.
///
/// For every edge `u -> v`, `v` appears in `u`'s forward edges and `u` in `v`'s backward
/// edges. Both lists are only written by [`Graph::add_edge`] and the constructors, which
/// keeps them in sync.
///
/// Parallel edges are stored as given: adding `u -> v` twice yields two entries in each
/// list. The dominance algorithms tolerate this; the frontier routines deduplicate their
/// results per node.
///
/// # Examples
///
/// ```rust
/// use ssagraph::utils::graph::{Graph, NodeId};
///
/// // 0 -> 1, 0 -> 2, 1 -> 3, 2 -> 3
/// let graph = Graph::new(&[vec![1, 2], vec![3], vec![3], vec![]])?;
/// assert_eq!(graph.size(), 4);
/// assert_eq!(graph.node(NodeId::new(3)).backward_edges(), &[NodeId::new(1), NodeId::new(2)]);
/// # Ok::<(), ssagraph::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    /// Builds a graph from a flat adjacency list: `forward_edges[u]` lists the targets of
    /// the edges leaving `u`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if a target index is outside `0..forward_edges.len()`.
    pub fn new(forward_edges: &[Vec<usize>]) -> Result<Self> {
        let mut graph = Self::with_size(forward_edges.len());
        for (source, targets) in forward_edges.iter().enumerate() {
            for &target in targets {
                graph.add_edge(NodeId::new(source), NodeId::new(target))?;
            }
        }
        Ok(graph)
    }

    /// Creates a graph with `size` nodes and no edges.
    #[must_use]
    pub fn with_size(size: usize) -> Self {
        Self {
            nodes: vec![Node::default(); size],
        }
    }

    /// Builds the graph of a rooted tree from its parent array.
    ///
    /// `parents[v]` is the parent of `v`; a node that is its own parent has no incoming
    /// edge (the root, and any node that is not part of the tree). Children are attached
    /// in ascending index order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if a parent index is out of range.
    pub fn from_rooted_tree(parents: &[NodeId]) -> Result<Self> {
        if let Some((child, parent)) = parents
            .iter()
            .enumerate()
            .find(|(_, parent)| parent.index() >= parents.len())
        {
            return Err(Error::GraphError(format!(
                "parent {} of node {} does not exist in tree with {} nodes",
                parent,
                child,
                parents.len()
            )));
        }
        Ok(Self::tree_from_parents(parents))
    }

    /// [`Graph::from_rooted_tree`] for parent arrays already known to be in range.
    pub(crate) fn tree_from_parents(parents: &[NodeId]) -> Self {
        let mut graph = Self::with_size(parents.len());
        for (child, &parent) in parents.iter().enumerate() {
            if parent.index() != child {
                graph.push_edge(parent, NodeId::new(child));
            }
        }
        graph
    }

    /// Appends a new node without edges and returns its identifier.
    pub fn add_node(&mut self) -> NodeId {
        self.nodes.push(Node::default());
        NodeId::new(self.nodes.len() - 1)
    }

    /// Adds the edge `source -> target`. No duplicate check is performed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if either endpoint does not exist.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> Result<()> {
        if source.index() >= self.nodes.len() {
            return Err(Error::GraphError(format!(
                "source node {} does not exist in graph with {} nodes",
                source,
                self.nodes.len()
            )));
        }
        if target.index() >= self.nodes.len() {
            return Err(Error::GraphError(format!(
                "target node {} does not exist in graph with {} nodes",
                target,
                self.nodes.len()
            )));
        }

        self.push_edge(source, target);
        Ok(())
    }

    /// [`Graph::add_edge`] for endpoints already known to exist.
    pub(crate) fn push_edge(&mut self, source: NodeId, target: NodeId) {
        self.nodes[source.index()].forward_edges.push(target);
        self.nodes[target.index()].backward_edges.push(source);
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the total number of edges, counting parallel edges individually.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|node| node.forward_edges.len()).sum()
    }

    /// Returns the adjacency lists of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of range.
    #[must_use]
    pub fn node(&self, node: NodeId) -> &Node {
        &self.nodes[node.index()]
    }

    /// Returns all nodes in index order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of edges leaving `node`.
    #[must_use]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.nodes[node.index()].forward_edges.len()
    }

    /// Number of edges entering `node`.
    #[must_use]
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.nodes[node.index()].backward_edges.len()
    }
}

/// Two graphs are equal when they have the same size and every node has the same
/// multiset of forward edges. Edge order is ignored; this is meant for tests, not for
/// hot paths.
impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        if self.nodes.len() != other.nodes.len() {
            return false;
        }

        self.nodes.iter().zip(&other.nodes).all(|(lhs, rhs)| {
            let mut lhs_edges = lhs.forward_edges.clone();
            let mut rhs_edges = rhs.forward_edges.clone();
            lhs_edges.sort_unstable();
            rhs_edges.sort_unstable();
            lhs_edges == rhs_edges
        })
    }
}

impl Eq for Graph {}

impl GraphBase for Graph {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Successors for Graph {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.nodes[node.index()].forward_edges.iter().copied()
    }
}

impl Predecessors for Graph {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.nodes[node.index()].backward_edges.iter().copied()
    }
}
