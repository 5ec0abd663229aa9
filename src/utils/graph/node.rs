//! Node identifier for the index-based graphs in this crate.
//!
//! Every graph here numbers its nodes densely from `0`, so a [`NodeId`] doubles as an
//! index into the per-node arrays computed by the traversal and dominance algorithms.

use std::fmt;

/// A strongly-typed index of a node within a [`Graph`](crate::utils::graph::Graph).
///
/// Nodes are never removed from a graph, so an identifier stays valid for the
/// lifetime of the graph that issued it. Identifiers of different graphs (for example
/// an instruction graph and the basic-block graph built from it) are not
/// interchangeable even though both wrap a `usize`.
///
/// # Examples
///
/// ```rust
/// use ssagraph::utils::graph::NodeId;
///
/// let node = NodeId::new(5);
/// let depths = vec![0, 1, 1, 2, 2, 3];
/// assert_eq!(depths[node.index()], 3);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Creates a new `NodeId` from a raw index value.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Returns the raw index value of this node identifier.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(index: usize) -> Self {
        NodeId(index)
    }
}

impl From<NodeId> for usize {
    #[inline]
    fn from(node: NodeId) -> Self {
        node.0
    }
}
