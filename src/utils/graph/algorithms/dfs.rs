//! Depth-first numbering of a graph.
//!
//! A single traversal from a root records everything the dominance algorithms need:
//! preorder and postorder ranks, the spanning-tree parent and depth of every node, the
//! size of every subtree and the chronological sequence of push/pop events.
//!
//! Because a subtree occupies a contiguous preorder range, ancestry becomes an interval
//! test: `v` is an ancestor of `w` iff `pre(v) <= pre(w) < pre(v) + size(v)`. The
//! dominator tree keeps a [`Dfs`] of itself precisely to answer dominance queries this
//! way.
//!
//! The traversal keeps an explicit stack of frames, so its stack usage does not grow
//! with the depth of the graph, while producing exactly the event order of the
//! textbook recursive formulation.

use crate::utils::graph::{NodeId, Successors};

/// Marker for nodes that the traversal never reached.
const UNVISITED: usize = usize::MAX;

/// One entry of the traversal [`timeline`](Dfs::timeline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimelineEvent {
    /// The node was discovered; everything it reaches is explored next.
    Push(NodeId),
    /// All of the node's descendants have been explored.
    Pop(NodeId),
}

impl TimelineEvent {
    /// Returns the node this event refers to.
    #[must_use]
    pub const fn node(self) -> NodeId {
        match self {
            TimelineEvent::Push(node) | TimelineEvent::Pop(node) => node,
        }
    }
}

/// Result of one depth-first traversal over forward edges.
///
/// Every per-node array is indexed by node index. Nodes that are not reachable from the
/// root keep placeholder values; use [`Dfs::is_reachable`] before querying them.
#[derive(Debug, Clone)]
pub struct Dfs {
    root: NodeId,
    pre_order: Vec<usize>,
    post_order: Vec<usize>,
    pre_order_reversed: Vec<NodeId>,
    timeline: Vec<TimelineEvent>,
    parent: Vec<NodeId>,
    depth: Vec<usize>,
    subtree_size: Vec<usize>,
}

struct Frame {
    node: NodeId,
    successors: Vec<NodeId>,
    next: usize,
}

impl Dfs {
    /// Traverses `graph` from `root`, following forward edges in the order the graph
    /// yields them and visiting every reachable node exactly once.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ssagraph::utils::graph::{algorithms::{Dfs, TimelineEvent}, Graph, NodeId};
    ///
    /// let graph = Graph::new(&[vec![1, 2], vec![], vec![]])?;
    /// let dfs = Dfs::new(&graph, NodeId::new(0));
    ///
    /// assert_eq!(dfs.pre_order(NodeId::new(2)), 2);
    /// assert_eq!(dfs.post_order(NodeId::new(0)), 2);
    /// assert_eq!(dfs.timeline()[1], TimelineEvent::Push(NodeId::new(1)));
    /// assert!(dfs.is_ancestor(NodeId::new(0), NodeId::new(2)));
    /// # Ok::<(), ssagraph::Error>(())
    /// ```
    #[must_use]
    pub fn new<G: Successors>(graph: &G, root: NodeId) -> Self {
        let node_count = graph.node_count();
        let mut dfs = Dfs {
            root,
            pre_order: vec![UNVISITED; node_count],
            post_order: vec![UNVISITED; node_count],
            pre_order_reversed: Vec::with_capacity(node_count),
            timeline: Vec::with_capacity(2 * node_count),
            parent: (0..node_count).map(NodeId::new).collect(),
            depth: vec![0; node_count],
            subtree_size: vec![0; node_count],
        };

        if root.index() >= node_count {
            return dfs;
        }

        let mut post_counter = 0;
        dfs.push(root, root);
        let mut stack = vec![Frame {
            node: root,
            successors: graph.successors(root).collect(),
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            if let Some(&child) = frame.successors.get(frame.next) {
                frame.next += 1;
                if dfs.pre_order[child.index()] == UNVISITED {
                    let parent = frame.node;
                    dfs.push(child, parent);
                    stack.push(Frame {
                        node: child,
                        successors: graph.successors(child).collect(),
                        next: 0,
                    });
                }
                continue;
            }

            let node = frame.node;
            stack.pop();

            dfs.post_order[node.index()] = post_counter;
            post_counter += 1;
            dfs.timeline.push(TimelineEvent::Pop(node));

            if node != root {
                let parent = dfs.parent[node.index()];
                dfs.subtree_size[parent.index()] += dfs.subtree_size[node.index()];
            }
        }

        dfs
    }

    fn push(&mut self, node: NodeId, parent: NodeId) {
        let idx = node.index();
        self.pre_order[idx] = self.pre_order_reversed.len();
        self.pre_order_reversed.push(node);
        self.parent[idx] = parent;
        self.depth[idx] = if node == parent {
            0
        } else {
            self.depth[parent.index()] + 1
        };
        self.subtree_size[idx] = 1;
        self.timeline.push(TimelineEvent::Push(node));
    }

    /// The node the traversal started from.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns `true` if `node` was reached from the root.
    #[must_use]
    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.pre_order
            .get(node.index())
            .is_some_and(|&rank| rank != UNVISITED)
    }

    /// Number of nodes reached from the root.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.pre_order_reversed.len()
    }

    /// Preorder rank of `node`, in `0..reachable_count()`.
    #[must_use]
    pub fn pre_order(&self, node: NodeId) -> usize {
        self.pre_order[node.index()]
    }

    /// Postorder rank of `node`, in `0..reachable_count()`.
    #[must_use]
    pub fn post_order(&self, node: NodeId) -> usize {
        self.post_order[node.index()]
    }

    /// Reached nodes ordered by preorder rank; the inverse of [`Dfs::pre_order`].
    #[must_use]
    pub fn pre_order_reversed(&self) -> &[NodeId] {
        &self.pre_order_reversed
    }

    /// The node with the given preorder rank.
    #[must_use]
    pub fn node_at_pre_order(&self, rank: usize) -> NodeId {
        self.pre_order_reversed[rank]
    }

    /// Push and pop events in the order they happened; `2 * reachable_count()` long.
    #[must_use]
    pub fn timeline(&self) -> &[TimelineEvent] {
        &self.timeline
    }

    /// Iterates the [`timeline`](Dfs::timeline) in chronological order.
    pub fn events(&self) -> impl Iterator<Item = TimelineEvent> + '_ {
        self.timeline.iter().copied()
    }

    /// Spanning-tree parent of `node`; the root is its own parent.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> NodeId {
        self.parent[node.index()]
    }

    /// Distance of `node` from the root in the spanning tree.
    #[must_use]
    pub fn depth(&self, node: NodeId) -> usize {
        self.depth[node.index()]
    }

    /// Number of nodes in the spanning subtree rooted at `node`, itself included.
    #[must_use]
    pub fn subtree_size(&self, node: NodeId) -> usize {
        self.subtree_size[node.index()]
    }

    /// The spanning subtree of `node` in preorder; `node` itself comes first.
    #[must_use]
    pub fn subtree(&self, node: NodeId) -> &[NodeId] {
        let start = self.pre_order(node);
        &self.pre_order_reversed[start..start + self.subtree_size(node)]
    }

    /// Returns `true` if `ancestor` is an ancestor of `node` in the spanning tree.
    /// Every reached node is its own ancestor; unreached nodes have no ancestors.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_reachable(ancestor) || !self.is_reachable(node) {
            return false;
        }
        let start = self.pre_order(ancestor);
        let rank = self.pre_order(node);
        start <= rank && rank < start + self.subtree_size(ancestor)
    }
}
