//! Dominator tree computation using the Lengauer-Tarjan algorithm.
//!
//! # Theory
//!
//! A node `d` **dominates** a node `n` if every path from the entry node to `n`
//! must pass through `d`. The **immediate dominator** of `n` (idom(n)) is the
//! unique node that strictly dominates `n` but does not strictly dominate any
//! other dominator of `n`. Making every node a child of its immediate dominator
//! yields the dominator tree, rooted at the entry.
//!
//! # Algorithm
//!
//! Lengauer and Tarjan, "A Fast Algorithm for Finding Dominators in a Flowgraph",
//! TOPLAS 1979, in its path-compression variant:
//!
//! 1. Number the nodes in depth-first preorder from the entry.
//! 2. Walking preorder ranks downwards, compute each node's semidominator from its
//!    predecessors through the `LinkEvalForest`, link the node below its DFS parent
//!    and settle the bucket of nodes whose semidominator is that parent.
//! 3. Walking preorder ranks upwards, replace every deferred immediate dominator by
//!    the immediate dominator of the recorded node.
//!
//! Steps 2 and 3 work entirely on preorder ranks; the result is mapped back to node
//! ids at the end. Time is O(E log V).
//!
//! # Queries
//!
//! The finished [`DominatorTree`] stores the tree as a [`Graph`] together with a
//! [`Dfs`] of that tree. Dominance is ancestry in the tree, so
//! [`DominatorTree::is_dominator_of`] is a constant-time preorder interval test.

use crate::utils::graph::{
    algorithms::{link_eval::LinkEvalForest, Dfs},
    Graph, NodeId, Predecessors, RootedGraph, Successors,
};

/// Result of dominator tree computation.
///
/// Nodes that are not reachable from the entry have no dominators; every query treats
/// them as unrelated to all nodes, themselves included.
///
/// # Examples
///
/// ```rust
/// use ssagraph::utils::graph::{algorithms::compute_dominators, Graph, NodeId};
///
/// // Diamond: 0 -> {1, 2} -> 3
/// let graph = Graph::new(&[vec![1, 2], vec![3], vec![3], vec![]])?;
/// let dom_tree = compute_dominators(&graph, NodeId::new(0));
///
/// assert_eq!(dom_tree.immediate_dominator(NodeId::new(3)), Some(NodeId::new(0)));
/// assert!(dom_tree.is_dominator_of(NodeId::new(0), NodeId::new(3)));
/// assert!(!dom_tree.is_strict_dominator_of(NodeId::new(1), NodeId::new(3)));
/// # Ok::<(), ssagraph::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DominatorTree {
    /// The entry (root) node of the dominator tree
    entry: NodeId,
    /// Immediate dominator for each node; the entry and unreachable nodes map to themselves
    imm_dom: Vec<NodeId>,
    /// The tree itself, edges from immediate dominator to dominated node
    tree: Graph,
    /// Traversal of `tree` from the entry, used for ancestry queries
    dfs: Dfs,
}

impl DominatorTree {
    /// Returns the entry (root) node of the dominator tree.
    #[inline]
    #[must_use]
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    /// Returns the number of nodes of the analysed graph.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.imm_dom.len()
    }

    /// Raw immediate-dominator array. `imm_dom()[entry] == entry`; entries of nodes
    /// that are unreachable from the entry are meaningless (they hold the node itself).
    #[must_use]
    pub fn imm_dom(&self) -> &[NodeId] {
        &self.imm_dom
    }

    /// Returns the immediate dominator of a node, or `None` for the entry node and for
    /// nodes unreachable from it.
    #[must_use]
    pub fn immediate_dominator(&self, node: NodeId) -> Option<NodeId> {
        if node == self.entry || !self.is_reachable(node) {
            None
        } else {
            Some(self.imm_dom[node.index()])
        }
    }

    /// Returns `true` if `node` is reachable from the entry.
    #[must_use]
    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.dfs.is_reachable(node)
    }

    /// Checks if node `a` dominates node `b`. Every reachable node dominates itself.
    ///
    /// # Complexity
    ///
    /// O(1): an interval test on the preorder numbering of the dominator tree.
    #[must_use]
    pub fn is_dominator_of(&self, a: NodeId, b: NodeId) -> bool {
        self.dfs.is_ancestor(a, b)
    }

    /// Checks if node `a` strictly dominates node `b`, i.e. dominates it and `a != b`.
    #[inline]
    #[must_use]
    pub fn is_strict_dominator_of(&self, a: NodeId, b: NodeId) -> bool {
        a != b && self.is_dominator_of(a, b)
    }

    /// Returns an iterator over all dominators of a node, from the node itself
    /// up to (and including) the entry node. Empty for unreachable nodes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ssagraph::utils::graph::{algorithms::compute_dominators, Graph, NodeId};
    ///
    /// let graph = Graph::new(&[vec![1], vec![2], vec![]])?;
    /// let dom_tree = compute_dominators(&graph, NodeId::new(0));
    /// let chain: Vec<usize> = dom_tree.dominators(NodeId::new(2)).map(NodeId::index).collect();
    /// assert_eq!(chain, vec![2, 1, 0]);
    /// # Ok::<(), ssagraph::Error>(())
    /// ```
    pub fn dominators(&self, node: NodeId) -> DominatorIterator<'_> {
        DominatorIterator {
            tree: self,
            current: self.is_reachable(node).then_some(node),
        }
    }

    /// Depth of a node in the dominator tree; the entry has depth 0.
    #[must_use]
    pub fn depth(&self, node: NodeId) -> usize {
        self.dfs.depth(node)
    }

    /// Nodes whose immediate dominator is `node`, in ascending index order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.tree.node(node).forward_edges()
    }

    /// The dominator tree as a graph with edges `idom(v) -> v`.
    #[must_use]
    pub fn tree(&self) -> &Graph {
        &self.tree
    }

    /// The depth-first traversal of the dominator tree from the entry. Its
    /// [`timeline`](Dfs::timeline) visits every block before any block it dominates.
    #[must_use]
    pub fn dfs(&self) -> &Dfs {
        &self.dfs
    }
}

/// Iterator over dominators of a node, from the node up to the entry.
pub struct DominatorIterator<'a> {
    tree: &'a DominatorTree,
    current: Option<NodeId>,
}

impl Iterator for DominatorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;

        self.current = if current == self.tree.entry {
            None
        } else {
            Some(self.tree.imm_dom[current.index()])
        };
        Some(current)
    }
}

/// Computes the dominator tree of `graph` rooted at `entry` using the Lengauer-Tarjan
/// algorithm.
///
/// Parallel edges and self loops are allowed. Nodes that `entry` does not reach are
/// left out of the tree. Repeated calls on the same graph and entry give identical
/// results.
///
/// # Complexity
///
/// - Time: O(E log V)
/// - Space: O(V)
///
/// # Examples
///
/// ```rust
/// use ssagraph::utils::graph::{algorithms::compute_dominators, Graph, NodeId};
///
/// // Loop: 0 -> 1 -> 2 -> 1, 2 -> 3
/// let graph = Graph::new(&[vec![1], vec![2], vec![1, 3], vec![]])?;
/// let dom_tree = compute_dominators(&graph, NodeId::new(0));
///
/// let imm_dom: Vec<usize> = dom_tree.imm_dom().iter().map(|n| n.index()).collect();
/// assert_eq!(imm_dom, vec![0, 0, 1, 2]);
/// # Ok::<(), ssagraph::Error>(())
/// ```
pub fn compute_dominators<G>(graph: &G, entry: NodeId) -> DominatorTree
where
    G: Successors + Predecessors,
{
    let node_count = graph.node_count();
    let dfs = Dfs::new(graph, entry);
    let reachable = dfs.reachable_count();

    // Everything below works on preorder ranks.
    let mut forest = LinkEvalForest::new(reachable);
    let mut imm_dom_rank: Vec<usize> = (0..reachable).collect();
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); reachable];

    for rank in (1..reachable).rev() {
        let node = dfs.node_at_pre_order(rank);

        let mut semi_dom = forest.semi_dom(rank);
        for pred in graph.predecessors(node) {
            if !dfs.is_reachable(pred) {
                continue;
            }
            let best = forest.eval(dfs.pre_order(pred));
            semi_dom = semi_dom.min(forest.semi_dom(best));
        }
        forest.set_semi_dom(rank, semi_dom);
        buckets[semi_dom].push(rank);

        let parent = dfs.pre_order(dfs.parent(node));
        forest.link(rank, parent);

        for member in std::mem::take(&mut buckets[parent]) {
            let best = forest.eval(member);
            imm_dom_rank[member] = if forest.semi_dom(best) < forest.semi_dom(member) {
                // Deferred: fixed up once `best`'s immediate dominator is known
                best
            } else {
                parent
            };
        }
    }

    for rank in 1..reachable {
        if imm_dom_rank[rank] != forest.semi_dom(rank) {
            imm_dom_rank[rank] = imm_dom_rank[imm_dom_rank[rank]];
        }
    }

    let mut imm_dom: Vec<NodeId> = (0..node_count).map(NodeId::new).collect();
    for (rank, &dominator_rank) in imm_dom_rank.iter().enumerate().skip(1) {
        imm_dom[dfs.node_at_pre_order(rank).index()] = dfs.node_at_pre_order(dominator_rank);
    }

    let tree = Graph::tree_from_parents(&imm_dom);
    let tree_dfs = Dfs::new(&tree, entry);

    DominatorTree {
        entry,
        imm_dom,
        tree,
        dfs: tree_dfs,
    }
}

/// Convenience function to compute dominators for a [`RootedGraph`].
///
/// This is equivalent to calling `compute_dominators(graph, graph.entry())`.
pub fn compute_dominators_rooted<G>(graph: &G) -> DominatorTree
where
    G: RootedGraph,
{
    compute_dominators(graph, graph.entry())
}

#[cfg(test)]
mod tests {
    use crate::utils::graph::{
        algorithms::dominators::compute_dominators,
        test_graphs::{lengauer_tarjan_graph, sreedhar_gao_graph},
        Graph, NodeId,
    };

    fn n(index: usize) -> NodeId {
        NodeId::new(index)
    }

    fn imm_dom_indices(graph: &Graph, entry: usize) -> Vec<usize> {
        compute_dominators(graph, n(entry))
            .imm_dom()
            .iter()
            .map(|node| node.index())
            .collect()
    }

    #[test]
    fn test_dominator_empty_graph() {
        let graph = Graph::default();
        let dom_tree = compute_dominators(&graph, n(0));
        assert_eq!(dom_tree.node_count(), 0);
        assert!(!dom_tree.is_reachable(n(0)));
    }

    #[test]
    fn test_dominator_single_node() {
        let graph = Graph::with_size(1);
        let dom_tree = compute_dominators(&graph, n(0));

        assert_eq!(dom_tree.entry(), n(0));
        assert_eq!(dom_tree.immediate_dominator(n(0)), None);
        assert!(dom_tree.is_dominator_of(n(0), n(0)));
        assert_eq!(dom_tree.depth(n(0)), 0);
    }

    #[test]
    fn test_dominator_diamond() {
        let graph = Graph::new(&[vec![1, 2], vec![3], vec![3], vec![]]).unwrap();
        assert_eq!(imm_dom_indices(&graph, 0), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_dominator_linear_chain() {
        let graph = Graph::new(&[vec![1], vec![2], vec![3], vec![]]).unwrap();
        let dom_tree = compute_dominators(&graph, n(0));

        assert_eq!(dom_tree.immediate_dominator(n(3)), Some(n(2)));
        assert!(dom_tree.is_dominator_of(n(1), n(3)));
        assert!(!dom_tree.is_dominator_of(n(3), n(1)));
        assert_eq!(dom_tree.depth(n(3)), 3);
    }

    #[test]
    fn test_dominator_lengauer_tarjan_figure() {
        // R A B C D E F G H I J K L
        let graph = lengauer_tarjan_graph();
        assert_eq!(
            imm_dom_indices(&graph, 0),
            vec![0, 0, 0, 0, 0, 0, 3, 3, 0, 0, 7, 0, 4]
        );
    }

    #[test]
    fn test_dominator_sreedhar_gao_graph() {
        let graph = sreedhar_gao_graph();
        assert_eq!(
            imm_dom_indices(&graph, 0),
            vec![0, 0, 1, 1, 2, 4, 5, 2, 2, 3, 9, 9, 9, 12, 13, 1, 15]
        );
    }

    #[test]
    fn test_dominator_if_then_else() {
        // entry -> cond -> {then, else} -> merge -> exit
        let graph =
            Graph::new(&[vec![1], vec![2, 3], vec![4], vec![4], vec![5], vec![]]).unwrap();
        assert_eq!(imm_dom_indices(&graph, 0), vec![0, 0, 1, 1, 1, 4]);
    }

    #[test]
    fn test_dominator_loop() {
        // entry -> header -> body -> header, body -> exit
        let graph = Graph::new(&[vec![1], vec![2], vec![1, 3], vec![]]).unwrap();
        let dom_tree = compute_dominators(&graph, n(0));

        assert!(dom_tree.is_dominator_of(n(1), n(2)));
        assert!(!dom_tree.is_strict_dominator_of(n(2), n(1)));
        assert_eq!(dom_tree.immediate_dominator(n(3)), Some(n(2)));
    }

    #[test]
    fn test_dominator_irreducible() {
        // Two entries into the cycle 1 <-> 2
        let graph = Graph::new(&[vec![1, 2], vec![2], vec![1]]).unwrap();
        assert_eq!(imm_dom_indices(&graph, 0), vec![0, 0, 0]);
    }

    #[test]
    fn test_dominator_complex_cfg() {
        //        entry
        //          |
        //          a
        //         / \
        //        b   c
        //        |   |
        //        d   e
        //         \ / \
        //          f   g
        //          |
        //          h
        let graph = Graph::new(&[
            vec![1],
            vec![2, 3],
            vec![4],
            vec![5],
            vec![6],
            vec![6, 7],
            vec![8],
            vec![],
            vec![],
        ])
        .unwrap();
        let dom_tree = compute_dominators(&graph, n(0));

        for node in 2..9 {
            assert!(dom_tree.is_dominator_of(n(1), n(node)));
        }
        assert_eq!(dom_tree.immediate_dominator(n(6)), Some(n(1)));
        assert_eq!(dom_tree.immediate_dominator(n(7)), Some(n(5)));
    }

    #[test]
    fn test_dominator_parallel_edges_and_self_loops() {
        let graph = Graph::new(&[vec![1, 1], vec![1, 2, 2], vec![]]).unwrap();
        assert_eq!(imm_dom_indices(&graph, 0), vec![0, 0, 1]);
    }

    #[test]
    fn test_dominator_non_zero_entry() {
        // 2 -> 0 -> 1, 2 -> 1; node 3 unreachable
        let graph = Graph::new(&[vec![1], vec![], vec![0, 1], vec![0]]).unwrap();
        let dom_tree = compute_dominators(&graph, n(2));

        assert_eq!(dom_tree.immediate_dominator(n(0)), Some(n(2)));
        assert_eq!(dom_tree.immediate_dominator(n(1)), Some(n(2)));
        assert_eq!(dom_tree.immediate_dominator(n(3)), None);
        assert!(!dom_tree.is_dominator_of(n(3), n(3)));
        assert!(!dom_tree.is_dominator_of(n(2), n(3)));
        assert_eq!(dom_tree.dominators(n(3)).count(), 0);
    }

    #[test]
    fn test_dominator_reflexive_but_not_strict() {
        let graph = lengauer_tarjan_graph();
        let dom_tree = compute_dominators(&graph, n(0));

        for node in 0..graph.size() {
            assert!(dom_tree.is_dominator_of(n(node), n(node)));
            assert!(!dom_tree.is_strict_dominator_of(n(node), n(node)));
        }
    }

    #[test]
    fn test_dominator_queries_agree_with_imm_dom_chain() {
        let graph = sreedhar_gao_graph();
        let dom_tree = compute_dominators(&graph, n(0));

        for b in 0..graph.size() {
            let chain: Vec<NodeId> = dom_tree.dominators(n(b)).collect();
            for a in 0..graph.size() {
                assert_eq!(
                    dom_tree.is_dominator_of(n(a), n(b)),
                    chain.contains(&n(a)),
                    "dominance of {a} over {b}"
                );
            }
        }
    }

    #[test]
    fn test_dominator_idempotent() {
        let graph = lengauer_tarjan_graph();
        let first = compute_dominators(&graph, n(0));
        let second = compute_dominators(&graph, n(0));
        assert_eq!(first.imm_dom(), second.imm_dom());
        assert_eq!(first.tree(), second.tree());
    }

    #[test]
    fn test_dominator_children_and_tree() {
        let graph = Graph::new(&[vec![1, 2], vec![3], vec![3], vec![]]).unwrap();
        let dom_tree = compute_dominators(&graph, n(0));

        assert_eq!(dom_tree.children(n(0)), &[n(1), n(2), n(3)]);
        assert!(dom_tree.children(n(1)).is_empty());
        assert_eq!(
            dom_tree.tree(),
            &Graph::new(&[vec![1, 2, 3], vec![], vec![], vec![]]).unwrap()
        );
    }

    #[test]
    fn test_dominator_iterator() {
        let graph = Graph::new(&[vec![1], vec![2], vec![3], vec![]]).unwrap();
        let dom_tree = compute_dominators(&graph, n(0));

        let dominators: Vec<NodeId> = dom_tree.dominators(n(3)).collect();
        assert_eq!(dominators, vec![n(3), n(2), n(1), n(0)]);
        let dominators: Vec<NodeId> = dom_tree.dominators(n(0)).collect();
        assert_eq!(dominators, vec![n(0)]);
    }

    #[test]
    fn test_dominator_deep_chain() {
        let size = 100_000;
        let edges: Vec<Vec<usize>> = (0..size)
            .map(|i| if i + 1 < size { vec![i + 1, 0] } else { vec![0] })
            .collect();
        let graph = Graph::new(&edges).unwrap();
        let dom_tree = compute_dominators(&graph, n(0));

        assert_eq!(dom_tree.immediate_dominator(n(size - 1)), Some(n(size - 2)));
        assert_eq!(dom_tree.depth(n(size - 1)), size - 1);
    }
}
