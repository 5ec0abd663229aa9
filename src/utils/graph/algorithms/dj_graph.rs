//! Dominator-join graphs and dominance frontiers.
//!
//! The DJ-graph of Sreedhar and Gao ("A Linear Time Algorithm for Placing φ-Nodes",
//! POPL 1995) splits the edges of a flow graph into *dominator edges*, which form the
//! dominator tree, and *join edges*: every original edge `u -> v` where `u` does not
//! strictly dominate `v`. A node `j` is in the dominance frontier of `x` exactly when
//! some join edge `s -> j` leaves the dominator subtree of `x` and `j` is not deeper
//! in the dominator tree than `x`.
//!
//! [`DominatorJoinGraph::iterated_dominator_frontier`] computes the closure
//! `DF+(S)` in time linear in the size of the graph by processing nodes from the
//! deepest dominator-tree level upwards through a piggy bank of pending nodes, and by never walking
//! the same dominator subtree twice.

use crate::utils::graph::{
    algorithms::{compute_dominators, DominatorTree},
    Graph, NodeId, Predecessors, Successors,
};

/// A dominator tree together with the join edges of the graph it was computed for.
///
/// # Examples
///
/// ```rust
/// use ssagraph::utils::graph::{algorithms::DominatorJoinGraph, Graph, NodeId};
///
/// // Loop: 0 -> 1 -> 2 -> 1, 2 -> 3
/// let graph = Graph::new(&[vec![1], vec![2], vec![1, 3], vec![]])?;
/// let dj_graph = DominatorJoinGraph::new(&graph, NodeId::new(0));
///
/// assert_eq!(dj_graph.dominator_frontier(NodeId::new(2)), vec![NodeId::new(1)]);
/// assert_eq!(
///     dj_graph.iterated_dominator_frontier(&[NodeId::new(2)]),
///     vec![NodeId::new(1)]
/// );
/// # Ok::<(), ssagraph::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DominatorJoinGraph {
    dom_tree: DominatorTree,
    join_graph: Graph,
}

impl DominatorJoinGraph {
    /// Computes the dominator tree of `graph` from `entry` and derives the join edges.
    #[must_use]
    pub fn new<G>(graph: &G, entry: NodeId) -> Self
    where
        G: Successors + Predecessors,
    {
        let dom_tree = compute_dominators(graph, entry);
        Self::from_dominator_tree(graph, dom_tree)
    }

    /// Derives the join edges of `graph` for an already computed dominator tree of it.
    ///
    /// Edges leaving nodes that are unreachable from the entry are not join edges.
    #[must_use]
    pub fn from_dominator_tree<G>(graph: &G, dom_tree: DominatorTree) -> Self
    where
        G: Successors,
    {
        let mut join_graph = Graph::with_size(graph.node_count());
        for source in graph.node_ids() {
            if !dom_tree.is_reachable(source) {
                continue;
            }
            for target in graph.successors(source) {
                if !dom_tree.is_strict_dominator_of(source, target) {
                    join_graph.push_edge(source, target);
                }
            }
        }

        Self {
            dom_tree,
            join_graph,
        }
    }

    /// The dominator tree the join edges were derived for.
    #[must_use]
    pub fn dominator_tree(&self) -> &DominatorTree {
        &self.dom_tree
    }

    /// The join edges, as a graph over the same nodes as the analysed graph.
    #[must_use]
    pub fn join_graph(&self) -> &Graph {
        &self.join_graph
    }

    /// Returns `true` if `source -> target` is an edge of the analysed graph that
    /// `source` does not strictly dominate.
    #[must_use]
    pub fn is_join_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.join_graph
            .node(source)
            .forward_edges()
            .contains(&target)
    }

    /// Computes the dominance frontier of a single node: the nodes `j` such that
    /// `node` dominates a predecessor of `j` but does not strictly dominate `j`.
    ///
    /// Every node appears at most once, in discovery order. Unreachable nodes have an
    /// empty frontier.
    ///
    /// # Complexity
    ///
    /// Linear in the size of `node`'s dominator subtree plus the join edges leaving it.
    #[must_use]
    pub fn dominator_frontier(&self, node: NodeId) -> Vec<NodeId> {
        let mut frontier = Vec::new();
        if !self.dom_tree.is_reachable(node) {
            return frontier;
        }

        let max_depth = self.dom_tree.depth(node);
        let mut in_frontier = vec![false; self.join_graph.size()];
        for &member in self.dom_tree.dfs().subtree(node) {
            for &target in self.join_graph.node(member).forward_edges() {
                if self.dom_tree.depth(target) <= max_depth && !in_frontier[target.index()] {
                    in_frontier[target.index()] = true;
                    frontier.push(target);
                }
            }
        }
        frontier
    }

    /// Computes the iterated dominance frontier `DF+(nodes)`, the least fixpoint of
    /// `X = DF(nodes ∪ X)`. These are exactly the blocks that need a phi instruction
    /// for a variable defined in `nodes`.
    ///
    /// Duplicate and unreachable input nodes are ignored. Every node appears at most
    /// once in the result, in discovery order.
    ///
    /// # Complexity
    ///
    /// O(V + E) for the whole set: each dominator subtree is walked once.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ssagraph::utils::graph::{algorithms::DominatorJoinGraph, Graph, NodeId};
    ///
    /// // Nested loops: 0 -> 1 -> 2 -> 3 -> 2, 3 -> 4 -> 1, 4 -> 5
    /// let graph = Graph::new(&[vec![1], vec![2], vec![3], vec![2, 4], vec![1, 5], vec![]])?;
    /// let dj_graph = DominatorJoinGraph::new(&graph, NodeId::new(0));
    ///
    /// let mut idf = dj_graph.iterated_dominator_frontier(&[NodeId::new(3)]);
    /// idf.sort();
    /// assert_eq!(idf, vec![NodeId::new(1), NodeId::new(2)]);
    /// # Ok::<(), ssagraph::Error>(())
    /// ```
    #[must_use]
    pub fn iterated_dominator_frontier(&self, nodes: &[NodeId]) -> Vec<NodeId> {
        let node_count = self.join_graph.size();
        let dfs = self.dom_tree.dfs();

        let mut bank = PiggyBank::default();
        let mut in_bank = vec![false; node_count];
        let mut visited = vec![false; node_count];
        let mut in_result = vec![false; node_count];
        let mut result = Vec::new();

        for &node in nodes {
            if self.dom_tree.is_reachable(node) && !in_bank[node.index()] {
                in_bank[node.index()] = true;
                bank.insert(node, self.dom_tree.depth(node));
            }
        }

        while let Some((popped, level)) = bank.pop() {
            if visited[popped.index()] {
                continue;
            }

            let start = dfs.pre_order(popped);
            let end = start + dfs.subtree_size(popped);
            let mut rank = start;
            while rank < end {
                let member = dfs.node_at_pre_order(rank);
                if member != popped && visited[member.index()] {
                    // Already walked from a deeper seed; its join edges are accounted for.
                    rank += dfs.subtree_size(member);
                    continue;
                }
                visited[member.index()] = true;

                for &target in self.join_graph.node(member).forward_edges() {
                    if self.dom_tree.depth(target) > level || in_result[target.index()] {
                        continue;
                    }
                    in_result[target.index()] = true;
                    result.push(target);
                    if !in_bank[target.index()] {
                        in_bank[target.index()] = true;
                        bank.insert(target, self.dom_tree.depth(target));
                    }
                }
                rank += 1;
            }
        }

        result
    }
}

/// Pending nodes of an iterated dominance frontier computation, bucketed by their
/// depth in the dominator tree.
///
/// [`PiggyBank::pop`] always hands out a node of the greatest depth that still has
/// pending nodes. Nodes inserted during processing are never deeper than the node
/// being processed, so the current level only ever moves towards the root.
#[derive(Debug, Default)]
struct PiggyBank {
    depth_to_nodes: Vec<Vec<NodeId>>,
    current_level: usize,
}

impl PiggyBank {
    fn insert(&mut self, node: NodeId, depth: usize) {
        if self.depth_to_nodes.len() <= depth {
            self.depth_to_nodes.resize_with(depth + 1, Vec::new);
        }
        self.depth_to_nodes[depth].push(node);
        self.current_level = self.current_level.max(depth);
    }

    fn pop(&mut self) -> Option<(NodeId, usize)> {
        loop {
            let bucket = self.depth_to_nodes.get_mut(self.current_level)?;
            if let Some(node) = bucket.pop() {
                return Some((node, self.current_level));
            }
            if self.current_level == 0 {
                return None;
            }
            self.current_level -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::graph::test_graphs::sreedhar_gao_graph;

    fn n(index: usize) -> NodeId {
        NodeId::new(index)
    }

    fn sorted(mut nodes: Vec<NodeId>) -> Vec<usize> {
        nodes.sort_unstable();
        nodes.into_iter().map(NodeId::index).collect()
    }

    #[test]
    fn test_join_edges_exclude_strict_dominance() {
        let graph = Graph::new(&[vec![1, 2], vec![3], vec![3], vec![0]]).unwrap();
        let dj_graph = DominatorJoinGraph::new(&graph, n(0));

        assert!(!dj_graph.is_join_edge(n(0), n(1)));
        assert!(dj_graph.is_join_edge(n(1), n(3)));
        assert!(dj_graph.is_join_edge(n(2), n(3)));
        assert!(dj_graph.is_join_edge(n(3), n(0)));
        assert_eq!(dj_graph.join_graph().edge_count(), 3);
    }

    #[test]
    fn test_self_loop_is_join_edge() {
        let graph = Graph::new(&[vec![1], vec![1, 2], vec![]]).unwrap();
        let dj_graph = DominatorJoinGraph::new(&graph, n(0));

        assert!(dj_graph.is_join_edge(n(1), n(1)));
        assert_eq!(dj_graph.dominator_frontier(n(1)), vec![n(1)]);
    }

    #[test]
    fn test_dominator_frontier_diamond() {
        let graph = Graph::new(&[vec![1, 2], vec![3], vec![3], vec![]]).unwrap();
        let dj_graph = DominatorJoinGraph::new(&graph, n(0));

        assert_eq!(dj_graph.dominator_frontier(n(1)), vec![n(3)]);
        assert_eq!(dj_graph.dominator_frontier(n(2)), vec![n(3)]);
        assert!(dj_graph.dominator_frontier(n(0)).is_empty());
        assert!(dj_graph.dominator_frontier(n(3)).is_empty());
    }

    #[test]
    fn test_dominator_frontier_sreedhar_gao() {
        let graph = sreedhar_gao_graph();
        let dj_graph = DominatorJoinGraph::new(&graph, n(0));

        assert_eq!(sorted(dj_graph.dominator_frontier(n(3))), vec![3, 15]);
        assert_eq!(sorted(dj_graph.dominator_frontier(n(9))), vec![3, 15]);
        assert_eq!(sorted(dj_graph.dominator_frontier(n(12))), vec![3, 12, 15]);
    }

    #[test]
    fn test_iterated_dominator_frontier_sreedhar_gao() {
        let graph = sreedhar_gao_graph();
        let dj_graph = DominatorJoinGraph::new(&graph, n(0));

        assert_eq!(
            sorted(dj_graph.iterated_dominator_frontier(&[n(9), n(12)])),
            vec![3, 12, 15]
        );
        assert_eq!(
            sorted(dj_graph.iterated_dominator_frontier(&[n(5), n(13)])),
            vec![2, 3, 8, 12, 15]
        );
    }

    #[test]
    fn test_iterated_frontier_contains_plain_frontiers() {
        let graph = sreedhar_gao_graph();
        let dj_graph = DominatorJoinGraph::new(&graph, n(0));

        for node in 0..graph.size() {
            let idf = dj_graph.iterated_dominator_frontier(&[n(node)]);
            for member in dj_graph.dominator_frontier(n(node)) {
                assert!(idf.contains(&member), "DF({node}) member {member} missing");
            }
        }
    }

    #[test]
    fn test_iterated_frontier_ignores_duplicates_and_unreachable() {
        // 3 is unreachable and jumps into the diamond
        let graph = Graph::new(&[vec![1, 2], vec![4], vec![4], vec![4], vec![]]).unwrap();
        let dj_graph = DominatorJoinGraph::new(&graph, n(0));

        assert_eq!(
            dj_graph.iterated_dominator_frontier(&[n(1), n(1), n(3)]),
            vec![n(4)]
        );
        assert!(dj_graph.dominator_frontier(n(3)).is_empty());
        assert!(!dj_graph.is_join_edge(n(3), n(4)));
        assert!(dj_graph.iterated_dominator_frontier(&[]).is_empty());
    }

    #[test]
    fn test_frontier_with_parallel_edges() {
        let graph = Graph::new(&[vec![1, 2], vec![3, 3], vec![3], vec![]]).unwrap();
        let dj_graph = DominatorJoinGraph::new(&graph, n(0));

        assert_eq!(dj_graph.dominator_frontier(n(1)), vec![n(3)]);
        assert_eq!(dj_graph.iterated_dominator_frontier(&[n(1), n(2)]), vec![n(3)]);
    }

    #[test]
    fn test_piggy_bank_pops_deepest_first() {
        let mut bank = PiggyBank::default();
        bank.insert(n(1), 1);
        bank.insert(n(4), 3);
        bank.insert(n(2), 1);

        assert_eq!(bank.pop(), Some((n(4), 3)));
        bank.insert(n(7), 2);
        assert_eq!(bank.pop(), Some((n(7), 2)));
        assert_eq!(bank.pop(), Some((n(2), 1)));
        assert_eq!(bank.pop(), Some((n(1), 1)));
        assert_eq!(bank.pop(), None);
    }
}
