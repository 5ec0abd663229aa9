//! Link-eval forest with path compression.
//!
//! Helper structure of the Lengauer-Tarjan dominator algorithm. All indices are
//! preorder ranks of the graph being analysed, not node ids: the algorithm links
//! nodes in decreasing preorder, so when `eval` runs on a node everything that can
//! influence its answer is already part of the forest.

/// A forest over `0..n` supporting `link` and minimum-semidominator `eval`.
///
/// `semi_dom[v]` is the semidominator candidate of `v` (initially `v` itself),
/// `parent[v]` the forest parent (a root is its own parent) and `label[v]` the node with
/// the smallest `semi_dom` on the compressed path from `v` up to, but excluding, the
/// root of its tree.
#[derive(Debug, Clone)]
pub(crate) struct LinkEvalForest {
    semi_dom: Vec<usize>,
    parent: Vec<usize>,
    label: Vec<usize>,
    // Scratch buffer for the compression walk, reused across `eval` calls.
    path: Vec<usize>,
}

impl LinkEvalForest {
    /// Creates `size` singleton trees with `semi_dom[v] = v`.
    pub(crate) fn new(size: usize) -> Self {
        Self {
            semi_dom: (0..size).collect(),
            parent: (0..size).collect(),
            label: (0..size).collect(),
            path: Vec::new(),
        }
    }

    pub(crate) fn semi_dom(&self, node: usize) -> usize {
        self.semi_dom[node]
    }

    pub(crate) fn set_semi_dom(&mut self, node: usize, value: usize) {
        self.semi_dom[node] = value;
    }

    /// Makes `parent` the forest parent of the root `child`.
    pub(crate) fn link(&mut self, child: usize, parent: usize) {
        self.parent[child] = parent;
    }

    fn is_root(&self, node: usize) -> bool {
        self.parent[node] == node
    }

    /// Returns the node with minimal `semi_dom` on the path from `node` to the root of
    /// its tree (root excluded), or `node` itself if it is a root. Every node on the
    /// walked path is re-parented directly below the root.
    pub(crate) fn eval(&mut self, node: usize) -> usize {
        if self.is_root(node) {
            return node;
        }

        // Collect the nodes whose parent is not yet the root.
        let mut path = std::mem::take(&mut self.path);
        let mut current = node;
        while !self.is_root(self.parent[current]) {
            path.push(current);
            current = self.parent[current];
        }

        // Compress top-down: a node's parent is fully compressed before the node itself.
        for &member in path.iter().rev() {
            let parent = self.parent[member];
            if self.semi_dom[self.label[parent]] < self.semi_dom[self.label[member]] {
                self.label[member] = self.label[parent];
            }
            self.parent[member] = self.parent[parent];
        }

        path.clear();
        self.path = path;
        self.label[node]
    }
}
