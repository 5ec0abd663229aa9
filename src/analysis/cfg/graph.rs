//! Control Flow Graph implementation.
//!
//! This module provides [`ControlFlowGraph`], which coalesces an instruction-level
//! successor graph into basic blocks and exposes the block-level graph to the
//! traversal and dominance algorithms.

use std::{fmt::Write, sync::OnceLock};

use crate::{
    utils::{
        escape_dot,
        graph::{
            algorithms::{self, DominatorTree},
            Graph, GraphBase, NodeId, Predecessors, RootedGraph, Successors,
        },
    },
    Error::GraphError,
    Result,
};

/// A control flow graph of basic blocks built from an instruction-level graph.
///
/// # Construction
///
/// Blocks are discovered depth-first from the entry instruction. An instruction `n` is
/// merged with its successor `m` into the same block when `n` has exactly one outgoing
/// edge, `m` exactly one incoming edge, and `m` has not been placed in a block yet. When
/// a block cannot grow any further it is closed, every target of its last instruction
/// is explored in order, and the block is connected to the block owning each target.
///
/// The block containing the entry instruction is always block `0`. Instructions that
/// the entry does not reach belong to no block.
///
/// # Lazy Computation
///
/// - [`dominators`](Self::dominators) - Dominator tree (computed on first access)
///
/// # Examples
///
/// ```rust
/// use ssagraph::analysis::ControlFlowGraph;
/// use ssagraph::utils::graph::{Graph, NodeId};
///
/// // 0 -> 1 -> {2, 3}, 2 -> 4, 3 -> 4
/// let instructions = Graph::new(&[vec![1], vec![2, 3], vec![4], vec![4], vec![]])?;
/// let cfg = ControlFlowGraph::new(&instructions, NodeId::new(0))?;
///
/// assert_eq!(cfg.block_count(), 4);
/// assert_eq!(cfg.block(NodeId::new(0)), Some(&[NodeId::new(0), NodeId::new(1)][..]));
/// assert_eq!(cfg.block_of(NodeId::new(1)), Some(NodeId::new(0)));
/// # Ok::<(), ssagraph::Error>(())
/// ```
#[derive(Debug)]
pub struct ControlFlowGraph {
    /// Block-level graph; node `i` is block `i`.
    graph: Graph,
    /// Instructions of every block, in execution order.
    blocks: Vec<Vec<NodeId>>,
    /// Owning block of every instruction, `None` if unreachable from the entry.
    node_to_basic_block: Vec<Option<NodeId>>,
    /// Lazily computed dominator tree.
    dominators: OnceLock<DominatorTree>,
}

/// A closed block whose outgoing edges are still being explored.
struct BlockFrame {
    block: NodeId,
    targets: Vec<NodeId>,
    next: usize,
}

impl ControlFlowGraph {
    /// Partitions `instructions` into basic blocks, starting from `entry`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::GraphError`] if `entry` is not a node of `instructions`.
    pub fn new(instructions: &Graph, entry: NodeId) -> Result<Self> {
        if entry.index() >= instructions.size() {
            return Err(GraphError(format!(
                "Entry instruction {} does not exist in graph with {} instructions",
                entry,
                instructions.size()
            )));
        }

        let mut cfg = Self {
            graph: Graph::default(),
            blocks: Vec::new(),
            node_to_basic_block: vec![None; instructions.size()],
            dominators: OnceLock::new(),
        };

        let mut stack = vec![cfg.open_block(instructions, entry)];
        while let Some(frame) = stack.last_mut() {
            let block = frame.block;
            if let Some(&target) = frame.targets.get(frame.next) {
                frame.next += 1;
                match cfg.node_to_basic_block[target.index()] {
                    Some(owner) => cfg.graph.push_edge(block, owner),
                    None => {
                        let child = cfg.open_block(instructions, target);
                        stack.push(child);
                    }
                }
                continue;
            }

            stack.pop();
            // The edge into a freshly explored block is added once the block is done.
            if let Some(parent) = stack.last() {
                cfg.graph.push_edge(parent.block, block);
            }
        }

        Ok(cfg)
    }

    /// Opens a block at `start` and grows it along single-entry, single-exit chains.
    fn open_block(&mut self, instructions: &Graph, start: NodeId) -> BlockFrame {
        let block = self.graph.add_node();
        let mut members = vec![start];
        self.node_to_basic_block[start.index()] = Some(block);

        let mut current = start;
        while let [next] = instructions.node(current).forward_edges() {
            let next = *next;
            if instructions.in_degree(next) != 1
                || self.node_to_basic_block[next.index()].is_some()
            {
                break;
            }
            self.node_to_basic_block[next.index()] = Some(block);
            members.push(next);
            current = next;
        }

        self.blocks.push(members);
        BlockFrame {
            block,
            targets: instructions.node(current).forward_edges().to_vec(),
            next: 0,
        }
    }

    /// Returns the entry block, which is always block `0`.
    #[must_use]
    pub const fn entry(&self) -> NodeId {
        NodeId(0)
    }

    /// Returns the number of blocks in the CFG.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the number of instructions of the input graph, reachable or not.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.node_to_basic_block.len()
    }

    /// Returns the instructions of a block, or `None` if the block does not exist.
    #[must_use]
    pub fn block(&self, block: NodeId) -> Option<&[NodeId]> {
        self.blocks.get(block.index()).map(Vec::as_slice)
    }

    /// Returns the instructions of every block, in block order.
    pub fn blocks(&self) -> impl Iterator<Item = &[NodeId]> {
        self.blocks.iter().map(Vec::as_slice)
    }

    /// Returns the block containing `instruction`, or `None` if the instruction is not
    /// reachable from the entry (or does not exist).
    #[must_use]
    pub fn block_of(&self, instruction: NodeId) -> Option<NodeId> {
        self.node_to_basic_block
            .get(instruction.index())
            .copied()
            .flatten()
    }

    /// The block-level graph.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Returns the dominator tree for this CFG.
    ///
    /// The dominator tree is computed lazily on first access and cached.
    /// This operation is thread-safe.
    #[must_use]
    pub fn dominators(&self) -> &DominatorTree {
        self.dominators
            .get_or_init(|| algorithms::compute_dominators(&self.graph, self.entry()))
    }

    /// Renders the block graph in Graphviz DOT format.
    ///
    /// Every block is labelled with the instructions it contains. The entry block is
    /// filled green, blocks without successors red.
    #[must_use]
    pub fn to_dot(&self, title: Option<&str>) -> String {
        let mut dot = String::new();

        dot.push_str("digraph CFG {\n");
        if let Some(name) = title {
            let _ = writeln!(dot, "    label=\"CFG: {}\";", escape_dot(name));
        }
        dot.push_str("    labelloc=t;\n");
        dot.push_str("    node [shape=box, fontname=\"Courier\", fontsize=10];\n\n");

        for (index, members) in self.blocks.iter().enumerate() {
            let block = NodeId::new(index);
            let is_entry = block == self.entry();
            let is_exit = self.graph.out_degree(block) == 0;

            let mut label = format!("B{index}");
            if is_entry {
                label.push_str(" (entry)");
            }
            if is_exit {
                label.push_str(" (exit)");
            }
            label.push_str("\\l");
            for instruction in members {
                let _ = write!(label, "i{}\\l", instruction.index());
            }

            let style = if is_entry {
                ", style=filled, fillcolor=lightgreen"
            } else if is_exit {
                ", style=filled, fillcolor=lightcoral"
            } else {
                ""
            };
            let _ = writeln!(dot, "    B{index} [label=\"{label}\"{style}];");
        }

        dot.push('\n');
        for (index, node) in self.graph.nodes().iter().enumerate() {
            for target in node.forward_edges() {
                let _ = writeln!(dot, "    B{index} -> B{};", target.index());
            }
        }
        dot.push_str("}\n");

        dot
    }
}

impl GraphBase for ControlFlowGraph {
    fn node_count(&self) -> usize {
        self.graph.size()
    }
}

impl Successors for ControlFlowGraph {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.graph.successors(node)
    }
}

impl Predecessors for ControlFlowGraph {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.graph.predecessors(node)
    }
}

impl RootedGraph for ControlFlowGraph {
    fn entry(&self) -> NodeId {
        ControlFlowGraph::entry(self)
    }
}
