//! Basic blocks of the function model.

use std::fmt;

use crate::{analysis::ssa::InstructionId, utils::graph::NodeId};

/// Unique identifier for a basic block within one [`Function`](super::Function).
///
/// Blocks are never removed, so block `i` is node `i` of the function's
/// [block graph](super::Function::block_graph); the `From` conversions translate between
/// the two.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub(crate) usize);

impl BlockId {
    /// Creates a new block identifier from a raw table index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the underlying index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

impl From<NodeId> for BlockId {
    fn from(node: NodeId) -> Self {
        Self(node.index())
    }
}

impl From<BlockId> for NodeId {
    fn from(block: BlockId) -> Self {
        NodeId::new(block.index())
    }
}

/// A basic block: a label, an ordered list of instructions and the control flow edges
/// to and from other blocks.
///
/// Phi instructions, when present, come before every other instruction of the block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicBlock {
    pub(crate) label: String,
    pub(crate) instructions: Vec<InstructionId>,
    pub(crate) successors: Vec<BlockId>,
    pub(crate) predecessors: Vec<BlockId>,
}

impl BasicBlock {
    pub(crate) fn new(label: String) -> Self {
        Self {
            label,
            ..Self::default()
        }
    }

    /// The block's label as printed in listings.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The block's instructions, in execution order.
    #[must_use]
    pub fn instructions(&self) -> &[InstructionId] {
        &self.instructions
    }

    /// Blocks control may flow to, in edge insertion order.
    #[must_use]
    pub fn successors(&self) -> &[BlockId] {
        &self.successors
    }

    /// Blocks control may flow from, in edge insertion order.
    #[must_use]
    pub fn predecessors(&self) -> &[BlockId] {
        &self.predecessors
    }

    /// Position of `instruction` within the block.
    #[must_use]
    pub fn position_of(&self, instruction: InstructionId) -> Option<usize> {
        self.instructions.iter().position(|&i| i == instruction)
    }
}
