//! Phi instructions under construction.
//!
//! Phi placement creates the instruction up front, but its arguments are only known
//! once the renaming pass has visited every predecessor of the phi's block. Until then
//! a [`PhiDescriptor`] collects the `(predecessor, renamed register)` forwarding pairs.

use crate::analysis::ssa::{BlockId, InstructionId, RegisterId};

/// A phi instruction being built for one base register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhiDescriptor {
    instruction: InstructionId,
    base: RegisterId,
    forwarding: Vec<(BlockId, RegisterId)>,
}

impl PhiDescriptor {
    /// Creates a descriptor without forwarding pairs.
    #[must_use]
    pub fn new(instruction: InstructionId, base: RegisterId) -> Self {
        Self {
            instruction,
            base,
            forwarding: Vec::new(),
        }
    }

    /// The phi instruction in the function.
    #[must_use]
    pub fn instruction(&self) -> InstructionId {
        self.instruction
    }

    /// The original register the phi merges.
    #[must_use]
    pub fn base(&self) -> RegisterId {
        self.base
    }

    /// Forwarding pairs collected so far, in the order the predecessors were renamed.
    #[must_use]
    pub fn forwarding(&self) -> &[(BlockId, RegisterId)] {
        &self.forwarding
    }

    /// Records that `register` reaches the phi along the edge from `predecessor`.
    ///
    /// Returns `false` and keeps the existing pair if `predecessor` already has one,
    /// which happens for parallel edges.
    pub fn add_forwarding(&mut self, predecessor: BlockId, register: RegisterId) -> bool {
        if self.forwarding.iter().any(|(block, _)| *block == predecessor) {
            return false;
        }
        self.forwarding.push((predecessor, register));
        true
    }
}
