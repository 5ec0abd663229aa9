//! Instructions of the function model.
//!
//! An [`Instruction`] writes its target registers and reads its arguments. The model
//! knows nothing about what an operation computes; the only operation it interprets is
//! [`Operation::Phi`], whose arguments come in `(predecessor block, register)` pairs.

use std::fmt;

use crate::analysis::ssa::{BlockId, RegisterId};

/// Unique identifier for an instruction within one [`Function`](super::Function).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstructionId(pub(crate) usize);

impl InstructionId {
    /// Creates a new instruction identifier from a raw table index.
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

impl fmt::Debug for InstructionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.0)
    }
}

impl fmt::Display for InstructionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.0)
    }
}

/// What an instruction does.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Selects the value flowing in from the predecessor control arrived from.
    Phi,
    /// Any other operation, identified by its mnemonic.
    Mnemonic(String),
}

impl From<&str> for Operation {
    fn from(mnemonic: &str) -> Self {
        Operation::Mnemonic(mnemonic.to_string())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Phi => f.write_str("phi"),
            Operation::Mnemonic(mnemonic) => f.write_str(mnemonic),
        }
    }
}

/// An instruction argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Argument {
    /// Reads a register.
    Register(RegisterId),
    /// A constant.
    Immediate(i64),
    /// Refers to a basic block, e.g. the predecessor of a phi pair.
    Block(BlockId),
}

impl Argument {
    /// Returns the register read by this argument, if any.
    #[must_use]
    pub const fn register(self) -> Option<RegisterId> {
        match self {
            Argument::Register(register) => Some(register),
            Argument::Immediate(_) | Argument::Block(_) => None,
        }
    }
}

/// A single instruction: `targets = operation arguments`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub(crate) operation: Operation,
    pub(crate) targets: Vec<RegisterId>,
    pub(crate) arguments: Vec<Argument>,
    pub(crate) block: BlockId,
}

impl Instruction {
    /// The operation performed.
    #[must_use]
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Registers written by this instruction.
    #[must_use]
    pub fn targets(&self) -> &[RegisterId] {
        &self.targets
    }

    /// Arguments read by this instruction.
    #[must_use]
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// The block this instruction belongs to.
    #[must_use]
    pub fn block(&self) -> BlockId {
        self.block
    }

    /// Returns `true` for phi instructions.
    #[must_use]
    pub fn is_phi(&self) -> bool {
        self.operation == Operation::Phi
    }

    /// Registers read by this instruction, in argument order.
    pub fn uses(&self) -> impl Iterator<Item = RegisterId> + '_ {
        self.arguments.iter().filter_map(|argument| argument.register())
    }

    /// Returns the `(predecessor, register)` pairs of a phi instruction, or `None` if
    /// this is not a phi or its arguments are not well-formed pairs.
    #[must_use]
    pub fn phi_pairs(&self) -> Option<Vec<(BlockId, RegisterId)>> {
        if !self.is_phi() || self.arguments.len() % 2 != 0 {
            return None;
        }

        self.arguments
            .chunks_exact(2)
            .map(|pair| match pair {
                [Argument::Block(block), Argument::Register(register)] => {
                    Some((*block, *register))
                }
                _ => None,
            })
            .collect()
    }
}
