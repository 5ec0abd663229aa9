//! Registers and their identifiers.
//!
//! A [`Register`] is a named storage location of a [`Function`](super::Function). Before
//! SSA construction a register may be written by any number of instructions; afterwards
//! every register has exactly one definition, or none if it is a function parameter.

use std::fmt;

use crate::analysis::ssa::InstructionId;

/// Unique identifier for a register.
///
/// This is a lightweight handle into the register table of one
/// [`Function`](super::Function). It is not meaningful across functions.
///
/// # Examples
///
/// ```rust
/// use ssagraph::analysis::ssa::Function;
///
/// let mut function = Function::new("f");
/// let x = function.add_register("x");
/// assert_eq!(function.register(x).map(|r| r.name()), Some("x"));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegisterId(pub(crate) usize);

impl RegisterId {
    /// Creates a new register identifier from a raw table index.
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

impl fmt::Debug for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// A register and the instructions that write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    name: String,
    definitions: Vec<InstructionId>,
}

impl Register {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            definitions: Vec::new(),
        }
    }

    /// The register's name as printed in listings.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instructions that have this register among their targets, in the order the
    /// targets were assigned.
    #[must_use]
    pub fn definitions(&self) -> &[InstructionId] {
        &self.definitions
    }

    pub(crate) fn add_definition(&mut self, instruction: InstructionId) {
        self.definitions.push(instruction);
    }

    /// Forgets one definition by `instruction`.
    pub(crate) fn remove_definition(&mut self, instruction: InstructionId) {
        if let Some(position) = self.definitions.iter().position(|&d| d == instruction) {
            self.definitions.remove(position);
        }
    }
}
