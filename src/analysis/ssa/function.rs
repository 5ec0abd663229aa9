//! Function representation: an arena of blocks, instructions and registers.
//!
//! A [`Function`] owns every entity it refers to and hands out plain index handles
//! ([`BlockId`], [`InstructionId`], [`RegisterId`]). Handles stay valid for the lifetime
//! of the function: removing an instruction or deleting a register leaves an empty slot
//! behind instead of shifting later entries.
//!
//! # Structure
//!
//! ```text
//! Function
//! ├── blocks: Vec<BasicBlock>                // never removed, block i = graph node i
//! ├── instructions: Vec<Option<Instruction>> // None once removed
//! ├── registers: Vec<Option<Register>>       // None once deleted
//! └── parameters: Vec<RegisterId>            // live on entry, no defining instruction
//! ```
//!
//! # Construction
//!
//! Functions are either assembled block by block ([`Function::add_block`],
//! [`Function::add_edge`], [`Function::append_instruction`]) or derived from a flat
//! instruction list and its successor relation with
//! [`Function::from_instruction_graph`], which forms basic blocks through
//! [`ControlFlowGraph`].
//!
//! # Thread Safety
//!
//! `Function` is `Send` and `Sync`; independent functions can be converted to SSA form
//! in parallel.

use std::{collections::HashMap, fmt};

use crate::{
    analysis::{
        cfg::ControlFlowGraph,
        ssa::{
            Argument, BasicBlock, BlockId, Instruction, InstructionId, Operation, Register,
            RegisterId,
        },
    },
    utils::graph::{Graph, NodeId},
    Error, Result,
};

/// A function: basic blocks of instructions over a set of registers.
///
/// # Examples
///
/// ```rust
/// use ssagraph::analysis::ssa::{Argument, Function};
///
/// let mut function = Function::new("double");
/// let a = function.add_parameter("a");
/// let x = function.add_register("x");
///
/// let entry = function.add_block("entry");
/// function.append_instruction(entry, "add".into(), vec![x], vec![
///     Argument::Register(a),
///     Argument::Register(a),
/// ])?;
/// function.append_instruction(entry, "ret".into(), vec![], vec![Argument::Register(x)])?;
///
/// assert_eq!(function.to_string(), "function double(a) {\nentry:\n    x = add a, a\n    ret x\n}\n");
/// # Ok::<(), ssagraph::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Function {
    name: String,
    blocks: Vec<BasicBlock>,
    instructions: Vec<Option<Instruction>>,
    registers: Vec<Option<Register>>,
    parameters: Vec<RegisterId>,
}

/// A source-level instruction for [`Function::from_instruction_graph`], naming its
/// registers instead of referring to them by handle.
///
/// # Examples
///
/// ```rust
/// use ssagraph::analysis::ssa::InstructionTemplate;
///
/// // x = add a, 1
/// let add = InstructionTemplate::new("add").target("x").register("a").immediate(1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionTemplate {
    operation: Operation,
    targets: Vec<String>,
    arguments: Vec<TemplateArgument>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TemplateArgument {
    Register(String),
    Immediate(i64),
}

impl InstructionTemplate {
    /// Starts a template without targets or arguments.
    #[must_use]
    pub fn new(operation: impl Into<Operation>) -> Self {
        Self {
            operation: operation.into(),
            targets: Vec::new(),
            arguments: Vec::new(),
        }
    }

    /// Adds a target register.
    #[must_use]
    pub fn target(mut self, name: impl Into<String>) -> Self {
        self.targets.push(name.into());
        self
    }

    /// Adds a register argument.
    #[must_use]
    pub fn register(mut self, name: impl Into<String>) -> Self {
        self.arguments.push(TemplateArgument::Register(name.into()));
        self
    }

    /// Adds a constant argument.
    #[must_use]
    pub fn immediate(mut self, value: i64) -> Self {
        self.arguments.push(TemplateArgument::Immediate(value));
        self
    }
}

impl Function {
    /// Creates an empty function.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builds a function from a flat instruction list and its successor relation.
    ///
    /// `successors` has one node per entry of `instructions`. Basic blocks are formed by
    /// [`ControlFlowGraph::new`] and labelled `b0`, `b1`, ... in discovery order, with
    /// the block of `entry` first. Instructions the entry does not reach are dropped.
    /// Registers are created on first mention, parameters first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if `successors` and `instructions` differ in size
    /// or `entry` does not exist.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ssagraph::analysis::ssa::{Function, InstructionTemplate};
    /// use ssagraph::utils::graph::{Graph, NodeId};
    ///
    /// let instructions = [
    ///     InstructionTemplate::new("mov").target("x").immediate(0),
    ///     InstructionTemplate::new("br").register("c"),
    ///     InstructionTemplate::new("mov").target("x").immediate(1),
    ///     InstructionTemplate::new("ret").register("x"),
    /// ];
    /// let successors = Graph::new(&[vec![1], vec![2, 3], vec![3], vec![]])?;
    /// let function = Function::from_instruction_graph(
    ///     "select",
    ///     &["c"],
    ///     &instructions,
    ///     &successors,
    ///     NodeId::new(0),
    /// )?;
    ///
    /// assert_eq!(function.block_count(), 3);
    /// assert_eq!(function.register_count(), 2);
    /// # Ok::<(), ssagraph::Error>(())
    /// ```
    pub fn from_instruction_graph(
        name: impl Into<String>,
        parameters: &[&str],
        instructions: &[InstructionTemplate],
        successors: &Graph,
        entry: NodeId,
    ) -> Result<Self> {
        if instructions.len() != successors.size() {
            return Err(Error::GraphError(format!(
                "Successor graph has {} nodes but there are {} instructions",
                successors.size(),
                instructions.len()
            )));
        }

        let cfg = ControlFlowGraph::new(successors, entry)?;
        let mut function = Function::new(name);
        let mut names: HashMap<String, RegisterId> = HashMap::new();

        for &parameter in parameters {
            let register = function.add_parameter(parameter);
            names.insert(parameter.to_string(), register);
        }

        for index in 0..cfg.block_count() {
            function.add_block(format!("b{index}"));
        }
        for (source, node) in cfg.graph().nodes().iter().enumerate() {
            for &target in node.forward_edges() {
                function.add_edge(BlockId::new(source), target.into())?;
            }
        }

        for (index, members) in cfg.blocks().enumerate() {
            for member in members {
                let template = &instructions[member.index()];

                let mut targets = Vec::with_capacity(template.targets.len());
                for name in &template.targets {
                    targets.push(function.register_named(&mut names, name));
                }

                let mut arguments = Vec::with_capacity(template.arguments.len());
                for argument in &template.arguments {
                    arguments.push(match argument {
                        TemplateArgument::Register(name) => {
                            Argument::Register(function.register_named(&mut names, name))
                        }
                        TemplateArgument::Immediate(value) => Argument::Immediate(*value),
                    });
                }

                function.append_instruction(
                    BlockId::new(index),
                    template.operation.clone(),
                    targets,
                    arguments,
                )?;
            }
        }

        Ok(function)
    }

    fn register_named(&mut self, names: &mut HashMap<String, RegisterId>, name: &str) -> RegisterId {
        if let Some(&register) = names.get(name) {
            return register;
        }
        let register = self.add_register(name);
        names.insert(name.to_string(), register);
        register
    }

    /// The function's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    // Registers

    /// Adds a register without definitions.
    pub fn add_register(&mut self, name: impl Into<String>) -> RegisterId {
        self.registers.push(Some(Register::new(name.into())));
        RegisterId(self.registers.len() - 1)
    }

    /// Adds a register that is live on entry to the function.
    pub fn add_parameter(&mut self, name: impl Into<String>) -> RegisterId {
        let register = self.add_register(name);
        self.parameters.push(register);
        register
    }

    /// Parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[RegisterId] {
        &self.parameters
    }

    /// Returns `true` if `register` is a parameter.
    #[must_use]
    pub fn is_parameter(&self, register: RegisterId) -> bool {
        self.parameters.contains(&register)
    }

    /// Makes `new` a parameter in place of `old`, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SsaError`] if `old` is not a parameter or `new` does not exist.
    pub fn replace_parameter(&mut self, old: RegisterId, new: RegisterId) -> Result<()> {
        self.check_register(new)?;
        let slot = self
            .parameters
            .iter_mut()
            .find(|parameter| **parameter == old)
            .ok_or_else(|| {
                Error::SsaError(format!("Register {old} is not a parameter of {}", self.name))
            })?;
        *slot = new;
        Ok(())
    }

    /// Returns a register, or `None` if it does not exist or was deleted.
    #[must_use]
    pub fn register(&self, register: RegisterId) -> Option<&Register> {
        self.registers.get(register.index()).and_then(Option::as_ref)
    }

    /// Iterates the live registers in creation order.
    pub fn registers(&self) -> impl Iterator<Item = (RegisterId, &Register)> {
        self.registers
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|r| (RegisterId(index), r)))
    }

    /// Number of live registers.
    #[must_use]
    pub fn register_count(&self) -> usize {
        self.registers.iter().flatten().count()
    }

    /// Size of the register table, deleted slots included. Every [`RegisterId`] of this
    /// function is below this bound.
    #[must_use]
    pub fn register_capacity(&self) -> usize {
        self.registers.len()
    }

    /// Deletes a register that no instruction defines any more.
    ///
    /// Uses of the register are not checked; [`verify_ssa`](super::verify_ssa) reports
    /// instructions still referring to deleted registers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SsaError`] if the register does not exist, is a parameter, or
    /// still has definitions.
    pub fn delete_register(&mut self, register: RegisterId) -> Result<()> {
        let entry = self.register(register).ok_or_else(|| {
            Error::SsaError(format!("Register {register} does not exist in {}", self.name))
        })?;
        if !entry.definitions().is_empty() {
            return Err(Error::SsaError(format!(
                "Register {} is still defined by {} instruction(s)",
                entry.name(),
                entry.definitions().len()
            )));
        }
        if self.is_parameter(register) {
            return Err(Error::SsaError(format!(
                "Register {} is a parameter of {}",
                entry.name(),
                self.name
            )));
        }

        self.registers[register.index()] = None;
        Ok(())
    }

    /// Returns `true` if any instruction reads `register`.
    #[must_use]
    pub fn is_register_used(&self, register: RegisterId) -> bool {
        self.instructions
            .iter()
            .flatten()
            .any(|instruction| instruction.uses().any(|used| used == register))
    }

    fn check_register(&self, register: RegisterId) -> Result<()> {
        if self.register(register).is_some() {
            Ok(())
        } else {
            Err(Error::SsaError(format!(
                "Register {register} does not exist in {}",
                self.name
            )))
        }
    }

    fn register_mut(&mut self, register: RegisterId) -> Result<&mut Register> {
        match self.registers.get_mut(register.index()) {
            Some(Some(entry)) => Ok(entry),
            _ => Err(Error::SsaError(format!(
                "Register {register} does not exist in {}",
                self.name
            ))),
        }
    }

    // Blocks

    /// Appends an empty block.
    pub fn add_block(&mut self, label: impl Into<String>) -> BlockId {
        self.blocks.push(BasicBlock::new(label.into()));
        BlockId(self.blocks.len() - 1)
    }

    /// Returns a block, or `None` if it does not exist.
    #[must_use]
    pub fn block(&self, block: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(block.index())
    }

    /// Iterates all blocks in creation order.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &BasicBlock)> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(index, block)| (BlockId(index), block))
    }

    /// Number of blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// The entry block: the first block created, if any.
    #[must_use]
    pub fn entry(&self) -> Option<BlockId> {
        (!self.blocks.is_empty()).then_some(BlockId(0))
    }

    /// Adds the control flow edge `from -> to`. No duplicate check is performed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if either block does not exist.
    pub fn add_edge(&mut self, from: BlockId, to: BlockId) -> Result<()> {
        for block in [from, to] {
            if block.index() >= self.blocks.len() {
                return Err(Error::GraphError(format!(
                    "Block {block} does not exist in {} with {} blocks",
                    self.name,
                    self.blocks.len()
                )));
            }
        }

        self.blocks[from.index()].successors.push(to);
        self.blocks[to.index()].predecessors.push(from);
        Ok(())
    }

    /// The control flow between blocks as a graph; node `i` is block `i`.
    #[must_use]
    pub fn block_graph(&self) -> Graph {
        let mut graph = Graph::with_size(self.blocks.len());
        for (index, block) in self.blocks.iter().enumerate() {
            for successor in &block.successors {
                graph.push_edge(NodeId::new(index), (*successor).into());
            }
        }
        graph
    }

    // Instructions

    /// Appends an instruction to the end of `block`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SsaError`] if the block or a referenced register or block does
    /// not exist.
    pub fn append_instruction(
        &mut self,
        block: BlockId,
        operation: Operation,
        targets: Vec<RegisterId>,
        arguments: Vec<Argument>,
    ) -> Result<InstructionId> {
        let position = self
            .block(block)
            .map(|b| b.instructions.len())
            .ok_or_else(|| self.missing_block(block))?;
        self.insert_instruction(block, position, operation, targets, arguments)
    }

    /// Inserts an instruction into `block` before the instruction at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SsaError`] if the block or a referenced register or block does
    /// not exist, or `position` is past the end of the block.
    pub fn insert_instruction(
        &mut self,
        block: BlockId,
        position: usize,
        operation: Operation,
        targets: Vec<RegisterId>,
        arguments: Vec<Argument>,
    ) -> Result<InstructionId> {
        let length = self
            .block(block)
            .map(|b| b.instructions.len())
            .ok_or_else(|| self.missing_block(block))?;
        if position > length {
            return Err(Error::SsaError(format!(
                "Cannot insert at position {position} of block {block} with {length} instructions"
            )));
        }
        for &target in &targets {
            self.check_register(target)?;
        }
        for &argument in &arguments {
            self.check_argument(argument)?;
        }

        let id = InstructionId(self.instructions.len());
        for &target in &targets {
            self.register_mut(target)?.add_definition(id);
        }
        self.instructions.push(Some(Instruction {
            operation,
            targets,
            arguments,
            block,
        }));
        self.blocks[block.index()].instructions.insert(position, id);
        Ok(id)
    }

    /// Returns an instruction, or `None` if it does not exist or was removed.
    #[must_use]
    pub fn instruction(&self, instruction: InstructionId) -> Option<&Instruction> {
        self.instructions
            .get(instruction.index())
            .and_then(Option::as_ref)
    }

    /// Iterates the live instructions in creation order.
    pub fn instructions(&self) -> impl Iterator<Item = (InstructionId, &Instruction)> {
        self.instructions
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|i| (InstructionId(index), i)))
    }

    /// Number of live instructions.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.instructions.iter().flatten().count()
    }

    /// Replaces target `index` of an instruction, moving the definition from the old to
    /// the new register.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SsaError`] if the instruction, the target slot or the register
    /// does not exist.
    pub fn set_target(
        &mut self,
        instruction: InstructionId,
        index: usize,
        register: RegisterId,
    ) -> Result<()> {
        self.check_register(register)?;
        let old = {
            let entry = self.instruction_mut(instruction)?;
            let slot = entry.targets.get_mut(index).ok_or_else(|| {
                Error::SsaError(format!("Instruction {instruction} has no target {index}"))
            })?;
            std::mem::replace(slot, register)
        };

        if let Ok(old_register) = self.register_mut(old) {
            old_register.remove_definition(instruction);
        }
        self.register_mut(register)?.add_definition(instruction);
        Ok(())
    }

    /// Replaces argument `index` of an instruction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SsaError`] if the instruction, the argument slot or a referenced
    /// register or block does not exist.
    pub fn set_argument(
        &mut self,
        instruction: InstructionId,
        index: usize,
        argument: Argument,
    ) -> Result<()> {
        self.check_argument(argument)?;
        let entry = self.instruction_mut(instruction)?;
        let slot = entry.arguments.get_mut(index).ok_or_else(|| {
            Error::SsaError(format!("Instruction {instruction} has no argument {index}"))
        })?;
        *slot = argument;
        Ok(())
    }

    /// Replaces all arguments of an instruction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SsaError`] if the instruction or a referenced register or block
    /// does not exist.
    pub fn set_arguments(
        &mut self,
        instruction: InstructionId,
        arguments: Vec<Argument>,
    ) -> Result<()> {
        for &argument in &arguments {
            self.check_argument(argument)?;
        }
        self.instruction_mut(instruction)?.arguments = arguments;
        Ok(())
    }

    /// Removes an instruction from its block and from the definitions of its targets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SsaError`] if the instruction does not exist.
    pub fn remove_instruction(&mut self, instruction: InstructionId) -> Result<Instruction> {
        let removed = self
            .instructions
            .get_mut(instruction.index())
            .and_then(Option::take)
            .ok_or_else(|| {
                Error::SsaError(format!("Instruction {instruction} does not exist"))
            })?;

        self.blocks[removed.block.index()]
            .instructions
            .retain(|&id| id != instruction);
        for &target in &removed.targets {
            if let Ok(register) = self.register_mut(target) {
                register.remove_definition(instruction);
            }
        }
        Ok(removed)
    }

    fn instruction_mut(&mut self, instruction: InstructionId) -> Result<&mut Instruction> {
        match self.instructions.get_mut(instruction.index()) {
            Some(Some(entry)) => Ok(entry),
            _ => Err(Error::SsaError(format!(
                "Instruction {instruction} does not exist"
            ))),
        }
    }

    fn check_argument(&self, argument: Argument) -> Result<()> {
        match argument {
            Argument::Register(register) => self.check_register(register),
            Argument::Block(block) if block.index() >= self.blocks.len() => {
                Err(self.missing_block(block))
            }
            Argument::Block(_) | Argument::Immediate(_) => Ok(()),
        }
    }

    fn missing_block(&self, block: BlockId) -> Error {
        Error::SsaError(format!("Block {block} does not exist in {}", self.name))
    }

    // Listing

    fn write_register(&self, f: &mut fmt::Formatter<'_>, register: RegisterId) -> fmt::Result {
        match self.register(register) {
            Some(entry) => f.write_str(entry.name()),
            None => write!(f, "<deleted {register}>"),
        }
    }

    fn write_block_label(&self, f: &mut fmt::Formatter<'_>, block: BlockId) -> fmt::Result {
        match self.block(block) {
            Some(entry) => f.write_str(entry.label()),
            None => write!(f, "{block}"),
        }
    }

    fn write_instruction(&self, f: &mut fmt::Formatter<'_>, instruction: &Instruction) -> fmt::Result {
        for (index, &target) in instruction.targets.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            self.write_register(f, target)?;
        }
        if !instruction.targets.is_empty() {
            f.write_str(" = ")?;
        }
        write!(f, "{}", instruction.operation)?;

        if let Some(pairs) = instruction.phi_pairs() {
            for (index, (block, register)) in pairs.into_iter().enumerate() {
                f.write_str(if index == 0 { " [" } else { ", [" })?;
                self.write_block_label(f, block)?;
                f.write_str(": ")?;
                self.write_register(f, register)?;
                f.write_str("]")?;
            }
            return Ok(());
        }

        for (index, argument) in instruction.arguments.iter().enumerate() {
            f.write_str(if index == 0 { " " } else { ", " })?;
            match *argument {
                Argument::Register(register) => self.write_register(f, register)?,
                Argument::Immediate(value) => write!(f, "{value}")?,
                Argument::Block(block) => self.write_block_label(f, block)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function {}(", self.name)?;
        for (index, &parameter) in self.parameters.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            self.write_register(f, parameter)?;
        }
        writeln!(f, ") {{")?;

        for block in &self.blocks {
            writeln!(f, "{}:", block.label)?;
            for &id in &block.instructions {
                if let Some(instruction) = self.instruction(id) {
                    f.write_str("    ")?;
                    self.write_instruction(f, instruction)?;
                    writeln!(f)?;
                }
            }
            if !block.successors.is_empty() {
                f.write_str("    ->")?;
                for &successor in &block.successors {
                    f.write_str(" ")?;
                    self.write_block_label(f, successor)?;
                }
                writeln!(f)?;
            }
        }

        writeln!(f, "}}")
    }
}
