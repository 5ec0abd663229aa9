//! SSA construction driver.
//!
//! Converts a [`Function`] into SSA form in place, following Cytron et al.,
//! "Efficiently Computing Static Single Assignment Form and the Control Dependence
//! Graph" (ACM TOPLAS 1991), with dominance frontiers taken from the DJ-graph of
//! Sreedhar and Gao.
//!
//! # Algorithm Overview
//!
//! 1. **Analysis**: the block graph, its dominator tree and DJ-graph are computed once.
//! 2. **Phi Placement**: for every register, a phi is placed in each block of the
//!    iterated dominance frontier of the blocks defining it.
//! 3. **Renaming**: the dominator tree is walked depth first. Entering a block opens a
//!    definition scope and renames the block's instructions; then every phi waiting in
//!    a CFG successor receives the definition reaching the end of the block. Leaving
//!    the block closes the scope.
//! 4. **Commit**: the original registers are deleted and the collected forwarding pairs
//!    become the phi arguments.
//!
//! Parameters count as defined on entry: each is replaced by a renamed register before
//! the walk starts.
//!
//! The instruction-set specific parts (how a phi is spelled, how registers are named,
//! which operands are uses) come from an [`SsaConstructionScheme`].

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use crate::{
    analysis::ssa::{
        verify_ssa, Argument, BlockId, Function, InstructionId, PhiDescriptor,
        ReachingDefinitionsSet, RegisterId, SsaConfig, SsaConstructionScheme,
    },
    utils::graph::{
        algorithms::{DominatorJoinGraph, TimelineEvent},
        Graph, NodeId, Successors,
    },
    Error, Result,
};

/// Per-function state of one SSA conversion.
pub(crate) struct FunctionSsaInfo {
    /// Control flow between blocks, node `i` is block `i`.
    block_graph: Graph,
    dj_graph: DominatorJoinGraph,
    /// Phis placed in each block, in placement order.
    phis_per_block: Vec<Vec<PhiDescriptor>>,
    /// Every register that existed before conversion, parameters included.
    original_registers: Vec<RegisterId>,
}

impl FunctionSsaInfo {
    /// Analyses `function` and checks that it can be converted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SsaError`] if the function has no blocks, control can flow back
    /// into the entry block, or a block is unreachable from the entry.
    pub(crate) fn new(function: &Function) -> Result<Self> {
        let Some(entry) = function.entry() else {
            return Err(Error::SsaError(format!(
                "Function {} has no blocks",
                function.name()
            )));
        };
        if let Some(block) = function.block(entry) {
            if !block.predecessors().is_empty() {
                return Err(Error::SsaError(format!(
                    "Entry block {} of {} has predecessors",
                    block.label(),
                    function.name()
                )));
            }
        }

        let block_graph = function.block_graph();
        let dj_graph = DominatorJoinGraph::new(&block_graph, entry.into());
        if let Some((_, block)) = function
            .blocks()
            .find(|(id, _)| !dj_graph.dominator_tree().is_reachable((*id).into()))
        {
            return Err(Error::SsaError(format!(
                "Block {} of {} is unreachable from the entry block",
                block.label(),
                function.name()
            )));
        }

        Ok(FunctionSsaInfo {
            phis_per_block: vec![Vec::new(); function.block_count()],
            original_registers: function.registers().map(|(id, _)| id).collect(),
            block_graph,
            dj_graph,
        })
    }

    /// Places a phi for every original register at the iterated dominance frontier of
    /// its defining blocks.
    pub(crate) fn insert_phis<S: SsaConstructionScheme>(
        &mut self,
        function: &mut Function,
        scheme: &mut S,
    ) -> Result<()> {
        let mut inserted = 0;

        for &base in &self.original_registers {
            let mut sites: Vec<NodeId> = function
                .register(base)
                .map(|register| {
                    register
                        .definitions()
                        .iter()
                        .filter_map(|&definition| function.instruction(definition))
                        .map(|instruction| instruction.block().into())
                        .collect()
                })
                .unwrap_or_default();
            if sites.is_empty() {
                continue;
            }
            sites.sort_unstable();
            sites.dedup();

            for node in self.dj_graph.iterated_dominator_frontier(&sites) {
                let block = BlockId::from(node);
                let instruction = scheme.new_phi_instruction(function, block, base)?;
                self.phis_per_block[block.index()].push(PhiDescriptor::new(instruction, base));
                inserted += 1;
            }
        }

        log::debug!(
            "{}: placed {inserted} phi instruction(s) for {} register(s)",
            function.name(),
            self.original_registers.len()
        );
        Ok(())
    }

    /// Renames every definition and use along the dominator tree and collects the
    /// forwarding pairs of the placed phis.
    pub(crate) fn rename<S: SsaConstructionScheme>(
        &mut self,
        function: &mut Function,
        scheme: &mut S,
    ) -> Result<()> {
        let mut definitions = ReachingDefinitionsSet::new(function.register_capacity());
        definitions.push_scope();
        for parameter in function.parameters().to_vec() {
            let renamed = scheme.new_renamed_register(function, parameter)?;
            function.replace_parameter(parameter, renamed)?;
            definitions.define(parameter, renamed);
        }

        for event in self.dj_graph.dominator_tree().dfs().events() {
            match event {
                TimelineEvent::Push(node) => {
                    let block = BlockId::from(node);
                    definitions.push_scope();
                    log::trace!(
                        "{}: renaming block {block} at dominator depth {}",
                        function.name(),
                        definitions.depth() - 1
                    );
                    scheme.rename_basic_block(function, block, &mut definitions)?;

                    for successor in self.block_graph.successors(node) {
                        for phi in &mut self.phis_per_block[successor.index()] {
                            if let Some(reaching) = definitions.query(phi.base()) {
                                phi.add_forwarding(block, reaching);
                            }
                        }
                    }
                }
                TimelineEvent::Pop(_) => definitions.pop_scope(),
            }
        }

        log::debug!(
            "{}: {} register(s) after renaming",
            function.name(),
            function.register_count() - self.original_registers.len()
        );
        Ok(())
    }

    /// Writes the forwarding pairs into the phi instructions and deletes the original
    /// registers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if a placed phi no longer exists or is no longer a
    /// phi instruction.
    pub(crate) fn commit(self, function: &mut Function) -> Result<()> {
        for descriptor in self.phis_per_block.into_iter().flatten() {
            let is_phi = function
                .instruction(descriptor.instruction())
                .is_some_and(|instruction| instruction.is_phi());
            if !is_phi {
                return Err(internal_error!(
                    "{}: instruction {} placed as phi for {} is not a phi instruction",
                    function.name(),
                    descriptor.instruction(),
                    descriptor.base()
                ));
            }

            if descriptor.forwarding().is_empty() {
                let name = function
                    .register(descriptor.base())
                    .map_or_else(|| descriptor.base().to_string(), |r| r.name().to_string());
                log::warn!(
                    "{}: phi {} for {name} received no forwarding pairs",
                    function.name(),
                    descriptor.instruction()
                );
            }

            let arguments = descriptor
                .forwarding()
                .iter()
                .flat_map(|&(block, register)| {
                    [Argument::Block(block), Argument::Register(register)]
                })
                .collect();
            function.set_arguments(descriptor.instruction(), arguments)?;
        }

        for register in self.original_registers {
            function.delete_register(register)?;
        }
        Ok(())
    }
}

/// Removes the phi instructions whose result never reaches a non-phi instruction,
/// through any chain of phis, and deletes their targets. Returns the number removed.
fn prune_unused_phis(function: &mut Function) -> Result<usize> {
    let mut phi_of: HashMap<RegisterId, InstructionId> = HashMap::new();
    let mut worklist: Vec<RegisterId> = Vec::new();
    for (id, instruction) in function.instructions() {
        if instruction.is_phi() {
            for &target in instruction.targets() {
                phi_of.insert(target, id);
            }
        } else {
            worklist.extend(instruction.uses());
        }
    }

    let mut live: HashSet<InstructionId> = HashSet::new();
    while let Some(register) = worklist.pop() {
        let Some(&phi) = phi_of.get(&register) else {
            continue;
        };
        if live.insert(phi) {
            if let Some(instruction) = function.instruction(phi) {
                worklist.extend(instruction.uses());
            }
        }
    }

    let mut dead: Vec<InstructionId> = phi_of
        .into_values()
        .filter(|phi| !live.contains(phi))
        .collect();
    dead.sort_unstable();
    dead.dedup();

    for &phi in &dead {
        let removed = function.remove_instruction(phi)?;
        for target in removed.targets() {
            function.delete_register(*target)?;
        }
    }
    Ok(dead.len())
}

/// Converts `function` into SSA form in place.
///
/// Afterwards every register has exactly one defining instruction (parameters have
/// none), every use is dominated by its definition, and values merging at join points
/// flow through phi instructions whose arguments are `(predecessor, register)` pairs.
/// A phi has no pair for a predecessor that no definition of its register reaches.
///
/// The function must not contain phi instructions yet. Its first block is the entry
/// block, which must not have predecessors, and every block must be reachable from it.
///
/// # Errors
///
/// Returns [`Error::SsaError`] if the function violates the requirements above, a
/// register is read where no definition reaches, or verification is enabled in
/// `config` and fails. Returns [`Error::Internal`] if the scheme breaks its contract.
/// On error the function is left partially converted.
///
/// # Examples
///
/// ```rust
/// use ssagraph::analysis::ssa::{
///     function_to_ssa_form, Argument, Function, GenericScheme, SsaConfig,
/// };
///
/// let mut function = Function::new("abs");
/// let a = function.add_parameter("a");
/// let x = function.add_register("x");
/// let entry = function.add_block("entry");
/// let negate = function.add_block("negate");
/// let exit = function.add_block("exit");
/// function.add_edge(entry, negate)?;
/// function.add_edge(entry, exit)?;
/// function.add_edge(negate, exit)?;
///
/// function.append_instruction(entry, "mov".into(), vec![x], vec![Argument::Register(a)])?;
/// function.append_instruction(negate, "neg".into(), vec![x], vec![Argument::Register(x)])?;
/// function.append_instruction(exit, "ret".into(), vec![], vec![Argument::Register(x)])?;
///
/// function_to_ssa_form(&mut function, &mut GenericScheme::new(), SsaConfig::default())?;
///
/// let listing = function.to_string();
/// assert!(listing.contains("x.2 = phi [entry: x.0], [negate: x.1]"));
/// # Ok::<(), ssagraph::Error>(())
/// ```
pub fn function_to_ssa_form<S: SsaConstructionScheme>(
    function: &mut Function,
    scheme: &mut S,
    config: SsaConfig,
) -> Result<()> {
    log::debug!(
        "{}: converting {} block(s), {} instruction(s) to SSA form",
        function.name(),
        function.block_count(),
        function.instruction_count()
    );

    let mut info = FunctionSsaInfo::new(function)?;
    info.insert_phis(function, scheme)?;
    info.rename(function, scheme)?;
    info.commit(function)?;

    if config.prune_unused_phis {
        let pruned = prune_unused_phis(function)?;
        log::debug!("{}: pruned {pruned} unused phi instruction(s)", function.name());
    }
    if config.verify {
        verify_ssa(function)?;
    }
    Ok(())
}

/// Converts independent functions into SSA form in parallel.
///
/// Each function gets its own scheme from `scheme_factory`. The result at index `i`
/// belongs to `functions[i]`; a failed conversion does not affect the others.
///
/// # Examples
///
/// ```rust
/// use ssagraph::analysis::ssa::{
///     functions_to_ssa_form, Argument, Function, GenericScheme, SsaConfig,
/// };
///
/// let mut functions: Vec<Function> = (0..4)
///     .map(|i| {
///         let mut function = Function::new(format!("f{i}"));
///         let x = function.add_register("x");
///         let entry = function.add_block("entry");
///         function
///             .append_instruction(entry, "mov".into(), vec![x], vec![Argument::Immediate(i)])
///             .map(|_| function)
///     })
///     .collect::<Result<_, _>>()?;
///
/// let results = functions_to_ssa_form(&mut functions, GenericScheme::new, SsaConfig::default());
/// assert!(results.iter().all(Result::is_ok));
/// # Ok::<(), ssagraph::Error>(())
/// ```
pub fn functions_to_ssa_form<S, F>(
    functions: &mut [Function],
    scheme_factory: F,
    config: SsaConfig,
) -> Vec<Result<()>>
where
    S: SsaConstructionScheme,
    F: Fn() -> S + Sync,
{
    functions
        .par_iter_mut()
        .map(|function| {
            let mut scheme = scheme_factory();
            function_to_ssa_form(function, &mut scheme, config)
        })
        .collect()
}
