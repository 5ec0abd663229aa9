//! Instruction-set specific hooks of SSA construction.
//!
//! The construction driver knows where phi instructions go and in which order blocks
//! are renamed, but not how an instruction set spells a phi, how renamed registers are
//! named, or which operands of an instruction are uses and which are definitions. An
//! [`SsaConstructionScheme`] supplies those pieces. [`GenericScheme`] is the scheme
//! for the generic function model of this crate.

use std::collections::HashMap;

use crate::{
    analysis::ssa::{
        Argument, BlockId, Function, InstructionId, Operation, ReachingDefinitionsSet,
        RegisterId,
    },
    Error, Result,
};

/// Callbacks the SSA construction driver uses to edit a function.
pub trait SsaConstructionScheme {
    /// Creates a phi instruction for `base` at the head of `block`. The new instruction
    /// must report itself as a phi and have `base` as its single target; its arguments
    /// are filled in by the driver after renaming.
    ///
    /// # Errors
    ///
    /// Returns an error if the instruction cannot be created.
    fn new_phi_instruction(
        &mut self,
        function: &mut Function,
        block: BlockId,
        base: RegisterId,
    ) -> Result<InstructionId>;

    /// Creates a fresh register standing for one definition of `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` does not exist.
    fn new_renamed_register(
        &mut self,
        function: &mut Function,
        base: RegisterId,
    ) -> Result<RegisterId>;

    /// Renames every instruction of `block` in order: each register use is replaced by
    /// the definition `definitions` reports for it, and each target gets a fresh
    /// register that becomes the reaching definition of its base.
    ///
    /// Arguments of phi instructions are not uses at this point and must be left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if a use has no reaching definition or the function rejects an
    /// edit.
    fn rename_basic_block(
        &mut self,
        function: &mut Function,
        block: BlockId,
        definitions: &mut ReachingDefinitionsSet,
    ) -> Result<()>;
}

/// Construction scheme for the generic function model.
///
/// - Phi instructions are inserted after the phis already at the head of the block.
/// - Renamed registers are called `<base>.<n>`, with `n` counting per base register
///   from `0`.
///
/// # Examples
///
/// ```rust
/// use ssagraph::analysis::ssa::{Function, GenericScheme, SsaConstructionScheme};
///
/// let mut function = Function::new("f");
/// let x = function.add_register("x");
/// let mut scheme = GenericScheme::new();
///
/// let x0 = scheme.new_renamed_register(&mut function, x)?;
/// let x1 = scheme.new_renamed_register(&mut function, x)?;
/// assert_eq!(function.register(x0).map(|r| r.name()), Some("x.0"));
/// assert_eq!(function.register(x1).map(|r| r.name()), Some("x.1"));
/// # Ok::<(), ssagraph::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct GenericScheme {
    counters: HashMap<RegisterId, usize>,
}

impl GenericScheme {
    /// Creates a scheme with all rename counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SsaConstructionScheme for GenericScheme {
    fn new_phi_instruction(
        &mut self,
        function: &mut Function,
        block: BlockId,
        base: RegisterId,
    ) -> Result<InstructionId> {
        let position = function
            .block(block)
            .map(|b| {
                b.instructions()
                    .iter()
                    .take_while(|&&id| function.instruction(id).is_some_and(|i| i.is_phi()))
                    .count()
            })
            .unwrap_or_default();
        function.insert_instruction(block, position, Operation::Phi, vec![base], Vec::new())
    }

    fn new_renamed_register(
        &mut self,
        function: &mut Function,
        base: RegisterId,
    ) -> Result<RegisterId> {
        let name = function
            .register(base)
            .map(|register| register.name().to_string())
            .ok_or_else(|| {
                Error::SsaError(format!(
                    "Cannot rename register {base}, it does not exist in {}",
                    function.name()
                ))
            })?;

        let counter = self.counters.entry(base).or_insert(0);
        let renamed = function.add_register(format!("{name}.{counter}"));
        *counter += 1;
        Ok(renamed)
    }

    fn rename_basic_block(
        &mut self,
        function: &mut Function,
        block: BlockId,
        definitions: &mut ReachingDefinitionsSet,
    ) -> Result<()> {
        let instructions = function
            .block(block)
            .map(|b| b.instructions().to_vec())
            .unwrap_or_default();

        for id in instructions {
            let Some(instruction) = function.instruction(id) else {
                continue;
            };
            let is_phi = instruction.is_phi();
            let arguments = instruction.arguments().to_vec();
            let targets = instruction.targets().to_vec();

            if !is_phi {
                for (index, argument) in arguments.into_iter().enumerate() {
                    let Argument::Register(base) = argument else {
                        continue;
                    };
                    let Some(reaching) = definitions.query(base) else {
                        let name = function.register(base).map_or("?", |r| r.name());
                        let label = function.block(block).map_or("?", |b| b.label());
                        return Err(Error::SsaError(format!(
                            "Register {name} is used in block {label} of {} without a reaching definition",
                            function.name()
                        )));
                    };
                    function.set_argument(id, index, Argument::Register(reaching))?;
                }
            }

            for (index, base) in targets.into_iter().enumerate() {
                let renamed = self.new_renamed_register(function, base)?;
                definitions.define(base, renamed);
                function.set_target(id, index, renamed)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phis_stay_in_insertion_order_at_block_head() {
        let mut function = Function::new("f");
        let x = function.add_register("x");
        let y = function.add_register("y");
        let block = function.add_block("b0");
        let ret = function
            .append_instruction(block, "ret".into(), vec![], vec![])
            .unwrap();
        let mut scheme = GenericScheme::new();

        let phi_x = scheme.new_phi_instruction(&mut function, block, x).unwrap();
        let phi_y = scheme.new_phi_instruction(&mut function, block, y).unwrap();

        assert_eq!(
            function.block(block).unwrap().instructions(),
            &[phi_x, phi_y, ret]
        );
        let phi = function.instruction(phi_y).unwrap();
        assert!(phi.is_phi());
        assert_eq!(phi.targets(), &[y]);
        assert!(phi.arguments().is_empty());
    }

    #[test]
    fn test_renamed_register_counters_are_per_base() {
        let mut function = Function::new("f");
        let x = function.add_register("x");
        let y = function.add_register("y");
        let mut scheme = GenericScheme::new();

        let x0 = scheme.new_renamed_register(&mut function, x).unwrap();
        let y0 = scheme.new_renamed_register(&mut function, y).unwrap();
        let x1 = scheme.new_renamed_register(&mut function, x).unwrap();

        let names: Vec<&str> = [x0, y0, x1]
            .iter()
            .filter_map(|&r| function.register(r).map(|r| r.name()))
            .collect();
        assert_eq!(names, vec!["x.0", "y.0", "x.1"]);
        assert!(scheme
            .new_renamed_register(&mut function, RegisterId::new(99))
            .is_err());
    }

    #[test]
    fn test_rename_block_uses_then_definitions() {
        // x = add x, 1 ; ret x
        let mut function = Function::new("f");
        let x = function.add_register("x");
        let block = function.add_block("b0");
        let add = function
            .append_instruction(
                block,
                "add".into(),
                vec![x],
                vec![Argument::Register(x), Argument::Immediate(1)],
            )
            .unwrap();
        let ret = function
            .append_instruction(block, "ret".into(), vec![], vec![Argument::Register(x)])
            .unwrap();

        let mut scheme = GenericScheme::new();
        let x_in = scheme.new_renamed_register(&mut function, x).unwrap();
        let mut definitions = ReachingDefinitionsSet::new(function.register_capacity());
        definitions.push_scope();
        definitions.define(x, x_in);

        scheme
            .rename_basic_block(&mut function, block, &mut definitions)
            .unwrap();

        let add = function.instruction(add).unwrap();
        assert_eq!(add.arguments()[0], Argument::Register(x_in));
        let x_out = add.targets()[0];
        assert_eq!(function.register(x_out).unwrap().name(), "x.1");
        assert_eq!(
            function.instruction(ret).unwrap().arguments(),
            &[Argument::Register(x_out)]
        );
        assert_eq!(definitions.query(x), Some(x_out));
        assert!(function.register(x).unwrap().definitions().is_empty());
    }

    #[test]
    fn test_rename_block_rejects_undefined_use() {
        let mut function = Function::new("f");
        let x = function.add_register("x");
        let block = function.add_block("b0");
        function
            .append_instruction(block, "ret".into(), vec![], vec![Argument::Register(x)])
            .unwrap();

        let mut definitions = ReachingDefinitionsSet::new(1);
        let error = GenericScheme::new()
            .rename_basic_block(&mut function, block, &mut definitions)
            .unwrap_err();
        assert!(matches!(error, Error::SsaError(message) if message.contains("Register x")));
    }
}
