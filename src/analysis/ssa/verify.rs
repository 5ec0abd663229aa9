//! SSA well-formedness checks.

use std::collections::HashMap;

use crate::{
    analysis::ssa::{BlockId, Function, InstructionId, RegisterId},
    utils::graph::algorithms::compute_dominators,
    Error, Result,
};

/// Checks that `function` is in SSA form.
///
/// The following must hold:
///
/// - Every live register other than a parameter has exactly one definition, and that
///   instruction lists it as a target. Parameters have none.
/// - Every register an instruction reads or writes is live.
/// - Every block is reachable from the entry block, and phi instructions precede all
///   other instructions of their block.
/// - A non-phi use is dominated by the definition: an earlier instruction of the same
///   block, or an instruction in a strictly dominating block.
/// - Phi arguments are `(predecessor, register)` pairs with at most one pair per
///   predecessor, and each forwarded definition dominates the end of its predecessor.
///   Predecessors without a pair are allowed; no value flows along those edges.
///
/// # Errors
///
/// Returns [`Error::SsaError`] describing the first violation found.
///
/// # Examples
///
/// ```rust
/// use ssagraph::analysis::ssa::{verify_ssa, Argument, Function};
///
/// let mut function = Function::new("f");
/// let x = function.add_register("x");
/// let entry = function.add_block("entry");
/// function.append_instruction(entry, "mov".into(), vec![x], vec![Argument::Immediate(1)])?;
/// assert!(verify_ssa(&function).is_ok());
///
/// function.append_instruction(entry, "mov".into(), vec![x], vec![Argument::Immediate(2)])?;
/// assert!(verify_ssa(&function).is_err());
/// # Ok::<(), ssagraph::Error>(())
/// ```
pub fn verify_ssa(function: &Function) -> Result<()> {
    let fail = |message: String| Err(Error::SsaError(format!("{}: {message}", function.name())));
    let Some(entry) = function.entry() else {
        return Ok(());
    };

    for (id, register) in function.registers() {
        let definitions = register.definitions();
        if function.is_parameter(id) {
            if !definitions.is_empty() {
                return fail(format!("parameter {} is also defined by an instruction", register.name()));
            }
            continue;
        }
        if definitions.len() != 1 {
            return fail(format!(
                "register {} has {} definitions",
                register.name(),
                definitions.len()
            ));
        }
        let defines = function
            .instruction(definitions[0])
            .is_some_and(|instruction| instruction.targets().contains(&id));
        if !defines {
            return fail(format!(
                "register {} lists {} as definition, which does not write it",
                register.name(),
                definitions[0]
            ));
        }
    }

    let mut locations: HashMap<InstructionId, (BlockId, usize)> = HashMap::new();
    for (block_id, block) in function.blocks() {
        for (position, &id) in block.instructions().iter().enumerate() {
            match function.instruction(id) {
                Some(instruction) if instruction.block() == block_id => {
                    locations.insert(id, (block_id, position));
                }
                _ => {
                    return fail(format!(
                        "block {} lists {id}, which is not an instruction of that block",
                        block.label()
                    ))
                }
            }
        }
    }

    let dom_tree = compute_dominators(&function.block_graph(), entry.into());
    let definition_site = |register: RegisterId| -> Option<(BlockId, usize)> {
        if function.is_parameter(register) {
            return None;
        }
        function
            .register(register)
            .and_then(|r| r.definitions().first())
            .and_then(|definition| locations.get(definition))
            .copied()
    };
    let name_of = |register: RegisterId| {
        function
            .register(register)
            .map_or_else(|| register.to_string(), |r| r.name().to_string())
    };

    for (block_id, block) in function.blocks() {
        if !dom_tree.is_reachable(block_id.into()) {
            return fail(format!("block {} is unreachable", block.label()));
        }

        let mut seen_non_phi = false;
        for (position, &id) in block.instructions().iter().enumerate() {
            let Some(instruction) = function.instruction(id) else {
                continue;
            };

            let referenced = instruction.targets().iter().copied().chain(instruction.uses());
            for register in referenced {
                if function.register(register).is_none() {
                    return fail(format!(
                        "{id} in block {} refers to deleted register {register}",
                        block.label()
                    ));
                }
            }

            if !instruction.is_phi() {
                seen_non_phi = true;
                for register in instruction.uses() {
                    let Some((def_block, def_position)) = definition_site(register) else {
                        continue;
                    };
                    let dominated = if def_block == block_id {
                        def_position < position
                    } else {
                        dom_tree.is_strict_dominator_of(def_block.into(), block_id.into())
                    };
                    if !dominated {
                        return fail(format!(
                            "use of {} in block {} is not dominated by its definition",
                            name_of(register),
                            block.label()
                        ));
                    }
                }
                continue;
            }

            if seen_non_phi {
                return fail(format!(
                    "phi {id} in block {} follows a non-phi instruction",
                    block.label()
                ));
            }
            let Some(pairs) = instruction.phi_pairs() else {
                return fail(format!(
                    "phi {id} in block {} has malformed arguments",
                    block.label()
                ));
            };

            let mut forwarded_from: Vec<BlockId> = Vec::with_capacity(pairs.len());
            for (predecessor, register) in pairs {
                if !block.predecessors().contains(&predecessor) {
                    return fail(format!(
                        "phi {id} in block {} forwards from {predecessor}, which is not a predecessor",
                        block.label()
                    ));
                }
                if forwarded_from.contains(&predecessor) {
                    return fail(format!(
                        "phi {id} in block {} has two pairs for predecessor {predecessor}",
                        block.label()
                    ));
                }
                forwarded_from.push(predecessor);

                if let Some((def_block, _)) = definition_site(register) {
                    if !dom_tree.is_dominator_of(def_block.into(), predecessor.into()) {
                        return fail(format!(
                            "{} forwarded to phi {id} in block {} does not reach the end of {predecessor}",
                            name_of(register),
                            block.label()
                        ));
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ssa::{Argument, Operation};

    /// entry -> {left, right} -> exit, with `x` defined once per branch and merged.
    fn merged_diamond() -> (Function, InstructionId) {
        let mut function = Function::new("diamond");
        let c = function.add_parameter("c");
        let x1 = function.add_register("x.1");
        let x2 = function.add_register("x.2");
        let x3 = function.add_register("x.3");

        let entry = function.add_block("entry");
        let left = function.add_block("left");
        let right = function.add_block("right");
        let exit = function.add_block("exit");
        function.add_edge(entry, left).unwrap();
        function.add_edge(entry, right).unwrap();
        function.add_edge(left, exit).unwrap();
        function.add_edge(right, exit).unwrap();

        function
            .append_instruction(entry, "br".into(), vec![], vec![Argument::Register(c)])
            .unwrap();
        function
            .append_instruction(left, "mov".into(), vec![x1], vec![Argument::Immediate(1)])
            .unwrap();
        function
            .append_instruction(right, "mov".into(), vec![x2], vec![Argument::Immediate(2)])
            .unwrap();
        let phi = function
            .append_instruction(
                exit,
                Operation::Phi,
                vec![x3],
                vec![
                    Argument::Block(left),
                    Argument::Register(x1),
                    Argument::Block(right),
                    Argument::Register(x2),
                ],
            )
            .unwrap();
        function
            .append_instruction(exit, "ret".into(), vec![], vec![Argument::Register(x3)])
            .unwrap();
        (function, phi)
    }

    #[test]
    fn test_verify_accepts_ssa() {
        let (function, _) = merged_diamond();
        verify_ssa(&function).unwrap();
        verify_ssa(&Function::new("empty")).unwrap();
    }

    #[test]
    fn test_verify_rejects_undominated_use() {
        let (mut function, _) = merged_diamond();
        // ret x.1 in exit: left does not dominate exit
        let exit = BlockId::new(3);
        function
            .append_instruction(exit, "ret".into(), vec![], vec![Argument::Register(RegisterId::new(1))])
            .unwrap();
        assert!(verify_ssa(&function).is_err());
    }

    #[test]
    fn test_verify_rejects_use_before_definition() {
        let mut function = Function::new("f");
        let x = function.add_register("x");
        let entry = function.add_block("entry");
        function
            .append_instruction(entry, "ret".into(), vec![], vec![Argument::Register(x)])
            .unwrap();
        function
            .append_instruction(entry, "mov".into(), vec![x], vec![Argument::Immediate(0)])
            .unwrap();
        assert!(verify_ssa(&function).is_err());
    }

    #[test]
    fn test_verify_rejects_phi_from_non_predecessor() {
        let (mut function, phi) = merged_diamond();
        function
            .set_argument(phi, 0, Argument::Block(BlockId::new(0)))
            .unwrap();
        assert!(verify_ssa(&function).is_err());
    }

    #[test]
    fn test_verify_rejects_duplicate_predecessor() {
        let (mut function, phi) = merged_diamond();
        function
            .set_argument(phi, 2, Argument::Block(BlockId::new(1)))
            .unwrap();
        assert!(verify_ssa(&function).is_err());
    }

    #[test]
    fn test_verify_rejects_forwarded_value_not_reaching_predecessor() {
        let (mut function, phi) = merged_diamond();
        // x.2 is defined in right and cannot flow in from left
        function
            .set_argument(phi, 1, Argument::Register(RegisterId::new(2)))
            .unwrap();
        assert!(verify_ssa(&function).is_err());
    }

    #[test]
    fn test_verify_accepts_partial_phi() {
        let (mut function, phi) = merged_diamond();
        function
            .set_arguments(
                phi,
                vec![Argument::Block(BlockId::new(1)), Argument::Register(RegisterId::new(1))],
            )
            .unwrap();
        verify_ssa(&function).unwrap();
    }

    #[test]
    fn test_verify_rejects_phi_after_instruction() {
        let (mut function, _) = merged_diamond();
        let y = function.add_register("y");
        let exit = BlockId::new(3);
        function
            .append_instruction(exit, Operation::Phi, vec![y], vec![])
            .unwrap();
        assert!(verify_ssa(&function).is_err());
    }

    #[test]
    fn test_verify_rejects_unreachable_block() {
        let (mut function, _) = merged_diamond();
        function.add_block("dead");
        assert!(verify_ssa(&function).is_err());
    }

    #[test]
    fn test_verify_rejects_deleted_register_reference() {
        let (mut function, _) = merged_diamond();
        let y = function.add_register("y");
        let exit = BlockId::new(3);
        function
            .append_instruction(exit, "use".into(), vec![], vec![Argument::Register(y)])
            .unwrap();
        function.delete_register(y).unwrap();
        assert!(verify_ssa(&function).is_err());
    }

    #[test]
    fn test_verify_rejects_defined_parameter() {
        let (mut function, _) = merged_diamond();
        let entry = BlockId::new(0);
        function
            .insert_instruction(entry, 0, "mov".into(), vec![RegisterId::new(0)], vec![Argument::Immediate(0)])
            .unwrap();
        assert!(verify_ssa(&function).is_err());
    }
}
