//! Static Single Assignment (SSA) form for register-based functions.
//!
//! This module provides a small, instruction-set neutral function model and converts
//! it into SSA form, where every register is written by exactly one instruction and
//! values meeting at control flow joins are merged by phi instructions.
//!
//! # Architecture
//!
//! The SSA module is organized into focused sub-modules:
//!
//! - `variable` - Registers and their identifiers
//! - `instruction` - Instructions, operations and arguments
//! - `block` - Basic blocks
//! - `function` - The function arena tying blocks, instructions and registers together
//! - `phi` - Phi instructions under construction
//! - `reaching` - Scoped reaching definitions used during renaming
//! - `scheme` - Instruction-set hooks of construction, and the generic scheme
//! - `builder` - The construction driver (Cytron et al. on the DJ-graph)
//! - `verify` - SSA well-formedness checks
//! - `config` - Construction options
//!
//! # Usage
//!
//! ```rust
//! use ssagraph::analysis::ssa::{
//!     function_to_ssa_form, Function, GenericScheme, InstructionTemplate, SsaConfig,
//! };
//! use ssagraph::utils::graph::{Graph, NodeId};
//!
//! // 0: x = mov 0
//! // 1: br c          -> 2, 3
//! // 2: x = mov 1
//! // 3: ret x
//! let instructions = [
//!     InstructionTemplate::new("mov").target("x").immediate(0),
//!     InstructionTemplate::new("br").register("c"),
//!     InstructionTemplate::new("mov").target("x").immediate(1),
//!     InstructionTemplate::new("ret").register("x"),
//! ];
//! let successors = Graph::new(&[vec![1], vec![2, 3], vec![3], vec![]])?;
//! let mut function =
//!     Function::from_instruction_graph("select", &["c"], &instructions, &successors, NodeId::new(0))?;
//!
//! function_to_ssa_form(&mut function, &mut GenericScheme::new(), SsaConfig::default())?;
//! assert!(function.to_string().contains("x.2 = phi [b0: x.0], [b1: x.1]"));
//! # Ok::<(), ssagraph::Error>(())
//! ```

mod block;
mod builder;
mod config;
mod function;
mod instruction;
mod phi;
mod reaching;
mod scheme;
mod variable;
mod verify;

pub use block::{BasicBlock, BlockId};
pub use builder::{function_to_ssa_form, functions_to_ssa_form};
pub use config::SsaConfig;
pub use function::{Function, InstructionTemplate};
pub use instruction::{Argument, Instruction, InstructionId, Operation};
pub use phi::PhiDescriptor;
pub use reaching::ReachingDefinitionsSet;
pub use scheme::{GenericScheme, SsaConstructionScheme};
pub use variable::{Register, RegisterId};
pub use verify::verify_ssa;
