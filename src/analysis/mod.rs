//! Program analysis on top of the generic graph infrastructure.
//!
//! This module builds on [`crate::utils::graph`] to provide the two stages of an
//! assembler middle-end that need dominance information.
//!
//! # Architecture
//!
//! - [`cfg`] - Basic block formation from an instruction-level successor graph
//! - [`ssa`] - A register-based function model and its conversion to SSA form
//!
//! # Usage
//!
//! ```rust
//! use ssagraph::analysis::ControlFlowGraph;
//! use ssagraph::utils::graph::{Graph, NodeId};
//!
//! // Instruction 2 branches back to 1 or falls through to 3
//! let instructions = Graph::new(&[vec![1], vec![2], vec![1, 3], vec![]])?;
//! let cfg = ControlFlowGraph::new(&instructions, NodeId::new(0))?;
//!
//! // Access dominator tree (lazily computed)
//! let dominators = cfg.dominators();
//! assert!(dominators.is_dominator_of(cfg.entry(), NodeId::new(1)));
//! # Ok::<(), ssagraph::Error>(())
//! ```

pub mod cfg;
pub mod ssa;

// Re-export primary types at module level
pub use cfg::ControlFlowGraph;
