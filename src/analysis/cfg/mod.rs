//! Control Flow Graph (CFG) construction.
//!
//! This module coalesces an instruction-level successor graph into basic blocks: maximal
//! chains of instructions that are entered only at the top and left only at the bottom.
//!
//! # Architecture
//!
//! The CFG stores its block-level edges in a [`crate::utils::graph::Graph`] and
//! implements the graph traits, so the shared algorithms (depth-first numbering,
//! dominators, dominance frontiers) run on it directly.
//!
//! # Lazy Computation
//!
//! The dominator tree is computed lazily on first access and cached. This is
//! implemented using [`std::sync::OnceLock`] for thread-safe initialization.
//!
//! # Examples
//!
//! ```rust
//! use ssagraph::analysis::ControlFlowGraph;
//! use ssagraph::utils::graph::{Graph, NodeId};
//!
//! // 0 -> 1 -> 2 -> 1, 2 -> 3
//! let instructions = Graph::new(&[vec![1], vec![2], vec![1, 3], vec![]])?;
//! let cfg = ControlFlowGraph::new(&instructions, NodeId::new(0))?;
//!
//! assert_eq!(cfg.block_count(), 3);
//! let dominators = cfg.dominators();
//! assert!(dominators.is_dominator_of(cfg.entry(), NodeId::new(2)));
//! # Ok::<(), ssagraph::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! [`ControlFlowGraph`] is [`Send`] and [`Sync`], enabling safe concurrent read
//! access after construction.

mod graph;

pub use graph::ControlFlowGraph;
