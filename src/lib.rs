// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # ssagraph
//!
//! Dominance analysis and SSA construction for the middle-end of an assembler or
//! compiler. `ssagraph` takes a function as an instruction-level successor graph,
//! forms its basic blocks, computes dominators with the Lengauer-Tarjan algorithm and
//! dominance frontiers on the DJ-graph of Sreedhar and Gao, and rewrites the function
//! into Static Single Assignment form.
//!
//! ## Features
//!
//! - **Adjacency graphs** - Compact successor/predecessor lists addressed by [`utils::graph::NodeId`]
//! - **Depth-first numbering** - Pre/post order, parents, depths, subtree sizes and the push/pop timeline
//! - **Dominator trees** - Lengauer-Tarjan with a path-compressing link-eval forest
//! - **Dominance frontiers** - Per node and iterated, computed on the DJ-graph with a piggy bank
//! - **Basic block formation** - Coalesces straight-line instruction chains
//! - **SSA construction** - Phi placement, renaming along the dominator tree, optional pruning
//! - **Verification** - Checks single definitions and dominance of every use
//!
//! ## Quick Start
//!
//! Add `ssagraph` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! ssagraph = "0.1"
//! ```
//!
//! ### Dominators
//!
//! ```rust
//! use ssagraph::utils::graph::{algorithms::compute_dominators, Graph, NodeId};
//!
//! // 0 -> {1, 2} -> 3
//! let graph = Graph::new(&[vec![1, 2], vec![3], vec![3], vec![]])?;
//! let dom_tree = compute_dominators(&graph, NodeId::new(0));
//!
//! assert_eq!(dom_tree.immediate_dominator(NodeId::new(3)), Some(NodeId::new(0)));
//! assert!(!dom_tree.is_dominator_of(NodeId::new(1), NodeId::new(3)));
//! # Ok::<(), ssagraph::Error>(())
//! ```
//!
//! ### Dominance Frontiers
//!
//! ```rust
//! use ssagraph::utils::graph::{algorithms::DominatorJoinGraph, Graph, NodeId};
//!
//! let graph = Graph::new(&[vec![1, 2], vec![3], vec![3], vec![]])?;
//! let dj_graph = DominatorJoinGraph::new(&graph, NodeId::new(0));
//!
//! assert_eq!(dj_graph.dominator_frontier(NodeId::new(1)), vec![NodeId::new(3)]);
//! assert_eq!(
//!     dj_graph.iterated_dominator_frontier(&[NodeId::new(1), NodeId::new(2)]),
//!     vec![NodeId::new(3)]
//! );
//! # Ok::<(), ssagraph::Error>(())
//! ```
//!
//! ### SSA Construction
//!
//! ```rust
//! use ssagraph::analysis::ssa::{
//!     function_to_ssa_form, Function, GenericScheme, InstructionTemplate, SsaConfig,
//! };
//! use ssagraph::utils::graph::{Graph, NodeId};
//!
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
//! println!("{function}");
//! # Ok::<(), ssagraph::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`utils::graph`] - The graph model, its traits and the graph algorithms
//! - [`analysis::cfg`] - Basic block formation
//! - [`analysis::ssa`] - The function model, SSA construction and verification
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: stage boundaries of SSA construction at
//! `debug`, per-block work at `trace`, and phi instructions that received no incoming
//! values at `warn`. No logger is installed by the library.
//!
//! ## Parallelism
//!
//! All graph and dominance structures are immutable after construction and can be
//! shared between threads. [`analysis::ssa::functions_to_ssa_form`] converts
//! independent functions in parallel using `rayon`.
//!
//! ## References
//!
//! - Lengauer and Tarjan, "A Fast Algorithm for Finding Dominators in a Flowgraph", TOPLAS 1979
//! - Cytron et al., "Efficiently Computing Static Single Assignment Form and the Control Dependence Graph", TOPLAS 1991
//! - Sreedhar and Gao, "A Linear Time Algorithm for Placing φ-Nodes", POPL 1995

#[macro_use]
pub(crate) mod error;

/// Program analysis: basic block formation and SSA construction.
pub mod analysis;

/// Shared infrastructure: the graph model, graph algorithms and output helpers.
pub mod utils;

/// `ssagraph` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `ssagraph` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust
/// use ssagraph::{analysis::ssa::{function_to_ssa_form, Function, GenericScheme, SsaConfig}, Error};
///
/// let mut function = Function::new("empty");
/// match function_to_ssa_form(&mut function, &mut GenericScheme::new(), SsaConfig::default()) {
///     Ok(()) => println!("converted"),
///     Err(Error::SsaError(message)) => println!("cannot convert: {message}"),
///     Err(e) => println!("Error: {e}"),
/// }
/// ```
pub use error::Error;
