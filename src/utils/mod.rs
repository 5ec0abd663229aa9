//! Shared infrastructure: the graph model with its algorithms, and small helpers.

mod dot;
pub mod graph;

pub use dot::escape_dot;
