use thiserror::Error;

macro_rules! internal_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Internal {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Internal {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The graph algorithms themselves cannot fail once their input graph exists; errors arise
/// while building graphs from caller supplied adjacency data, while converting a function
/// into SSA form, and when an internal consistency check trips.
///
/// # Error Categories
///
/// - [`Error::GraphError`] - Invalid node indices handed to a graph constructor
/// - [`Error::SsaError`] - The function handed to SSA construction is not convertible,
///   or the converted function failed verification
/// - [`Error::Internal`] - A consistency check failed; this points at a bug in whatever
///   produced the function (parser, instruction builder, construction scheme)
///
/// # Examples
///
/// ```rust
/// use ssagraph::{utils::graph::Graph, Error};
///
/// match Graph::new(&[vec![1], vec![7]]) {
///     Ok(_) => unreachable!(),
///     Err(Error::GraphError(message)) => println!("rejected: {message}"),
///     Err(e) => println!("other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Graph construction error.
    ///
    /// Raised when an edge refers to a node index outside the graph, or when a
    /// rooted-tree parent array is inconsistent.
    #[error("{0}")]
    GraphError(String),

    /// SSA construction error.
    ///
    /// The function cannot be converted (a block is unreachable from the entry, a
    /// register is used where no definition reaches) or the converted function does
    /// not satisfy the single-definition / dominance invariants.
    #[error("{0}")]
    SsaError(String),

    /// An internal consistency check failed.
    ///
    /// The error includes the source location where the inconsistency was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Description of the violated invariant
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Internal - {file}:{line}: {message}")]
    Internal {
        /// The message to be printed for the Internal error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },
}
