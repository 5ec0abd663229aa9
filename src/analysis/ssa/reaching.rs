//! Reaching definitions during SSA renaming.
//!
//! While the renaming pass walks the dominator tree, every original ("base") register
//! has a stack of renamed registers. The top of a base's stack is the definition that
//! reaches the current program point. Each dominator-tree node opens a scope; leaving
//! the node closes it and discards every definition made inside.

use crate::analysis::ssa::RegisterId;

/// Stack of definition scopes keyed by base register.
///
/// # Examples
///
/// ```rust
/// use ssagraph::analysis::ssa::{ReachingDefinitionsSet, RegisterId};
///
/// let x = RegisterId::new(0);
/// let (x1, x2) = (RegisterId::new(5), RegisterId::new(6));
/// let mut definitions = ReachingDefinitionsSet::new(1);
///
/// definitions.push_scope();
/// definitions.define(x, x1);
/// definitions.push_scope();
/// definitions.define(x, x2);
/// assert_eq!(definitions.query(x), Some(x2));
/// definitions.pop_scope();
/// assert_eq!(definitions.query(x), Some(x1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReachingDefinitionsSet {
    /// Renamed registers per base register index, innermost last.
    definitions: Vec<Vec<RegisterId>>,
    /// Base registers defined in each open scope, one entry per definition.
    scopes: Vec<Vec<RegisterId>>,
}

impl ReachingDefinitionsSet {
    /// Creates an empty set for base registers with indices below `register_capacity`.
    /// Larger indices are accepted too; the tables grow on demand.
    #[must_use]
    pub fn new(register_capacity: usize) -> Self {
        Self {
            definitions: vec![Vec::new(); register_capacity],
            scopes: Vec::new(),
        }
    }

    /// Opens a new innermost scope.
    pub fn push_scope(&mut self) {
        self.scopes.push(Vec::new());
    }

    /// Closes the innermost scope, forgetting every definition made in it.
    pub fn pop_scope(&mut self) {
        if let Some(scope) = self.scopes.pop() {
            for base in scope {
                if let Some(stack) = self.definitions.get_mut(base.index()) {
                    stack.pop();
                }
            }
        }
    }

    /// Number of open scopes.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Makes `renamed` the reaching definition of `base` until the innermost scope is
    /// closed. Opens a scope first if none is open.
    pub fn define(&mut self, base: RegisterId, renamed: RegisterId) {
        if self.scopes.is_empty() {
            self.push_scope();
        }
        if self.definitions.len() <= base.index() {
            self.definitions.resize_with(base.index() + 1, Vec::new);
        }

        self.definitions[base.index()].push(renamed);
        if let Some(scope) = self.scopes.last_mut() {
            scope.push(base);
        }
    }

    /// The definition of `base` reaching the current point, if there is one.
    #[must_use]
    pub fn query(&self, base: RegisterId) -> Option<RegisterId> {
        self.definitions
            .get(base.index())
            .and_then(|stack| stack.last())
            .copied()
    }
}
