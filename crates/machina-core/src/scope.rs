//! The composite-state scope stack.
//!
//! While a diagram is ingested, the stack holds the names of the currently
//! open composite-state blocks. Every state and transition endpoint is
//! qualified against the stack contents *at the moment of its declaration*;
//! qualifying after ingestion would attribute names to the wrong scope.

use crate::{
    error::CoreError,
    identifier::{DELIMITER, StateId},
};

/// Ordered stack of enclosing composite-state names.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    scopes: Vec<String>,
}

impl ScopeStack {
    /// Creates an empty scope stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new scope. Depth is unbounded.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidName`] if the name contains the path
    /// delimiter.
    pub fn push(&mut self, name: &str) -> Result<(), CoreError> {
        check_name(name)?;
        self.scopes.push(name.to_string());
        Ok(())
    }

    /// Closes the most recently opened scope.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnbalancedScope`] when the stack is empty.
    /// A silent no-op here would let a stray pop corrupt the ids of every
    /// later sibling, so the imbalance is surfaced immediately.
    pub fn pop(&mut self) -> Result<(), CoreError> {
        self.scopes.pop().map(|_| ()).ok_or(CoreError::UnbalancedScope)
    }

    /// Qualifies a local name against the current stack contents.
    pub fn form_id(&self, name: &str) -> Result<StateId, CoreError> {
        check_name(name)?;
        Ok(StateId::from_scope(&self.scopes, name))
    }

    /// Returns the current nesting depth.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Removes every open scope.
    pub fn clear(&mut self) {
        self.scopes.clear();
    }
}

fn check_name(name: &str) -> Result<(), CoreError> {
    if name.contains(DELIMITER) {
        return Err(CoreError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}
