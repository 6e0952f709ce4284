//! Parsed statements of a state-diagram document.

use crate::span::Spanned;

/// One statement of the diagram body.
///
/// Scoping is structural: a [`Statement::Block`] carries its body, so the
/// apply pass opens and closes the composite scope around it and push/pop
/// balance is guaranteed by construction.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Statement {
    /// `A --> B` or `A --> B : label`
    Transition {
        from: String,
        to: String,
        label: Option<String>,
    },
    /// `A: free text`
    Description { name: String, text: String },
    /// `state A { ... }`
    Block {
        name: String,
        body: Vec<Spanned<Statement>>,
    },
}
