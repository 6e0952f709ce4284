//! # Machina Parser
//!
//! Parser for the Machina state-diagram language. This crate provides the
//! pipeline from source text to a populated state store.
//!
//! ## Usage
//!
//! ```
//! # use machina_parser::ParseError;
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = "
//!         stateDiagram
//!
//!         Idle --> Configuring
//!         Configuring --> Idle : EvConfig
//!     ";
//!
//!     let db = machina_parser::parse(source)?;
//!     assert_eq!(db.states().len(), 2);
//!     Ok(())
//! }
//! ```

mod apply;
mod ast;
mod error;
mod parser;
#[cfg(test)]
mod parser_tests;
mod span;

pub use error::{Diagnostic, ErrorCode, Label, ParseError, Severity};
pub use span::Span;

use log::debug;

use machina_core::StateDb;

/// Parses source text and returns the populated state store.
///
/// Each call works against a fresh [`StateDb`], so concurrent or repeated
/// builds never observe each other's state. The pipeline is:
///
/// 1. **Parse** - build a spanned AST from the source
/// 2. **Apply** - walk the AST, driving the store's ingestion API
///
/// # Errors
///
/// Returns a [`ParseError`] for syntax errors and for semantic errors
/// raised while applying the document (invalid names, unbalanced scopes).
/// No partial store is ever returned.
pub fn parse(source: &str) -> Result<StateDb, ParseError> {
    let statements = parser::parse_document(source)?;
    debug!(statements = statements.len(); "parsed document");

    let mut db = StateDb::new();
    apply::apply_document(&statements, &mut db).map_err(ParseError::from)?;
    debug!(states = db.states().len(), transitions = db.transitions().len(); "store populated");

    Ok(db)
}
