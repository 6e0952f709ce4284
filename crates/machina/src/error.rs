//! Error types for Machina operations.
//!
//! This module provides the main error type [`MachinaError`] which wraps
//! the error conditions that can occur during diagram processing.

use std::io;

use thiserror::Error;

use machina_parser::ParseError;

use crate::structure::GraphError;

/// The main error type for Machina operations.
///
/// The `Parse` variant carries the offending source alongside the
/// structured diagnostics, so callers can render snippets.
#[derive(Debug, Error)]
pub enum MachinaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
}

impl MachinaError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
