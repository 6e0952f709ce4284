//! State and transition records.

use serde::Serialize;

use crate::identifier::StateId;

/// A registered state.
///
/// `id` is the hierarchical key, `name` the local label it was declared
/// with, and `description` optional free text (empty when never supplied).
/// The parent relationship is not stored; it is derived from the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct State {
    pub id: StateId,
    pub name: String,
    pub description: String,
}

/// A transition between two states, with endpoints resolved against the
/// scope stack that was active when it was declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: StateId,
    pub to: StateId,
    pub description: String,
}
