//! Error types for the core state model.

use thiserror::Error;

/// Errors raised by the scope stack and the state/transition store.
///
/// Both variants are hard failures: silently absorbing either would
/// corrupt identifier formation for everything declared afterwards, so
/// the store refuses to continue instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A source-level name contains the hierarchical path delimiter.
    ///
    /// There is no escaping mechanism; such a name would make the formed
    /// identifier ambiguous with a nested one.
    #[error("state name `{name}` contains the reserved delimiter `/`")]
    InvalidName { name: String },

    /// A scope was popped without a matching push.
    #[error("scope stack underflow: pop without a matching push")]
    UnbalancedScope,
}
