//! Structural ingestion events.

/// A structural event accepted by [`StateDb::apply`](crate::db::StateDb::apply).
///
/// The two kinds form a sum type, so event handling is exhaustive by
/// construction. Scope push and pop are not events: they are direct
/// calls on the store, because they must take effect at the exact point
/// of declaration rather than inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    AddState {
        name: String,
        description: Option<String>,
    },
    AddTransition {
        from: String,
        to: String,
        description: Option<String>,
    },
}
