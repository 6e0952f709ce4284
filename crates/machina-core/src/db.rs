//! The state/transition store.
//!
//! [`StateDb`] is the authoritative model a single diagram build works
//! against: the id-to-state mapping, the ordered transition list, and the
//! scope stack that qualifies local names. Every build owns its own
//! instance and downstream stages only ever read from it; a store shared
//! across builds would let interleaved builds corrupt each other.

use indexmap::IndexMap;
use log::trace;

use crate::{
    error::CoreError,
    event::StoreEvent,
    identifier::StateId,
    scope::ScopeStack,
    state::{State, Transition},
};

/// The mutable store populated during ingestion.
#[derive(Debug, Default)]
pub struct StateDb {
    states: IndexMap<StateId, State>,
    transitions: Vec<Transition>,
    scope: ScopeStack,
}

impl StateDb {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a composite-state scope for subsequently declared names.
    pub fn push_scope(&mut self, name: &str) -> Result<(), CoreError> {
        self.scope.push(name)
    }

    /// Closes the innermost composite-state scope.
    pub fn pop_scope(&mut self) -> Result<(), CoreError> {
        self.scope.pop()
    }

    /// Registers a state under the current scope.
    ///
    /// Re-registering an id with an unchanged name and description is a
    /// no-op. A call that supplies no description preserves a previously
    /// stored one; a differing description overwrites it.
    pub fn add_state(&mut self, name: &str, description: Option<&str>) -> Result<(), CoreError> {
        let id = self.scope.form_id(name)?;

        if let Some(old) = self.states.get(&id) {
            if old.name == name && description.is_some_and(|desc| desc == old.description) {
                return Ok(());
            }
        }

        let description = match description {
            Some(desc) => desc.to_string(),
            None => self
                .states
                .get(&id)
                .map(|old| old.description.clone())
                .unwrap_or_default(),
        };

        trace!(id:% = id; "registering state");
        self.states.insert(
            id.clone(),
            State {
                id,
                name: name.to_string(),
                description,
            },
        );
        Ok(())
    }

    /// Appends a transition, resolving both endpoints under the current scope.
    ///
    /// Endpoint existence is deliberately not checked here: the store
    /// accepts references to ids that were never registered, and the graph
    /// assembler rejects them when the snapshot is consumed.
    pub fn add_transition(
        &mut self,
        from: &str,
        to: &str,
        description: Option<&str>,
    ) -> Result<(), CoreError> {
        let from = self.scope.form_id(from)?;
        let to = self.scope.form_id(to)?;

        trace!(from:% = from, to:% = to; "registering transition");
        self.transitions.push(Transition {
            from,
            to,
            description: description.unwrap_or_default().to_string(),
        });
        Ok(())
    }

    /// Applies one structural event.
    pub fn apply(&mut self, event: StoreEvent) -> Result<(), CoreError> {
        match event {
            StoreEvent::AddState { name, description } => {
                self.add_state(&name, description.as_deref())
            }
            StoreEvent::AddTransition {
                from,
                to,
                description,
            } => self.add_transition(&from, &to, description.as_deref()),
        }
    }

    /// Applies a sequence of structural events in order.
    pub fn apply_all(
        &mut self,
        events: impl IntoIterator<Item = StoreEvent>,
    ) -> Result<(), CoreError> {
        for event in events {
            self.apply(event)?;
        }
        Ok(())
    }

    /// Read view of the id-to-state mapping, in insertion order.
    pub fn states(&self) -> &IndexMap<StateId, State> {
        &self.states
    }

    /// Read view of the transition list, in application order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Resets states, transitions, and the scope stack.
    pub fn clear(&mut self) {
        self.states.clear();
        self.transitions.clear();
        self.scope.clear();
    }
}
