//! Hierarchical state identifiers.
//!
//! A [`StateId`] is the fully qualified key of a state: the names of its
//! enclosing composite states plus its local name, joined by [`DELIMITER`].
//! Parent/child relationships are never stored anywhere else; they are
//! derived from the id's path structure on demand.

use std::fmt;

use serde::Serialize;

/// Path delimiter between the segments of a hierarchical identifier.
pub const DELIMITER: char = '/';

/// A fully qualified, hierarchical state identifier.
///
/// # Examples
///
/// ```
/// use machina_core::identifier::StateId;
///
/// let id = StateId::from_scope(&["Outer".into(), "Inner".into()], "S1");
/// assert_eq!(id, "Outer/Inner/S1");
/// assert_eq!(id.leaf(), "S1");
/// assert_eq!(id.parent().unwrap(), "Outer/Inner");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StateId(String);

impl StateId {
    /// Forms an identifier from a scope stack and a local name.
    ///
    /// With an empty stack the identifier is the local name itself.
    pub fn from_scope(scopes: &[String], name: &str) -> Self {
        if scopes.is_empty() {
            return Self(name.to_string());
        }
        let mut path = String::with_capacity(
            scopes.iter().map(|s| s.len() + 1).sum::<usize>() + name.len(),
        );
        for scope in scopes {
            path.push_str(scope);
            path.push(DELIMITER);
        }
        path.push_str(name);
        Self(path)
    }

    /// Returns the identifier of the enclosing composite state.
    ///
    /// Derived by dropping the last path segment; `None` for a top-level
    /// identifier.
    pub fn parent(&self) -> Option<StateId> {
        self.0
            .rsplit_once(DELIMITER)
            .map(|(head, _)| Self(head.to_string()))
    }

    /// Returns the local (leaf) segment of the identifier.
    pub fn leaf(&self) -> &str {
        self.0
            .rsplit_once(DELIMITER)
            .map_or(self.0.as_str(), |(_, tail)| tail)
    }

    /// Checks whether this identifier is a strict path prefix of `other`.
    ///
    /// This is the cluster-detection primitive: a state is composite iff
    /// some other state's id has it as a strict path prefix. Matching is
    /// segment-aligned, so `A` is not a prefix of `AB/C`.
    pub fn is_strict_prefix_of(&self, other: &StateId) -> bool {
        other.0.len() > self.0.len()
            && other.0.starts_with(&self.0)
            && other.0[self.0.len()..].starts_with(DELIMITER)
    }

    /// Returns a rendering-safe element id with delimiters replaced by `__`.
    pub fn element_id(&self) -> String {
        self.0.replace(DELIMITER, "__")
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Sound: the derived Hash/Eq of the newtype agree with those of `str`,
// so ids can key maps that are looked up by plain strings.
impl std::borrow::Borrow<str> for StateId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StateId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl PartialEq<str> for StateId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StateId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn name_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9_]{0,8}"
    }

    proptest! {
        /// Forming an id under a scope and taking its parent recovers the scope path.
        #[test]
        fn parent_inverts_from_scope(
            scopes in proptest::collection::vec(name_strategy(), 1..4),
            name in name_strategy(),
        ) {
            let id = StateId::from_scope(&scopes, &name);
            let parent = id.parent().expect("scoped id must have a parent");
            prop_assert_eq!(parent.as_str(), scopes.join("/"));
            prop_assert_eq!(id.leaf(), name.as_str());
        }

        /// A scope path is always a strict prefix of every id formed under it.
        #[test]
        fn scope_is_strict_prefix(
            scopes in proptest::collection::vec(name_strategy(), 1..4),
            name in name_strategy(),
        ) {
            let id = StateId::from_scope(&scopes, &name);
            let scope_id = StateId::from(scopes.join("/").as_str());
            prop_assert!(scope_id.is_strict_prefix_of(&id));
            // A strict string prefix is also strictly shorter, which is what
            // the assembler's length ordering relies on.
            prop_assert!(scope_id.as_str().len() < id.as_str().len());
        }
    }
}
