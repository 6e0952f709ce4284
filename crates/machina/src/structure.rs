//! Graph assembly from a store snapshot.
//!
//! The assembler turns the flat id-to-state mapping into an explicit
//! tree: every node carries its parent index and children indices, so
//! cluster membership is derived exactly once here and later stages never
//! re-split identifier strings. Edges whose endpoints are composite
//! clusters are set aside for the boundary router instead of being handed
//! to the layout engine, which routes such edges incorrectly.

use indexmap::IndexMap;
use log::debug;
use thiserror::Error;

use machina_core::{StateDb, StateId};

/// Errors raised while assembling the graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A transition endpoint never resolved to a registered state.
    ///
    /// Such edges could never be drawn; they fail the build instead of
    /// being dropped without a diagnostic.
    #[error("transition `{from}` --> `{to}` references an unregistered state")]
    DanglingTransition { from: StateId, to: StateId },
}

/// A node of the assembled graph.
#[derive(Debug)]
pub struct Node {
    id: StateId,
    name: String,
    description: String,
    element_id: String,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl Node {
    pub fn id(&self) -> &StateId {
        &self.id
    }

    /// The local display label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Optional free-text description; empty when never supplied.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Rendering-safe element id (path delimiters replaced).
    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    /// Index of the enclosing composite node, if any.
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Indices of the directly nested states.
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// A node is a cluster iff at least one other state nests inside it.
    pub fn is_cluster(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A transition edge, with endpoints resolved to node indices.
#[derive(Debug, Clone)]
pub struct Edge {
    from: usize,
    to: usize,
    label: String,
}

impl Edge {
    pub fn from(&self) -> usize {
        self.from
    }

    pub fn to(&self) -> usize {
        self.to
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// The node/edge set handed to the layout engine, plus the deferred edges
/// the boundary router re-routes after layout.
#[derive(Debug)]
pub struct StateGraph {
    nodes: Vec<Node>,
    index: IndexMap<StateId, usize>,
    plain_edges: Vec<Edge>,
    deferred_edges: Vec<Edge>,
}

impl StateGraph {
    /// Assembles the graph from a store snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DanglingTransition`] for a transition whose
    /// endpoint has no state record.
    pub fn from_db(db: &StateDb) -> Result<Self, GraphError> {
        // Ascending id string length. A parent's id is a strict string
        // prefix of every child's id and therefore strictly shorter, so
        // parents are always indexed before their children. The sort is
        // stable: equal lengths keep the store's insertion order.
        let mut states: Vec<_> = db.states().values().collect();
        states.sort_by_key(|state| state.id.as_str().len());

        let mut nodes: Vec<Node> = Vec::with_capacity(states.len());
        let mut index: IndexMap<StateId, usize> = IndexMap::with_capacity(states.len());

        for state in states {
            let idx = nodes.len();
            let parent = state
                .id
                .parent()
                .and_then(|parent_id| index.get(parent_id.as_str()).copied());
            if let Some(parent_idx) = parent {
                nodes[parent_idx].children.push(idx);
            }
            nodes.push(Node {
                id: state.id.clone(),
                name: state.name.clone(),
                description: state.description.clone(),
                element_id: state.id.element_id(),
                parent,
                children: Vec::new(),
            });
            index.insert(state.id.clone(), idx);
        }

        let mut plain_edges = Vec::new();
        let mut deferred_edges = Vec::new();
        for transition in db.transitions() {
            let missing = || GraphError::DanglingTransition {
                from: transition.from.clone(),
                to: transition.to.clone(),
            };
            let from = index
                .get(transition.from.as_str())
                .copied()
                .ok_or_else(missing)?;
            let to = index
                .get(transition.to.as_str())
                .copied()
                .ok_or_else(missing)?;

            let edge = Edge {
                from,
                to,
                label: transition.description.clone(),
            };
            if nodes[from].is_cluster() || nodes[to].is_cluster() {
                deferred_edges.push(edge);
            } else {
                plain_edges.push(edge);
            }
        }

        debug!(
            nodes = nodes.len(),
            plain = plain_edges.len(),
            deferred = deferred_edges.len();
            "assembled state graph"
        );

        Ok(Self {
            nodes,
            index,
            plain_edges,
            deferred_edges,
        })
    }

    /// All nodes, parents before children.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    /// Looks a node up by its full hierarchical id.
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Edges between leaf states, routed by the layout engine.
    pub fn plain_edges(&self) -> &[Edge] {
        &self.plain_edges
    }

    /// Edges with at least one cluster endpoint, routed after layout.
    pub fn deferred_edges(&self) -> &[Edge] {
        &self.deferred_edges
    }

    /// Indices of top-level nodes.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, node)| node.parent().is_none().then_some(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composite_db() -> StateDb {
        let mut db = StateDb::new();
        db.add_state("S1", None).unwrap();
        db.add_state("Composite1", None).unwrap();
        db.add_transition("S1", "Composite1", Some("outer")).unwrap();
        db.push_scope("Composite1").unwrap();
        db.add_state("S1", None).unwrap();
        db.add_state("S2", None).unwrap();
        db.add_transition("S1", "S2", Some("inner")).unwrap();
        db.pop_scope().unwrap();
        db
    }

    #[test]
    fn test_parents_are_indexed_before_children() {
        let graph = StateGraph::from_db(&composite_db()).unwrap();
        for (idx, node) in graph.nodes().iter().enumerate() {
            if let Some(parent) = node.parent() {
                assert!(parent < idx, "parent of {:?} indexed after it", node.id());
            }
        }
    }

    #[test]
    fn test_cluster_detection_from_id_structure() {
        let graph = StateGraph::from_db(&composite_db()).unwrap();

        let composite = graph.node(graph.node_index("Composite1").unwrap());
        assert!(composite.is_cluster());
        assert_eq!(composite.children().len(), 2);

        let leaf = graph.node(graph.node_index("Composite1/S1").unwrap());
        assert!(!leaf.is_cluster());
        assert_eq!(leaf.parent(), graph.node_index("Composite1"));
    }

    #[test]
    fn test_edges_touching_a_cluster_are_deferred() {
        let graph = StateGraph::from_db(&composite_db()).unwrap();

        assert_eq!(graph.deferred_edges().len(), 1);
        assert_eq!(graph.deferred_edges()[0].label(), "outer");

        assert_eq!(graph.plain_edges().len(), 1);
        assert_eq!(graph.plain_edges()[0].label(), "inner");
    }

    #[test]
    fn test_dangling_transition_is_a_hard_error() {
        let mut db = StateDb::new();
        db.add_state("A", None).unwrap();
        db.add_transition("A", "Ghost", None).unwrap();

        let err = StateGraph::from_db(&db).unwrap_err();
        assert_eq!(
            err,
            GraphError::DanglingTransition {
                from: "A".into(),
                to: "Ghost".into(),
            }
        );
    }

    #[test]
    fn test_element_ids_are_rendering_safe() {
        let graph = StateGraph::from_db(&composite_db()).unwrap();
        let node = graph.node(graph.node_index("Composite1/S2").unwrap());
        assert_eq!(node.element_id(), "Composite1__S2");
    }

    #[test]
    fn test_equal_length_ids_keep_insertion_order() {
        let mut db = StateDb::new();
        db.add_state("BB", None).unwrap();
        db.add_state("AA", None).unwrap();
        let graph = StateGraph::from_db(&db).unwrap();

        assert_eq!(graph.node(0).id(), &StateId::from("BB"));
        assert_eq!(graph.node(1).id(), &StateId::from("AA"));
    }
}
