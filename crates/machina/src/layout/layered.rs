//! The built-in layered layout engine.
//!
//! Ranks are assigned per containment scope with a BFS over the sibling
//! edges, ranks are stacked top to bottom, and siblings sit side by side
//! within their rank. Cluster sizes are computed bottom-up from their
//! contents before positions are pushed top-down, so a composite state is
//! always large enough to enclose everything nested in it.

use std::collections::{HashMap, HashSet, VecDeque};

use log::debug;
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
};

use machina_core::geometry::{Bounds, Insets, Point, Size};

use crate::{
    config::LayoutConfig,
    layout::{Layout, LayoutEngine},
    structure::{Node, StateGraph},
};

/// Deterministic layered engine.
#[derive(Debug)]
pub struct LayeredEngine {
    config: LayoutConfig,
}

impl LayeredEngine {
    /// Creates an engine with the given sizing configuration.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    fn calculate_layout(&self, graph: &StateGraph) -> Layout {
        let count = graph.nodes().len();
        if count == 0 {
            return Layout::new(Vec::new(), Vec::new());
        }

        let mut sizes = vec![Size::default(); count];
        let mut relative = vec![Point::default(); count];

        // Measure bottom-up. Nodes are ordered parents-first, so the
        // reverse order visits children before the cluster that needs
        // their extent.
        for idx in (0..count).rev() {
            let node = graph.node(idx);
            sizes[idx] = if node.is_cluster() {
                let content =
                    self.arrange_scope(graph, node.children(), Some(idx), &sizes, &mut relative);
                let padded = content.add_padding(self.cluster_insets());
                let title = self.leaf_size(node);
                Size::new(padded.width().max(title.width()), padded.height())
            } else {
                self.leaf_size(node)
            };
        }

        // Arrange the top-level scope, then push absolute bounds down.
        let roots: Vec<usize> = graph.roots().collect();
        self.arrange_scope(graph, &roots, None, &sizes, &mut relative);

        let mut bounds = vec![Bounds::default(); count];
        for &root in &roots {
            self.place(graph, root, Point::default(), &sizes, &relative, &mut bounds);
        }

        let edge_paths = graph
            .plain_edges()
            .iter()
            .map(|edge| vec![bounds[edge.from()].center(), bounds[edge.to()].center()])
            .collect();

        debug!(nodes = count; "layout calculated");
        Layout::new(bounds, edge_paths)
    }

    /// Positions `members` relative to their scope's content origin and
    /// returns the content size.
    fn arrange_scope(
        &self,
        graph: &StateGraph,
        members: &[usize],
        scope: Option<usize>,
        sizes: &[Size],
        relative: &mut [Point],
    ) -> Size {
        if members.is_empty() {
            return Size::default();
        }

        let ranks = self.assign_ranks(graph, members, scope);
        let margin = self.config.state_margin;

        let rank_widths: Vec<f32> = ranks
            .iter()
            .map(|rank| {
                let total: f32 = rank.iter().map(|&member| sizes[member].width()).sum();
                total + margin * rank.len().saturating_sub(1) as f32
            })
            .collect();
        let content_width = rank_widths.iter().fold(0.0f32, |acc, &w| acc.max(w));

        let mut y = 0.0f32;
        for (rank, rank_width) in ranks.iter().zip(&rank_widths) {
            let rank_height = rank
                .iter()
                .map(|&member| sizes[member].height())
                .fold(0.0f32, f32::max);

            // Rows are centered within the scope content.
            let mut x = (content_width - rank_width) / 2.0;
            for &member in rank {
                relative[member] =
                    Point::new(x + sizes[member].width() / 2.0, y + rank_height / 2.0);
                x += sizes[member].width() + margin;
            }
            y += rank_height + margin;
        }

        Size::new(content_width, y - margin)
    }

    /// BFS rank assignment over the sibling edges of one scope.
    ///
    /// Edges are projected upward: an edge between two nested states
    /// contributes an ordering constraint between the scope members that
    /// contain them. Members unreachable from any root (cycles, isolated
    /// nodes) seed new rows so every member is ranked.
    fn assign_ranks(
        &self,
        graph: &StateGraph,
        members: &[usize],
        scope: Option<usize>,
    ) -> Vec<Vec<usize>> {
        let mut sibling_graph = DiGraph::<usize, ()>::new();
        let mut petgraph_index: HashMap<usize, NodeIndex> = HashMap::new();
        for &member in members {
            petgraph_index.insert(member, sibling_graph.add_node(member));
        }

        for edge in graph.plain_edges().iter().chain(graph.deferred_edges()) {
            let from = ancestor_in_scope(graph, edge.from(), scope);
            let to = ancestor_in_scope(graph, edge.to(), scope);
            if let (Some(from), Some(to)) = (from, to) {
                if from != to {
                    sibling_graph.add_edge(petgraph_index[&from], petgraph_index[&to], ());
                }
            }
        }

        let mut ranks: Vec<Vec<usize>> = Vec::new();
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::new();

        for node_idx in sibling_graph.node_indices() {
            if sibling_graph
                .neighbors_directed(node_idx, Direction::Incoming)
                .count()
                == 0
            {
                queue.push_back((node_idx, 0));
            }
        }

        loop {
            while let Some((node_idx, rank)) = queue.pop_front() {
                if !visited.insert(node_idx) {
                    continue;
                }
                while ranks.len() <= rank {
                    ranks.push(Vec::new());
                }
                ranks[rank].push(sibling_graph[node_idx]);

                for successor in sibling_graph.neighbors(node_idx) {
                    if !visited.contains(&successor) {
                        queue.push_back((successor, rank + 1));
                    }
                }
            }

            match sibling_graph
                .node_indices()
                .find(|node_idx| !visited.contains(node_idx))
            {
                Some(unvisited) => queue.push_back((unvisited, 0)),
                None => break,
            }
        }

        ranks
    }

    fn place(
        &self,
        graph: &StateGraph,
        idx: usize,
        origin: Point,
        sizes: &[Size],
        relative: &[Point],
        bounds: &mut [Bounds],
    ) {
        let center = origin.add_point(relative[idx]);
        let node_bounds = Bounds::new_from_center(center, sizes[idx]);
        bounds[idx] = node_bounds;

        let node = graph.node(idx);
        if node.is_cluster() {
            let insets = self.cluster_insets();
            let content_origin = Point::new(
                node_bounds.min_x() + insets.left(),
                node_bounds.min_y() + insets.top(),
            );
            for &child in node.children() {
                self.place(graph, child, content_origin, sizes, relative, bounds);
            }
        }
    }

    fn leaf_size(&self, node: &Node) -> Size {
        let label_chars = node
            .name()
            .chars()
            .count()
            .max(node.description().chars().count());
        let label_width =
            label_chars as f32 * self.config.state_font_size * 0.6 + 2.0 * self.config.box_margin;
        Size::new(
            self.config.state_width.max(label_width),
            self.config.state_height,
        )
    }

    /// Padding between a cluster's border and its contents; the top side
    /// reserves a band for the title.
    fn cluster_insets(&self) -> Insets {
        let pad = self.config.box_margin;
        let title_band = self.config.state_font_size + 2.0 * pad;
        Insets::new(pad + title_band, pad, pad, pad)
    }
}

impl LayoutEngine for LayeredEngine {
    fn layout(&self, graph: &StateGraph) -> Layout {
        self.calculate_layout(graph)
    }
}

/// Climbs the containment tree until reaching the member of `scope` that
/// contains `idx`, or `None` when `idx` lies outside the scope.
fn ancestor_in_scope(graph: &StateGraph, mut idx: usize, scope: Option<usize>) -> Option<usize> {
    loop {
        let node = graph.node(idx);
        if node.parent() == scope {
            return Some(idx);
        }
        idx = node.parent()?;
    }
}

#[cfg(test)]
mod tests {
    use machina_core::StateDb;

    use super::*;

    fn layout_of(db: &StateDb) -> (StateGraph, Layout) {
        let graph = StateGraph::from_db(db).unwrap();
        let layout = LayeredEngine::new(LayoutConfig::default()).layout(&graph);
        (graph, layout)
    }

    fn contains(outer: Bounds, inner: Bounds) -> bool {
        outer.min_x() <= inner.min_x()
            && outer.min_y() <= inner.min_y()
            && outer.max_x() >= inner.max_x()
            && outer.max_y() >= inner.max_y()
    }

    #[test]
    fn test_edge_orders_ranks_top_to_bottom() {
        let mut db = StateDb::new();
        db.add_state("Idle", None).unwrap();
        db.add_state("Busy", None).unwrap();
        db.add_transition("Idle", "Busy", None).unwrap();
        let (graph, layout) = layout_of(&db);

        let idle = layout.node_bounds(graph.node_index("Idle").unwrap());
        let busy = layout.node_bounds(graph.node_index("Busy").unwrap());
        assert!(idle.max_y() < busy.min_y(), "source rank must sit above");
    }

    #[test]
    fn test_minimum_state_size_is_respected() {
        let mut db = StateDb::new();
        db.add_state("A", None).unwrap();
        let (graph, layout) = layout_of(&db);

        let bounds = layout.node_bounds(graph.node_index("A").unwrap());
        assert_eq!(bounds.width(), 150.0);
        assert_eq!(bounds.height(), 65.0);
    }

    #[test]
    fn test_cluster_encloses_its_children() {
        let mut db = StateDb::new();
        db.add_state("C", None).unwrap();
        db.push_scope("C").unwrap();
        db.add_state("X", None).unwrap();
        db.add_state("Y", None).unwrap();
        db.add_transition("X", "Y", None).unwrap();
        db.pop_scope().unwrap();
        let (graph, layout) = layout_of(&db);

        let cluster = layout.node_bounds(graph.node_index("C").unwrap());
        let x = layout.node_bounds(graph.node_index("C/X").unwrap());
        let y = layout.node_bounds(graph.node_index("C/Y").unwrap());
        assert!(contains(cluster, x));
        assert!(contains(cluster, y));
        assert!(x.max_y() < y.min_y());
    }

    #[test]
    fn test_siblings_in_a_rank_do_not_overlap() {
        let mut db = StateDb::new();
        db.add_state("Root", None).unwrap();
        db.add_state("Left", None).unwrap();
        db.add_state("Right", None).unwrap();
        db.add_transition("Root", "Left", None).unwrap();
        db.add_transition("Root", "Right", None).unwrap();
        let (graph, layout) = layout_of(&db);

        let left = layout.node_bounds(graph.node_index("Left").unwrap());
        let right = layout.node_bounds(graph.node_index("Right").unwrap());
        assert!(left.max_x() < right.min_x() || right.max_x() < left.min_x());
    }

    #[test]
    fn test_deferred_edges_still_order_clusters() {
        // S1 --> Composite1 is deferred, but the cluster must still be
        // ranked below its source.
        let mut db = StateDb::new();
        db.add_state("S1", None).unwrap();
        db.add_state("Composite1", None).unwrap();
        db.add_transition("S1", "Composite1", None).unwrap();
        db.push_scope("Composite1").unwrap();
        db.add_state("Inner", None).unwrap();
        db.pop_scope().unwrap();
        let (graph, layout) = layout_of(&db);

        let s1 = layout.node_bounds(graph.node_index("S1").unwrap());
        let cluster = layout.node_bounds(graph.node_index("Composite1").unwrap());
        assert!(s1.max_y() < cluster.min_y());
    }

    #[test]
    fn test_empty_graph_produces_empty_layout() {
        let db = StateDb::new();
        let (_, layout) = layout_of(&db);
        assert_eq!(layout.content_bounds(), Bounds::default());
    }
}
