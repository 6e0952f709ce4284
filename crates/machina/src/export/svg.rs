//! SVG rendering for laid-out state diagrams.
//!
//! The document is produced fully in memory. The exporter only reads the
//! graph, the layout, and the routed edges; it never mutates them.

use log::debug;
use svg::{
    Document,
    node::element::{Definitions, Group, Marker, Path, Rectangle, Text},
};

use machina_core::geometry::Point;

use crate::{
    config::AppConfig,
    layout::Layout,
    router::RoutedEdge,
    structure::{Edge, Node, StateGraph},
};

/// Fixed margin added to the content bounding box on each axis.
const VIEWBOX_MARGIN: f32 = 20.0;

const FONT_FAMILY: &str = "\"Open-Sans\", \"sans-serif\"";
const STATE_FILL: &str = "#ECECFF";
const STATE_STROKE: &str = "#9370DB";
const EDGE_STROKE: &str = "#333333";

/// In-memory SVG builder for one laid-out diagram.
pub struct SvgBuilder<'a> {
    graph: &'a StateGraph,
    layout: &'a Layout,
    routed: &'a [RoutedEdge],
    config: &'a AppConfig,
    target_element_id: &'a str,
}

impl<'a> SvgBuilder<'a> {
    pub fn new(
        graph: &'a StateGraph,
        layout: &'a Layout,
        routed: &'a [RoutedEdge],
        config: &'a AppConfig,
    ) -> Self {
        Self {
            graph,
            layout,
            routed,
            config,
            target_element_id: "machina-diagram",
        }
    }

    /// Sets the id carried by the produced SVG root element.
    pub fn with_target_element_id(self, target_element_id: &'a str) -> Self {
        Self {
            target_element_id,
            ..self
        }
    }

    /// Renders the document to an SVG string.
    ///
    /// The view box is the content bounding box grown by a fixed margin,
    /// while width and height scale to the container.
    pub fn render(&self) -> String {
        let content = self.layout.content_bounds();
        let width = content.max_x() + VIEWBOX_MARGIN;
        let height = content.max_y() + VIEWBOX_MARGIN;

        let mut doc = Document::new()
            .set("id", self.target_element_id)
            .set("width", "100%")
            .set("height", "100%")
            .set("viewBox", format!("0 0 {width} {height}"));

        if let Some(color) = self.config.style.background_color() {
            doc = doc.add(
                Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", width)
                    .set("height", height)
                    .set("fill", color),
            );
        }

        doc = doc.add(arrow_head_definitions());

        // Nodes come parents-first, so composite boxes paint beneath
        // their contents.
        let mut diagram = Group::new().set("class", "state-diagram");
        for (idx, node) in self.graph.nodes().iter().enumerate() {
            diagram = diagram.add(self.render_state(idx, node));
        }
        for (idx, edge) in self.graph.plain_edges().iter().enumerate() {
            diagram = diagram.add(self.render_plain_edge(idx, edge));
        }
        for edge in self.routed {
            diagram = diagram.add(self.render_routed_edge(edge));
        }

        debug!(width = width, height = height; "SVG document rendered");
        doc.add(diagram).to_string()
    }

    fn render_state(&self, idx: usize, node: &Node) -> Group {
        let bounds = self.layout.node_bounds(idx);
        let center = bounds.center();
        let font_size = self.config.layout.state_font_size;

        let rect = Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("rx", 5.0)
            .set("ry", 5.0)
            .set("fill", if node.is_cluster() { "none" } else { STATE_FILL })
            .set("stroke", STATE_STROKE);

        // Clusters carry their title in the reserved band at the top;
        // leaves center it, leaving room for a description line below.
        let title_y = if node.is_cluster() {
            bounds.min_y() + font_size + self.config.layout.box_margin
        } else if node.description().is_empty() {
            center.y() + font_size / 3.0
        } else {
            center.y() - 2.0
        };

        let title = Text::new(node.name())
            .set("x", center.x())
            .set("y", title_y)
            .set("text-anchor", "middle")
            .set("font-family", FONT_FAMILY)
            .set("font-size", font_size);

        let mut group = Group::new()
            .set("id", node.element_id())
            .set(
                "class",
                if node.is_cluster() {
                    "state state--composite"
                } else {
                    "state"
                },
            )
            .add(rect)
            .add(title);

        if !node.is_cluster() && !node.description().is_empty() {
            group = group.add(
                Text::new(node.description())
                    .set("x", center.x())
                    .set("y", center.y() + font_size)
                    .set("text-anchor", "middle")
                    .set("font-family", FONT_FAMILY)
                    .set("font-size", font_size - 2.0),
            );
        }

        group
    }

    fn render_plain_edge(&self, idx: usize, edge: &Edge) -> Group {
        let path = self.layout.edge_path(idx);
        let from_bounds = self.layout.node_bounds(edge.from());
        let to_bounds = self.layout.node_bounds(edge.to());

        // Trim the path at the box borders so the arrow tip touches the
        // border instead of the center.
        let start = from_bounds.border_point_towards(path[1]);
        let end = to_bounds.border_point_towards(path[path.len() - 2]);
        self.render_edge_line(start, end, edge.label(), "transition")
    }

    fn render_routed_edge(&self, edge: &RoutedEdge) -> Group {
        self.render_edge_line(
            edge.start(),
            edge.end(),
            edge.label(),
            "transition transition--boundary",
        )
    }

    fn render_edge_line(&self, start: Point, end: Point, label: &str, class: &str) -> Group {
        let line = Path::new()
            .set(
                "d",
                format!("M {} {} L {} {}", start.x(), start.y(), end.x(), end.y()),
            )
            .set("class", class)
            .set("fill", "none")
            .set("stroke", EDGE_STROKE)
            .set("marker-end", "url(#arrowhead)");

        let mut group = Group::new().add(line);
        if !label.is_empty() {
            let mid = start.midpoint(end);
            group = group.add(
                Text::new(label)
                    .set("x", mid.x())
                    .set("y", mid.y() - 4.0)
                    .set("text-anchor", "middle")
                    .set("font-family", FONT_FAMILY)
                    .set("font-size", self.config.layout.state_font_size - 2.0),
            );
        }
        group
    }
}

/// The arrow head marker referenced by every transition line.
fn arrow_head_definitions() -> Definitions {
    Definitions::new().add(
        Marker::new()
            .set("id", "arrowhead")
            .set("refX", 5)
            .set("refY", 2)
            .set("markerWidth", 6)
            .set("markerHeight", 4)
            .set("orient", "auto")
            .add(Path::new().set("d", "M 0,0 V 4 L6,2 Z")),
    )
}

#[cfg(test)]
mod tests {
    use machina_core::StateDb;

    use crate::{
        layout::{LayoutEngine, LayeredEngine},
        router::route_boundary_edges,
    };

    use super::*;

    fn render_db(db: &StateDb) -> String {
        let config = AppConfig::default();
        let graph = StateGraph::from_db(db).unwrap();
        let layout = LayeredEngine::new(config.layout.clone()).layout(&graph);
        let routed = route_boundary_edges(&graph, &layout);
        SvgBuilder::new(&graph, &layout, &routed, &config)
            .with_target_element_id("target-1")
            .render()
    }

    #[test]
    fn test_view_box_is_content_plus_fixed_margin() {
        let mut db = StateDb::new();
        db.add_state("A", None).unwrap();
        let svg = render_db(&db);

        // One default-sized state: 150x65 content, 20 margin per axis.
        assert!(svg.contains("viewBox=\"0 0 170 85\""));
        assert!(svg.contains("width=\"100%\""));
        assert!(svg.contains("height=\"100%\""));
        assert!(svg.contains("id=\"target-1\""));
    }

    #[test]
    fn test_marker_and_element_ids_are_present() {
        let mut db = StateDb::new();
        db.add_state("C", None).unwrap();
        db.push_scope("C").unwrap();
        db.add_state("X", None).unwrap();
        db.pop_scope().unwrap();
        db.add_state("A", None).unwrap();
        db.add_transition("A", "C", Some("go")).unwrap();
        let svg = render_db(&db);

        assert!(svg.contains("id=\"arrowhead\""));
        assert!(svg.contains("id=\"C__X\""));
        // The A --> C edge touches a cluster, so it is boundary-routed.
        assert!(svg.contains("transition--boundary"));
        assert!(svg.contains(">go<"));
    }
}
