//! Post-layout routing of boundary edges.
//!
//! Generic layout engines mis-route edges whose endpoint is a cluster
//! rather than a leaf, so those edges are computed here instead, from the
//! finished geometry: a straight chord along the line between the two
//! endpoint centers, entering and leaving each box at half its width.
//! A chord trades looks for correctness; it is always attached to the
//! right boxes.

use log::debug;

use machina_core::geometry::Point;

use crate::{layout::Layout, structure::StateGraph};

/// A deferred edge with its computed straight-line path.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEdge {
    from: usize,
    to: usize,
    start: Point,
    end: Point,
    label: String,
}

impl RoutedEdge {
    /// Graph index of the source node.
    pub fn from(&self) -> usize {
        self.from
    }

    /// Graph index of the target node.
    pub fn to(&self) -> usize {
        self.to
    }

    /// Where the chord leaves the source box.
    pub fn start(&self) -> Point {
        self.start
    }

    /// Where the chord enters the target box.
    pub fn end(&self) -> Point {
        self.end
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Computes corrected paths for every deferred edge.
///
/// Endpoints were already resolved during assembly, so no edge can
/// silently vanish here.
pub fn route_boundary_edges(graph: &StateGraph, layout: &Layout) -> Vec<RoutedEdge> {
    let routed: Vec<RoutedEdge> = graph
        .deferred_edges()
        .iter()
        .map(|edge| {
            let from_bounds = layout.node_bounds(edge.from());
            let to_bounds = layout.node_bounds(edge.to());
            let from_center = from_bounds.center();
            let to_center = to_bounds.center();

            let (start, end) = if to_center.x() == from_center.x() {
                // Same center column: the chord's slope is undefined, so
                // route a vertical segment clipped by half of each box
                // height instead.
                let sign = if to_center.y() >= from_center.y() {
                    1.0
                } else {
                    -1.0
                };
                (
                    Point::new(
                        from_center.x(),
                        from_center.y() + sign * from_bounds.height() / 2.0,
                    ),
                    Point::new(to_center.x(), to_center.y() - sign * to_bounds.height() / 2.0),
                )
            } else {
                let tangent =
                    (to_center.y() - from_center.y()) / (to_center.x() - from_center.x());
                let sign = if to_center.x() > from_center.x() {
                    1.0
                } else {
                    -1.0
                };
                // Offset each endpoint horizontally by half its box width,
                // towards the peer on the source side and away from it on
                // the target side; the tangent gives the matching y.
                let start_dx = sign * from_bounds.width() / 2.0;
                let end_dx = -sign * to_bounds.width() / 2.0;
                (
                    Point::new(
                        from_center.x() + start_dx,
                        from_center.y() + tangent * start_dx,
                    ),
                    Point::new(to_center.x() + end_dx, to_center.y() + tangent * end_dx),
                )
            };

            RoutedEdge {
                from: edge.from(),
                to: edge.to(),
                start,
                end,
                label: edge.label().to_string(),
            }
        })
        .collect();

    debug!(edges = routed.len(); "boundary edges routed");
    routed
}
