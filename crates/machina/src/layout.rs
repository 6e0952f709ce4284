//! Layout engine seam.
//!
//! The pipeline treats positioning as a black box behind [`LayoutEngine`]:
//! an engine receives the assembled graph and must give every node a
//! bounding box and every plain edge a polyline path. Deferred edges get
//! no path here; the boundary router computes those from the finished
//! geometry.

mod layered;

pub use layered::LayeredEngine;

use machina_core::geometry::{Bounds, Point};

use crate::structure::StateGraph;

/// A finished layout: node geometry plus paths for the plain edges.
#[derive(Debug)]
pub struct Layout {
    node_bounds: Vec<Bounds>,
    edge_paths: Vec<Vec<Point>>,
}

impl Layout {
    pub(crate) fn new(node_bounds: Vec<Bounds>, edge_paths: Vec<Vec<Point>>) -> Self {
        Self {
            node_bounds,
            edge_paths,
        }
    }

    /// Bounding box of the node at the given graph index.
    pub fn node_bounds(&self, idx: usize) -> Bounds {
        self.node_bounds[idx]
    }

    /// Path of the plain edge at the given index, center to center.
    pub fn edge_path(&self, idx: usize) -> &[Point] {
        &self.edge_paths[idx]
    }

    /// The bounding box of all laid-out content.
    pub fn content_bounds(&self) -> Bounds {
        let mut bounds = self.node_bounds.iter();
        let first = match bounds.next() {
            Some(first) => *first,
            None => return Bounds::default(),
        };
        bounds.fold(first, |acc, b| acc.merge(b))
    }
}

/// The positioning black box.
pub trait LayoutEngine {
    /// Assigns every node a position and size, and every plain edge a path.
    fn layout(&self, graph: &StateGraph) -> Layout;
}
