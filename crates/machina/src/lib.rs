//! Machina - a small language for state diagrams.
//!
//! Parsing, layout, and SVG rendering for textual state-diagram
//! definitions with nested composite states and labeled transitions.
//!
//! The pipeline per build is: parse into a fresh state store, assemble the
//! hierarchical graph, lay it out, re-route the edges whose endpoints are
//! composite clusters, and render SVG.

pub mod config;
pub mod export;
pub mod layout;
pub mod router;
pub mod structure;

mod error;

pub use machina_core::{StateDb, StateId, geometry};
pub use machina_parser::ParseError;

pub use error::MachinaError;

use log::{debug, info};

use config::AppConfig;
use export::svg::SvgBuilder;
use layout::{LayoutEngine, LayeredEngine};
use structure::StateGraph;

/// Builder for parsing and rendering Machina state diagrams.
///
/// Every build works against its own state store, so concurrent builds on
/// one process never interfere.
///
/// # Examples
///
/// ```
/// use machina::{DiagramBuilder, config::AppConfig};
///
/// let source = "
///     stateDiagram
///
///     Idle --> Configuring
///     Configuring --> Idle : EvConfig
/// ";
///
/// let builder = DiagramBuilder::new(AppConfig::default());
/// let svg = builder.build(source, "diagram-1")
///     .expect("failed to build diagram");
/// assert!(svg.contains("<svg"));
/// ```
#[derive(Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Creates a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Parses source text into a state store.
    ///
    /// # Errors
    ///
    /// Returns [`MachinaError::Parse`] carrying the diagnostics and the
    /// offending source.
    pub fn parse(&self, source: &str) -> Result<StateDb, MachinaError> {
        info!("parsing state diagram");

        let db = machina_parser::parse(source)
            .map_err(|err| MachinaError::new_parse_error(err, source))?;

        debug!(states = db.states().len(), transitions = db.transitions().len(); "diagram parsed");
        Ok(db)
    }

    /// Renders a parsed store to an SVG string.
    ///
    /// The produced SVG root carries `target_element_id`, is sized to the
    /// content bounding box plus a fixed 20-unit margin per axis, and
    /// scales to 100% of its container.
    ///
    /// # Errors
    ///
    /// Returns [`MachinaError::Graph`] when a transition references a
    /// state that was never registered.
    pub fn render_svg(&self, db: &StateDb, target_element_id: &str) -> Result<String, MachinaError> {
        let graph = StateGraph::from_db(db)?;

        // The engine is a black box behind the seam; only this spot knows
        // which one runs.
        let engine: Box<dyn LayoutEngine> = Box::new(LayeredEngine::new(self.config.layout.clone()));
        let laid_out = engine.layout(&graph);

        let routed = router::route_boundary_edges(&graph, &laid_out);

        let svg = SvgBuilder::new(&graph, &laid_out, &routed, &self.config)
            .with_target_element_id(target_element_id)
            .render();

        info!("SVG rendered successfully");
        Ok(svg)
    }

    /// Compiles source text straight to an SVG string.
    pub fn build(&self, source: &str, target_element_id: &str) -> Result<String, MachinaError> {
        let db = self.parse(source)?;
        self.render_svg(&db, target_element_id)
    }
}
