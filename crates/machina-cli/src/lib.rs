//! CLI logic for the Machina state-diagram tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use machina::{DiagramBuilder, MachinaError};

/// Run the Machina CLI application.
///
/// Reads the input file, compiles it through the diagram pipeline, and
/// writes the resulting SVG to the output file.
///
/// # Errors
///
/// Returns `MachinaError` for file I/O errors, configuration loading
/// errors, parse errors, and graph assembly errors.
pub fn run(args: &Args) -> Result<(), MachinaError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = DiagramBuilder::new(app_config);
    let svg = builder.build(&source, &args.element_id)?;

    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
