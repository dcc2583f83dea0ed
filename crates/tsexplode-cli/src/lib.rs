//! tsexplode CLI library
//!
//! This module contains the core CLI logic for the tsexplode tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use log::{debug, info};

use tsexplode::{
    ExplodeError, ExplodeSummary, Exploder, config::AppConfig, emit::FileEmitter,
    project::Project,
};

/// Run the tsexplode CLI application
///
/// This function loads the source units named by `args`, flattens every
/// marked interface and writes one output unit per entry into the output
/// directory.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `ExplodeError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Resolution errors and cyclic types
/// - Output errors
pub fn run(args: &Args) -> Result<ExplodeSummary, ExplodeError> {
    info!(
        inputs:? = args.inputs,
        project:? = args.project,
        out_dir = args.out;
        "Processing sources"
    );

    // Load configuration; the command line wins over the file
    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(enum_mode) = args.enum_mode {
        debug!(enum_mode:%; "Enum mode set on the command line");
        app_config = AppConfig::new(
            app_config.explode().clone().with_enum_mode(enum_mode),
            app_config.output().clone(),
        );
    }

    // Collect the initial source units
    let mut project = match &args.project {
        Some(path) => Project::from_tsconfig(path)?,
        None => Project::new(),
    };
    for input in &args.inputs {
        project.add_path(input)?;
    }

    // Parse, follow imports and elaborate
    let loaded = project.load()?;
    let graph = loaded.type_graph()?;

    // Flatten entries and write output units
    let output = app_config.output();
    let mut emitter = FileEmitter::new(&args.out, output.file_extension());
    let summary = Exploder::new(app_config).explode(&graph, &mut emitter)?;

    info!(
        written = summary.written().len(),
        skipped = summary.skipped().len(),
        out_dir = args.out;
        "Output units exported"
    );

    Ok(summary)
}

/// One line describing what a run did, for the terminal.
pub fn describe_summary(summary: &ExplodeSummary, out: &str) -> String {
    let mut line = format!(
        "Wrote {} to {out}",
        plural(summary.written().len(), "unit")
    );
    if !summary.skipped().is_empty() {
        line.push_str(&format!(
            ", kept {} already present",
            plural(summary.skipped().len(), "unit")
        ));
    }
    if !summary.duplicates().is_empty() {
        line.push_str(&format!(
            "; declared more than once: {}",
            summary.duplicates().join(", ")
        ));
    }
    line
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
