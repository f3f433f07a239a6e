//! The paramux command-line interface.
//!
//! Thin wrapper around the engine: loads and decodes the input and
//! requirements documents, runs the pipeline, serializes the result, and
//! maps every failure to its stable exit code.

use std::fs;
use std::path::Path;

use clap::Parser;
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

use crate::cli::args::ParamuxArgs;
use crate::document::InputDocument;
use crate::engine;
use crate::errors::{ParamuxError, Result};
use crate::requirements::RequirementsDocument;

pub mod args;
pub mod output;

/// The main entry point for the CLI. Returns the process exit code.
pub fn run() -> i32 {
    init_tracing();
    let args = ParamuxArgs::parse();
    match execute(&args) {
        Ok(()) => 0,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    }
}

fn execute(args: &ParamuxArgs) -> Result<()> {
    let input: InputDocument = load_document(&args.input, |path, reason| {
        ParamuxError::InputLoad { path, reason }
    })
    .map_err(promote_input_schema)?;

    let requirements: RequirementsDocument = match &args.requirements {
        Some(path) => load_document(path, |path, reason| ParamuxError::RequirementsLoad {
            path,
            reason,
        })
        .map_err(promote_requirements_schema)?,
        None => RequirementsDocument::default(),
    };

    let document = engine::run(input, requirements)?;
    output::write(&document, args.format, args.output.as_deref())
}

/// Two-stage load: file read and JSON syntax problems are load failures,
/// while a well-formed document that fails the typed decode is a schema
/// failure, carried in the error's `reason`.
fn load_document<T, F>(path: &Path, load_error: F) -> std::result::Result<T, LoadFailure>
where
    T: DeserializeOwned,
    F: Fn(String, String) -> ParamuxError,
{
    let display = path.display().to_string();
    let text = fs::read_to_string(path)
        .map_err(|err| LoadFailure::Load(load_error(display.clone(), err.to_string())))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|err| LoadFailure::Load(load_error(display.clone(), err.to_string())))?;
    serde_json::from_value(value).map_err(|err| LoadFailure::Schema {
        path: display,
        reason: err.to_string(),
    })
}

enum LoadFailure {
    Load(ParamuxError),
    Schema { path: String, reason: String },
}

fn promote_input_schema(failure: LoadFailure) -> ParamuxError {
    match failure {
        LoadFailure::Load(err) => err,
        LoadFailure::Schema { path, reason } => ParamuxError::InputSchema { path, reason },
    }
}

fn promote_requirements_schema(failure: LoadFailure) -> ParamuxError {
    match failure {
        LoadFailure::Load(err) => err,
        LoadFailure::Schema { path, reason } => ParamuxError::RequirementsSchema { path, reason },
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("paramux=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
