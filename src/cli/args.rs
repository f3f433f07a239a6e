//! Command-line arguments for the paramux CLI.
//!
//! Uses `clap` with its "derive" feature for a declarative, type-safe
//! argument structure.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "paramux",
    version,
    about = "Translate a JSON with multi-value parameters into a JSON with single-value parameters."
)]
pub struct ParamuxArgs {
    /// JSON file with multi-value parameters.
    #[arg(long, default_value = "mv-params.json")]
    pub input: PathBuf,

    /// JSON file with validation and transformation requirements.
    #[arg(long)]
    pub requirements: Option<PathBuf>,

    /// Write the multiplexed document to this file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Serialization mode for the output document.
    #[arg(long, value_enum, default_value = "readable")]
    pub format: OutputFormat,
}

/// Output serialization modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// 4-space indentation, one key per line.
    Readable,
    /// Compact, no indentation or spacing.
    Parseable,
}
