//! Output document serialization.
//!
//! Two modes: `readable` (4-space indent, one key per line) for humans and
//! `parseable` (compact) for downstream tooling.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::cli::args::OutputFormat;
use crate::document::OutputDocument;
use crate::errors::{ParamuxError, Result};

/// Renders the output document in the requested mode, without a trailing
/// newline.
pub fn render(document: &OutputDocument, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Readable => {
            let mut buf = Vec::new();
            let formatter = PrettyFormatter::with_indent(b"    ");
            let mut serializer = Serializer::with_formatter(&mut buf, formatter);
            document
                .serialize(&mut serializer)
                .map_err(|err| render_error(err.to_string()))?;
            String::from_utf8(buf).map_err(|err| render_error(err.to_string()))?
        }
        OutputFormat::Parseable => {
            serde_json::to_string(document).map_err(|err| render_error(err.to_string()))?
        }
    };
    Ok(rendered)
}

/// Writes the rendered document to the target path, or to stdout when no
/// path is given.
pub fn write(
    document: &OutputDocument,
    format: OutputFormat,
    target: Option<&Path>,
) -> Result<()> {
    let mut rendered = render(document, format)?;
    rendered.push('\n');
    match target {
        Some(path) => fs::write(path, rendered).map_err(|err| ParamuxError::OutputWrite {
            target: path.display().to_string(),
            reason: err.to_string(),
        }),
        None => {
            print!("{rendered}");
            Ok(())
        }
    }
}

fn render_error(reason: String) -> ParamuxError {
    ParamuxError::OutputWrite {
        target: "(render)".to_string(),
        reason,
    }
}
