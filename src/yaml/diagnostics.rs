//! YAML error diagnostics for part spec files

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::entities::GeometryError;

/// YAML syntax or shape error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid part spec: {message}")]
#[diagnostic(code(partsmith::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

impl YamlSyntaxError {
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Geometry(#[from] GeometryError),

    #[error("Failed to read {path}: {source}")]
    #[diagnostic(code(partsmith::yaml::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize: {0}")]
    Serialize(String),
}

/// Convert a 1-based line/column to a byte offset
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut line_start = 0;
    for (index, text) in source.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let within = text
                .char_indices()
                .nth(column.saturating_sub(1))
                .map(|(i, _)| i)
                .unwrap_or(text.len());
            return line_start + within;
        }
        line_start += text.len();
    }
    source.len().saturating_sub(1)
}

fn generate_help(message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("tab") {
        return Some(
            "YAML requires spaces for indentation, not tabs. Replace tabs with spaces.".to_string(),
        );
    }

    if msg_lower.contains("missing field `shape`") {
        return Some(
            "Add a shape block, e.g.\nshape:\n  part_type: rectangle\n  rect_width_mm: 30"
                .to_string(),
        );
    }

    if msg_lower.contains("missing field") {
        return Some(
            "Every dimension must be present; `partsmith parse` prints a complete spec to start from."
                .to_string(),
        );
    }

    if msg_lower.contains("unknown variant") && msg_lower.contains("aluminum") {
        return Some("Valid materials: aluminum (or aluminium), steel".to_string());
    }

    if msg_lower.contains("invalid value") || msg_lower.contains("invalid type") {
        return Some("Dimensions are whole millimetres and must not be negative.".to_string());
    }

    if msg_lower.contains("duplicate key") {
        return Some("Each key can only appear once. Remove or rename the duplicate key.".to_string());
    }

    if msg_lower.contains("mapping values are not allowed") {
        return Some("You may be missing a space after ':' or have incorrect indentation.".to_string());
    }

    None
}
