//! Findings documents.
//!
//! A document is either a top-level array of findings or an object of the
//! form `{"findings": [...]}`. Any other shape is rejected before a single
//! finding is normalized.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use super::finding::normalize_finding;
use crate::diagnostic::SequencerError;
use crate::model::Patch;

/// Reads and parses a JSON document from disk.
pub fn read_document(path: &Path) -> Result<Value, SequencerError> {
    if !path.exists() {
        return Err(SequencerError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| SequencerError::io(path, e.to_string()))?;

    serde_json::from_str(&content).map_err(|e| SequencerError::InvalidJson {
        message: format!("{}: {}", path.display(), e),
    })
}

/// Returns the list of raw findings held by a document.
pub fn findings_from_document(document: &Value) -> Result<&[Value], SequencerError> {
    match document {
        Value::Array(findings) => Ok(findings.as_slice()),
        Value::Object(obj) => match obj.get("findings") {
            Some(Value::Array(findings)) => Ok(findings.as_slice()),
            Some(other) => Err(SequencerError::UnsupportedDocument {
                found: format!("\"findings\" holding {}", describe(other)),
            }),
            None => Err(SequencerError::UnsupportedDocument {
                found: "an object without a \"findings\" key".to_string(),
            }),
        },
        other => Err(SequencerError::UnsupportedDocument {
            found: describe(other).to_string(),
        }),
    }
}

/// Normalizes every finding of a document, in document order.
pub fn normalize_document(document: &Value) -> Result<Vec<Patch>, SequencerError> {
    let findings = findings_from_document(document)?;
    Ok(findings.iter().map(normalize_finding).collect())
}

/// Reads a findings document and normalizes it.
pub fn load_findings(path: &Path) -> Result<Vec<Patch>, SequencerError> {
    let document = read_document(path)?;
    let patches = normalize_document(&document)?;
    debug!(path = %path.display(), patches = patches.len(), "loaded findings");
    Ok(patches)
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
