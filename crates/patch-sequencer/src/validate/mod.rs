//! Strict structural validation of findings documents.
//!
//! This mirrors the published findings schema and is deliberately stricter
//! than the normalizer: classification must be exactly `Additive`,
//! `Corrective` or `Destructive`, confidence an integer in `0..=100`, and
//! impact exactly `low`, `medium` or `high`. Hand-built fixtures and legacy
//! producers that only the normalizer accepts will show violations here.

use std::fmt;

use serde_json::{Map, Value};

use crate::diagnostic::SequencerError;
use crate::normalize::findings_from_document;

const CLASSIFICATIONS: &[&str] = &["Additive", "Corrective", "Destructive"];
const IMPACTS: &[&str] = &["low", "medium", "high"];
const REQUIRED: &[&str] = &["id", "classification"];
const REFERENCE_LISTS: &[&str] = &["dependencies", "affects"];

/// One schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Position of the finding in the document.
    pub finding: usize,
    /// Offending field, or `None` when the finding itself is malformed.
    pub field: Option<String>,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "findings[{}].{}: {}", self.finding, field, self.message),
            None => write!(f, "findings[{}]: {}", self.finding, self.message),
        }
    }
}

/// Validates every finding of a document.
///
/// A document of the wrong shape is an error; violations inside findings
/// are returned as a list (empty when the document is valid).
pub fn validate_document(document: &Value) -> Result<Vec<Violation>, SequencerError> {
    let findings = findings_from_document(document)?;

    let mut violations = Vec::new();
    for (i, finding) in findings.iter().enumerate() {
        match finding.as_object() {
            Some(obj) => validate_finding(i, obj, &mut violations),
            None => violations.push(Violation {
                finding: i,
                field: None,
                message: "must be an object".to_string(),
            }),
        }
    }

    Ok(violations)
}

fn validate_finding(i: usize, obj: &Map<String, Value>, out: &mut Vec<Violation>) {
    let mut report = |field: &str, message: String| {
        out.push(Violation {
            finding: i,
            field: Some(field.to_string()),
            message,
        });
    };

    for field in REQUIRED {
        if !obj.contains_key(*field) {
            report(*field, "is required".to_string());
        }
    }

    if let Some(id) = obj.get("id") {
        if !id.as_str().is_some_and(|s| !s.is_empty()) {
            report("id", "must be a non-empty string".to_string());
        }
    }

    if let Some(class) = obj.get("classification") {
        if !class.as_str().is_some_and(|s| CLASSIFICATIONS.contains(&s)) {
            report("classification", format!("must be one of {}", CLASSIFICATIONS.join(", ")));
        }
    }

    if let Some(confidence) = obj.get("confidence") {
        if !confidence.as_i64().is_some_and(|c| (0..=100).contains(&c)) {
            report("confidence", "must be an integer in [0, 100]".to_string());
        }
    }

    if let Some(impact) = obj.get("impact") {
        if !impact.as_str().is_some_and(|s| IMPACTS.contains(&s)) {
            report("impact", format!("must be one of {}", IMPACTS.join(", ")));
        }
    }

    for field in REFERENCE_LISTS {
        let Some(value) = obj.get(*field) else {
            continue;
        };
        let Some(items) = value.as_array() else {
            report(*field, "must be an array".to_string());
            continue;
        };
        for (j, item) in items.iter().enumerate() {
            if !(item.is_string() || item.is_object()) {
                report(
                    format!("{}[{}]", field, j).as_str(),
                    "must be a reference string or object".to_string(),
                );
            }
        }
    }
}
