//! Dependency reference parsing.
//!
//! Accepted forms:
//!
//! ```text
//! "schema.name"                      kind defaults to `table`
//! "schema.name:kind"
//! "name"                             schema defaults to `public`
//! {"schema": .., "name": .., "kind": ..}   plus legacy aliases
//! ```

use serde_json::{Map, Value};

use super::fields::first_text;
use crate::model::{Dependency, DEFAULT_KIND, DEFAULT_SCHEMA};

const SCHEMA_KEYS: &[&str] = &["schema", "object_schema", "schema_name"];
const NAME_KEYS: &[&str] = &["name", "object_name", "object_id", "object"];
const KIND_KEYS: &[&str] = &["kind", "object_type", "type"];

/// Parses a raw reference. Returns `None` for anything that does not name an
/// object; callers skip those entries.
pub fn parse_dependency(raw: &Value) -> Option<Dependency> {
    match raw {
        Value::String(s) => parse_dependency_str(s),
        Value::Object(obj) => parse_dependency_object(obj),
        _ => None,
    }
}

/// Parses the string form of a reference.
pub fn parse_dependency_str(raw: &str) -> Option<Dependency> {
    if raw.is_empty() {
        return None;
    }

    let Some((schema, rest)) = raw.split_once('.') else {
        return Some(Dependency::new(DEFAULT_SCHEMA, raw, DEFAULT_KIND));
    };

    let (name, kind) = rest.split_once(':').unwrap_or((rest, DEFAULT_KIND));
    if name.is_empty() {
        return None;
    }

    Some(Dependency::new(schema, name, kind))
}

fn parse_dependency_object(obj: &Map<String, Value>) -> Option<Dependency> {
    let name = first_text(obj, NAME_KEYS)?;
    let schema = first_text(obj, SCHEMA_KEYS).unwrap_or_else(|| DEFAULT_SCHEMA.to_string());
    let kind = first_text(obj, KIND_KEYS).unwrap_or_else(|| DEFAULT_KIND.to_string());

    Some(Dependency::new(schema, name, kind))
}
