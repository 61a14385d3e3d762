//! Finding → Patch mapping.

use serde_json::{Map, Value};
use xxhash_rust::xxh3::xxh3_64;

use super::dependency::parse_dependency;
use super::fields::{first_array, first_non_null, first_present, first_text};
use crate::model::{Classification, Dependency, Impact, Patch, DEFAULT_KIND, DEFAULT_SCHEMA};

pub const DEFAULT_CONFIDENCE: u8 = 50;

const ID_KEYS: &[&str] = &["id", "finding_id", "name"];
const CLASSIFICATION_KEYS: &[&str] = &["classification", "class"];
const CONFIDENCE_KEYS: &[&str] = &["confidence", "confidence_score"];
const IMPACT_KEYS: &[&str] = &["impact", "severity", "estimated_impact"];
const DEPENDENCY_KEYS: &[&str] = &["dependencies", "depends_on"];
const AFFECTS_KEYS: &[&str] = &["affects", "creates", "affected", "affected_objects"];
const OBJECT_NAME_KEYS: &[&str] = &["object_name", "name"];
const OBJECT_KIND_KEYS: &[&str] = &["object_type", "kind"];

/// Range of the numeric part of generated ids.
const AUTO_ID_MODULUS: u64 = 100_000_000;

/// Maps one raw finding to a canonical patch. Never fails.
///
/// A finding that is not a JSON object yields a patch with defaults and a
/// content-derived id.
pub fn normalize_finding(finding: &Value) -> Patch {
    let empty = Map::new();
    let obj = finding.as_object().unwrap_or(&empty);

    let id = first_text(obj, ID_KEYS).unwrap_or_else(|| auto_id(finding));

    let classification = first_text(obj, CLASSIFICATION_KEYS)
        .map(|raw| Classification::parse(&raw))
        .unwrap_or(Classification::Corrective);

    let confidence = first_non_null(obj, CONFIDENCE_KEYS)
        .map(coerce_confidence)
        .unwrap_or(DEFAULT_CONFIDENCE);

    let impact = match first_present(obj, IMPACT_KEYS) {
        Some(Value::String(raw)) => Impact::parse(raw),
        _ => Impact::Medium,
    };

    let dependencies = parse_all(first_array(obj, DEPENDENCY_KEYS));

    let mut affects = parse_all(first_array(obj, AFFECTS_KEYS));
    if affects.is_empty() {
        if let Some(object) = implied_object(obj) {
            affects.push(object);
        }
    }

    Patch {
        id,
        classification,
        confidence,
        impact,
        dependencies,
        affects,
        fanout: 0,
    }
}

/// Deterministic id for a finding without one: `auto_<digits>`, derived from
/// an XXH3 hash of the finding's key-sorted JSON.
pub fn auto_id(finding: &Value) -> String {
    let mut canonical = String::new();
    write_canonical(finding, &mut canonical);
    format!("auto_{}", xxh3_64(canonical.as_bytes()) % AUTO_ID_MODULUS)
}

/// Integers, integral strings and truncated floats are accepted; anything
/// else becomes [`DEFAULT_CONFIDENCE`]. The result is clamped to `0..=100`.
fn coerce_confidence(raw: &Value) -> u8 {
    let parsed = match raw {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match parsed {
        Some(value) => value.clamp(0, 100) as u8,
        None => DEFAULT_CONFIDENCE,
    }
}

fn parse_all(raw: &[Value]) -> Vec<Dependency> {
    raw.iter().filter_map(parse_dependency).collect()
}

/// The object a finding describes through its top-level `object_name`,
/// `schema` and `object_type` fields.
fn implied_object(obj: &Map<String, Value>) -> Option<Dependency> {
    let name = first_text(obj, OBJECT_NAME_KEYS)?;
    let schema = first_text(obj, &["schema"]).unwrap_or_else(|| DEFAULT_SCHEMA.to_string());
    let kind = first_text(obj, OBJECT_KIND_KEYS).unwrap_or_else(|| DEFAULT_KIND.to_string());
    Some(Dependency::new(schema, name, kind))
}

/// Writes `value` as compact JSON with object keys sorted, independent of how
/// `serde_json` orders maps in this build.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key.as_str()], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
