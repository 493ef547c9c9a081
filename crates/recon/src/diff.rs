use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One differing leaf between two documents.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DiffEntry {
    pub path: String,
    #[serde(alias = "A")]
    pub a: Value,
    #[serde(alias = "B")]
    pub b: Value,
}

/// Structural diff of two JSON documents.
///
/// Object keys are visited in sorted order and joined with `.`; lists are
/// compared index by index as `path[i]`, with the shorter side reading as
/// null. Objects (including objects inside lists) recurse; anything else that
/// differs is reported as a leaf.
pub fn diff(a: &Value, b: &Value) -> Vec<DiffEntry> {
    let mut out = Vec::new();
    diff_at("", a, b, &mut out);
    out
}

fn diff_at(path: &str, a: &Value, b: &Value, out: &mut Vec<DiffEntry>) {
    match (a, b) {
        (Value::Object(a), Value::Object(b)) => diff_objects(path, a, b, out),
        (Value::Array(a), Value::Array(b)) => {
            for i in 0..a.len().max(b.len()) {
                let ai = a.get(i).unwrap_or(&Value::Null);
                let bi = b.get(i).unwrap_or(&Value::Null);
                diff_at(&format!("{path}[{i}]"), ai, bi, out);
            }
        }
        _ if a != b => out.push(DiffEntry {
            path: path.to_string(),
            a: a.clone(),
            b: b.clone(),
        }),
        _ => {}
    }
}

fn diff_objects(path: &str, a: &Map<String, Value>, b: &Map<String, Value>, out: &mut Vec<DiffEntry>) {
    let mut keys: Vec<&String> = a.keys().chain(b.keys()).collect();
    keys.sort();
    keys.dedup();

    for key in keys {
        let child = if path.is_empty() { key.clone() } else { format!("{path}.{key}") };
        let av = a.get(key).unwrap_or(&Value::Null);
        let bv = b.get(key).unwrap_or(&Value::Null);
        diff_at(&child, av, bv, out);
    }
}
