//! Structural differences between two JSON documents.

use serde::Serialize;
use serde_json::Value;

/// One place where two documents disagree.
///
/// `path` is a JSON Pointer into both documents. A side that has nothing at
/// that path reports `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Difference {
    pub path: String,
    pub left: Value,
    pub right: Value,
}

/// List every leaf-level difference between `left` and `right`.
///
/// Objects are compared key by key and arrays index by index; anything else
/// (including a type mismatch) is reported whole.
pub fn diff(left: &Value, right: &Value) -> Vec<Difference> {
    let mut differences = Vec::new();
    walk(String::new(), left, right, &mut differences);
    differences
}

fn walk(path: String, left: &Value, right: &Value, out: &mut Vec<Difference>) {
    match (left, right) {
        (Value::Object(a), Value::Object(b)) => {
            for (key, a_value) in a {
                let b_value = b.get(key).unwrap_or(&Value::Null);
                walk(child(&path, key), a_value, b_value, out);
            }
            for (key, b_value) in b {
                if !a.contains_key(key) {
                    walk(child(&path, key), &Value::Null, b_value, out);
                }
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            for i in 0..a.len().max(b.len()) {
                let a_value = a.get(i).unwrap_or(&Value::Null);
                let b_value = b.get(i).unwrap_or(&Value::Null);
                walk(child(&path, &i.to_string()), a_value, b_value, out);
            }
        }
        _ if left != right => out.push(Difference {
            path,
            left: left.clone(),
            right: right.clone(),
        }),
        _ => {}
    }
}

/// Append a reference token, escaped per RFC 6901.
fn child(path: &str, token: &str) -> String {
    format!("{path}/{}", token.replace('~', "~0").replace('/', "~1"))
}
