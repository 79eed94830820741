//! Recursive placeholder substitution.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::Value;

use super::ValueMap;

lazy_static! {
    /// A `{name}` placeholder token.
    static ref PLACEHOLDER: Regex = Regex::new(r"\{([^}]+)\}").expect("placeholder pattern is valid");
}

/// Replace every `{name}` token in the tree with its value.
///
/// Tokens with no value are left verbatim so partially specified circuits
/// can still be previewed. Non-string leaves pass through unchanged; object
/// key order and array order are preserved. The input is not modified.
pub fn substitute(node: &Value, values: &ValueMap) -> Value {
    match node {
        Value::String(text) => Value::String(substitute_str(text, values)),
        Value::Array(items) => Value::Array(items.iter().map(|v| substitute(v, values)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), substitute(v, values)))
                .collect(),
        ),
        Value::Null | Value::Bool(_) | Value::Number(_) => node.clone(),
    }
}

/// Replace the tokens in a single string.
pub fn substitute_str(text: &str, values: &ValueMap) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| match values.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Names of the placeholders still present anywhere in the tree, in
/// first-seen order without duplicates.
pub fn unresolved_placeholders(node: &Value) -> Vec<String> {
    let mut found = Vec::new();
    collect_placeholders(node, &mut found);
    found
}

fn collect_placeholders(node: &Value, found: &mut Vec<String>) {
    match node {
        Value::String(text) => {
            for caps in PLACEHOLDER.captures_iter(text) {
                let name = caps[1].to_string();
                if !found.contains(&name) {
                    found.push(name);
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|v| collect_placeholders(v, found)),
        Value::Object(map) => map.values().for_each(|v| collect_placeholders(v, found)),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}
