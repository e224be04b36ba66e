//! Dynamic values and the container predicate
//!
//! Roots and looked-up values are plain `serde_json::Value`s. A missing
//! property is represented by `None` rather than a sentinel value, so
//! "undefined" never lives inside a document.

use serde_json::Value;

/// Returns true if `value` supports named-property descent
///
/// Objects and arrays are containers; `null` and every other scalar are not.
/// Arrays count as containers so they can be extracted by a template, but
/// they expose no named properties to the resolver.
pub fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// Truthiness used when walking a root list
///
/// `null`, `false`, numeric zero and the empty string are falsy. Every
/// container is truthy, including empty ones.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Stringify a looked-up value the way template output expects
///
/// A missing value renders as the literal text `undefined`.
pub fn display_string(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(v) => render_value(v),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => render_number(n),
        Value::String(s) => s.clone(),
        Value::Object(_) => "[object Object]".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                // Holes and nulls join as empty strings
                Value::Null => String::new(),
                other => render_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
    }
}

fn render_number(n: &serde_json::Number) -> String {
    if !n.is_f64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) => render_float(f),
        None => n.to_string(),
    }
}

/// Script number formatting: plain decimals between `1e-6` and `1e21`,
/// exponent notation with an explicit sign outside that range
fn render_float(f: f64) -> String {
    if f == 0.0 {
        // Covers negative zero
        return "0".to_string();
    }
    let magnitude = f.abs();
    if (1e-6..1e21).contains(&magnitude) {
        // `f64`'s Display drops the trailing `.0` that serde_json keeps
        return format!("{}", f);
    }
    let exp = format!("{:e}", f);
    match exp.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => exp,
    }
}
