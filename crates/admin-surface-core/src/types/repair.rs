//! Lenient field extraction for stored configuration blobs.
//!
//! Every helper returns `None` for a value of the wrong shape so callers can
//! fall back to their default instead of failing.

use std::collections::BTreeSet;

use serde_json::Value;

/// Read a string field. Non-strings are treated as absent.
pub(crate) fn extract_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Read a boolean flag, accepting the checkbox encodings form posts produce.
pub(crate) fn extract_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Some(true),
            "0" | "false" | "off" | "no" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Read a list of strings into a set.
///
/// A non-list yields `None`; non-string and blank elements inside a list are
/// skipped.
pub(crate) fn extract_string_set(value: &Value) -> Option<BTreeSet<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    }
}

/// Read an ordered list of strings, dropping blanks and non-strings.
pub(crate) fn extract_string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    }
}

/// Returns the trimmed string when it is non-empty.
pub(crate) fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
