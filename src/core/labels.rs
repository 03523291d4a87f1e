//! `key=value` label parsing.

use crate::error::SecretError;
use std::collections::BTreeMap;

/// Parse `key=value` strings into a label map. Later duplicates win.
pub fn parse_labels<S: AsRef<str>>(labels: &[S]) -> Result<BTreeMap<String, String>, SecretError> {
    let mut parsed = BTreeMap::new();
    for label in labels {
        let label = label.as_ref();
        let (key, value) = split_label(label)?;
        parsed.insert(key.to_string(), value.to_string());
    }
    Ok(parsed)
}

fn split_label(label: &str) -> Result<(&str, &str), SecretError> {
    let (key, value) = label
        .split_once('=')
        .ok_or_else(|| SecretError::malformed_label(label, "must be key=value"))?;
    if value.contains('=') {
        return Err(SecretError::malformed_label(
            label,
            "must contain exactly one '='",
        ));
    }
    if key.is_empty() {
        return Err(SecretError::malformed_label(label, "key cannot be empty"));
    }
    Ok((key, value))
}
