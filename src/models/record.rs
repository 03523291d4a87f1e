//! The assembled credential record and its payload.

use crate::error::SecretError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use zeroize::Zeroize;

/// Secret payload: payload key to text value.
///
/// Values are wiped from memory when the payload is dropped.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(BTreeMap<String, String>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: &str, value: String) {
        self.0.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of the entries as a plain map.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.0.clone()
    }
}

impl From<BTreeMap<String, String>> for Payload {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl Drop for Payload {
    fn drop(&mut self) {
        for value in self.0.values_mut() {
            value.zeroize();
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.keys().map(|k| (k, "<redacted>")))
            .finish()
    }
}

/// Both identity fields must be non-empty.
pub(crate) fn validate_identity(name: &str, namespace: &str) -> Result<(), SecretError> {
    for (field, value) in [("name", name), ("namespace", namespace)] {
        if value.is_empty() {
            return Err(SecretError::InvalidName {
                field,
                reason: "cannot be empty".into(),
            });
        }
    }
    Ok(())
}

/// A secret ready to be exported or upserted. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    name: String,
    namespace: String,
    labels: BTreeMap<String, String>,
    payload: Payload,
}

impl CredentialRecord {
    /// Build a record; `name` and `namespace` must be non-empty.
    pub(crate) fn new(
        name: String,
        namespace: String,
        labels: BTreeMap<String, String>,
        payload: Payload,
    ) -> Result<Self, SecretError> {
        validate_identity(&name, &namespace)?;
        Ok(Self {
            name,
            namespace,
            labels,
            payload,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}
