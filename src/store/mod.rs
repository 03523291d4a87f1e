//! Named-resource store abstraction.
//!
//! The upsert engine talks to a store only through [`ResourceStore`]. Resources
//! are addressed by `(namespace, name)`; the store owns `uid`,
//! `resource_version`, and `creation_timestamp`.

use crate::constants;
use crate::error::StoreError;
use crate::models::record::CredentialRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

pub mod file;
pub mod logged;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMeta {
    pub name: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
    // Kept last: TOML tables must follow plain values.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub metadata: ResourceMeta,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl Resource {
    /// A new, not-yet-stored resource carrying the record's identity and payload.
    pub fn from_record(record: &CredentialRecord) -> Self {
        Self {
            metadata: ResourceMeta {
                name: record.name().to_string(),
                namespace: record.namespace().to_string(),
                labels: record.labels().clone(),
                ..Default::default()
            },
            data: record.payload().to_map(),
        }
    }

    pub fn is_same(&self, namespace: &str, name: &str) -> bool {
        self.metadata.namespace == namespace && self.metadata.name == name
    }
}

/// Point in time after which store calls fail with [`StoreError::Timeout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Instant);

impl Deadline {
    /// Deadline `timeout` from now, capped at `MAX_TIMEOUT_SECS`.
    pub fn after(timeout: Duration) -> Self {
        let timeout = timeout.min(Duration::from_secs(constants::MAX_TIMEOUT_SECS));
        let now = Instant::now();
        Self(now.checked_add(timeout).unwrap_or(now))
    }

    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    pub fn remaining(&self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.0
    }

    pub fn check(&self) -> Result<(), StoreError> {
        if self.is_expired() {
            return Err(StoreError::Timeout);
        }
        Ok(())
    }
}

/// Store addressing resources by namespace and name.
pub trait ResourceStore {
    /// Fetch a resource, `Ok(None)` when it does not exist.
    fn get(
        &self,
        namespace: &str,
        name: &str,
        deadline: Deadline,
    ) -> Result<Option<Resource>, StoreError>;

    /// Store a new resource. Fails with `AlreadyExists` if the identity is taken.
    fn create(&self, resource: Resource, deadline: Deadline) -> Result<Resource, StoreError>;

    /// Overwrite the labels and data of an existing resource.
    ///
    /// `resource.metadata.resource_version` must match the stored version,
    /// otherwise the call fails with `Conflict`.
    fn replace(&self, resource: Resource, deadline: Deadline) -> Result<Resource, StoreError>;
}
