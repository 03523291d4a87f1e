//! Tracing decorator for any [`ResourceStore`].

use crate::error::StoreError;
use crate::store::{Deadline, Resource, ResourceStore};
use std::time::Instant;
use tracing::debug;

/// Wraps a store and logs every call with its outcome and latency.
pub struct Logged<S> {
    inner: S,
}

impl<S: ResourceStore> Logged<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

fn outcome<T>(result: &Result<T, StoreError>) -> String {
    match result {
        Ok(_) => "ok".to_string(),
        Err(e) => e.to_string(),
    }
}

impl<S: ResourceStore> ResourceStore for Logged<S> {
    fn get(
        &self,
        namespace: &str,
        name: &str,
        deadline: Deadline,
    ) -> Result<Option<Resource>, StoreError> {
        let started = Instant::now();
        let result = self.inner.get(namespace, name, deadline);
        debug!(
            op = "get",
            namespace,
            name,
            found = matches!(result, Ok(Some(_))),
            elapsed_ms = started.elapsed().as_millis() as u64,
            result = %outcome(&result),
            "store call"
        );
        result
    }

    fn create(&self, resource: Resource, deadline: Deadline) -> Result<Resource, StoreError> {
        let namespace = resource.metadata.namespace.clone();
        let name = resource.metadata.name.clone();
        let started = Instant::now();
        let result = self.inner.create(resource, deadline);
        debug!(
            op = "create",
            namespace = %namespace,
            name = %name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            result = %outcome(&result),
            "store call"
        );
        result
    }

    fn replace(&self, resource: Resource, deadline: Deadline) -> Result<Resource, StoreError> {
        let namespace = resource.metadata.namespace.clone();
        let name = resource.metadata.name.clone();
        let version = resource.metadata.resource_version;
        let started = Instant::now();
        let result = self.inner.replace(resource, deadline);
        debug!(
            op = "replace",
            namespace = %namespace,
            name = %name,
            resource_version = ?version,
            elapsed_ms = started.elapsed().as_millis() as u64,
            result = %outcome(&result),
            "store call"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::paths::StorePaths;
    use crate::store::file::FileStore;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_forwards_calls_unchanged() {
        let dir = TempDir::new().unwrap();
        let store = Logged::new(FileStore::new(StorePaths::from_root(dir.path().to_path_buf())));
        let deadline = Deadline::after(Duration::from_secs(10));

        let mut resource = Resource::default();
        resource.metadata.namespace = "ns".into();
        resource.metadata.name = "a".into();
        let created = store.create(resource.clone(), deadline).unwrap();
        assert_eq!(store.get("ns", "a", deadline).unwrap(), Some(created));
        assert!(matches!(
            store.create(resource, deadline),
            Err(StoreError::AlreadyExists)
        ));

        let direct = FileStore::new(StorePaths::from_root(dir.path().to_path_buf()));
        assert!(direct.get("ns", "a", deadline).unwrap().is_some());
    }
}
