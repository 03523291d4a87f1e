//! Create-or-replace reconciliation of a record against a [`ResourceStore`].

use crate::error::{Operation, SecretError, StoreError};
use crate::models::record::CredentialRecord;
use crate::store::{Deadline, Resource, ResourceStore};
use tracing::info;

/// Terminal state of a successful upsert, with the stored resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(Resource),
    Updated(Resource),
}

impl UpsertOutcome {
    pub fn verb(&self) -> &'static str {
        match self {
            UpsertOutcome::Created(_) => "created",
            UpsertOutcome::Updated(_) => "updated",
        }
    }

    pub fn resource(&self) -> &Resource {
        match self {
            UpsertOutcome::Created(r) | UpsertOutcome::Updated(r) => r,
        }
    }
}

/// Make the store hold `record`: create it if absent, otherwise replace the
/// existing resource's labels and payload. Each store call is made at most
/// once; failures are never retried.
pub fn upsert<S: ResourceStore + ?Sized>(
    store: &S,
    record: &CredentialRecord,
    deadline: Deadline,
) -> Result<UpsertOutcome, SecretError> {
    let namespace = record.namespace();
    let name = record.name();
    let fail = |operation: Operation| {
        move |source: StoreError| SecretError::Upsert {
            operation,
            namespace: namespace.to_string(),
            name: name.to_string(),
            source,
        }
    };

    let existing = store
        .get(namespace, name, deadline)
        .map_err(fail(Operation::Lookup))?;

    let outcome = match existing {
        None => {
            let created = store
                .create(Resource::from_record(record), deadline)
                .map_err(fail(Operation::Create))?;
            UpsertOutcome::Created(created)
        }
        Some(mut current) => {
            current.metadata.labels = record.labels().clone();
            current.data = record.payload().to_map();
            let updated = store
                .replace(current, deadline)
                .map_err(fail(Operation::Replace))?;
            UpsertOutcome::Updated(updated)
        }
    };

    info!(
        namespace,
        name,
        outcome = outcome.verb(),
        resource_version = ?outcome.resource().metadata.resource_version,
        "secret reconciled"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assembler::{assemble_with, CredentialSources};
    use crate::core::paths::StorePaths;
    use crate::store::file::FileStore;
    use std::cell::Cell;
    use std::collections::BTreeMap;
    use std::path::Path;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn record(user: &str, password: &str) -> CredentialRecord {
        let sources = CredentialSources {
            username: Some(user.into()),
            password: Some(password.into()),
            ..Default::default()
        };
        let mut labels = BTreeMap::new();
        labels.insert("app".into(), "charts".into());
        assemble_with("repo-auth", "flux-system", labels, &sources, |_: &Path| {
            unreachable!()
        })
        .unwrap()
    }

    fn deadline() -> Deadline {
        Deadline::after(Duration::from_secs(10))
    }

    #[test]
    fn test_created_then_updated() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(StorePaths::from_root(dir.path().to_path_buf()));
        let rec = record("bot", "pw");

        let first = upsert(&store, &rec, deadline()).unwrap();
        assert!(matches!(first, UpsertOutcome::Created(_)));
        let stored = store.get("flux-system", "repo-auth", deadline()).unwrap().unwrap();
        assert_eq!(stored.data, rec.payload().to_map());

        let second = upsert(&store, &rec, deadline()).unwrap();
        assert!(matches!(second, UpsertOutcome::Updated(_)));
        assert_eq!(second.verb(), "updated");
        let stored = store.get("flux-system", "repo-auth", deadline()).unwrap().unwrap();
        assert_eq!(stored.data, rec.payload().to_map());
        assert_eq!(stored.metadata.uid, first.resource().metadata.uid);
    }

    #[test]
    fn test_update_replaces_payload_and_labels() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(StorePaths::from_root(dir.path().to_path_buf()));
        upsert(&store, &record("bot", "old"), deadline()).unwrap();

        let rec = assemble_with(
            "repo-auth",
            "flux-system",
            BTreeMap::new(),
            &CredentialSources::default(),
            |_: &Path| unreachable!(),
        )
        .unwrap();
        let outcome = upsert(&store, &rec, deadline()).unwrap();
        assert!(outcome.resource().data.is_empty());
        assert!(outcome.resource().metadata.labels.is_empty());
    }

    /// Store whose replace always loses an optimistic-concurrency race.
    #[derive(Default)]
    struct ConflictingStore {
        creates: Cell<u32>,
        replaces: Cell<u32>,
    }

    impl ResourceStore for ConflictingStore {
        fn get(&self, namespace: &str, name: &str, _: Deadline) -> Result<Option<Resource>, StoreError> {
            let mut r = Resource::default();
            r.metadata.namespace = namespace.into();
            r.metadata.name = name.into();
            r.metadata.resource_version = Some(7);
            Ok(Some(r))
        }

        fn create(&self, resource: Resource, _: Deadline) -> Result<Resource, StoreError> {
            self.creates.set(self.creates.get() + 1);
            Ok(resource)
        }

        fn replace(&self, _: Resource, _: Deadline) -> Result<Resource, StoreError> {
            self.replaces.set(self.replaces.get() + 1);
            Err(StoreError::Conflict {
                expected: 7,
                current: 8,
            })
        }
    }

    #[test]
    fn test_replace_conflict_surfaces_without_create() {
        let store = ConflictingStore::default();
        let err = upsert(&store, &record("bot", "pw"), deadline()).unwrap_err();
        match err {
            SecretError::Upsert {
                operation,
                namespace,
                name,
                source,
            } => {
                assert_eq!(operation, Operation::Replace);
                assert_eq!(namespace, "flux-system");
                assert_eq!(name, "repo-auth");
                assert!(matches!(source, StoreError::Conflict { .. }));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store.creates.get(), 0);
        assert_eq!(store.replaces.get(), 1);
    }

    /// Store that never holds anything; `create` answers with `create_result`.
    struct EmptyStore {
        create_result: fn(Resource) -> Result<Resource, StoreError>,
        gets: Cell<u32>,
        creates: Cell<u32>,
        replaces: Cell<u32>,
    }

    impl EmptyStore {
        fn new(create_result: fn(Resource) -> Result<Resource, StoreError>) -> Self {
            Self {
                create_result,
                gets: Cell::new(0),
                creates: Cell::new(0),
                replaces: Cell::new(0),
            }
        }
    }

    impl ResourceStore for EmptyStore {
        fn get(&self, _: &str, _: &str, _: Deadline) -> Result<Option<Resource>, StoreError> {
            self.gets.set(self.gets.get() + 1);
            Ok(None)
        }

        fn create(&self, resource: Resource, _: Deadline) -> Result<Resource, StoreError> {
            self.creates.set(self.creates.get() + 1);
            (self.create_result)(resource)
        }

        fn replace(&self, resource: Resource, _: Deadline) -> Result<Resource, StoreError> {
            self.replaces.set(self.replaces.get() + 1);
            Ok(resource)
        }
    }

    #[test]
    fn test_absent_resource_is_looked_up_then_created() {
        let store = EmptyStore::new(Ok);
        let rec = record("bot", "pw");
        let outcome = upsert(&store, &rec, deadline()).unwrap();
        match &outcome {
            UpsertOutcome::Created(r) => {
                assert!(r.is_same("flux-system", "repo-auth"));
                assert_eq!(r.data, rec.payload().to_map());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(outcome.verb(), "created");
        assert_eq!(store.gets.get(), 1);
        assert_eq!(store.creates.get(), 1);
        assert_eq!(store.replaces.get(), 0);
    }

    #[test]
    fn test_create_failure_surfaces_without_replace() {
        let store = EmptyStore::new(|_| Err(StoreError::AlreadyExists));
        let err = upsert(&store, &record("bot", "pw"), deadline()).unwrap_err();
        assert!(matches!(
            err,
            SecretError::Upsert {
                operation: Operation::Create,
                source: StoreError::AlreadyExists,
                ..
            }
        ));
        assert!(err.to_string().starts_with("create secret 'flux-system/repo-auth' failed"));
        assert_eq!(store.gets.get(), 1);
        assert_eq!(store.creates.get(), 1);
        assert_eq!(store.replaces.get(), 0);
    }

    #[test]
    fn test_lookup_timeout_is_lookup_error() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(StorePaths::from_root(dir.path().to_path_buf()));
        let err = upsert(&store, &record("bot", "pw"), Deadline::at(Instant::now())).unwrap_err();
        assert!(matches!(
            err,
            SecretError::Upsert {
                operation: Operation::Lookup,
                source: StoreError::Timeout,
                ..
            }
        ));
    }

    #[test]
    fn test_works_through_trait_object() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(StorePaths::from_root(dir.path().to_path_buf()));
        let dyn_store: &dyn ResourceStore = &store;
        let outcome = upsert(dyn_store, &record("bot", "pw"), deadline()).unwrap();
        assert_eq!(outcome.verb(), "created");
    }
}
