//! TOML file-backed [`ResourceStore`].
//!
//! All resources live in `store.toml` under the store directory. Each call
//! holds an exclusive flock on `store.lock` for its whole read-modify-write,
//! and saves go through a temp file so readers never see a partial store.

use crate::constants;
use crate::core::file_lock::FileLock;
use crate::core::paths::StorePaths;
use crate::error::StoreError;
use crate::store::{Deadline, Resource, ResourceStore};
use crate::util::fs as store_fs;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    store: StoreSection,
    #[serde(default)]
    resources: Vec<Resource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreSection {
    #[serde(default = "default_version")]
    version: u32,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            version: default_version(),
        }
    }
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone)]
pub struct FileStore {
    paths: StorePaths,
}

impl FileStore {
    pub fn new(paths: StorePaths) -> Self {
        Self { paths }
    }

    fn lock(&self, deadline: Deadline) -> Result<FileLock, StoreError> {
        deadline.check()?;
        store_fs::ensure_dir(&self.paths.root, constants::STORE_DIR_MODE)?;
        FileLock::exclusive_until(&self.paths.store_lock, deadline)
    }
}

impl ResourceStore for FileStore {
    fn get(
        &self,
        namespace: &str,
        name: &str,
        deadline: Deadline,
    ) -> Result<Option<Resource>, StoreError> {
        let _lock = self.lock(deadline)?;
        let store = load(&self.paths.store_toml)?;
        Ok(store
            .resources
            .into_iter()
            .find(|r| r.is_same(namespace, name)))
    }

    fn create(&self, mut resource: Resource, deadline: Deadline) -> Result<Resource, StoreError> {
        let _lock = self.lock(deadline)?;
        let mut store = load(&self.paths.store_toml)?;
        let meta = &resource.metadata;
        if store
            .resources
            .iter()
            .any(|r| r.is_same(&meta.namespace, &meta.name))
        {
            return Err(StoreError::AlreadyExists);
        }

        resource.metadata.uid = Some(Uuid::new_v4().to_string());
        resource.metadata.resource_version = Some(1);
        resource.metadata.creation_timestamp = Some(Utc::now());
        store.resources.push(resource.clone());
        store.resources.sort_by(|a, b| {
            (&a.metadata.namespace, &a.metadata.name).cmp(&(&b.metadata.namespace, &b.metadata.name))
        });

        deadline.check()?;
        save(&self.paths.store_toml, &store)?;
        Ok(resource)
    }

    fn replace(&self, resource: Resource, deadline: Deadline) -> Result<Resource, StoreError> {
        let _lock = self.lock(deadline)?;
        let mut store = load(&self.paths.store_toml)?;
        let meta = &resource.metadata;
        let existing = store
            .resources
            .iter_mut()
            .find(|r| r.is_same(&meta.namespace, &meta.name))
            .ok_or(StoreError::NotFound)?;

        let current = existing.metadata.resource_version.unwrap_or(0);
        if let Some(expected) = meta.resource_version {
            if expected != current {
                return Err(StoreError::Conflict { expected, current });
            }
        }

        existing.metadata.labels = resource.metadata.labels;
        existing.data = resource.data;
        existing.metadata.resource_version = Some(current + 1);
        let updated = existing.clone();

        deadline.check()?;
        save(&self.paths.store_toml, &store)?;
        Ok(updated)
    }
}

fn load(path: &Path) -> Result<StoreFile, StoreError> {
    if !path.exists() {
        return Ok(StoreFile::default());
    }
    let content = fs::read_to_string(path)
        .map_err(|e| StoreError::io(format!("read store {}", path.display()), e))?;
    toml::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn save(path: &Path, store: &StoreFile) -> Result<(), StoreError> {
    let content = toml::to_string_pretty(store)?;
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| StoreError::io("create temp store", e))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| StoreError::io("write store", e))?;
    tmp.flush().ok();
    store_fs::set_permissions(tmp.path(), constants::STORE_FILE_MODE)?;
    tmp.persist(path)
        .map_err(|err| StoreError::io(format!("persist store {}", path.display()), err.error))?;
    Ok(())
}
