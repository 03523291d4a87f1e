//! Store path resolution and directory layout.

use crate::constants;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct StorePaths {
    pub root: PathBuf,
    pub store_toml: PathBuf,
    pub store_lock: PathBuf,
}

impl StorePaths {
    /// Resolve the store directory from CLI/env arg, config file, or default.
    pub fn resolve(root_arg: Option<PathBuf>, configured: Option<PathBuf>) -> Self {
        if let Some(root) = root_arg {
            return Self::from_root(root);
        }
        if let Some(root) = configured {
            return Self::from_root(root);
        }
        Self::from_root(PathBuf::from(constants::DEFAULT_STORE_DIR))
    }

    /// Create store paths from a root directory.
    pub fn from_root(root: PathBuf) -> Self {
        let store_toml = root.join("store.toml");
        let store_lock = root.join("store.lock");
        Self {
            root,
            store_toml,
            store_lock,
        }
    }
}

impl fmt::Display for StorePaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store@{}", self.root.display())
    }
}
