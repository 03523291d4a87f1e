//! Configuration file model.

use crate::core::export::ExportFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub defaults: DefaultsSection,
}

/// Fallbacks used when a flag and its env var are both unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsSection {
    /// Namespace for new secrets.
    #[serde(default)]
    pub namespace: Option<String>,

    /// Store deadline, as a duration string (e.g. "90s", "5m").
    #[serde(default)]
    pub timeout: Option<String>,

    /// Directory of the file-backed resource store.
    #[serde(default)]
    pub store_dir: Option<PathBuf>,

    #[serde(default)]
    pub export_format: Option<ExportFormat>,
}
