//! Error types for secret assembly, export, and store reconciliation.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::export::ExportFormat;

/// Errors produced while building, exporting, or upserting a secret.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("invalid label '{label}': {reason}")]
    MalformedLabel { label: String, reason: String },

    #[error("failed to read {kind} '{}': {source}", .path.display())]
    FileRead {
        kind: FileKind,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write exported secret: {0}")]
    Write(#[source] io::Error),

    #[error("failed to parse {format} document: {reason}")]
    Parse { format: ExportFormat, reason: String },

    #[error("invalid secret {field}: {reason}")]
    InvalidName { field: &'static str, reason: String },

    #[error("{operation} secret '{namespace}/{name}' failed: {source}")]
    Upsert {
        operation: Operation,
        namespace: String,
        name: String,
        #[source]
        source: StoreError,
    },
}

impl SecretError {
    pub fn malformed_label(label: &str, reason: impl Into<String>) -> Self {
        Self::MalformedLabel {
            label: label.to_string(),
            reason: reason.into(),
        }
    }

    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            kind: FileKind::Other,
            path: path.into(),
            source,
        }
    }

    /// Tag a `FileRead` error with the credential source it came from.
    pub fn with_kind(self, kind: FileKind) -> Self {
        match self {
            Self::FileRead { path, source, .. } => Self::FileRead { kind, path, source },
            other => other,
        }
    }
}

/// Which credential source a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Cert,
    Key,
    Ca,
    Other,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Cert => f.write_str("repository cert file"),
            FileKind::Key => f.write_str("repository key file"),
            FileKind::Ca => f.write_str("repository CA file"),
            FileKind::Other => f.write_str("file"),
        }
    }
}

/// Store call made by the upsert engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Lookup,
    Create,
    Replace,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Lookup => "lookup",
            Operation::Create => "create",
            Operation::Replace => "replace",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures reported by a [`ResourceStore`](crate::store::ResourceStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("resource already exists")]
    AlreadyExists,

    #[error("resource not found")]
    NotFound,

    #[error("conflict: resource version {expected} is stale (current {current})")]
    Conflict { expected: u64, current: u64 },

    #[error("deadline exceeded")]
    Timeout,

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("parse store {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("serialize store: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl StoreError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_error_names_operation_and_resource() {
        let err = SecretError::Upsert {
            operation: Operation::Replace,
            namespace: "flux-system".into(),
            name: "repo-auth".into(),
            source: StoreError::Conflict {
                expected: 1,
                current: 2,
            },
        };
        let msg = err.to_string();
        assert!(msg.starts_with("replace secret 'flux-system/repo-auth' failed"));
        assert!(msg.contains("stale"));
    }

    #[test]
    fn test_file_read_error_includes_path() {
        let err = SecretError::file_read(
            "/tmp/missing.crt",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(
            err.to_string(),
            "failed to read file '/tmp/missing.crt': no such file"
        );
        let err = err.with_kind(FileKind::Cert);
        assert!(err
            .to_string()
            .starts_with("failed to read repository cert file '/tmp/missing.crt'"));
    }
}
