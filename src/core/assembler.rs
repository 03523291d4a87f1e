//! Builds a [`CredentialRecord`] from optional credential sources.
//!
//! Grouped sources (`username`/`password`, `cert_file`/`key_file`) are written
//! only when the whole group is present. A partially supplied group is skipped
//! without error.

use crate::constants;
use crate::core::file_loader;
use crate::error::{FileKind, SecretError};
use crate::models::record::{self, CredentialRecord, Payload};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Optional inputs for the payload. Empty strings and paths count as absent.
#[derive(Debug, Clone, Default)]
pub struct CredentialSources {
    pub username: Option<String>,
    pub password: Option<String>,
    pub cert_file: Option<PathBuf>,
    pub key_file: Option<PathBuf>,
    pub ca_file: Option<PathBuf>,
}

/// Presence of a two-member source group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing<T> {
    Complete(T, T),
    Partial,
    Absent,
}

impl<T> Pairing<T> {
    fn of(first: Option<T>, second: Option<T>) -> Self {
        match (first, second) {
            (Some(a), Some(b)) => Pairing::Complete(a, b),
            (None, None) => Pairing::Absent,
            _ => Pairing::Partial,
        }
    }
}

impl CredentialSources {
    pub fn basic_auth(&self) -> Pairing<&str> {
        Pairing::of(non_empty(&self.username), non_empty(&self.password))
    }

    pub fn tls_pair(&self) -> Pairing<&Path> {
        Pairing::of(non_empty_path(&self.cert_file), non_empty_path(&self.key_file))
    }

    pub fn ca(&self) -> Option<&Path> {
        non_empty_path(&self.ca_file)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn non_empty_path(value: &Option<PathBuf>) -> Option<&Path> {
    value.as_deref().filter(|p| !p.as_os_str().is_empty())
}

/// Assemble a record, reading files from disk.
pub fn assemble(
    name: &str,
    namespace: &str,
    labels: BTreeMap<String, String>,
    sources: &CredentialSources,
) -> Result<CredentialRecord, SecretError> {
    assemble_with(name, namespace, labels, sources, file_loader::read_to_string)
}

/// Assemble a record using `load` for every file-backed source.
pub fn assemble_with<F>(
    name: &str,
    namespace: &str,
    labels: BTreeMap<String, String>,
    sources: &CredentialSources,
    mut load: F,
) -> Result<CredentialRecord, SecretError>
where
    F: FnMut(&Path) -> Result<String, SecretError>,
{
    // Identity is validated before any file is read.
    record::validate_identity(name, namespace)?;

    let mut payload = Payload::new();

    match sources.basic_auth() {
        Pairing::Complete(username, password) => {
            payload.insert(constants::KEY_USERNAME, username.to_string());
            payload.insert(constants::KEY_PASSWORD, password.to_string());
        }
        Pairing::Partial => debug!("username and password must be set together, skipping basic auth"),
        Pairing::Absent => {}
    }

    match sources.tls_pair() {
        Pairing::Complete(cert, key) => {
            debug!(cert = %cert.display(), key = %key.display(), "reading TLS client pair");
            let cert = load(cert).map_err(|e| e.with_kind(FileKind::Cert))?;
            payload.insert(constants::KEY_CERT_FILE, cert);
            let key = load(key).map_err(|e| e.with_kind(FileKind::Key))?;
            payload.insert(constants::KEY_KEY_FILE, key);
        }
        Pairing::Partial => debug!("cert-file and key-file must be set together, skipping TLS pair"),
        Pairing::Absent => {}
    }

    if let Some(ca) = sources.ca() {
        debug!(ca = %ca.display(), "reading CA file");
        let ca = load(ca).map_err(|e| e.with_kind(FileKind::Ca))?;
        payload.insert(constants::KEY_CA_FILE, ca);
    }

    CredentialRecord::new(name.to_string(), namespace.to_string(), labels, payload)
}
