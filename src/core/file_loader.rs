//! Whole-file reads for credential sources.

use crate::error::SecretError;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Read the full contents of `path` as UTF-8 text.
///
/// The file handle lives only for the duration of the call.
pub fn read_to_string(path: &Path) -> Result<String, SecretError> {
    let mut file = File::open(path).map_err(|e| SecretError::file_read(path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| SecretError::file_read(path, e))?;
    String::from_utf8(bytes).map_err(|e| {
        SecretError::file_read(path, io::Error::new(io::ErrorKind::InvalidData, e))
    })
}
