//! File-based locking using flock(2) for cross-process store access.

use crate::constants;
use crate::error::StoreError;
use crate::store::Deadline;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::thread;
use std::time::Duration;

/// An exclusive file lock. Released on drop (file close releases flock).
pub struct FileLock {
    _file: File,
}

impl FileLock {
    /// Try to acquire an exclusive lock without blocking.
    /// Returns `Ok(Some(lock))` if acquired, `Ok(None)` if already held.
    pub fn try_exclusive(path: &Path) -> Result<Option<Self>, StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(|e| StoreError::io(format!("open lock file {}", path.display()), e))?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self { _file: file })),
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            // fs2 on Linux may return Other instead of WouldBlock
            Err(ref e) if e.raw_os_error() == Some(11) => Ok(None), // EAGAIN
            Err(e) => Err(StoreError::io(format!("try lock {}", path.display()), e)),
        }
    }

    /// Acquire an exclusive lock, polling until `deadline` passes.
    pub fn exclusive_until(path: &Path, deadline: Deadline) -> Result<Self, StoreError> {
        let poll = Duration::from_millis(constants::LOCK_POLL_INTERVAL_MS);
        loop {
            if let Some(lock) = Self::try_exclusive(path)? {
                return Ok(lock);
            }
            let remaining = deadline.remaining();
            if remaining.is_zero() {
                return Err(StoreError::Timeout);
            }
            thread::sleep(poll.min(remaining));
        }
    }
}
