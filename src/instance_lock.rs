//! Single-instance guard
//!
//! An exclusive advisory lock on a file in the temp dir. The OS drops the lock
//! when the process exits, so a crashed instance never blocks the next launch.

use crate::error::InstanceError;
use log::{debug, info};
use std::fs::{File, OpenOptions, TryLockError};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct InstanceLock {
    path: PathBuf,
    // Held for the lifetime of the guard; closing it releases the lock
    file: File,
}

impl InstanceLock {
    /// Try to become the only running instance
    ///
    /// # Errors
    ///
    /// `InstanceError::AlreadyRunning` if another process holds the lock,
    /// `InstanceError::Io` if the lock file cannot be opened.
    pub fn acquire(path: impl AsRef<Path>) -> Result<Self, InstanceError> {
        let path = path.as_ref().to_path_buf();
        let io_err = |source| InstanceError::Io {
            path: path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(io_err)?;

        match file.try_lock() {
            Ok(()) => {}
            Err(TryLockError::WouldBlock) => {
                debug!("Lock file {} is held by another process", path.display());
                return Err(InstanceError::AlreadyRunning(path.clone()));
            }
            Err(TryLockError::Error(source)) => return Err(io_err(source)),
        }

        // PID is informational only
        file.set_len(0).map_err(io_err)?;
        writeln!(file, "{}", std::process::id()).map_err(io_err)?;

        info!("Acquired single-instance lock: {}", path.display());
        Ok(Self { path, file })
    }

    /// Acquire the lock at the standard location
    pub fn acquire_default() -> Result<Self, InstanceError> {
        Self::acquire(crate::platform::lock_file_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
        debug!("Released single-instance lock: {}", self.path.display());
    }
}
