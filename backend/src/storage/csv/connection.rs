//! CSV storage connection.
//!
//! Holds the base data directory all repositories write under, plus a shared
//! write lock. Check-then-act sequences (propose, accept, settle) run under
//! the lock so that the "at most one active share per appointment" invariant
//! is enforced at the storage layer rather than by racy application checks.

use anyhow::Result;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvConnection {
    /// Create a new connection rooted at the given data directory.
    /// The directory is created if it does not exist.
    pub fn new(base_directory: impl AsRef<Path>) -> Result<Self> {
        let base_directory = base_directory.as_ref().to_path_buf();
        if !base_directory.exists() {
            fs::create_dir_all(&base_directory)?;
            debug!("Created data directory: {:?}", base_directory);
        }
        Ok(Self {
            base_directory,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of a CSV file under the data directory
    pub fn file_path(&self, file_name: &str) -> PathBuf {
        self.base_directory.join(file_name)
    }

    /// Acquire the connection-wide write lock.
    ///
    /// All read-modify-write sequences that span a check and a write must hold
    /// this guard for their whole duration. A poisoned lock is recovered - the
    /// underlying CSV files are only ever replaced atomically, so a panicked
    /// holder cannot leave a half-written file behind.
    pub fn write_lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
