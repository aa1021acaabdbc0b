//! Append-only audit trail of command invocations.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::CommandError;

use super::entry::AuditEntry;

/// Writes one [`AuditEntry`] per line to the configured audit log.
///
/// Shared by every session of a dispatcher. Each entry is encoded before
/// the file lock is taken and written with a single call, so lines from
/// concurrent invocations never interleave.
pub struct AuditLogger {
    file: Mutex<File>,
    path: PathBuf,
    written: AtomicU64,
}

impl AuditLogger {
    /// Open the audit log at `path` for appending.
    ///
    /// Earlier entries are kept; missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Io`] if the directory cannot be created or
    /// the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, CommandError> {
        let path = path.as_ref();
        match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
                debug!(path = %dir.display(), "Creating audit log directory");
                std::fs::create_dir_all(dir)?;
            }
            _ => {}
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        debug!(path = %path.display(), "Audit log opened");

        Ok(Self {
            file: Mutex::new(file),
            path: path.to_path_buf(),
            written: AtomicU64::new(0),
        })
    }

    /// Append the record of one invocation.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Serialization`] if the entry cannot be
    /// encoded, or [`CommandError::Io`] if the write fails. A failed flush
    /// is only logged.
    pub fn log(&self, entry: &AuditEntry) -> Result<(), CommandError> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        file.write_all(&line)?;
        if let Err(e) = file.flush() {
            warn!(error = %e, invocation = %entry.invocation_id, "Failed to flush audit log");
        }

        self.written.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Number of entries appended through this logger.
    pub fn entries_written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
