//! Debug log file writer.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::TranscriptEntry;

#[derive(Debug, Error)]
pub enum DebugLogError {
    #[error("failed to write debug log {0}: {1}")]
    WriteError(String, #[source] std::io::Error),
}

type Result<T> = std::result::Result<T, DebugLogError>;

/// Appends transcript entries to a text file.
#[derive(Debug, Clone)]
pub struct DebugLog {
    path: PathBuf,
}

impl DebugLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, creating the file and its parent directory on first use.
    pub fn append(&self, entry: &TranscriptEntry) -> Result<()> {
        let err = |e| DebugLogError::WriteError(self.path.display().to_string(), e);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(err)?;
        }

        let mut file =
            OpenOptions::new().create(true).append(true).open(&self.path).map_err(err)?;

        write!(file, "{entry}").map_err(err)?;
        Ok(())
    }

    /// Append without surfacing failures; a broken log must not break a run.
    pub fn record(&self, entry: &TranscriptEntry) {
        if let Err(e) = self.append(entry) {
            tracing::warn!("{e}");
        }
    }
}
