//! Answer cache and its JSON file form.
//!
//! The cache maps a namespace (one per query directory) to the macro values
//! given for it. It lives for one run; the file form lets a later run start
//! from previously given answers.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Resolved macro values for one namespace.
pub type MacroValues = BTreeMap<String, String>;

/// Namespace -> macro name -> value.
pub type AnswerCache = BTreeMap<String, MacroValues>;

#[derive(Debug, Error)]
pub enum AnswerFileError {
    #[error("failed to read answers file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse answers file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize answers: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write answers file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Persisted answers: the macro cache plus any other collected answers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerFile {
    #[serde(default)]
    pub macros: AnswerCache,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl AnswerFile {
    pub fn load(path: &Path) -> Result<Self, AnswerFileError> {
        let s = fs::read_to_string(path)
            .map_err(|source| AnswerFileError::Read { path: path.to_path_buf(), source })?;
        serde_json::from_str(&s)
            .map_err(|source| AnswerFileError::Parse { path: path.to_path_buf(), source })
    }

    /// Write as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), AnswerFileError> {
        let write_err =
            |source| AnswerFileError::Write { path: path.to_path_buf(), source };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(AnswerFileError::Serialize)?;
        fs::write(path, json + "\n").map_err(write_err)
    }

    /// Record a non-macro answer.
    pub fn set_extra(&mut self, key: impl Into<String>, value: impl Serialize) {
        if let Ok(v) = serde_json::to_value(value) {
            self.extra.insert(key.into(), v);
        }
    }
}
