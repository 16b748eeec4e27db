//! Transcript entry types.

use std::fmt;

use chrono::{DateTime, Utc};

/// One piece of a command's transcript block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    /// Written before the process is spawned.
    Started { ts: DateTime<Utc>, command: String },
    /// Written after the process has closed.
    Finished { exit_code: i32, stdout: String, stderr: String },
}

impl TranscriptEntry {
    pub fn started(command: impl Into<String>) -> Self {
        Self::Started { ts: Utc::now(), command: command.into() }
    }

    pub fn finished(
        exit_code: i32,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::Finished { exit_code, stdout: stdout.into(), stderr: stderr.into() }
    }
}

impl fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptEntry::Started { ts, command } => {
                writeln!(f, "[{}]", ts.to_rfc3339())?;
                writeln!(f, "$ {command}")
            }
            TranscriptEntry::Finished { exit_code, stdout, stderr } => {
                writeln!(f, "exit code: {exit_code}")?;
                writeln!(f, "stdout:")?;
                write_section(f, stdout)?;
                writeln!(f, "stderr:")?;
                write_section(f, stderr)?;
                writeln!(f)
            }
        }
    }
}

fn write_section(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    if text.is_empty() {
        return Ok(());
    }
    if text.ends_with('\n') { write!(f, "{text}") } else { writeln!(f, "{text}") }
}
