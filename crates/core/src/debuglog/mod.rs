//! Append-only transcript of commands run in debug mode.
//!
//! Each command contributes one block: a timestamp line and the command line
//! when it starts, then the exit line, stdout and stderr once it closes. The
//! file is never read back by the tool itself.

mod service;
mod types;

pub use service::{DebugLog, DebugLogError};
pub use types::TranscriptEntry;
