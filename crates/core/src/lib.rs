//! Core library for provisio.
//!
//! Two mechanisms carry the logic of the tool:
//! - [`runner::CommandRunner`] runs one external command with configurable
//!   echoing, scrollback erasure and a debug transcript.
//! - [`macros::MacroResolver`] discovers `{name}` macros in query files and
//!   backfills only the ones missing from the answer cache.

pub mod answers;
pub mod config;
pub mod debuglog;
pub mod macros;
pub mod questions;
pub mod runner;
pub mod scripts;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
