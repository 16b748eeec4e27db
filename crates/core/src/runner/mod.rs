//! External command execution with configurable output visibility.
//!
//! [`CommandRunner`] spawns one command at a time through `sh -c`, captures
//! both output streams, optionally echoes them live and optionally erases the
//! echoed output once the command has closed.

mod console;
mod progress;
mod scrollback;
mod service;
mod types;

pub use console::{Console, TerminalConsole};
pub use progress::{ProgressIndicator, Spinner};
pub use scrollback::{normalize_line, row_count};
pub use service::CommandRunner;
pub use types::{CommandOptions, CommandResult};
