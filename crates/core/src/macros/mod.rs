//! Placeholder discovery and answer-caching resolution.
//!
//! Discovery runs in two stages: [`QueryFiles`] enumerates candidate files and
//! [`scan_macros`] extracts `{name}` tokens from one file's text.
//! [`MacroResolver`] combines them and fills in only the names missing from
//! the answer cache.

mod discovery;
mod resolver;
mod scanner;

pub use discovery::{QueryFiles, namespaces};
pub use resolver::{MacroResolver, PlaceholderSet};
pub use scanner::{MacroScanner, scan_macros, strip_function_blocks};
pub(crate) use scanner::macro_matches;
