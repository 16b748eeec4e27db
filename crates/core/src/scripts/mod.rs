//! Rendering resolved query files into runnable provisioning scripts.

mod builder;
mod render;

pub use builder::{ScriptBuilder, ScriptError, shell_quote, write_script};
pub use render::substitute_macros;
