//! Dynamic shell completion for namespace names.
//!
//! Enabled through clap_complete's environment hook, e.g.
//! `source <(COMPLETE=bash provisio)`.

use clap_complete::engine::CompletionCandidate;
use provisio_core::config::{ConfigLoader, ResolvedConfig};
use provisio_core::macros::namespaces;
use std::ffi::OsStr;

/// Load the resolved config, returning None if it fails.
fn load_config() -> Option<ResolvedConfig> {
    ConfigLoader::load(None, None).ok()
}

/// Complete namespace names from the configured templates directory.
pub fn complete_namespaces(current: &OsStr) -> Vec<CompletionCandidate> {
    let current_str = current.to_str().unwrap_or("");

    let Some(cfg) = load_config() else {
        return Vec::new();
    };

    namespaces(&cfg.templates_dir)
        .into_iter()
        .filter(|name| name.starts_with(current_str))
        .map(CompletionCandidate::new)
        .collect()
}
