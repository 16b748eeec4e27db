//! Resolution of discovered macros against the answer cache.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::discovery::QueryFiles;
use super::scanner::MacroScanner;
use crate::answers::{AnswerCache, MacroValues};
use crate::config::types::MacroConfig;
use crate::questions::{PromptError, Prompter, Question};

/// Unique macro names found in a directory.
pub type PlaceholderSet = BTreeSet<String>;

/// Discovers macros in query directories and asks only for the missing ones.
pub struct MacroResolver {
    extension: String,
    scanner: MacroScanner,
    prompter: Arc<dyn Prompter>,
}

impl MacroResolver {
    pub fn new(config: &MacroConfig, prompter: Arc<dyn Prompter>) -> Self {
        Self {
            extension: config.extension.clone(),
            scanner: MacroScanner::new(&config.functions_marker),
            prompter,
        }
    }

    /// Collect the macros used by every query file under `dir`.
    pub fn discover(&self, dir: &Path) -> PlaceholderSet {
        let mut names = PlaceholderSet::new();
        for path in QueryFiles::new(dir, &self.extension).iter() {
            match fs::read_to_string(&path) {
                Ok(text) => self.scanner.scan_into(&text, &mut names),
                Err(e) => tracing::warn!("skipping unreadable {}: {e}", path.display()),
            }
        }
        tracing::debug!(dir = %dir.display(), ?names, "discovered macros");
        names
    }

    /// Resolve every macro under `dir` for `namespace`.
    ///
    /// Names already in `cache[namespace]` are reused; the rest are asked in a
    /// single prompt round-trip and merged into the cache. Returns the
    /// namespace's full mapping, or an empty one when `dir` has no macros.
    pub async fn resolve(
        &self,
        dir: &Path,
        cache: &mut AnswerCache,
        namespace: &str,
    ) -> Result<MacroValues, PromptError> {
        let placeholders = self.discover(dir);
        if placeholders.is_empty() {
            return Ok(MacroValues::new());
        }

        let cached = cache.get(namespace);
        let missing: Vec<&String> = placeholders
            .iter()
            .filter(|name| cached.is_none_or(|values| !values.contains_key(*name)))
            .collect();

        if !missing.is_empty() {
            tracing::info!("Resolving macros from {}", dir.display());
            let questions: Vec<Question> =
                missing.iter().map(|name| Question::text(name.as_str())).collect();
            let answers = self.prompter.prompt_many(&questions).await?;

            let values = cache.entry(namespace.to_string()).or_default();
            for (name, answer) in answers {
                values.entry(name).or_insert_with(|| answer.to_string());
            }
        }

        Ok(cache.get(namespace).cloned().unwrap_or_default())
    }
}
