//! Extraction of `{name}` macros from query text.

use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

static MACRO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]+)\}").expect("valid regex"));

/// Unescaped `{name}` tokens in `text`, as the full token span and the name.
///
/// A `{` directly after `$` never opens a macro, but a later `{` inside the
/// skipped span still can: `${a {b}` yields `b`.
pub(crate) fn macro_matches(text: &str) -> MacroMatches<'_> {
    MacroMatches { text, at: 0 }
}

pub(crate) struct MacroMatches<'t> {
    text: &'t str,
    at: usize,
}

impl<'t> Iterator for MacroMatches<'t> {
    type Item = (Range<usize>, &'t str);

    fn next(&mut self) -> Option<Self::Item> {
        while self.at < self.text.len() {
            let caps = MACRO_RE.captures_at(self.text, self.at)?;
            let (whole, name) = (caps.get(0)?, caps.get(1)?);
            if whole.start() > 0 && self.text.as_bytes()[whole.start() - 1] == b'$' {
                // `{` is one byte, so this stays on a char boundary.
                self.at = whole.start() + 1;
                continue;
            }
            self.at = whole.end();
            return Some((whole.range(), name.as_str()));
        }
        None
    }
}

/// Finds user-facing macros in query text.
#[derive(Debug, Clone)]
pub struct MacroScanner {
    marker: Regex,
}

impl MacroScanner {
    /// `functions_marker` is matched case-insensitively as a literal.
    pub fn new(functions_marker: &str) -> Self {
        let marker = RegexBuilder::new(&regex::escape(functions_marker))
            .case_insensitive(true)
            .build()
            .expect("escaped literal is a valid regex");
        Self { marker }
    }

    /// Text before the first functions marker, or all of it when there is none.
    pub fn strip_function_blocks<'a>(&self, text: &'a str) -> &'a str {
        match self.marker.find(text) {
            Some(m) => &text[..m.start()],
            None => text,
        }
    }

    /// Collect macro names into `into`, skipping `${...}` and function blocks.
    pub fn scan_into(&self, text: &str, into: &mut BTreeSet<String>) {
        let text = self.strip_function_blocks(text);
        into.extend(macro_matches(text).map(|(_, name)| name.to_string()));
    }

    pub fn scan(&self, text: &str) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.scan_into(text, &mut names);
        names
    }
}

/// Macro names in `text` using `functions_marker` as the cut-off.
pub fn scan_macros(text: &str, functions_marker: &str) -> BTreeSet<String> {
    MacroScanner::new(functions_marker).scan(text)
}

/// Text before the first (case-insensitive) `functions_marker`.
pub fn strip_function_blocks<'a>(text: &'a str, functions_marker: &str) -> &'a str {
    MacroScanner::new(functions_marker).strip_function_blocks(text)
}
