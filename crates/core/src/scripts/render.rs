use std::collections::BTreeMap;

use crate::macros::macro_matches;

/// Replace each `{name}` with its value.
///
/// `${name}` is left alone, as are names without a value.
pub fn substitute_macros(text: &str, values: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for (span, name) in macro_matches(text) {
        let Some(value) = values.get(name) else {
            continue;
        };
        out.push_str(&text[last..span.start]);
        out.push_str(value);
        last = span.end;
    }

    out.push_str(&text[last..]);
    out
}
