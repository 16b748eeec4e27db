//! Terminal row arithmetic for erasing echoed output.

/// Collapse carriage-return overwrites to the text a terminal ends up showing.
pub fn normalize_line(line: &str) -> &str {
    match line.rfind('\r') {
        Some(idx) => &line[idx + 1..],
        None => line,
    }
}

/// Number of terminal rows occupied by `text` at the given width.
///
/// Every line, including a trailing empty one, takes `len / width + 1` rows.
pub fn row_count(text: &str, width: u16) -> usize {
    let width = usize::from(width.max(1));
    text.split('\n').map(|line| normalize_line(line).chars().count() / width + 1).sum()
}
