//! Plain-text source excerpts for error messages.
//!
//! ```text
//!   1 | 2014-05-05 * "Cafe Mogador"
//! > 2 |   Liabilities:CreditCard  -37.45
//!     |                                 ^
//!   3 |   Expenses:Food
//! ```

use std::fmt::Write as _;

/// Render `before` lines of context above `line`, the line itself with a
/// caret under `column`, and `after` lines below.
///
/// Lines and columns are 1-based; a line past the end of the buffer renders
/// as empty.
pub fn render_snippet(source: &[u8], line: usize, column: usize, before: usize, after: usize) -> String {
    let lines: Vec<&[u8]> = source.split(|b| *b == b'\n').collect();
    let line = line.max(1);
    let first = line.saturating_sub(before).max(1);
    let last = (line + after).min(lines.len()).max(line);
    let width = last.to_string().len();

    let mut out = String::new();
    for number in first..=last {
        let text = line_text(&lines, number);
        let marker = if number == line { '>' } else { ' ' };
        let _ = writeln!(out, "{marker} {number:>width$} | {text}");
        if number == line {
            let _ = writeln!(out, "  {:width$} | {}^", "", caret_padding(&text, column));
        }
    }
    out
}

fn line_text(lines: &[&[u8]], number: usize) -> String {
    lines.get(number - 1).map_or_else(String::new, |bytes| {
        let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
        String::from_utf8_lossy(bytes).into_owned()
    })
}

/// Whitespace reaching `column`, keeping tabs so the caret lines up.
fn caret_padding(text: &str, column: usize) -> String {
    let mut chars = text.chars();
    (1..column)
        .map(|_| match chars.next() {
            Some('\t') => '\t',
            _ => ' ',
        })
        .collect()
}
