// src/parse/tokenizer.rs

use std::mem;

/// Trim surrounding whitespace, including a stray byte-order mark.
/// U+0085 (NEL) is kept: it is not whitespace for a JavaScript-style trim.
pub fn trim_field(raw: &str) -> &str {
    raw.trim_matches(|c: char| (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}')
}

/// Split CSV text into rows of trimmed fields in a single pass.
///
/// - `,` ends a field; `\n`, `\r\n` or a bare `\r` ends a row.
/// - `"` toggles quote mode wherever it appears; inside quotes `""` is a
///   literal quote and delimiters are plain text.
/// - Every line break emits a row, so a blank line becomes `[""]`.
/// - Unterminated input is flushed at the end if anything is buffered.
///
/// There is no rejection path: unbalanced quotes just swallow the rest of
/// the input into the current field.
pub fn tokenize(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    cell.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' | '\n' | '\r' if !in_quotes => {
                row.push(trim_field(&cell).to_string());
                cell.clear();
                if ch == ',' {
                    continue;
                }
                rows.push(mem::take(&mut row));
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            _ => cell.push(ch),
        }
    }

    // raw buffer length, not trimmed: trailing whitespace still flushes a row
    if !cell.is_empty() || !row.is_empty() {
        row.push(trim_field(&cell).to_string());
        rows.push(row);
    }

    rows
}
