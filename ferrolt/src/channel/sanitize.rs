//! Terminal output cleanup.
//!
//! Output captured from an OLT CLI session is written for a terminal: it
//! carries ANSI cursor sequences, carriage returns, backspaces and the
//! Huawei `---- More ( Press 'Q' to break ) ----` pager prompt. The parsers
//! tolerate most of this, but a cursor sequence in front of a label breaks
//! anchored matching, so raw payloads are cleaned before parsing.

use std::sync::LazyLock;

use log::trace;
use regex::Regex;

static PAGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-+\s*More\s*\([^)]*\)\s*-+[ \t]*").expect("pager pattern is valid")
});

/// Apply backspaces and drop carriage returns.
///
/// Runs before escape stripping, which discards both control bytes.
fn apply_line_edits(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\r' => {}
            // Backspace erases within the current line only
            '\x08' => {
                if out.chars().last().is_some_and(|prev| prev != '\n') {
                    out.pop();
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Strip ANSI escape sequences and control characters from terminal output.
///
/// Newlines are kept, carriage returns are dropped and backspaces erase
/// the preceding character.
pub fn strip_ansi(raw: &str) -> String {
    strip_ansi_escapes::strip_str(apply_line_edits(raw))
}

/// Clean raw device output for parsing.
///
/// Strips escape sequences (see [`strip_ansi`]) and removes pager prompts.
/// A line that held nothing but a pager prompt is dropped entirely; text
/// that followed the prompt on the same line is kept.
pub fn sanitize(raw: &str) -> String {
    let stripped = strip_ansi(raw);
    let mut cleaned = String::with_capacity(stripped.len());

    for line in stripped.split('\n') {
        if PAGER.is_match(line) {
            let rest = PAGER.replace_all(line, "");
            trace!("dropping pager prompt, remainder {:?}", rest);
            if rest.trim().is_empty() {
                continue;
            }
            cleaned.push_str(&rest);
        } else {
            cleaned.push_str(line);
        }
        cleaned.push('\n');
    }

    // every kept piece got a newline; the last piece never had one
    cleaned.pop();

    cleaned
}
