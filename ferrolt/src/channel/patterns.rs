//! Pattern matching utilities for `Label : value` lines.

use regex::Regex;

/// Trait for line matching - regex by default, extensible for custom parsers.
pub trait LineMatcher: Send + Sync {
    /// Returns the captured value if the line matches, or None.
    fn capture<'a>(&self, line: &'a str) -> Option<&'a str>;

    /// Check if the line matches the pattern.
    fn is_match(&self, line: &str) -> bool {
        self.capture(line).is_some()
    }
}

/// Regex-based line matcher (the default implementation).
///
/// The value is the first capture group, or the whole match when the
/// pattern has no groups.
impl LineMatcher for Regex {
    fn capture<'a>(&self, line: &'a str) -> Option<&'a str> {
        let caps = self.captures(line)?;
        caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str())
    }
}

/// Compile a label into an anchored `Label : value` pattern.
///
/// The label is matched literally at the start of the line. The value
/// after the colon must start with a non-space character.
pub fn compile_label_pattern(label: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"^{}\s*:\s*(\S.*)$", regex::escape(label.trim())))
}
