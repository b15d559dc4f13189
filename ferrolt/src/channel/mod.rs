//! Channel layer for raw device text.
//!
//! This module cleans terminal output before it is parsed and provides
//! the line matchers used by the label-driven parsers.

mod patterns;
mod sanitize;

pub use patterns::{LineMatcher, compile_label_pattern};
pub use sanitize::{sanitize, strip_ansi};
