//! Platform definitions for multi-vendor OLT support.
//!
//! This module defines vendor-specific configuration: the autofind label
//! table, failure markers, output normalization and command rendering.

mod definition;
mod registry;
pub mod vendors;

pub use definition::OltPlatform;
pub use registry::PlatformRegistry;

use std::sync::LazyLock;

use regex::Regex;

use crate::channel::sanitize;
use crate::workflow::{OntIdentity, RegistrationFieldSet};

static TRAILING_PROMPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\S+[>#]\s*$").expect("prompt pattern is valid")
});

/// Trait for vendor-specific behavior.
pub trait OltBehavior: Send + Sync {
    /// Normalize command output (clean terminal noise, strip command echo
    /// and trailing prompt).
    fn normalize_output(&self, raw: &str, command: &str) -> String;

    /// Detect command failure from output.
    fn detect_failure(&self, _output: &str) -> Option<String> {
        None
    }

    /// CLI commands that register the ONT described by `fields`.
    ///
    /// Empty when the platform has no registration syntax.
    fn registration_commands(&self, _fields: &RegistrationFieldSet) -> Vec<String> {
        Vec::new()
    }

    /// CLI command that shows a registered ONT, if the platform has one.
    fn verification_command(&self, _identity: &OntIdentity) -> Option<String> {
        None
    }
}

/// Default vendor behavior implementation.
pub struct DefaultBehavior;

impl OltBehavior for DefaultBehavior {
    fn normalize_output(&self, raw: &str, command: &str) -> String {
        let cleaned = sanitize(raw);
        let mut lines: Vec<&str> = cleaned.lines().collect();

        // Strip command echo from the beginning
        let command = command.trim();
        if !command.is_empty() && lines.first().is_some_and(|l| l.contains(command)) {
            lines.remove(0);
        }

        // Strip trailing blank lines and prompt
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }
        if lines.last().is_some_and(|l| TRAILING_PROMPT.is_match(l.trim())) {
            lines.pop();
        }

        lines.join("\n").trim().to_string()
    }
}
