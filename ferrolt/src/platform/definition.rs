//! Platform definition for vendor-specific configurations.

use std::fmt;
use std::sync::Arc;

use super::{DefaultBehavior, OltBehavior};
use crate::parser::{AutofindParser, LabelRule, LabelTable};

/// Platform definition containing all vendor-specific configuration.
///
/// Label tables and failure markers are plain data so firmware variants
/// can be described without code; output handling and command rendering
/// come from the [`OltBehavior`] trait.
#[derive(Clone)]
pub struct OltPlatform {
    /// Platform name (e.g., "huawei_ma5600", "generic").
    pub name: String,

    /// Labels understood in autofind output.
    pub labels: LabelTable,

    /// Patterns that indicate command failure.
    pub failed_when_contains: Vec<String>,

    /// Optional vendor-specific behavior.
    pub behavior: Option<Arc<dyn OltBehavior>>,
}

impl OltPlatform {
    /// Create a new platform definition with the Huawei GPON label table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: LabelTable::huawei_gpon(),
            failed_when_contains: vec![],
            behavior: None,
        }
    }

    /// Replace the label table.
    pub fn with_labels(mut self, labels: LabelTable) -> Self {
        self.labels = labels;
        self
    }

    /// Append a label rule.
    pub fn with_label_rule(mut self, rule: LabelRule) -> Self {
        self.labels = self.labels.with_rule(rule);
        self
    }

    /// Add a failure pattern.
    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    /// Set vendor behavior.
    pub fn with_behavior(mut self, behavior: Arc<dyn OltBehavior>) -> Self {
        self.behavior = Some(behavior);
        self
    }

    /// Get the vendor behavior, or the default one.
    pub fn behavior(&self) -> Arc<dyn OltBehavior> {
        self.behavior
            .clone()
            .unwrap_or_else(|| Arc::new(DefaultBehavior))
    }

    /// Autofind parser using this platform's label table.
    pub fn autofind_parser(&self) -> AutofindParser {
        AutofindParser::new(self.labels.clone())
    }

    /// Normalize raw command output.
    pub fn normalize_output(&self, raw: &str, command: &str) -> String {
        self.behavior().normalize_output(raw, command)
    }

    /// Detect a failure in command output.
    ///
    /// Vendor behavior is consulted first, then `failed_when_contains`.
    /// Returns the line carrying the failure marker.
    pub fn detect_failure(&self, output: &str) -> Option<String> {
        if let Some(message) = self.behavior().detect_failure(output) {
            return Some(message);
        }

        self.failed_when_contains.iter().find_map(|pattern| {
            output
                .lines()
                .find(|line| line.contains(pattern.as_str()))
                .map(|line| line.trim().to_string())
        })
    }
}

impl fmt::Debug for OltPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OltPlatform")
            .field("name", &self.name)
            .field("labels", &self.labels)
            .field("failed_when_contains", &self.failed_when_contains)
            .field(
                "behavior",
                &self.behavior.as_ref().map(|_| "<OltBehavior>"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::OntField;

    #[test]
    fn test_detect_failure_returns_marker_line() {
        let platform = OltPlatform::new("test").with_failure_pattern("Failure:");
        let output = "  ont add 5 1 sn-auth X\n  Failure: SN already exists\n";
        assert_eq!(
            platform.detect_failure(output).as_deref(),
            Some("Failure: SN already exists")
        );
        assert_eq!(platform.detect_failure("success: 1"), None);
    }

    #[test]
    fn test_autofind_parser_uses_platform_labels() {
        let platform = OltPlatform::new("test")
            .with_label_rule(LabelRule::new(OntField::SerialNumber, "Serial").unwrap());
        let onts = platform
            .autofind_parser()
            .parse("---\nNumber : 1\nSerial : ABCD\n---\n");
        assert_eq!(onts[0].serial_number.as_deref(), Some("ABCD"));
    }

    #[test]
    fn test_with_labels_replaces_table() {
        let labels = LabelTable::new()
            .with_alias(OntField::Number, "No.")
            .unwrap();
        let platform = OltPlatform::new("test").with_labels(labels);
        assert_eq!(platform.labels.len(), 1);

        let onts = platform
            .autofind_parser()
            .parse("---\nNo. : 4\nNumber : 5\n---\n");
        assert_eq!(onts.len(), 1);
        assert_eq!(onts[0].number, "4");
    }

    #[test]
    fn test_default_behavior_used_when_unset() {
        let platform = OltPlatform::new("test");
        assert!(platform.behavior.is_none());
        assert_eq!(platform.normalize_output("x\nOLT>", "show"), "x");
    }
}
