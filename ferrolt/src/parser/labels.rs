//! Label table for `Label : value` autofind blocks.
//!
//! The set of labels the autofind parser understands is data, not control
//! flow: an ordered list of rules, each binding a matcher to an ONT
//! attribute and a value extractor. Firmware releases that spell a label
//! differently get an extra rule instead of a parser change.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::channel::{LineMatcher, compile_label_pattern};
use crate::error::PlatformError;

/// Attribute of a discovered ONT that a label assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OntField {
    Number,
    Fsp,
    SerialNumber,
    Password,
    VendorId,
    Version,
    SoftwareVersion,
    EquipmentId,
    AutofindTime,
}

impl OntField {
    /// Attribute name as it appears in the JSON record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Fsp => "fsp",
            Self::SerialNumber => "serialNumber",
            Self::Password => "password",
            Self::VendorId => "vendorId",
            Self::Version => "version",
            Self::SoftwareVersion => "softwareVersion",
            Self::EquipmentId => "equipmentId",
            Self::AutofindTime => "autofindTime",
        }
    }
}

impl fmt::Display for OntField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the captured text becomes the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extractor {
    /// The whole capture, trimmed.
    #[default]
    Trimmed,

    /// Only the first whitespace-delimited token (drops trailing annotations
    /// such as `(HWTC-0A1B2C3D)` after a serial number).
    FirstToken,
}

impl Extractor {
    /// Apply the extractor to a captured value.
    ///
    /// Returns None when nothing is left after extraction.
    pub fn extract<'a>(&self, captured: &'a str) -> Option<&'a str> {
        let value = match self {
            Self::Trimmed => captured.trim(),
            Self::FirstToken => captured.split_whitespace().next().unwrap_or(""),
        };
        (!value.is_empty()).then_some(value)
    }
}

/// One `(label, extractor)` entry of a [`LabelTable`].
#[derive(Clone)]
pub struct LabelRule {
    /// Attribute this rule assigns.
    pub field: OntField,

    /// Matcher that captures the raw value from a trimmed line.
    pub matcher: Arc<dyn LineMatcher>,

    /// Post-processing applied to the captured value.
    pub extractor: Extractor,

    /// Human-readable source of the matcher, for diagnostics.
    pub source: String,
}

impl LabelRule {
    /// Create a rule matching the literal `label` followed by `:`.
    pub fn new(field: OntField, label: &str) -> Result<Self, PlatformError> {
        let regex = compile_label_pattern(label)?;
        Ok(Self {
            field,
            source: regex.as_str().to_string(),
            matcher: Arc::new(regex),
            extractor: Extractor::default(),
        })
    }

    /// Create a rule from a custom regex. The value is capture group 1.
    pub fn with_pattern(field: OntField, pattern: &str) -> Result<Self, PlatformError> {
        let regex = Regex::new(pattern)?;
        if regex.captures_len() < 2 {
            return Err(PlatformError::InvalidDefinition {
                message: format!("label pattern '{pattern}' for {field} has no capture group"),
            });
        }
        Ok(Self {
            field,
            source: pattern.to_string(),
            matcher: Arc::new(regex),
            extractor: Extractor::default(),
        })
    }

    /// Create a rule from any [`LineMatcher`] implementation.
    pub fn with_matcher(
        field: OntField,
        source: impl Into<String>,
        matcher: Arc<dyn LineMatcher>,
    ) -> Self {
        Self {
            field,
            matcher,
            extractor: Extractor::default(),
            source: source.into(),
        }
    }

    /// Set the value extractor.
    pub fn extracting(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Apply the rule to a trimmed line.
    pub fn apply<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.matcher
            .capture(line)
            .and_then(|captured| self.extractor.extract(captured))
    }
}

impl fmt::Debug for LabelRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelRule")
            .field("field", &self.field)
            .field("source", &self.source)
            .field("extractor", &self.extractor)
            .finish()
    }
}

/// Ordered table of label rules. The first rule that matches a line wins.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    rules: Vec<LabelRule>,
}

impl LabelTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The labels printed by `display ont autofind all` on Huawei GPON boards.
    pub fn huawei_gpon() -> Self {
        let literal = [
            (OntField::Fsp, "F/S/P"),
            (OntField::SerialNumber, "Ont SN"),
            (OntField::Password, "Password"),
            (OntField::VendorId, "VendorID"),
            (OntField::Version, "Ont Version"),
            (OntField::SoftwareVersion, "Ont SoftwareVersion"),
            (OntField::EquipmentId, "Ont EquipmentID"),
            (OntField::AutofindTime, "Ont autofind time"),
        ];

        let mut table = Self::new().with_rule(
            LabelRule::with_pattern(OntField::Number, r"^Number\s*:\s*([0-9]+)$")
                .expect("number pattern is valid"),
        );
        for (field, label) in literal {
            let mut rule = LabelRule::new(field, label).expect("built-in label is valid");
            if field == OntField::SerialNumber {
                rule = rule.extracting(Extractor::FirstToken);
            }
            table = table.with_rule(rule);
        }
        table
    }

    /// Append a rule.
    pub fn with_rule(mut self, rule: LabelRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append a literal label alias for a field.
    ///
    /// Serial-number aliases keep the first-token extractor.
    pub fn with_alias(self, field: OntField, label: &str) -> Result<Self, PlatformError> {
        let mut rule = LabelRule::new(field, label)?;
        if field == OntField::SerialNumber {
            rule = rule.extracting(Extractor::FirstToken);
        }
        Ok(self.with_rule(rule))
    }

    /// Append a custom regex rule for a field.
    pub fn with_pattern(self, field: OntField, pattern: &str) -> Result<Self, PlatformError> {
        let mut rule = LabelRule::with_pattern(field, pattern)?;
        if field == OntField::SerialNumber {
            rule = rule.extracting(Extractor::FirstToken);
        }
        Ok(self.with_rule(rule))
    }

    /// Find the first rule matching a trimmed line.
    pub fn match_line<'a>(&self, line: &'a str) -> Option<(OntField, &'a str)> {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(line).map(|value| (rule.field, value)))
    }

    /// All rules in evaluation order.
    pub fn rules(&self) -> &[LabelRule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
