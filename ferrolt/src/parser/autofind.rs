//! `display ont autofind all` output parsing.
//!
//! ```text
//!   ----------------------------------------------------------------------------
//!   Number              : 1
//!   F/S/P               : 0/1/5
//!   Ont SN              : 485754430A1B2C3D (HWTC-0A1B2C3D)
//!   Password            : 0x00000000000000000000
//!   VendorID            : HWTC
//!   Ont Version         : 10C7.A
//!   Ont SoftwareVersion : V3R017C10S115
//!   Ont EquipmentID     : HG8310M
//!   Ont autofind time   : 2024-03-01 10:22:31+08:00
//!   ----------------------------------------------------------------------------
//!   The number of GPON autofind ONT is 1
//! ```
//!
//! Blocks are separated by dash-only lines. The parser is a two-state
//! machine: between records, or accumulating a partial record. A delimiter
//! flushes the partial record (if it has a `Number`) and starts a new one;
//! label lines update the partial record; anything else is ignored.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::labels::{LabelTable, OntField};

/// Separator between two path segments of an `F/S/P` value.
pub const FSP_SEPARATOR: char = '/';

/// An ONT reported by an autofind scan.
///
/// Only `number` is guaranteed; every other attribute is present only when
/// its label appeared in the block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OntRecord {
    /// Sequence id within the autofind run.
    pub number: String,

    /// Frame/slot/port path (`F/S/P`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fsp: Option<String>,

    /// Serial number without trailing annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autofind_time: Option<String>,
}

impl OntRecord {
    /// Create a record with only a number.
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            fsp: None,
            serial_number: None,
            password: None,
            vendor_id: None,
            version: None,
            software_version: None,
            equipment_id: None,
            autofind_time: None,
        }
    }

    /// Set the `F/S/P` path.
    pub fn with_fsp(mut self, fsp: impl Into<String>) -> Self {
        self.fsp = Some(fsp.into());
        self
    }

    /// Set the serial number.
    pub fn with_serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }

    /// Port segment of the `F/S/P` path.
    ///
    /// None when the path is absent or has fewer than three non-empty
    /// leading segments.
    pub fn port_id(&self) -> Option<&str> {
        let fsp = self.fsp.as_deref()?;
        let segments: Vec<&str> = fsp.split(FSP_SEPARATOR).map(str::trim).collect();
        if segments.len() < 3 || segments[..3].iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(segments[2])
    }

    /// `F/S` prefix of the `F/S/P` path, the board this ONT hangs off.
    pub fn board_id(&self) -> Option<String> {
        self.port_id()?;
        let fsp = self.fsp.as_deref()?;
        let mut segments = fsp.split(FSP_SEPARATOR).map(str::trim);
        let frame = segments.next()?;
        let slot = segments.next()?;
        Some(format!("{frame}{FSP_SEPARATOR}{slot}"))
    }
}

/// A record under construction. Every attribute may still be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialOnt {
    pub number: Option<String>,
    pub fsp: Option<String>,
    pub serial_number: Option<String>,
    pub password: Option<String>,
    pub vendor_id: Option<String>,
    pub version: Option<String>,
    pub software_version: Option<String>,
    pub equipment_id: Option<String>,
    pub autofind_time: Option<String>,
}

impl PartialOnt {
    /// Assign a value to one attribute. Later values overwrite earlier ones.
    pub fn set(&mut self, field: OntField, value: &str) {
        let slot = match field {
            OntField::Number => &mut self.number,
            OntField::Fsp => &mut self.fsp,
            OntField::SerialNumber => &mut self.serial_number,
            OntField::Password => &mut self.password,
            OntField::VendorId => &mut self.vendor_id,
            OntField::Version => &mut self.version,
            OntField::SoftwareVersion => &mut self.software_version,
            OntField::EquipmentId => &mut self.equipment_id,
            OntField::AutofindTime => &mut self.autofind_time,
        };
        *slot = Some(value.to_string());
    }

    /// Complete the record. Without a number there is no record.
    pub fn complete(self) -> Option<OntRecord> {
        Some(OntRecord {
            number: self.number?,
            fsp: self.fsp,
            serial_number: self.serial_number,
            password: self.password,
            vendor_id: self.vendor_id,
            version: self.version,
            software_version: self.software_version,
            equipment_id: self.equipment_id,
            autofind_time: self.autofind_time,
        })
    }
}

/// Parser state between lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AutofindState {
    /// No block open yet.
    #[default]
    BetweenRecords,

    /// Inside a block.
    Accumulating(PartialOnt),
}

impl AutofindState {
    /// Transition on a delimiter line: flush the open block and start a new one.
    pub fn on_delimiter(self) -> (Self, Option<OntRecord>) {
        (Self::Accumulating(PartialOnt::default()), self.finish())
    }

    /// Transition on a label line: assign the value to the open block.
    ///
    /// Label lines seen before any delimiter open a block implicitly.
    pub fn on_field(self, field: OntField, value: &str) -> Self {
        let mut partial = match self {
            Self::BetweenRecords => PartialOnt::default(),
            Self::Accumulating(partial) => partial,
        };
        partial.set(field, value);
        Self::Accumulating(partial)
    }

    /// Close the state at end of input, yielding the open block if complete.
    pub fn finish(self) -> Option<OntRecord> {
        match self {
            Self::BetweenRecords => None,
            Self::Accumulating(partial) => partial.complete(),
        }
    }
}

/// Check if a trimmed line is a block delimiter (dashes only).
pub fn is_delimiter(line: &str) -> bool {
    !line.is_empty() && line.bytes().all(|b| b == b'-')
}

/// Autofind parser bound to a label table.
#[derive(Debug, Clone)]
pub struct AutofindParser {
    labels: LabelTable,
}

impl AutofindParser {
    /// Create a parser with a specific label table.
    pub fn new(labels: LabelTable) -> Self {
        Self { labels }
    }

    /// Get the label table.
    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Parse autofind output into records, in scan order.
    ///
    /// Never fails. Blocks without a `Number` line are dropped; duplicate
    /// serial numbers are kept.
    pub fn parse(&self, raw: &str) -> Vec<OntRecord> {
        let mut onts = Vec::new();
        let mut state = AutofindState::default();

        for line in raw.lines().map(str::trim) {
            if is_delimiter(line) {
                let (next, flushed) = state.on_delimiter();
                if let Some(ont) = flushed {
                    trace!("flushed ONT {}", ont.number);
                    onts.push(ont);
                }
                state = next;
                continue;
            }

            match self.labels.match_line(line) {
                Some((field, value)) => {
                    trace!("{field} = {value:?}");
                    state = state.on_field(field, value);
                }
                None => {
                    if !line.is_empty() {
                        trace!("ignoring line {line:?}");
                    }
                }
            }
        }

        if let Some(ont) = state.finish() {
            trace!("flushed ONT {} at end of input", ont.number);
            onts.push(ont);
        }

        debug!("parsed {} autofind ONT(s)", onts.len());
        onts
    }
}

impl Default for AutofindParser {
    fn default() -> Self {
        Self::new(LabelTable::huawei_gpon())
    }
}

/// Parse autofind output with the default Huawei GPON label table.
pub fn parse_ont_autofind(raw: &str) -> Vec<OntRecord> {
    AutofindParser::default().parse(raw)
}
