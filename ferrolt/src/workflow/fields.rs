//! Field sets edited by the registration workflow.
//!
//! All values are strings: they are form inputs and wire payload fields,
//! and device ids are opaque to this crate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;

/// Static defaults for every workflow form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowDefaults {
    pub board_id: String,
    pub port_id: String,
    pub ont_id: String,
    pub description: String,
    pub line_profile_id: String,
    pub service_profile_id: String,
}

impl Default for WorkflowDefaults {
    fn default() -> Self {
        Self {
            board_id: "0/0".to_string(),
            port_id: "5".to_string(),
            ont_id: "1".to_string(),
            description: "test".to_string(),
            line_profile_id: "10".to_string(),
            service_profile_id: "10".to_string(),
        }
    }
}

impl WorkflowDefaults {
    /// Load defaults from JSON. Missing keys keep their built-in value.
    pub fn from_json_str(json: &str) -> Result<Self, WorkflowError> {
        serde_json::from_str(json).map_err(|e| WorkflowError::InvalidDefaults {
            message: e.to_string(),
        })
    }
}

/// A user-editable workflow field, named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    BoardId,
    PortId,
    OntId,
    SerialNumber,
    Description,
    LineProfileId,
    ServiceProfileId,
}

impl Field {
    /// Identity fields, required by both registration and verification.
    pub const IDENTITY: [Field; 4] = [
        Field::BoardId,
        Field::PortId,
        Field::OntId,
        Field::SerialNumber,
    ];

    /// Wire/form name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BoardId => "boardId",
            Self::PortId => "portId",
            Self::OntId => "ontId",
            Self::SerialNumber => "serialNumber",
            Self::Description => "description",
            Self::LineProfileId => "lineProfileId",
            Self::ServiceProfileId => "serviceProfileId",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boardId" => Ok(Self::BoardId),
            "portId" => Ok(Self::PortId),
            "ontId" => Ok(Self::OntId),
            "serialNumber" => Ok(Self::SerialNumber),
            "description" => Ok(Self::Description),
            "lineProfileId" => Ok(Self::LineProfileId),
            "serviceProfileId" => Ok(Self::ServiceProfileId),
            other => Err(WorkflowError::UnknownField {
                name: other.to_string(),
            }),
        }
    }
}

/// Which ONT on which port: the fields registration and verification share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OntIdentity {
    pub board_id: String,
    pub port_id: String,
    pub ont_id: String,
    pub serial_number: String,
}

impl OntIdentity {
    /// Identity prefilled from defaults, with no serial number.
    pub fn from_defaults(defaults: &WorkflowDefaults) -> Self {
        Self {
            board_id: defaults.board_id.clone(),
            port_id: defaults.port_id.clone(),
            ont_id: defaults.ont_id.clone(),
            serial_number: String::new(),
        }
    }

    /// Get an identity field. None for fields outside the identity.
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::BoardId => Some(&self.board_id),
            Field::PortId => Some(&self.port_id),
            Field::OntId => Some(&self.ont_id),
            Field::SerialNumber => Some(&self.serial_number),
            _ => None,
        }
    }

    /// Overwrite an identity field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) -> Result<(), WorkflowError> {
        let slot = match field {
            Field::BoardId => &mut self.board_id,
            Field::PortId => &mut self.port_id,
            Field::OntId => &mut self.ont_id,
            Field::SerialNumber => &mut self.serial_number,
            other => {
                return Err(WorkflowError::FieldNotApplicable {
                    field: other.as_str(),
                    form: "verification",
                });
            }
        };
        *slot = value.into();
        Ok(())
    }

    /// Check that every identity field is filled in.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        for field in Field::IDENTITY {
            if self.get(field).is_none_or(|v| v.trim().is_empty()) {
                return Err(WorkflowError::MissingField {
                    field: field.as_str(),
                });
            }
        }
        Ok(())
    }
}

/// Everything a registration request carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationFieldSet {
    #[serde(flatten)]
    pub identity: OntIdentity,
    pub description: String,
    pub line_profile_id: String,
    pub service_profile_id: String,
}

impl RegistrationFieldSet {
    /// Field set prefilled from defaults.
    pub fn from_defaults(defaults: &WorkflowDefaults) -> Self {
        Self {
            identity: OntIdentity::from_defaults(defaults),
            description: defaults.description.clone(),
            line_profile_id: defaults.line_profile_id.clone(),
            service_profile_id: defaults.service_profile_id.clone(),
        }
    }

    /// Get any field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Description => &self.description,
            Field::LineProfileId => &self.line_profile_id,
            Field::ServiceProfileId => &self.service_profile_id,
            identity => self.identity.get(identity).unwrap_or_default(),
        }
    }

    /// Overwrite any field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Description => self.description = value,
            Field::LineProfileId => self.line_profile_id = value,
            Field::ServiceProfileId => self.service_profile_id = value,
            Field::BoardId => self.identity.board_id = value,
            Field::PortId => self.identity.port_id = value,
            Field::OntId => self.identity.ont_id = value,
            Field::SerialNumber => self.identity.serial_number = value,
        }
    }

    /// Check that the identity fields are filled in.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        self.identity.validate()
    }
}

/// Status lookup form: one ONT on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    pub board_id: String,
    pub ont_id: String,
}

impl StatusQuery {
    pub fn from_defaults(defaults: &WorkflowDefaults) -> Self {
        Self {
            board_id: defaults.board_id.clone(),
            ont_id: defaults.ont_id.clone(),
        }
    }

    /// Overwrite a status field. Only `boardId` and `ontId` apply.
    pub fn set(&mut self, field: Field, value: impl Into<String>) -> Result<(), WorkflowError> {
        match field {
            Field::BoardId => self.board_id = value.into(),
            Field::OntId => self.ont_id = value.into(),
            other => {
                return Err(WorkflowError::FieldNotApplicable {
                    field: other.as_str(),
                    form: "status",
                });
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), WorkflowError> {
        if self.board_id.trim().is_empty() {
            return Err(WorkflowError::MissingField { field: "boardId" });
        }
        if self.ont_id.trim().is_empty() {
            return Err(WorkflowError::MissingField { field: "ontId" });
        }
        Ok(())
    }
}
