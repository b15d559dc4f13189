//! Response envelope returned by the device-session API.
//!
//! ```json
//! {"status": "success", "data": "<raw CLI text>"}
//! {"status": "error", "message": "Not logged in to OLT"}
//! ```
//!
//! Some endpoints name the payload `output` instead of `data`; both are
//! accepted.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Envelope status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Error,
}

/// A decoded API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: Status,

    /// Raw device output.
    #[serde(default, alias = "output", skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    /// Human-readable message, mostly on errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope {
    /// A success envelope carrying device output.
    pub fn success(data: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            data: Some(data.into()),
            message: None,
        }
    }

    /// An error envelope.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Decode an envelope from a JSON body.
    pub fn from_json(body: &str) -> Result<Self, ApiError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Check if the envelope reports success.
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Take the payload of a success envelope.
    ///
    /// A success without payload yields an empty string. An error envelope
    /// becomes [`ApiError::Rejected`], keeping any attached output.
    pub fn into_data(self) -> Result<String, ApiError> {
        match self.status {
            Status::Success => Ok(self.data.unwrap_or_default()),
            Status::Error => Err(ApiError::Rejected {
                message: self
                    .message
                    .unwrap_or_else(|| "Request failed".to_string()),
                output: self.data,
            }),
        }
    }
}
