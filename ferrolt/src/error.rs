//! Error types for ferrolt.
//!
//! Parsing device output never fails; malformed lines are dropped. Errors
//! come from the layers around the parsers: the external API boundary,
//! workflow transitions, and platform/label-table configuration.

use thiserror::Error;

/// Main error type for ferrolt operations.
#[derive(Error, Debug)]
pub enum Error {
    /// External device-session API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Registration workflow errors
    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// Platform/vendor errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Errors reported by, or while talking to, the device-session API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The API answered with an `error` envelope.
    #[error("Request rejected: {message}")]
    Rejected {
        message: String,
        /// Device output attached to the rejection, if any.
        output: Option<String>,
    },

    /// The envelope could not be decoded.
    #[error("Malformed response envelope: {0}")]
    MalformedEnvelope(#[from] serde_json::Error),

    /// The request never reached the API.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Session not logged in
    #[error("Not logged in to OLT - call login() first")]
    NotLoggedIn,
}

/// Workflow errors (field edits, selection, request validation).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum WorkflowError {
    /// A required field is empty when building a request.
    #[error("Field '{field}' is required")]
    MissingField { field: &'static str },

    /// The field name is not known.
    #[error("Unknown field '{name}'")]
    UnknownField { name: String },

    /// The field exists but does not belong to this form.
    #[error("Field '{field}' does not apply to the {form} form")]
    FieldNotApplicable {
        field: &'static str,
        form: &'static str,
    },

    /// Selection index is outside the discovered list.
    #[error("No discovered ONT at index {index} ({available} available)")]
    NoSuchRecord { index: usize, available: usize },

    /// Workflow defaults could not be loaded.
    #[error("Invalid workflow defaults: {message}")]
    InvalidDefaults { message: String },
}

/// Platform definition errors.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Invalid platform definition
    #[error("Invalid platform definition: {message}")]
    InvalidDefinition { message: String },

    /// Platform name not found in the registry
    #[error("Unknown platform '{name}'")]
    UnknownPlatform { name: String },

    /// Platform name already registered
    #[error("Platform '{name}' is already registered")]
    AlreadyRegistered { name: String },

    /// Invalid label regex pattern
    #[error("Invalid label pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Result type alias using ferrolt's Error.
pub type Result<T> = std::result::Result<T, Error>;
