//! Result types for session operations.

use std::time::Duration;

use crate::workflow::{OntIdentity, RegistrationFieldSet};

/// Output of a single device request.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// The command (or request) the output answers.
    pub command: String,

    /// The command output (normalized - terminal noise, command echo and
    /// trailing prompt removed).
    pub result: String,

    /// The raw output before normalization.
    pub raw_result: String,

    /// Time taken by the API round-trip.
    pub elapsed: Duration,

    /// Failure message if the output carries a device failure marker.
    pub failure_message: Option<String>,
}

impl CommandOutput {
    /// Check if the output indicates success.
    pub fn is_success(&self) -> bool {
        self.failure_message.is_none()
    }

    /// Get the result lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.result.lines()
    }

    /// Check if the result contains a substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.result.contains(pattern)
    }
}

impl std::fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.result)
    }
}

/// Outcome of a registration request the API accepted.
#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    /// The field set that was submitted.
    pub request: RegistrationFieldSet,

    /// Device log of the registration commands.
    pub log: String,

    /// Device failure found in the log, despite the API reporting success.
    pub failure_message: Option<String>,

    pub elapsed: Duration,
}

impl RegistrationOutcome {
    /// Check if the device accepted the registration.
    pub fn is_success(&self) -> bool {
        self.failure_message.is_none()
    }
}

/// Outcome of a verification request.
#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    /// The identity that was checked.
    pub request: OntIdentity,

    /// Device output.
    pub output: String,

    /// Whether the serial number appears in the output.
    pub serial_seen: bool,

    /// Device failure found in the output.
    pub failure_message: Option<String>,

    pub elapsed: Duration,
}

impl VerificationOutcome {
    /// Check if the ONT is registered as requested.
    pub fn is_verified(&self) -> bool {
        self.serial_seen && self.failure_message.is_none()
    }
}
