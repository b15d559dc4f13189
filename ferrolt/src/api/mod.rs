//! Boundary to the external device-session API.
//!
//! The process that actually talks to the OLT lives outside this crate. It
//! is reached through [`OltApi`], which returns raw CLI text wrapped in an
//! [`Envelope`]. Request payloads are the workflow's field sets serialized
//! with camelCase keys, every value a string.

mod envelope;

pub use envelope::{Envelope, Status};

use std::fmt;
use std::future::Future;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::workflow::{OntIdentity, RegistrationFieldSet};

pub use crate::workflow::StatusQuery;

/// Payload of a registration request.
pub type RegisterRequest = RegistrationFieldSet;

/// Payload of a verification request.
pub type VerifyRequest = OntIdentity;

/// Payload of an arbitrary CLI command request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCommand {
    pub command: String,
}

impl TestCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

/// Device login credentials. The password is never printed.
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// JSON login body (`{"username": .., "password": ..}`).
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "username": self.username,
            "password": self.password.expose_secret(),
        })
        .to_string()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Trait for the device-session API.
///
/// Every call returns the decoded envelope; an `error` envelope is a
/// successful call. `Err` is reserved for failures to get an envelope at all.
pub trait OltApi: Send {
    /// Open a device session.
    fn login(&mut self, credentials: &Credentials) -> impl Future<Output = Result<Envelope>> + Send;

    /// Close the device session.
    fn logout(&mut self) -> impl Future<Output = Result<Envelope>> + Send;

    /// Raw `display board` listing for frame 0.
    fn all_boards(&mut self) -> impl Future<Output = Result<Envelope>> + Send;

    /// Raw detail listing for one board (`0/1`).
    fn board_detail(&mut self, board_id: &str) -> impl Future<Output = Result<Envelope>> + Send;

    /// Raw `display ont autofind all` output.
    fn ont_autofind(&mut self) -> impl Future<Output = Result<Envelope>> + Send;

    /// Register an ONT; the payload is the device log.
    fn register_ont(
        &mut self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<Envelope>> + Send;

    /// Show a registered ONT; the payload is the device output.
    fn verify_ont(
        &mut self,
        request: &VerifyRequest,
    ) -> impl Future<Output = Result<Envelope>> + Send;

    /// Online status of one ONT.
    fn ont_status(&mut self, query: &StatusQuery) -> impl Future<Output = Result<Envelope>> + Send;

    /// ONT details looked up by description.
    fn ont_info(&mut self, description: &str) -> impl Future<Output = Result<Envelope>> + Send;

    /// Run an arbitrary CLI command.
    fn test_command(
        &mut self,
        request: &TestCommand,
    ) -> impl Future<Output = Result<Envelope>> + Send;
}
