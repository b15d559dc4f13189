//! Provisioning session over the device-session API.
//!
//! The session sequences the workflow against an [`OltApi`]:
//! discover, populate, register, verify. Raw payloads are sanitized and
//! parsed here; the workflow only ever sees typed records.
//!
//! [`OltApi`]: crate::api::OltApi

mod builder;
mod provisioning;
mod response;

pub use builder::SessionBuilder;
pub use provisioning::ProvisioningSession;
pub use response::{CommandOutput, RegistrationOutcome, VerificationOutcome};
