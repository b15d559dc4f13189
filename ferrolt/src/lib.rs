//! # Ferrolt
//!
//! Parsers and provisioning workflow for GPON OLT command-line output.
//!
//! Ferrolt turns the raw text an OLT prints for `display board` and
//! `display ont autofind all` into typed records, and keeps the form state
//! of a discover, register and verify workflow for ONTs.
//!
//! ## Features
//!
//! - Board listing and ONT autofind parsers that tolerate terminal noise
//! - Configurable label tables for firmware that words its labels differently
//! - Platform definitions with failure markers and vendor CLI scripts
//! - Device access through the [`OltApi`](api::OltApi) trait
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ferrolt::SessionBuilder;
//! use ferrolt::api::{Credentials, OltApi};
//!
//! async fn provision(api: impl OltApi) -> Result<(), ferrolt::Error> {
//!     let mut session = SessionBuilder::new(api)
//!         .platform("huawei_ma5600")
//!         .build()?;
//!
//!     session.login(&Credentials::new("admin", "secret")).await?;
//!
//!     let onts = session.discover().await?;
//!     println!("found {} ONT(s)", onts.len());
//!
//!     let outcome = session.register().await?;
//!     if outcome.is_success() {
//!         let report = session.verify().await?;
//!         println!("verified: {}", report.is_verified());
//!     }
//!
//!     session.logout().await?;
//!     Ok(())
//! }
//! ```
//!
//! The parsers can be used on their own:
//!
//! ```rust
//! let raw = "Number : 1\nF/S/P : 0/1/5\nOnt SN : 48575443ABCDEF01\n";
//! let onts = ferrolt::parser::parse_ont_autofind(raw);
//! assert_eq!(onts[0].port_id(), Some("5"));
//! ```

pub mod api;
pub mod channel;
pub mod error;
pub mod parser;
pub mod platform;
pub mod session;
pub mod workflow;

// Re-export main types for convenience
pub use error::Error;
pub use parser::{BoardRecord, OntRecord, parse_boards, parse_ont_autofind};
pub use platform::{OltPlatform, PlatformRegistry};
pub use session::{
    CommandOutput, ProvisioningSession, RegistrationOutcome, SessionBuilder, VerificationOutcome,
};
pub use workflow::{Field, Workflow, WorkflowDefaults};
