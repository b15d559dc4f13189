//! Huawei MA5600-series (MA5683T, MA5608T, MA5680T) platform definition.
//!
//! # Prompt Examples
//!
//! ```text
//! MA5683T>                           # user mode
//! MA5683T#                           # privileged mode (after `enable`)
//! MA5683T(config)#                   # global config (after `config`)
//! MA5683T(config-if-gpon-0/1)#       # GPON board interface
//! ```
//!
//! # Registration
//!
//! ONTs are added from the GPON interface of their board, addressed by
//! port and ONT id:
//!
//! ```text
//! enable
//! config
//! interface gpon 0/1
//! ont add 5 1 sn-auth 48575443ABCDEF01 omci ont-lineprofile-id 10 ont-srvprofile-id 10 desc "test"
//! quit
//! quit
//! ```

use std::sync::Arc;

use crate::channel::sanitize;
use crate::platform::{DefaultBehavior, OltBehavior, OltPlatform};
use crate::workflow::{OntIdentity, RegistrationFieldSet};

/// Platform name for Huawei MA5600-series OLTs.
pub const PLATFORM_NAME: &str = "huawei_ma5600";

/// Create the Huawei MA5600-series platform definition.
pub fn platform() -> OltPlatform {
    OltPlatform::new(PLATFORM_NAME)
        .with_failure_pattern("Failure:")
        .with_failure_pattern("% Unknown command")
        .with_failure_pattern("% Parameter error")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Too many parameters")
        .with_failure_pattern("Error:")
        .with_behavior(Arc::new(HuaweiBehavior))
}

/// Huawei MA5600-specific behavior.
pub struct HuaweiBehavior;

impl HuaweiBehavior {
    /// `0/1` board path as the space-separated `0 1` the display commands take.
    fn frame_slot(board_id: &str) -> String {
        board_id
            .split('/')
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl OltBehavior for HuaweiBehavior {
    fn normalize_output(&self, raw: &str, command: &str) -> String {
        // `{ <cr>|... }:` completion hints are echoed before output on some firmware
        let cleaned: String = sanitize(raw)
            .lines()
            .filter(|line| !line.trim_start().starts_with("{ <cr>"))
            .collect::<Vec<_>>()
            .join("\n");
        DefaultBehavior.normalize_output(&cleaned, command)
    }

    fn registration_commands(&self, fields: &RegistrationFieldSet) -> Vec<String> {
        let identity = &fields.identity;
        vec![
            "enable".to_string(),
            "config".to_string(),
            format!("interface gpon {}", identity.board_id.trim()),
            format!(
                "ont add {} {} sn-auth {} omci ont-lineprofile-id {} ont-srvprofile-id {} desc \"{}\"",
                identity.port_id.trim(),
                identity.ont_id.trim(),
                identity.serial_number.trim(),
                fields.line_profile_id.trim(),
                fields.service_profile_id.trim(),
                fields.description.replace('"', "'"),
            ),
            "quit".to_string(),
            "quit".to_string(),
        ]
    }

    fn verification_command(&self, identity: &OntIdentity) -> Option<String> {
        Some(format!(
            "display ont info {} {} {}",
            Self::frame_slot(&identity.board_id),
            identity.port_id.trim(),
            identity.ont_id.trim(),
        ))
    }
}
