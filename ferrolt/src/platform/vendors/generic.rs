//! Generic platform definition.
//!
//! This is the simplest platform: the Huawei GPON label table, the default
//! output normalization and a minimal set of failure markers. It renders
//! no device commands.

use crate::platform::OltPlatform;

/// Platform name for the generic platform.
pub const PLATFORM_NAME: &str = "generic";

/// Create the generic platform definition.
pub fn platform() -> OltPlatform {
    OltPlatform::new(PLATFORM_NAME)
        .with_failure_pattern("Failure:")
        .with_failure_pattern("Error:")
}
