//! Builder for creating provisioning sessions.

use super::provisioning::ProvisioningSession;
use crate::api::OltApi;
use crate::error::{PlatformError, Result};
use crate::platform::{OltPlatform, PlatformRegistry};
use crate::workflow::WorkflowDefaults;

/// Builder for constructing provisioning sessions.
///
/// # Example
///
/// ```rust,no_run
/// use ferrolt::SessionBuilder;
/// # use ferrolt::api::OltApi;
///
/// # fn example(api: impl OltApi) -> Result<(), ferrolt::Error> {
/// let session = SessionBuilder::new(api)
///     .platform("huawei_ma5600")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct SessionBuilder<A> {
    api: A,
    platform_name: Option<String>,
    custom_platform: Option<OltPlatform>,
    defaults: WorkflowDefaults,
}

impl<A: OltApi> SessionBuilder<A> {
    /// Create a new session builder over an API client.
    pub fn new(api: A) -> Self {
        Self {
            api,
            platform_name: None,
            custom_platform: None,
            defaults: WorkflowDefaults::default(),
        }
    }

    /// Set the platform name (e.g., "huawei_ma5600", "generic").
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform_name = Some(platform.into());
        self
    }

    /// Set a custom platform definition.
    pub fn custom_platform(mut self, platform: OltPlatform) -> Self {
        self.custom_platform = Some(platform);
        self
    }

    /// Set the workflow defaults.
    pub fn defaults(mut self, defaults: WorkflowDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Build the session.
    ///
    /// This does not log in. Call `login()` on the returned session.
    pub fn build(self) -> Result<ProvisioningSession<A>> {
        let platform = if let Some(custom) = self.custom_platform {
            custom
        } else if let Some(name) = self.platform_name {
            PlatformRegistry::lookup(&name)?
        } else {
            return Err(PlatformError::InvalidDefinition {
                message: "Platform must be specified".to_string(),
            }
            .into());
        };

        Ok(ProvisioningSession::new(self.api, platform, self.defaults))
    }
}
