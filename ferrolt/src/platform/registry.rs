//! Global platform registry for looking up platform definitions.

use std::sync::{LazyLock, RwLock};

use indexmap::IndexMap;

use super::definition::OltPlatform;
use super::vendors;
use crate::error::{PlatformError, Result};

/// Global platform registry.
static REGISTRY: LazyLock<RwLock<PlatformRegistry>> = LazyLock::new(|| {
    let mut registry = PlatformRegistry::new();
    registry.register_builtin_platforms();
    RwLock::new(registry)
});

/// Registry for platform definitions, in registration order.
#[derive(Debug, Default)]
pub struct PlatformRegistry {
    platforms: IndexMap<String, OltPlatform>,
}

impl PlatformRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            platforms: IndexMap::new(),
        }
    }

    /// Get the global registry.
    pub fn global() -> &'static RwLock<PlatformRegistry> {
        &REGISTRY
    }

    /// Look up a platform in the global registry.
    pub fn lookup(name: &str) -> Result<OltPlatform> {
        Self::global()
            .read()
            .map_err(|_| PlatformError::InvalidDefinition {
                message: "Failed to acquire registry lock".to_string(),
            })?
            .get(name)
            .cloned()
            .ok_or_else(|| {
                PlatformError::UnknownPlatform {
                    name: name.to_string(),
                }
                .into()
            })
    }

    /// Register built-in platforms.
    fn register_builtin_platforms(&mut self) {
        for platform in [vendors::generic::platform(), vendors::huawei::platform()] {
            self.platforms.insert(platform.name.clone(), platform);
        }
    }

    /// Register a platform definition.
    pub fn register(&mut self, platform: OltPlatform) -> Result<()> {
        if platform.name.trim().is_empty() {
            return Err(PlatformError::InvalidDefinition {
                message: "Platform name must not be empty".to_string(),
            }
            .into());
        }
        if self.platforms.contains_key(&platform.name) {
            return Err(PlatformError::AlreadyRegistered {
                name: platform.name.clone(),
            }
            .into());
        }
        self.platforms.insert(platform.name.clone(), platform);
        Ok(())
    }

    /// Get a platform by name.
    pub fn get(&self, name: &str) -> Option<&OltPlatform> {
        self.platforms.get(name)
    }

    /// Check if a platform is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.platforms.contains_key(name)
    }

    /// List all registered platform names.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.platforms.keys()
    }

    /// Get a mutable reference to a platform.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut OltPlatform> {
        self.platforms.get_mut(name)
    }
}
