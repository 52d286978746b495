//! Fixed name → address table built once at startup.

use std::collections::HashMap;

use crate::config::ServiceConfig;
use crate::registry::resolver::{RegistryError, ServiceAddress, ServiceResolver};

/// A registry whose entries never change after construction.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    services: HashMap<String, ServiceAddress>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configured services, rejecting duplicates and bad URLs.
    pub fn from_config(services: &[ServiceConfig]) -> Result<Self, RegistryError> {
        services
            .iter()
            .try_fold(Self::new(), |registry, s| registry.with_service(&s.name, &s.url))
    }

    /// Add a service, consuming and returning the registry.
    pub fn with_service(mut self, name: &str, url: &str) -> Result<Self, RegistryError> {
        if self.services.contains_key(name) {
            return Err(RegistryError::DuplicateService {
                name: name.to_string(),
            });
        }
        let address = ServiceAddress::parse(name, url)?;
        self.services.insert(name.to_string(), address);
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl ServiceResolver for StaticRegistry {
    fn resolve(&self, service: &str) -> Result<ServiceAddress, RegistryError> {
        self.services
            .get(service)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownService(service.to_string()))
    }
}
