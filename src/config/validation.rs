//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (routes reference existing services)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::registry::{RegistryError, ServiceAddress};
use crate::routing::{PathPattern, PatternError};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid listener bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("service name must not be empty")]
    EmptyServiceName,

    #[error("duplicate service '{0}'")]
    DuplicateService(String),

    #[error(transparent)]
    InvalidServiceUrl(RegistryError),

    #[error("duplicate route id '{0}'")]
    DuplicateRoute(String),

    #[error("route '{0}' has no paths")]
    EmptyRoutePaths(String),

    #[error("route '{route}': {source}")]
    InvalidPattern {
        route: String,
        #[source]
        source: PatternError,
    },

    #[error("route '{route}' targets unknown service '{service}'")]
    UnknownService { route: String, service: String },

    #[error("timeout '{0}' must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("invalid metrics address '{0}'")]
    InvalidMetricsAddress(String),

    #[error("cors: exposed_headers cannot be '*' when allow_credentials is true")]
    WildcardExposedHeadersWithCredentials,
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let mut service_names = HashSet::new();
    for service in &config.services {
        if service.name.is_empty() {
            errors.push(ValidationError::EmptyServiceName);
            continue;
        }
        if !service_names.insert(service.name.as_str()) {
            errors.push(ValidationError::DuplicateService(service.name.clone()));
        }
        if let Err(e) = ServiceAddress::parse(&service.name, &service.url) {
            errors.push(ValidationError::InvalidServiceUrl(e));
        }
    }

    let mut route_ids = HashSet::new();
    for route in &config.routes {
        if !route_ids.insert(route.id.as_str()) {
            errors.push(ValidationError::DuplicateRoute(route.id.clone()));
        }
        if route.paths.is_empty() {
            errors.push(ValidationError::EmptyRoutePaths(route.id.clone()));
        }
        for path in &route.paths {
            if let Err(source) = PathPattern::parse(path) {
                errors.push(ValidationError::InvalidPattern {
                    route: route.id.clone(),
                    source,
                });
            }
        }
        if !service_names.contains(route.service.as_str()) {
            errors.push(ValidationError::UnknownService {
                route: route.id.clone(),
                service: route.service.clone(),
            });
        }
    }

    let timeouts = &config.timeouts;
    for (name, value) in [
        ("connect_secs", timeouts.connect_secs),
        ("upstream_secs", timeouts.upstream_secs),
        ("idle_secs", timeouts.idle_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    let cors = &config.cors;
    if cors.allow_credentials && cors.exposed_headers.iter().any(|h| h == "*") {
        errors.push(ValidationError::WildcardExposedHeadersWithCredentials);
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
