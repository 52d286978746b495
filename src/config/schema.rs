//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the API gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream services addressable by logical name.
    pub services: Vec<ServiceConfig>,

    /// Route definitions. Declaration order is the match order.
    pub routes: Vec<RouteConfig>,

    /// Timeout configuration for upstream calls.
    pub timeouts: TimeoutConfig,

    /// Cross-origin policy applied to every response.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    /// The goal application's routing table.
    fn default() -> Self {
        let services = [
            ("user-service", 8081),
            ("goal-service", 8082),
            ("points-service", 8083),
            ("notification-service", 8084),
            ("challenge-service", 8085),
        ]
        .into_iter()
        .map(|(name, port)| ServiceConfig::new(name, format!("http://localhost:{port}")))
        .collect();

        let routes = vec![
            RouteConfig::new(
                "user-service",
                ["/api/users/**", "/api/friend-requests/**"],
                "user-service",
            ),
            RouteConfig::new("goal-service", ["/api/goals/**"], "goal-service"),
            RouteConfig::new("points-service", ["/api/points/**"], "points-service"),
            RouteConfig::new(
                "notification-service",
                ["/api/notifications/**"],
                "notification-service",
            ),
            RouteConfig::new("challenge-service", ["/api/challenges/**"], "challenge-service"),
        ];

        Self {
            listener: ListenerConfig::default(),
            services,
            routes,
            timeouts: TimeoutConfig::default(),
            cors: CorsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// A configuration with no services and no routes.
    ///
    /// Useful as a starting point when the default table is not wanted.
    pub fn empty() -> Self {
        Self {
            services: Vec::new(),
            routes: Vec::new(),
            ..Self::default()
        }
    }

    /// Look up a service definition by name.
    pub fn service(&self, name: &str) -> Option<&ServiceConfig> {
        self.services.iter().find(|s| s.name == name)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// A named upstream service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Logical service name routes and clients refer to.
    pub name: String,

    /// Base URL, e.g. "http://localhost:8081".
    pub url: String,
}

impl ServiceConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Route configuration mapping path patterns to a service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging/metrics.
    pub id: String,

    /// Path patterns, e.g. "/api/users/**". Any one matching selects the route.
    pub paths: Vec<String>,

    /// Logical name of the service to forward to.
    pub service: String,
}

impl RouteConfig {
    pub fn new<I, S>(id: impl Into<String>, paths: I, service: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            paths: paths.into_iter().map(Into::into).collect(),
            service: service.into(),
        }
    }
}

/// Timeout configuration for upstream operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Time to wait for upstream response headers, in seconds.
    pub upstream_secs: u64,

    /// Idle pooled connection timeout in seconds.
    pub idle_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 30,
            idle_secs: 90,
        }
    }
}

/// Cross-origin resource sharing policy.
///
/// The defaults are fully open: any origin, method and header, with
/// credentials allowed. Only suitable for development.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Send `Access-Control-Allow-Credentials: true`.
    pub allow_credentials: bool,

    /// Origin patterns. `*` matches any run of characters.
    pub allowed_origin_patterns: Vec<String>,

    /// Allowed methods, or `*` for any.
    pub allowed_methods: Vec<String>,

    /// Allowed request headers, or `*` for any.
    pub allowed_headers: Vec<String>,

    /// Response headers exposed to scripts.
    pub exposed_headers: Vec<String>,

    /// Preflight cache lifetime in seconds.
    pub max_age_secs: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_credentials: true,
            allowed_origin_patterns: vec!["*".to_string()],
            allowed_methods: vec!["*".to_string()],
            allowed_headers: vec!["*".to_string()],
            exposed_headers: Vec::new(),
            max_age_secs: Some(1800),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_matches_goal_application() {
        let config = GatewayConfig::default();

        let ids: Vec<_> = config.routes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "user-service",
                "goal-service",
                "points-service",
                "notification-service",
                "challenge-service"
            ]
        );
        assert_eq!(
            config.routes[0].paths,
            ["/api/users/**", "/api/friend-requests/**"]
        );
        assert_eq!(
            config.service("challenge-service").map(|s| s.url.as_str()),
            Some("http://localhost:8085")
        );
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.routes.len(), 5);
        assert!(config.cors.allow_credentials);
    }

    #[test]
    fn test_explicit_routes_replace_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [[services]]
            name = "x"
            url = "http://127.0.0.1:9000"

            [[routes]]
            id = "first"
            paths = ["/api/a/**"]
            service = "x"

            [[routes]]
            id = "second"
            paths = ["/api/**"]
            service = "x"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.services.len(), 1);
        assert_eq!(config.routes[0].id, "first");
        assert_eq!(config.routes[1].id, "second");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.timeouts.upstream_secs, 30);
    }
}
