//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes in declaration order
//! - Look up the matching route for a request path
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan in declaration order; the first match wins, so overlapping
//!   routes must be declared most-specific first
//! - Explicit `None` rather than a silent default route

use crate::config::RouteConfig;
use crate::routing::matcher::{AnyMatcher, Matcher, PatternError};

/// A compiled route.
#[derive(Debug)]
pub struct Route {
    id: String,
    patterns: Vec<String>,
    matcher: AnyMatcher,
    service: String,
}

impl Route {
    /// Compile a route from its configuration.
    pub fn from_config(config: &RouteConfig) -> Result<Self, PatternError> {
        Ok(Self {
            id: config.id.clone(),
            patterns: config.paths.clone(),
            matcher: AnyMatcher::from_patterns(&config.paths)?,
            service: config.service.clone(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Logical name of the target service.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// The path patterns as configured.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn matches(&self, path: &str) -> bool {
        self.matcher.matches(path)
    }
}

/// Ordered, immutable route table.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Compile routes, preserving declaration order.
    pub fn from_config(routes: &[RouteConfig]) -> Result<Self, PatternError> {
        let routes = routes
            .iter()
            .map(Route::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { routes })
    }

    /// Find the first route whose patterns match `path`.
    pub fn match_path(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(path))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
