//! Path matching logic.
//!
//! # Responsibilities
//! - Parse configured path patterns (`/api/users/**`, `/health`)
//! - Match a request path against a pattern
//! - Combine patterns with OR semantics for multi-path routes
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Only a trailing `/**` wildcard is supported; anything else is rejected
//!   when the pattern is parsed, never at match time
//! - No regex, matching is a single prefix comparison

use thiserror::Error;

/// Errors raised while parsing a path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,

    #[error("pattern '{0}' must start with '/'")]
    NotAbsolute(String),

    #[error("pattern '{0}' uses an unsupported wildcard; only a trailing '/**' is allowed")]
    UnsupportedWildcard(String),
}

/// Trait for matching request paths against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// A parsed path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches the path exactly.
    Exact(String),
    /// `<base>/**`: matches `<base>` and everything below it.
    /// An empty base (from `/**`) matches every path.
    Subtree(String),
}

impl PathPattern {
    /// Parse a pattern such as `/api/users/**`.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        if !pattern.starts_with('/') {
            return Err(PatternError::NotAbsolute(pattern.to_string()));
        }

        let (base, subtree) = match pattern.strip_suffix("/**") {
            Some(base) => (base, true),
            None => (pattern, false),
        };

        if base.contains('*') || base.contains('{') || base.contains('}') {
            return Err(PatternError::UnsupportedWildcard(pattern.to_string()));
        }

        Ok(if subtree {
            PathPattern::Subtree(base.to_string())
        } else {
            PathPattern::Exact(base.to_string())
        })
    }
}

impl Matcher for PathPattern {
    fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(expected) => path == expected,
            PathPattern::Subtree(base) => path
                .strip_prefix(base.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/')),
        }
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathPattern::Exact(path) => f.write_str(path),
            PathPattern::Subtree(base) => write!(f, "{base}/**"),
        }
    }
}

/// Combines multiple matchers with OR semantics.
#[derive(Debug)]
pub struct AnyMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AnyMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }

    /// Parse a list of path patterns into a single matcher.
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let matchers = patterns
            .into_iter()
            .map(|p| PathPattern::parse(p.as_ref()).map(|p| Box::new(p) as Box<dyn Matcher>))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(matchers))
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl Matcher for AnyMatcher {
    fn matches(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtree_pattern() {
        let pattern = PathPattern::parse("/api/users/**").unwrap();

        assert!(pattern.matches("/api/users/42"));
        assert!(pattern.matches("/api/users/42/friends"));
        assert!(pattern.matches("/api/users/"));
        assert!(pattern.matches("/api/users"));

        assert!(!pattern.matches("/api/usersx"));
        assert!(!pattern.matches("/api/goals/1"));
        assert!(!pattern.matches("/API/users/1")); // Case sensitive
    }

    #[test]
    fn test_catch_all_pattern() {
        let pattern = PathPattern::parse("/**").unwrap();
        assert!(pattern.matches("/"));
        assert!(pattern.matches("/anything/at/all"));
    }

    #[test]
    fn test_exact_pattern() {
        let pattern = PathPattern::parse("/health").unwrap();
        assert!(pattern.matches("/health"));
        assert!(!pattern.matches("/health/live"));
        assert!(!pattern.matches("/healthz"));
    }

    #[test]
    fn test_rejected_patterns() {
        assert_eq!(PathPattern::parse(""), Err(PatternError::Empty));
        assert!(matches!(
            PathPattern::parse("api/users/**"),
            Err(PatternError::NotAbsolute(_))
        ));
        for bad in ["/api/*/users", "/api/**/users", "/api/users/*", "/api/{id}"] {
            assert!(
                matches!(PathPattern::parse(bad), Err(PatternError::UnsupportedWildcard(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_round_trips_source() {
        for source in ["/api/users/**", "/health", "/**"] {
            assert_eq!(PathPattern::parse(source).unwrap().to_string(), source);
        }
    }

    #[test]
    fn test_any_matcher() {
        let matcher =
            AnyMatcher::from_patterns(["/api/users/**", "/api/friend-requests/**"]).unwrap();

        assert!(matcher.matches("/api/users/1"));
        assert!(matcher.matches("/api/friend-requests/7/accept"));
        assert!(!matcher.matches("/api/goals/1"));
    }
}
