//! Typed request descriptors.
//!
//! # Responsibilities
//! - Describe one call: HTTP method, path template, parameters, body
//! - Expand `{name}` segments with percent-encoded parameter values
//!
//! # Design Decisions
//! - Placeholders must fill a whole path segment (`/api/users/{id}`)
//! - Expansion failures are errors, never silently left as literal text

use std::collections::HashMap;

use reqwest::Method;
use url::Url;

use crate::client::error::{ClientError, ClientResult};

/// A path such as `/api/users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

impl PathTemplate {
    pub fn parse(template: &str) -> ClientResult<Self> {
        let invalid = |reason: &str| ClientError::Template {
            template: template.to_string(),
            reason: reason.to_string(),
        };

        let rest = template
            .strip_prefix('/')
            .ok_or_else(|| invalid("must start with '/'"))?;

        let mut segments = Vec::new();
        for raw in rest.split('/').filter(|s| !s.is_empty()) {
            let segment = match raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) if !name.is_empty() && !name.contains(['{', '}']) => {
                    Segment::Param(name.to_string())
                }
                Some(_) => return Err(invalid("empty or nested placeholder")),
                None if raw.contains(['{', '}']) => {
                    return Err(invalid("placeholders must span a whole segment"))
                }
                None => Segment::Literal(raw.to_string()),
            };
            segments.push(segment);
        }

        Ok(Self {
            source: template.to_string(),
            segments,
        })
    }

    /// Names of the placeholders, in order.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Append the expanded path to `base`, keeping any base path.
    pub fn expand_onto(&self, base: &Url, params: &HashMap<String, String>) -> ClientResult<Url> {
        let mut url = base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| ClientError::Template {
                template: self.source.clone(),
                reason: format!("base URL '{base}' cannot carry a path"),
            })?;
            path.pop_if_empty();
            for segment in &self.segments {
                match segment {
                    Segment::Literal(text) => {
                        path.push(text);
                    }
                    Segment::Param(name) => {
                        let value = params.get(name).ok_or_else(|| ClientError::Template {
                            template: self.source.clone(),
                            reason: format!("missing parameter '{name}'"),
                        })?;
                        path.push(value);
                    }
                }
            }
        }
        Ok(url)
    }
}

impl std::fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// One typed call against a named service.
#[derive(Debug, Clone)]
pub struct ServiceRequest {
    pub method: Method,
    pub path: PathTemplate,
    pub params: HashMap<String, String>,
    pub body: Option<serde_json::Value>,
}

impl ServiceRequest {
    pub fn new(method: Method, path: PathTemplate) -> Self {
        Self {
            method,
            path,
            params: HashMap::new(),
            body: None,
        }
    }

    pub fn get(path: &str) -> ClientResult<Self> {
        Ok(Self::new(Method::GET, PathTemplate::parse(path)?))
    }

    /// Bind a path parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(name.into(), value.to_string());
        self
    }

    /// Attach a JSON body.
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Resolve the full URL for this request against a base URL.
    pub fn url(&self, base: &Url) -> ClientResult<Url> {
        self.path.expand_onto(base, &self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:8081").unwrap()
    }

    #[test]
    fn test_expands_user_lookup() {
        let request = ServiceRequest::get("/api/users/{id}").unwrap().param("id", 42);
        assert_eq!(
            request.url(&base()).unwrap().as_str(),
            "http://localhost:8081/api/users/42"
        );
    }

    #[test]
    fn test_param_values_are_encoded() {
        let request = ServiceRequest::get("/api/users/{id}")
            .unwrap()
            .param("id", "a b/c");
        assert_eq!(
            request.url(&base()).unwrap().as_str(),
            "http://localhost:8081/api/users/a%20b%2Fc"
        );
    }

    #[test]
    fn test_keeps_base_path() {
        let base = Url::parse("http://users.internal/v2/").unwrap();
        let request = ServiceRequest::get("/api/users/{id}").unwrap().param("id", 1);
        assert_eq!(
            request.url(&base).unwrap().as_str(),
            "http://users.internal/v2/api/users/1"
        );
    }

    #[test]
    fn test_missing_param() {
        let request = ServiceRequest::get("/api/users/{id}").unwrap();
        let err = request.url(&base()).unwrap_err();
        assert!(err.to_string().contains("missing parameter 'id'"));
    }

    #[test]
    fn test_rejects_partial_placeholders() {
        assert!(PathTemplate::parse("/api/users/id-{id}").is_err());
        assert!(PathTemplate::parse("/api/users/{}").is_err());
        assert!(PathTemplate::parse("api/users").is_err());
    }

    #[test]
    fn test_lists_params() {
        let template = PathTemplate::parse("/api/challenges/{challenge}/members/{user}").unwrap();
        assert_eq!(template.params().collect::<Vec<_>>(), ["challenge", "user"]);
    }
}
