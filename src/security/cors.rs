//! Cross-origin policy.
//!
//! Wraps tower-http's `CorsLayer` with the gateway's `CorsConfig`. The layer
//! sits outside the proxy handler, so matched, unmatched, and failed requests
//! all get the same headers, and preflight requests are answered without
//! reaching any upstream.
//!
//! `CorsLayer` treats every `OPTIONS` request as a preflight. Only an
//! `OPTIONS` carrying both `Origin` and `Access-Control-Request-Method` is
//! one, so `mask_plain_options` and `unmask_plain_options` wrap the layer and
//! let other `OPTIONS` requests through as actual requests.

use std::time::Duration;

use axum::{
    extract::Request,
    http::{header, request::Parts, HeaderMap, HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

use crate::config::CorsConfig;

const WILDCARD: &str = "*";

/// Build the CORS layer.
///
/// With credentials enabled a literal `*` is not allowed on the wire, so
/// wildcard origins, methods and headers mirror the request instead.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let credentials = config.allow_credentials;

    let origin = if is_wildcard(&config.allowed_origin_patterns) {
        if credentials {
            AllowOrigin::mirror_request()
        } else {
            AllowOrigin::from(Any)
        }
    } else {
        let patterns = config.allowed_origin_patterns.clone();
        AllowOrigin::predicate(move |origin: &HeaderValue, _: &Parts| {
            origin
                .to_str()
                .map(|origin| patterns.iter().any(|p| origin_matches(p, origin)))
                .unwrap_or(false)
        })
    };

    let methods = if is_wildcard(&config.allowed_methods) {
        if credentials {
            AllowMethods::mirror_request()
        } else {
            AllowMethods::from(Any)
        }
    } else {
        AllowMethods::list(parse_all::<Method>(&config.allowed_methods, "method"))
    };

    let headers = if is_wildcard(&config.allowed_headers) {
        if credentials {
            AllowHeaders::mirror_request()
        } else {
            AllowHeaders::from(Any)
        }
    } else {
        AllowHeaders::list(parse_all::<HeaderName>(&config.allowed_headers, "header"))
    };

    let mut layer = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(credentials);

    if is_wildcard(&config.exposed_headers) && !credentials {
        layer = layer.expose_headers(Any);
    } else {
        if is_wildcard(&config.exposed_headers) {
            tracing::warn!("Ignoring '*' in exposed headers; not allowed with credentials");
        }
        let named: Vec<String> = config
            .exposed_headers
            .iter()
            .filter(|h| h.as_str() != WILDCARD)
            .cloned()
            .collect();
        if !named.is_empty() {
            layer = layer.expose_headers(parse_all::<HeaderName>(&named, "header"));
        }
    }
    if let Some(secs) = config.max_age_secs {
        layer = layer.max_age(Duration::from_secs(secs));
    }

    layer
}

/// True for a CORS preflight: `OPTIONS` with `Origin` and
/// `Access-Control-Request-Method`.
pub fn is_preflight(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(header::ORIGIN)
        && headers.contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

/// Marks a non-preflight `OPTIONS` request while it passes the CORS layer.
#[derive(Debug, Clone, Copy)]
struct PlainOptions;

/// Outer half: present a non-preflight `OPTIONS` to the CORS layer as `GET`.
pub async fn mask_plain_options(mut request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS && !is_preflight(request.method(), request.headers()) {
        request.extensions_mut().insert(PlainOptions);
        *request.method_mut() = Method::GET;
    }
    next.run(request).await
}

/// Inner half: restore `OPTIONS` before the request reaches the handler.
pub async fn unmask_plain_options(mut request: Request, next: Next) -> Response {
    if request.extensions_mut().remove::<PlainOptions>().is_some() {
        *request.method_mut() = Method::OPTIONS;
    }
    next.run(request).await
}

fn is_wildcard(values: &[String]) -> bool {
    values.iter().any(|v| v == WILDCARD)
}

fn parse_all<T: std::str::FromStr>(values: &[String], kind: &str) -> Vec<T> {
    values
        .iter()
        .filter_map(|v| match v.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                tracing::warn!(value = %v, kind, "Ignoring unparseable CORS entry");
                None
            }
        })
        .collect()
}

/// Glob match where `*` stands for any run of characters.
pub fn origin_matches(pattern: &str, origin: &str) -> bool {
    let mut parts = pattern.split('*');
    let Some(first) = parts.next() else {
        return false;
    };
    let Some(mut rest) = origin.strip_prefix(first) else {
        return false;
    };

    let tail: Vec<&str> = parts.collect();
    let Some((last, middle)) = tail.split_last() else {
        // No '*' in the pattern: exact match.
        return rest.is_empty();
    };

    for part in middle {
        match rest.find(part) {
            Some(idx) => rest = &rest[idx + part.len()..],
            None => return false,
        }
    }
    rest.ends_with(last)
}
