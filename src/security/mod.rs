//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request
//!     → cors.rs (preflight answered here; headers added on the way out)
//!     → [proxy handler]
//!     → headers.rs (hop-by-hop removal, X-Forwarded-*)
//!     → Upstream
//! ```
//!
//! # Design Decisions
//! - The default cross-origin policy is fully open (development only)
//! - No authentication at the gateway; upstreams own their access rules

pub mod cors;
pub mod headers;

pub use cors::cors_layer;
