//! Service registry subsystem.
//!
//! # Data Flow
//! ```text
//! [[services]] config (name, url)
//!     → static_registry.rs (parse & validate URLs, build table)
//!     → resolver.rs (ServiceResolver::resolve(name) → ServiceAddress)
//!     → used by the proxy handler and the inter-service client
//! ```
//!
//! # Design Decisions
//! - Addresses resolved once at startup; no health tracking, no discovery
//! - Callers depend on the `ServiceResolver` trait, not the static table

pub mod resolver;
pub mod static_registry;

pub use resolver::{RegistryError, ServiceAddress, ServiceResolver};
pub use static_registry::StaticRegistry;
