//! API gateway and inter-service client for the goal-tracking services.

pub mod client;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod routing;
pub mod security;

pub use client::{ServiceClient, UserClient, UserDto};
pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
pub use registry::{ServiceResolver, StaticRegistry};
