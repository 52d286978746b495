//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → [security::cors answers preflights, decorates responses]
//!     → [routing decides the route]
//!     → [registry resolves the service address]
//!     → server.rs (forward upstream, stream response)
//!     → response.rs (gateway-generated errors only)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::GatewayError;
pub use server::{AppState, GatewayServer};
