//! Inter-service client subsystem.
//!
//! # Data Flow
//! ```text
//! UserClient::get_user_by_id(42)
//!     → request.rs (ServiceRequest: GET /api/users/{id}, id=42)
//!     → service.rs (resolve "user-service", send, await)
//!     → UserDto or ClientError
//! ```

pub mod error;
pub mod request;
pub mod service;
pub mod user;

pub use error::{ClientError, ClientResult};
pub use request::{PathTemplate, ServiceRequest};
pub use service::ServiceClient;
pub use user::{UserClient, UserDto, USER_SERVICE};
