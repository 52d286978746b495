//! User service lookups used by other services.

use serde::{Deserialize, Serialize};

use crate::client::error::ClientResult;
use crate::client::request::ServiceRequest;
use crate::client::service::ServiceClient;

/// Logical name of the user service in the registry.
pub const USER_SERVICE: &str = "user-service";

/// User payload as served by `GET /api/users/{id}`.
///
/// Only `id` is required; fields this crate does not model are kept in
/// `extra` so nothing the user service sends is lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Typed client for the user service.
#[derive(Debug, Clone)]
pub struct UserClient {
    inner: ServiceClient,
    service: String,
}

impl UserClient {
    pub fn new(inner: ServiceClient) -> Self {
        Self::for_service(inner, USER_SERVICE)
    }

    /// Target a user service registered under a different name.
    pub fn for_service(inner: ServiceClient, service: impl Into<String>) -> Self {
        Self {
            inner,
            service: service.into(),
        }
    }

    /// `GET /api/users/{id}`.
    ///
    /// An unknown id yields `ClientError::Status` with 404, never a default user.
    pub async fn get_user_by_id(&self, id: i64) -> ClientResult<UserDto> {
        let request = ServiceRequest::get("/api/users/{id}")?.param("id", id);
        self.inner.execute(&self.service, &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_dto_keeps_unknown_fields() {
        let user: UserDto = serde_json::from_str(
            r#"{"id":42,"name":"Alice","email":"alice@example.com","totalPoints":120}"#,
        )
        .unwrap();

        assert_eq!(user.id, 42);
        assert_eq!(user.name.as_deref(), Some("Alice"));
        assert_eq!(user.username, None);
        assert_eq!(user.extra.get("totalPoints"), Some(&serde_json::json!(120)));
    }

    #[test]
    fn test_user_dto_requires_id() {
        assert!(serde_json::from_str::<UserDto>(r#"{"name":"Alice"}"#).is_err());
    }
}
