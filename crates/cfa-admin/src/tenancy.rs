//! Tenant identity and the acting principal supplied by the auth collaborator.

use std::fmt;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Declares a `u64` backed identifier for a stored entity.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pub(crate) use entity_id;

entity_id!(
    /// Isolation boundary carried by every stored record.
    TenantId
);

entity_id!(UserId);

pub const TENANT_HEADER: &str = "x-tenant-id";
pub const USER_HEADER: &str = "x-user-id";
pub const ROLE_HEADER: &str = "x-user-role";

const DEFAULT_ROLE: &str = "admin";

/// Acting principal as validated upstream by the auth collaborator.
///
/// The core trusts this tuple; it never accepts a tenant identifier from a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub tenant_id: TenantId,
    pub role: String,
}

impl Principal {
    pub fn new(user_id: UserId, tenant_id: TenantId, role: impl Into<String>) -> Self {
        Self {
            user_id,
            tenant_id,
            role: role.into(),
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Result<Self, PrincipalRejection> {
        let tenant_id = numeric_header(headers, TENANT_HEADER)?;
        let user_id = numeric_header(headers, USER_HEADER)?;
        let role = headers
            .get(ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_ROLE)
            .to_string();

        Ok(Self {
            user_id: UserId(user_id),
            tenant_id: TenantId(tenant_id),
            role,
        })
    }
}

fn numeric_header(headers: &HeaderMap, name: &'static str) -> Result<u64, PrincipalRejection> {
    let raw = headers
        .get(name)
        .ok_or(PrincipalRejection::Missing(name))?
        .to_str()
        .map_err(|_| PrincipalRejection::Malformed(name))?;
    raw.trim()
        .parse::<u64>()
        .map_err(|_| PrincipalRejection::Malformed(name))
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = PrincipalRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Principal::from_headers(&parts.headers)
    }
}

/// Raised when the upstream auth headers are absent or unreadable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrincipalRejection {
    Missing(&'static str),
    Malformed(&'static str),
}

impl fmt::Display for PrincipalRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrincipalRejection::Missing(header) => write!(f, "missing {header} header"),
            PrincipalRejection::Malformed(header) => write!(f, "malformed {header} header"),
        }
    }
}

impl axum::response::IntoResponse for PrincipalRejection {
    fn into_response(self) -> axum::response::Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn principal_reads_auth_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(TENANT_HEADER, HeaderValue::from_static("7"));
        headers.insert(USER_HEADER, HeaderValue::from_static("42"));
        headers.insert(ROLE_HEADER, HeaderValue::from_static("manager"));

        let principal = Principal::from_headers(&headers).expect("headers parse");
        assert_eq!(principal.tenant_id, TenantId(7));
        assert_eq!(principal.user_id, UserId(42));
        assert_eq!(principal.role, "manager");
    }

    #[test]
    fn role_defaults_to_admin() {
        let mut headers = HeaderMap::new();
        headers.insert(TENANT_HEADER, HeaderValue::from_static("1"));
        headers.insert(USER_HEADER, HeaderValue::from_static("1"));

        let principal = Principal::from_headers(&headers).expect("headers parse");
        assert_eq!(principal.role, "admin");
    }

    #[test]
    fn missing_tenant_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_HEADER, HeaderValue::from_static("1"));

        assert_eq!(
            Principal::from_headers(&headers),
            Err(PrincipalRejection::Missing(TENANT_HEADER))
        );
    }

    #[test]
    fn non_numeric_tenant_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(TENANT_HEADER, HeaderValue::from_static("lyon"));
        headers.insert(USER_HEADER, HeaderValue::from_static("1"));

        assert_eq!(
            Principal::from_headers(&headers),
            Err(PrincipalRejection::Malformed(TENANT_HEADER))
        );
    }
}
