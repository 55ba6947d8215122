//! # Authentication Middleware
//!
//! Static bearer-token authentication for the `/v1` API surface. When no
//! token is configured every request passes. Health probes and `/metrics`
//! are mounted outside this middleware.
//!
//! Token comparison is constant-time (`subtle::ConstantTimeEq`).

use axum::extract::Request;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;

use crate::error::AppError;

/// A secret that never shows up in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretString(***)")
    }
}

/// Authentication settings, injected as a request extension.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub token: Option<SecretString>,
}

/// Reject requests without a matching `Authorization: Bearer` header.
pub async fn auth_middleware(request: Request, next: Next) -> Response {
    let expected = request
        .extensions()
        .get::<AuthConfig>()
        .and_then(|config| config.token.clone());

    let Some(expected) = expected else {
        return next.run(request).await;
    };

    let verdict = bearer_token(&request).map(|presented| token_matches(presented, &expected));
    match verdict {
        Some(true) => next.run(request).await,
        Some(false) => {
            tracing::warn!(path = %request.uri().path(), "rejected request with invalid token");
            AppError::Unauthorized("invalid bearer token".to_string()).into_response()
        }
        None => AppError::Unauthorized("missing bearer token".to_string()).into_response(),
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

fn token_matches(presented: &str, expected: &SecretString) -> bool {
    presented.as_bytes().ct_eq(expected.expose().as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_is_redacted_in_debug() {
        let secret = SecretString::new("hunter2");
        assert_eq!(format!("{secret:?}"), "SecretString(***)");
        assert_eq!(secret.expose(), "hunter2");
    }

    #[test]
    fn token_comparison() {
        let expected = SecretString::new("abc123");
        assert!(token_matches("abc123", &expected));
        assert!(!token_matches("abc124", &expected));
        assert!(!token_matches("abc12", &expected));
        assert!(!token_matches("", &expected));
    }

    #[test]
    fn bearer_token_parsing() {
        let request = Request::builder()
            .header(AUTHORIZATION, "Bearer  tok ")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&request), Some("tok"));

        let basic = Request::builder()
            .header(AUTHORIZATION, "Basic dXNlcg==")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&basic), None);
    }
}
