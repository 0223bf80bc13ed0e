// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer token middleware for the admin routes.
//!
//! With a token configured, requests must carry `Authorization: Bearer <token>`.
//! Without one, admin routes are open in development and every request is
//! rejected in production (fail-closed).

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

/// Authentication configuration for the admin routes.
#[derive(Clone)]
pub struct AuthConfig {
    /// Expected bearer token. If `Some`, bearer auth is enforced.
    pub admin_token: Option<String>,
    /// Let requests through when no token is configured.
    pub open_without_token: bool,
}

impl AuthConfig {
    /// Auth for the given token and environment.
    pub fn new(admin_token: Option<String>, production: bool) -> Self {
        Self {
            admin_token: admin_token.filter(|t| !t.is_empty()),
            open_without_token: !production,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "admin_token",
                &self.admin_token.as_ref().map(|_| "[redacted]"),
            )
            .field("open_without_token", &self.open_without_token)
            .finish()
    }
}

/// Middleware that validates the admin bearer token.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected_token) = auth.admin_token.as_deref() else {
        if auth.open_without_token {
            return Ok(next.run(request).await);
        }
        tracing::error!("no admin token configured -- rejecting admin request");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if token == Some(expected_token) {
        Ok(next.run(request).await)
    } else {
        tracing::debug!(path = %request.uri().path(), "admin request rejected");
        Err(StatusCode::UNAUTHORIZED)
    }
}
