// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! [`TokenError`] covers failures inside the token components; [`AuthError`]
//! is what the bearer gate rejects a request with.

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Failure while resolving the secret, issuing or verifying a token.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Configured secret is not valid base64
    #[error("failed to decode secret: {0}")]
    Decode(String),

    /// Token could not be signed (includes an unresolvable secret at issuance)
    #[error("failed to sign token: {0}")]
    Signing(String),

    /// Token is malformed, its signature does not match or it uses another algorithm
    #[error("failed to parse token: {0}")]
    Parse(#[source] jsonwebtoken::errors::Error),

    /// Token expiry is in the past
    #[error("token has expired")]
    Expired,

    /// Token was issued for a different audience
    #[error("incorrect audience, audience found: {0}")]
    Audience(String),
}

/// Rejection produced by the bearer gate.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header, or one without the `Bearer ` prefix
    #[error("bearer token required")]
    MissingBearer,

    /// Bearer token present but failed verification
    #[error("invalid bearer token: {0}")]
    InvalidToken(#[from] TokenError),
}

impl AuthError {
    /// Get the error code reported in the response body.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingBearer => "UNAUTHORIZED",
            AuthError::InvalidToken(_) => "INVALID_TOKEN",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingBearer => {
                let mut response =
                    ApiError::new(self.status_code(), self.error_code(), "").into_response();
                response
                    .headers_mut()
                    .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                response
            }
            AuthError::InvalidToken(_) => {
                ApiError::new(self.status_code(), self.error_code(), "auth token invalid")
                    .into_response()
            }
        }
    }
}
