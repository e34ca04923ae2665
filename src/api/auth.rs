// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance endpoint.
//!
//! Any non-empty username and password pair receives a token; the password is
//! not checked against a credential store.

use axum::{
    body::{to_bytes, Body},
    extract::State,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::ApiError, state::AppState};

/// Credentials posted to obtain a token.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AuthRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Issued access token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    /// Signed HS256 JWT
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: u32,
}

/// Issue an access token for a username/password pair.
///
/// Unreadable or undecodable bodies are reported as internal errors.
#[utoipa::path(
    post,
    path = "/sumapi/v1/auth",
    tag = "Auth",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Token issued", body = AuthResponse),
        (status = 403, description = "Empty username or password", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody)
    )
)]
pub async fn issue_token(
    State(state): State<AppState>,
    body: Body,
) -> Result<Json<AuthResponse>, ApiError> {
    let bytes = to_bytes(body, state.config.max_body_bytes)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "failed to read request body");
            ApiError::internal()
        })?;

    // A `null` body carries no credentials and falls through to the 403 below.
    let request = serde_json::from_slice::<Option<AuthRequest>>(&bytes)
        .map_err(|e| {
            tracing::warn!(error = %e, "failed to decode auth request");
            ApiError::internal()
        })?
        .unwrap_or_default();

    if request.username.is_empty() || request.password.is_empty() {
        tracing::warn!("username or password is empty");
        return Err(ApiError::forbidden());
    }

    let claims = state.claims.build(&request.username, Utc::now());
    let token = state.issuer.issue(&claims).map_err(|e| {
        tracing::warn!(error = %e, "failed to generate token");
        ApiError::internal()
    })?;

    Ok(Json(AuthResponse {
        token,
        expires_in: state.config.token.expires_in_secs(),
    }))
}
