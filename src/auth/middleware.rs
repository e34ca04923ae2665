// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token gate for the `/sumapi/v1` routes.
//!
//! Each request starts unverified and ends either admitted or rejected:
//!
//! 1. The token issuance route is admitted without a token.
//! 2. A missing `Authorization` header, or one not starting with `Bearer `,
//!    is rejected with `401` and `WWW-Authenticate: Bearer`.
//! 3. A token that fails verification is rejected with `401 INVALID_TOKEN`.
//! 4. Otherwise the request is admitted and the verified subject is stored in
//!    the request extensions as [`AuthenticatedUser`].
//!
//! The gate is layered over the whole nested router, so unmatched paths and
//! wrong methods under the prefix are gated too.

use axum::{
    extract::{OriginalUri, Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, AuthenticatedUser, TokenVerifier};
use crate::state::AppState;

/// Full path of the token issuance route, which bypasses the gate.
pub const AUTH_ROUTE: &str = "/sumapi/v1/auth";

const BEARER_PREFIX: &[u8] = b"Bearer ";

/// Outcome of gating a single request.
#[derive(Debug)]
pub enum GateDecision {
    /// Login route, no token inspected
    Bypass,
    /// Token verified
    Admit(AuthenticatedUser),
    Reject(AuthError),
}

/// Decide whether a request for `path` carrying `authorization` may proceed.
pub fn evaluate(
    path: &str,
    authorization: Option<&HeaderValue>,
    verifier: &TokenVerifier,
) -> GateDecision {
    if path == AUTH_ROUTE {
        return GateDecision::Bypass;
    }

    let Some(token) = authorization.and_then(|value| value.as_bytes().strip_prefix(BEARER_PREFIX))
    else {
        return GateDecision::Reject(AuthError::MissingBearer);
    };

    // Non-UTF-8 bytes cannot form a valid JWT and fail verification below.
    let token = String::from_utf8_lossy(token);

    match verifier.verify(&token) {
        Ok(user_id) => GateDecision::Admit(AuthenticatedUser { user_id }),
        Err(e) => GateDecision::Reject(AuthError::InvalidToken(e)),
    }
}

/// Authentication middleware function.
///
/// ```rust,ignore
/// Router::new()
///     .route("/sum", post(handler))
///     .layer(axum::middleware::from_fn_with_state(state.clone(), require_bearer));
/// ```
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // Inside a nested router the URI has the prefix stripped.
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    match evaluate(&path, request.headers().get(AUTHORIZATION), &state.verifier) {
        GateDecision::Bypass => next.run(request).await,
        GateDecision::Admit(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        GateDecision::Reject(e) => {
            if let AuthError::InvalidToken(ref cause) = e {
                tracing::warn!(error = %cause, path = %path, "failed to verify token");
            }
            e.into_response()
        }
    }
}
