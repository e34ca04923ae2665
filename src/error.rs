// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Error returned to clients as `{http_status, code, desc}`.
///
/// Descriptions are fixed strings; internal error text is logged, never sent.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub desc: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric HTTP status, repeated in the body
    pub http_status: u16,
    pub code: String,
    pub desc: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, desc: impl Into<String>) -> Self {
        Self {
            status,
            code,
            desc: desc.into(),
        }
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "internal error",
        )
    }

    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", "")
    }

    pub fn bad_request() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD REQUEST", "")
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", "not found")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            http_status: self.status.as_u16(),
            code: self.code.to_string(),
            desc: self.desc,
        });
        (self.status, body).into_response()
    }
}
