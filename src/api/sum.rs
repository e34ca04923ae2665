// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Digest endpoint.

use axum::{
    body::{to_bytes, Body},
    extract::State,
    Json,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

use crate::{error::ApiError, flatten::flatten, state::AppState};

/// Any JSON document.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct SumRequest(pub serde_json::Value);

/// Integer sum of all numeric leaves and the SHA-256 of its decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SumResponse {
    /// Lowercase hex SHA-256 of `sum.to_string()`
    pub sha256: String,
    pub sum: i64,
}

/// Sum `values` after truncating each toward zero, then hash the result.
///
/// Out-of-range leaves saturate to the `i64` bounds and the sum wraps.
pub fn digest(values: &[f64]) -> SumResponse {
    let sum = values
        .iter()
        .fold(0i64, |acc, value| acc.wrapping_add(value.trunc() as i64));

    SumResponse {
        sha256: hex::encode(Sha256::digest(sum.to_string().as_bytes())),
        sum,
    }
}

/// Sum every number in a JSON document.
#[utoipa::path(
    post,
    path = "/sumapi/v1/sum",
    tag = "Sum",
    security(("bearer_auth" = [])),
    request_body = SumRequest,
    responses(
        (status = 200, description = "Digest computed", body = SumResponse),
        (status = 400, description = "Body is not valid JSON", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody)
    )
)]
pub async fn compute_sum(
    State(state): State<AppState>,
    body: Body,
) -> Result<Json<SumResponse>, ApiError> {
    let bytes = to_bytes(body, state.config.max_body_bytes)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "failed to read request body");
            ApiError::internal()
        })?;

    let SumRequest(payload): SumRequest = serde_json::from_slice(&bytes).map_err(|e| {
        tracing::warn!(error = %e, "failed to decode sum payload");
        ApiError::bad_request()
    })?;

    Ok(Json(digest(&flatten(&payload))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_hashes_decimal_sum() {
        let result = digest(&[10.0, 14.0]);
        assert_eq!(result.sum, 24);
        assert_eq!(
            result.sha256,
            "c2356069e9d1e79ca924378153cfbbfb4d4416b1f99d41a2940bfdb66c5319db"
        );
    }

    #[test]
    fn digest_of_nothing_is_zero() {
        let result = digest(&[]);
        assert_eq!(result.sum, 0);
        assert_eq!(
            result.sha256,
            "5feceb66ffc86f38d952786c6d696c79c2dbc239dd4e91b46729d73a27fb57e9"
        );
    }

    #[test]
    fn fractions_truncate_toward_zero() {
        assert_eq!(digest(&[2.7]).sum, 2);
        assert_eq!(digest(&[-2.7]).sum, -2);
        assert_eq!(digest(&[0.5, 0.5, 0.5]).sum, 0);
    }

    #[test]
    fn negative_sum_hashes_with_sign() {
        let result = digest(&[-5.0]);
        assert_eq!(result.sum, -5);
        assert_eq!(result.sha256, hex::encode(Sha256::digest(b"-5")));
    }
}
