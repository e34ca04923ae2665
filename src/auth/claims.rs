// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and the authenticated user representation.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::TokenConfig;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username the token was issued to)
    #[serde(default)]
    pub sub: String,

    /// Expiration timestamp (Unix seconds)
    pub exp: i64,

    /// Audience (trust domain the token was issued for)
    #[serde(default)]
    pub aud: String,
}

/// Builds claims for newly issued tokens.
#[derive(Debug, Clone)]
pub struct ClaimsBuilder {
    audience: String,
    expires_in: Duration,
}

impl ClaimsBuilder {
    pub fn new(audience: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            audience: audience.into(),
            expires_in,
        }
    }

    pub fn from_config(config: &TokenConfig) -> Self {
        Self::new(config.audience.clone(), config.expires_in)
    }

    /// Claims for `subject` expiring one configured lifetime after `now`.
    ///
    /// The subject is not validated here.
    pub fn build(&self, subject: &str, now: DateTime<Utc>) -> Claims {
        let lifetime = i64::try_from(self.expires_in.as_secs()).unwrap_or(i64::MAX);

        Claims {
            sub: subject.to_string(),
            exp: now.timestamp().saturating_add(lifetime),
            aud: self.audience.clone(),
        }
    }
}

/// Identity attached to a request once its bearer token is verified.
///
/// Handlers do not read it today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Token subject
    pub user_id: String,
}
