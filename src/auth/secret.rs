// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing secret resolution.

use base64ct::{Base64, Encoding};

use super::TokenError;

/// Resolves the shared HMAC secret used to sign and verify tokens.
pub trait SecretResolver: Send + Sync {
    fn resolve_secret(&self) -> Result<Vec<u8>, TokenError>;
}

/// Secret held as a standard, padded base64 string and decoded on every use.
#[derive(Clone)]
pub struct Base64Secret {
    encoded: String,
}

impl Base64Secret {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self {
            encoded: encoded.into(),
        }
    }
}

impl SecretResolver for Base64Secret {
    fn resolve_secret(&self) -> Result<Vec<u8>, TokenError> {
        Base64::decode_vec(&self.encoded).map_err(|e| TokenError::Decode(e.to_string()))
    }
}

impl std::fmt::Debug for Base64Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Base64Secret")
            .field("encoded", &"[REDACTED]")
            .finish()
    }
}
