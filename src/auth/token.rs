// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 token issuance and verification.
//!
//! Tokens are stateless: validity is decided by re-checking the signature,
//! expiry and audience on every presentation. There is no revocation.

use std::sync::Arc;

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use super::{Claims, SecretResolver, TokenError};
use crate::config::TokenConfig;

/// Expiry is checked without clock skew tolerance.
const EXPIRY_LEEWAY: u64 = 0;

/// Signs claims into a compact JWT.
#[derive(Clone)]
pub struct TokenIssuer {
    keys: Arc<dyn SecretResolver>,
}

impl TokenIssuer {
    pub fn new(keys: Arc<dyn SecretResolver>) -> Self {
        Self { keys }
    }

    /// Sign `claims` with HMAC-SHA256.
    ///
    /// Identical claims and secret always produce the same token.
    pub fn issue(&self, claims: &Claims) -> Result<String, TokenError> {
        let secret = self
            .keys
            .resolve_secret()
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(&secret),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

/// Verifies tokens produced by [`TokenIssuer`] and extracts their subject.
#[derive(Clone)]
pub struct TokenVerifier {
    keys: Arc<dyn SecretResolver>,
    audience: String,
}

impl TokenVerifier {
    pub fn new(keys: Arc<dyn SecretResolver>, audience: impl Into<String>) -> Self {
        Self {
            keys,
            audience: audience.into(),
        }
    }

    pub fn from_config(keys: Arc<dyn SecretResolver>, config: &TokenConfig) -> Self {
        Self::new(keys, config.audience.clone())
    }

    /// Verify `token` and return its subject unmodified.
    ///
    /// Signature, expiry and any `nbf` claim are checked first, then the
    /// audience.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let secret = self.keys.resolve_secret()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = EXPIRY_LEEWAY;
        validation.validate_nbf = true;
        // Audience is compared below so a mismatch keeps its own error kind.
        validation.validate_aud = false;

        let token_data = decode::<Claims>(token, &DecodingKey::from_secret(&secret), &validation)
            .map_err(|e| {
                if matches!(e.kind(), ErrorKind::ExpiredSignature) {
                    TokenError::Expired
                } else {
                    TokenError::Parse(e)
                }
            })?;

        let claims = token_data.claims;
        if claims.aud != self.audience {
            return Err(TokenError::Audience(claims.aud));
        }

        Ok(claims.sub)
    }
}
