// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless HS256 access tokens for the Sum API.
//!
//! ## Auth Flow
//!
//! 1. Client posts `{username, password}` to `/sumapi/v1/auth`
//! 2. Server builds claims (`sub`, `exp`, `aud`) and signs them with the
//!    configured secret
//! 3. Client sends `Authorization: Bearer <token>` on every other route
//! 4. The gate in [`middleware`] verifies signature, expiry and audience
//!
//! ## Security
//!
//! - The password is accepted but not checked against any credential store
//! - No revocation; tokens die on expiry
//! - Expiry is checked with zero clock skew tolerance

pub mod claims;
pub mod error;
pub mod middleware;
pub mod secret;
pub mod token;

pub use claims::{AuthenticatedUser, Claims, ClaimsBuilder};
pub use error::{AuthError, TokenError};
pub use middleware::{require_bearer, AUTH_ROUTE};
pub use secret::{Base64Secret, SecretResolver};
pub use token::{TokenIssuer, TokenVerifier};
