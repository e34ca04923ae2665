// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sum API - token-gated JSON digest service
//!
//! Issues HS256 access tokens and, for authenticated callers, sums every
//! number found in an arbitrary JSON document and returns the SHA-256 of the
//! sum.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token issuance, verification and the bearer gate
//! - `flatten` - Numeric leaf extraction from JSON
//! - `config` - Environment configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod flatten;
pub mod state;
pub mod telemetry;
