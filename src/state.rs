// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{
    auth::{Base64Secret, ClaimsBuilder, SecretResolver, TokenIssuer, TokenVerifier},
    config::Config,
};

/// Read-only per-process state handed to every handler.
///
/// Built once at startup; request handling never mutates it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub claims: ClaimsBuilder,
    pub issuer: TokenIssuer,
    pub verifier: TokenVerifier,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let keys: Arc<dyn SecretResolver> = Arc::new(Base64Secret::new(config.token.secret.clone()));
        Self::with_secret_resolver(config, keys)
    }

    /// Build the state with a caller-supplied secret resolver.
    pub fn with_secret_resolver(config: Config, keys: Arc<dyn SecretResolver>) -> Self {
        Self {
            claims: ClaimsBuilder::from_config(&config.token),
            issuer: TokenIssuer::new(keys.clone()),
            verifier: TokenVerifier::from_config(keys, &config.token),
            config: Arc::new(config),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
