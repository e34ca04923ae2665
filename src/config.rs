// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`Config`] value built once at startup. The config is handed to the token
//! components and the router explicitly; nothing reads the environment after
//! startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TOKEN_SECRET` | Base64-encoded HMAC signing secret | placeholder, override it |
//! | `TOKEN_AUDIENCE` | Audience claim issued and expected | `local` |
//! | `TOKEN_EXPIRES_IN_MINUTES` | Access token lifetime | `60` |
//! | `MAX_BODY_BYTES` | Upper bound on buffered request bodies | `2097152` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{env, net::SocketAddr, time::Duration};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TOKEN_SECRET_ENV: &str = "TOKEN_SECRET";
pub const TOKEN_AUDIENCE_ENV: &str = "TOKEN_AUDIENCE";
pub const TOKEN_EXPIRES_IN_ENV: &str = "TOKEN_EXPIRES_IN_MINUTES";
pub const MAX_BODY_BYTES_ENV: &str = "MAX_BODY_BYTES";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Placeholder signing secret. Any real deployment must set `TOKEN_SECRET`.
pub const DEFAULT_TOKEN_SECRET: &str = "NXY4eS9CP0UoSCtLYlBlU2hWbVlxM3Q2dzl6JEMmRik=";
pub const DEFAULT_TOKEN_AUDIENCE: &str = "local";
pub const DEFAULT_EXPIRES_IN_MINUTES: u64 = 60;
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Default `RUST_LOG` filter when none is set.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("Invalid bind address {0}: {1}")]
    InvalidBindAddr(String, String),
}

/// Token settings shared by the claims builder, issuer and verifier.
#[derive(Clone)]
pub struct TokenConfig {
    /// Base64 (standard alphabet, padded) encoding of the HMAC secret.
    pub secret: String,
    pub audience: String,
    pub expires_in: Duration,
}

impl TokenConfig {
    /// Token lifetime in whole seconds, as reported to clients.
    pub fn expires_in_secs(&self) -> u32 {
        u32::try_from(self.expires_in.as_secs()).unwrap_or(u32::MAX)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_TOKEN_SECRET
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_TOKEN_SECRET.to_string(),
            audience: DEFAULT_TOKEN_AUDIENCE.to_string(),
            expires_in: Duration::from_secs(DEFAULT_EXPIRES_IN_MINUTES * 60),
        }
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"[REDACTED]")
            .field("audience", &self.audience)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub token: TokenConfig,
    pub max_body_bytes: usize,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            token: TokenConfig::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unset and empty values both resolve to the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port: u16 = parse_or(get(PORT_ENV), PORT_ENV, DEFAULT_PORT)?;
        let bind_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidBindAddr(format!("{host}:{port}"), e.to_string())
            })?;

        let expires_in_minutes: u64 = parse_or(
            get(TOKEN_EXPIRES_IN_ENV),
            TOKEN_EXPIRES_IN_ENV,
            DEFAULT_EXPIRES_IN_MINUTES,
        )?;

        let token = TokenConfig {
            secret: get(TOKEN_SECRET_ENV).unwrap_or_else(|| DEFAULT_TOKEN_SECRET.to_string()),
            audience: get(TOKEN_AUDIENCE_ENV).unwrap_or_else(|| DEFAULT_TOKEN_AUDIENCE.to_string()),
            expires_in: Duration::from_secs(expires_in_minutes.saturating_mul(60)),
        };

        let max_body_bytes = parse_or(
            get(MAX_BODY_BYTES_ENV),
            MAX_BODY_BYTES_ENV,
            DEFAULT_MAX_BODY_BYTES,
        )?;

        let log_format = match get(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue(LOG_FORMAT_ENV, other.to_string()));
            }
        };

        Ok(Self {
            bind_addr,
            token,
            max_body_bytes,
            log_format,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, v)),
        None => Ok(default),
    }
}
