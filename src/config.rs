// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup and is immutable afterwards.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATABASE_PATH` | Path of the embedded course/credential database | `data/courses.redb` |
//! | `TOKEN_SECRET` | HMAC secret used to sign bearer tokens | Required |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;

use thiserror::Error;

/// Environment variable name for the database file path.
pub const DATABASE_PATH_ENV: &str = "DATABASE_PATH";

/// Environment variable name for the token signing secret.
pub const TOKEN_SECRET_ENV: &str = "TOKEN_SECRET";

/// Environment variable name for the bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default database location, relative to the working directory.
pub const DEFAULT_DATABASE_PATH: &str = "data/courses.redb";

pub const DEFAULT_HOST: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 8080;

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TOKEN_SECRET must be set")]
    MissingTokenSecret,

    #[error("TOKEN_SECRET must not be empty")]
    EmptyTokenSecret,

    #[error("PORT is not a valid port: {0}")]
    InvalidPort(String),

    #[error("LOG_FORMAT must be `json` or `pretty`, got `{0}`")]
    InvalidLogFormat(String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(ConfigError::InvalidLogFormat(other.to_string())),
        }
    }
}

/// Process-wide server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_path: PathBuf,
    pub token_secret: String,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token_secret = lookup(TOKEN_SECRET_ENV).ok_or(ConfigError::MissingTokenSecret)?;
        if token_secret.trim().is_empty() {
            return Err(ConfigError::EmptyTokenSecret);
        }

        let port = match lookup(PORT_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let log_format = match lookup(LOG_FORMAT_ENV) {
            Some(raw) => LogFormat::parse(&raw)?,
            None => LogFormat::default(),
        };

        Ok(Self {
            database_path: lookup(DATABASE_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            token_secret,
            host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            log_format,
        })
    }

    /// `host:port` string suitable for binding a listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = ServerConfig::from_lookup(lookup_from(&[(TOKEN_SECRET_ENV, "s3cret")])).unwrap();
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn missing_secret_is_rejected() {
        let err = ServerConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingTokenSecret);

        let err = ServerConfig::from_lookup(lookup_from(&[(TOKEN_SECRET_ENV, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::EmptyTokenSecret);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            (TOKEN_SECRET_ENV, "s3cret"),
            (DATABASE_PATH_ENV, "/tmp/x.redb"),
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "3000"),
            (LOG_FORMAT_ENV, "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/x.redb"));
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn bad_port_and_log_format_are_rejected() {
        let err = ServerConfig::from_lookup(lookup_from(&[
            (TOKEN_SECRET_ENV, "s3cret"),
            (PORT_ENV, "eighty"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort("eighty".to_string()));

        let err = ServerConfig::from_lookup(lookup_from(&[
            (TOKEN_SECRET_ENV, "s3cret"),
            (LOG_FORMAT_ENV, "xml"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidLogFormat("xml".to_string()));
    }
}
