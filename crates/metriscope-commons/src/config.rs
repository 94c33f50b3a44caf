//! Server and store configuration.
//!
//! Everything is sourced from the process environment. The only
//! mandatory piece of external configuration is the table-store
//! connection string; when it is absent the server still starts and
//! every store-backed endpoint reports "not configured" instead.

use serde::{Deserialize, Serialize};
use std::env;

use crate::errors::{StoreError, StoreResult};

/// Main server configuration, assembled from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (METRISCOPE_HOST, default 127.0.0.1).
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port (METRISCOPE_PORT, default 8080).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base log level (METRISCOPE_LOG_LEVEL, default "info").
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "compact" or "json" (METRISCOPE_LOG_FORMAT).
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Table-store connection string (TABLES_CONNECTION_STRING).
    /// `None` when unset or blank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            connection_string: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment, falling back to
    /// defaults for anything unset. Never fails: a missing or blank
    /// connection string is recorded as `None`, not an error.
    pub fn from_env() -> Self {
        let connection_string = env::var("TABLES_CONNECTION_STRING")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            host: env::var("METRISCOPE_HOST").unwrap_or_else(|_| default_host()),
            port: env::var("METRISCOPE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(default_port),
            log_level: env::var("METRISCOPE_LOG_LEVEL").unwrap_or_else(|_| default_log_level()),
            log_format: env::var("METRISCOPE_LOG_FORMAT").unwrap_or_else(|_| default_log_format()),
            connection_string,
        }
    }

    /// Socket address string suitable for `HttpServer::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parsed table-store connection settings.
///
/// The connection string follows the common `Key=Value;Key=Value;...`
/// shape: `AccountName` and `AccountKey` are required, the endpoint is
/// either given explicitly via `TableEndpoint` (the Azurite/emulator
/// case) or derived from the account name and endpoint suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConnection {
    /// Storage account name; also part of the signature's canonical resource.
    pub account: String,
    /// Base64-encoded shared key used to sign requests.
    pub key: String,
    /// Table service endpoint, no trailing slash.
    pub endpoint: String,
}

impl StoreConnection {
    /// Parse a connection string. Unrecognized keys are ignored.
    pub fn parse(raw: &str) -> StoreResult<Self> {
        let mut account = None;
        let mut key = None;
        let mut endpoint = None;
        let mut protocol = "https".to_string();
        let mut suffix = "core.windows.net".to_string();

        for part in raw.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let Some((name, value)) = part.split_once('=') else {
                return Err(StoreError::InvalidConfig(format!(
                    "malformed connection string segment: {part:?}"
                )));
            };
            match name {
                "AccountName" => account = Some(value.to_string()),
                // AccountKey is base64 and may itself contain '=' padding,
                // hence split_once above rather than a full split.
                "AccountKey" => key = Some(value.to_string()),
                "TableEndpoint" => endpoint = Some(value.trim_end_matches('/').to_string()),
                "DefaultEndpointsProtocol" => protocol = value.to_string(),
                "EndpointSuffix" => suffix = value.to_string(),
                _ => {}
            }
        }

        let account = account
            .filter(|a| !a.is_empty())
            .ok_or_else(|| StoreError::InvalidConfig("connection string is missing AccountName".into()))?;
        let key = key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| StoreError::InvalidConfig("connection string is missing AccountKey".into()))?;
        let endpoint = endpoint
            .unwrap_or_else(|| format!("{protocol}://{account}.table.{suffix}"));

        Ok(Self { account, key, endpoint })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_emulator_connection_string() {
        let conn = StoreConnection::parse(
            "DefaultEndpointsProtocol=http;AccountName=devstoreaccount1;\
             AccountKey=Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==;\
             TableEndpoint=http://127.0.0.1:10002/devstoreaccount1;",
        )
        .unwrap();
        assert_eq!(conn.account, "devstoreaccount1");
        assert_eq!(conn.endpoint, "http://127.0.0.1:10002/devstoreaccount1");
        assert!(conn.key.ends_with("=="));
    }

    #[test]
    fn derives_endpoint_from_account_and_suffix() {
        let conn = StoreConnection::parse(
            "DefaultEndpointsProtocol=https;AccountName=metrics;AccountKey=c2VjcmV0;EndpointSuffix=core.windows.net",
        )
        .unwrap();
        assert_eq!(conn.endpoint, "https://metrics.table.core.windows.net");
    }

    #[test]
    fn missing_account_is_invalid() {
        let err = StoreConnection::parse("AccountKey=c2VjcmV0").unwrap_err();
        assert!(err.to_string().contains("AccountName"));
    }

    #[test]
    fn missing_key_is_invalid() {
        let err = StoreConnection::parse("AccountName=metrics").unwrap_err();
        assert!(err.to_string().contains("AccountKey"));
    }

    #[test]
    fn default_config_has_no_connection() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.bind_addr(), "127.0.0.1:8080");
        assert!(cfg.connection_string.is_none());
    }
}
