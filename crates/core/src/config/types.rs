use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

use crate::flatten::RowHeights;
use crate::ranking::DEFAULT_UPGRADE_TOLERANCE;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    /// Remote fleet API. Without it the server runs with an empty collection.
    #[serde(default)]
    pub upstream: Option<UpstreamConfig>,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Remote fleet API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Base URL (e.g., "http://localhost:7476")
    pub url: String,
    /// Sent as `X-API-Key` when set
    #[serde(default)]
    pub api_key: Option<String>,
    /// Torrent client instance whose releases are shown
    #[serde(default = "default_instance_id")]
    pub instance_id: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Seconds between snapshot refreshes (default: 30)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_instance_id() -> String {
    "default".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_poll_interval() -> u64 {
    30
}

/// Ranking and display tuning
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Points below the best score a member may be to count as an upgrade candidate
    #[serde(default = "default_upgrade_tolerance")]
    pub upgrade_tolerance: i32,
    #[serde(default)]
    pub row_heights: RowHeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            upgrade_tolerance: default_upgrade_tolerance(),
            row_heights: RowHeights::default(),
        }
    }
}

fn default_upgrade_tolerance() -> i32 {
    DEFAULT_UPGRADE_TOLERANCE
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<SanitizedUpstreamConfig>,
    pub engine: EngineConfig,
}

/// Sanitized upstream config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedUpstreamConfig {
    pub url: String,
    pub api_key_configured: bool,
    pub instance_id: String,
    pub timeout_secs: u32,
    pub poll_interval_secs: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            upstream: config.upstream.as_ref().map(|u| SanitizedUpstreamConfig {
                url: u.url.clone(),
                api_key_configured: u.api_key.as_deref().is_some_and(|k| !k.is_empty()),
                instance_id: u.instance_id.clone(),
                timeout_secs: u.timeout_secs,
                poll_interval_secs: u.poll_interval_secs,
            }),
            engine: config.engine.clone(),
        }
    }
}
