// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Application Configuration
 * Environment-driven configuration for the scanning engine
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use serde::Deserialize;
use tracing::info;

/// Caps on the number of secondary resources handed back to the
/// orchestrator, bounding total work per scan.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceCaps {
    #[serde(default = "default_max_scripts")]
    pub max_scripts: usize,
    #[serde(default = "default_max_links")]
    pub max_links: usize,
    #[serde(default = "default_max_media")]
    pub max_media: usize,
}

fn default_max_scripts() -> usize {
    15
}

fn default_max_links() -> usize {
    25
}

fn default_max_media() -> usize {
    25
}

impl Default for ResourceCaps {
    fn default() -> Self {
        Self {
            max_scripts: default_max_scripts(),
            max_links: default_max_links(),
            max_media: default_max_media(),
        }
    }
}

/// Application configuration with env overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_bind_host")]
    pub bind_host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Timeout for the primary-target fetch
    #[serde(default = "default_primary_timeout")]
    pub primary_timeout_secs: u64,

    /// Timeout for derived-resource fetches (scripts, links)
    #[serde(default = "default_derived_timeout")]
    pub derived_timeout_secs: u64,

    /// Timeout for sensitive-file probes
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Fetch batch size: all fetches within a batch run in parallel, and
    /// the whole batch completes before the next one starts
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Response body cap in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    #[serde(default)]
    pub resource_caps: ResourceCaps,
}

fn default_bind_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8471
}

fn default_primary_timeout() -> u64 {
    10
}

fn default_derived_timeout() -> u64 {
    8
}

fn default_probe_timeout() -> u64 {
    5
}

fn default_batch_size() -> usize {
    5
}

fn default_max_body_bytes() -> usize {
    5 * 1024 * 1024
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_host: default_bind_host(),
            port: default_port(),
            primary_timeout_secs: default_primary_timeout(),
            derived_timeout_secs: default_derived_timeout(),
            probe_timeout_secs: default_probe_timeout(),
            batch_size: default_batch_size(),
            max_body_bytes: default_max_body_bytes(),
            resource_caps: ResourceCaps::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("TUTKA_BIND_HOST") {
            config.bind_host = host;
        }
        if let Some(port) = env_parse("TUTKA_PORT") {
            config.port = port;
        }
        if let Some(timeout) = env_parse("TUTKA_PRIMARY_TIMEOUT_SECS") {
            config.primary_timeout_secs = timeout;
        }
        if let Some(timeout) = env_parse("TUTKA_DERIVED_TIMEOUT_SECS") {
            config.derived_timeout_secs = timeout;
        }
        if let Some(timeout) = env_parse("TUTKA_PROBE_TIMEOUT_SECS") {
            config.probe_timeout_secs = timeout;
        }
        if let Some(batch) = env_parse("TUTKA_BATCH_SIZE") {
            config.batch_size = batch;
        }
        if let Some(cap) = env_parse("TUTKA_MAX_BODY_BYTES") {
            config.max_body_bytes = cap;
        }

        info!(
            "[Config] bind={}:{} batch_size={} timeouts={}s/{}s/{}s",
            config.bind_host,
            config.port,
            config.batch_size,
            config.primary_timeout_secs,
            config.derived_timeout_secs,
            config.probe_timeout_secs
        );

        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.primary_timeout_secs, 10);
        assert_eq!(config.probe_timeout_secs, 5);
        assert_eq!(config.resource_caps.max_scripts, 15);
        assert_eq!(config.resource_caps.max_links, 25);
    }
}
