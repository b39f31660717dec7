// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the know query gateway.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so typos in `know.toml`
//! fail at startup instead of being silently ignored.

use std::collections::BTreeMap;

use know_core::Tier;
use serde::{Deserialize, Serialize};

/// Top-level know configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KnowConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// OpenCode serve (AI backend) connection.
    #[serde(default)]
    pub opencode: OpenCodeConfig,

    /// Prefrontal knowledge store connection.
    #[serde(default)]
    pub prefrontal: PrefrontalConfig,

    /// Response cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Model routing settings.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Knowledge context settings.
    #[serde(default)]
    pub context: ContextConfig,
}

/// Process-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// OpenCode serve connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenCodeConfig {
    #[serde(default = "default_opencode_host")]
    pub host: String,

    #[serde(default = "default_opencode_port")]
    pub port: u16,

    /// Timeout for session and prompt requests.
    #[serde(default = "default_opencode_timeout")]
    pub timeout_secs: u64,

    /// Timeout for the reachability probe used by `know health`.
    #[serde(default = "default_opencode_probe_timeout")]
    pub probe_timeout_secs: u64,
}

impl Default for OpenCodeConfig {
    fn default() -> Self {
        Self {
            host: default_opencode_host(),
            port: default_opencode_port(),
            timeout_secs: default_opencode_timeout(),
            probe_timeout_secs: default_opencode_probe_timeout(),
        }
    }
}

impl OpenCodeConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn default_opencode_host() -> String {
    "127.0.0.1".to_string()
}

fn default_opencode_port() -> u16 {
    4096
}

fn default_opencode_timeout() -> u64 {
    30
}

fn default_opencode_probe_timeout() -> u64 {
    2
}

/// Prefrontal knowledge store connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PrefrontalConfig {
    /// Base URL of the knowledge API.
    #[serde(default = "default_prefrontal_url")]
    pub url: String,

    /// Bearer token passed through on every request. `None` sends an empty token.
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_prefrontal_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_prefrontal_probe_timeout")]
    pub probe_timeout_secs: u64,
}

impl Default for PrefrontalConfig {
    fn default() -> Self {
        Self {
            url: default_prefrontal_url(),
            token: None,
            timeout_secs: default_prefrontal_timeout(),
            probe_timeout_secs: default_prefrontal_probe_timeout(),
        }
    }
}

fn default_prefrontal_url() -> String {
    "https://prefrontal-cortex.jordanpartridge.us/api/knowledge".to_string()
}

fn default_prefrontal_timeout() -> u64 {
    10
}

fn default_prefrontal_probe_timeout() -> u64 {
    3
}

/// Which key-value store backs the response cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// One file per entry under `cache.dir`; survives between invocations.
    #[default]
    File,
    /// Process-local map; useful for tests and long-running embedders.
    Memory,
}

/// Response cache settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Disabling turns every cache operation into a no-op.
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// Advisory time-to-live in seconds, enforced by the store.
    #[serde(default = "default_cache_ttl")]
    pub ttl: u64,

    #[serde(default)]
    pub backend: CacheBackend,

    /// Directory for the file backend.
    #[serde(default = "default_cache_dir")]
    pub dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl: default_cache_ttl(),
            backend: CacheBackend::default(),
            dir: default_cache_dir(),
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_cache_dir() -> String {
    dirs::cache_dir()
        .map(|p| p.join("know").display().to_string())
        .unwrap_or_else(|| ".know-cache".to_string())
}

/// A route-table override applied at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouteOverride {
    pub provider: String,
    pub model: String,
    #[serde(default = "default_override_tier")]
    pub tier: Tier,
}

fn default_override_tier() -> Tier {
    Tier::Balanced
}

/// Model routing settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Provider used for bare explicit model ids that match no shortcut.
    #[serde(default = "default_fallback_provider")]
    pub fallback_provider: String,

    /// Shortcut labels consulted when `consensus` is called without models.
    #[serde(default = "default_consensus_models")]
    pub consensus_models: Vec<String>,

    /// Per-intent overrides, e.g. `[routing.routes.code]`.
    #[serde(default)]
    pub routes: BTreeMap<String, RouteOverride>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            fallback_provider: default_fallback_provider(),
            consensus_models: default_consensus_models(),
            routes: BTreeMap::new(),
        }
    }
}

fn default_fallback_provider() -> String {
    "openrouter".to_string()
}

fn default_consensus_models() -> Vec<String> {
    vec!["claude".to_string(), "grok".to_string(), "gemini".to_string()]
}

/// Knowledge context settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContextConfig {
    /// Default maximum number of entries fetched per query.
    #[serde(default = "default_context_limit")]
    pub limit: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            limit: default_context_limit(),
        }
    }
}

fn default_context_limit() -> usize {
    10
}
