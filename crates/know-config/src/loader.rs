// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./know.toml` > `~/.config/know/know.toml` > `/etc/know/know.toml`,
//! then the legacy unprefixed variables, then `KNOW_*` overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use tracing::debug;

use crate::model::KnowConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/know/know.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "know.toml";

/// Per-user config file under the XDG config dir, if one can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("know/know.toml"))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/know/know.toml`
/// 3. `~/.config/know/know.toml`
/// 4. `./know.toml`
/// 5. `OPENCODE_HOST`, `OPENCODE_PORT`, `PREFRONTAL_URL`, `PREFRONTAL_API_TOKEN`
/// 6. `KNOW_*` environment variables
pub fn load_config() -> Result<KnowConfig, figment::Error> {
    debug!(user_config = ?user_config_path(), "loading configuration");
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<KnowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KnowConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<KnowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KnowConfig::default()))
        .merge(Toml::file(path))
        .merge(legacy_env_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for the standard hierarchy (exposed for diagnostics).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(KnowConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(legacy_env_provider())
        .merge(env_provider())
}

/// `KNOW_*` variables, mapped section-first with `Env::map`.
///
/// `Env::split("_")` would turn `KNOW_OPENCODE_TIMEOUT_SECS` into
/// `opencode.timeout.secs`; only the first underscore after the section name
/// is a separator.
fn env_provider() -> Env {
    Env::prefixed("KNOW_").map(|key| section_key(&key.as_str().to_ascii_lowercase()).into())
}

/// Unprefixed variable names kept for existing deployments.
fn legacy_env_provider() -> Env {
    Env::raw()
        .only(&[
            "OPENCODE_HOST",
            "OPENCODE_PORT",
            "PREFRONTAL_URL",
            "PREFRONTAL_API_TOKEN",
        ])
        .map(|key| {
            match key.as_str().to_ascii_lowercase().as_str() {
                "prefrontal_api_token" => "prefrontal.token".to_string(),
                other => section_key(other),
            }
            .into()
        })
}

const SECTIONS: &[&str] = &[
    "general",
    "opencode",
    "prefrontal",
    "cache",
    "routing",
    "context",
];

fn section_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section) {
            if let Some(field) = rest.strip_prefix('_') {
                return format!("{section}.{field}");
            }
        }
    }
    key.to_string()
}
