// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./plinth.toml` > `~/.config/plinth/plinth.toml` > `/etc/plinth/plinth.toml`
//! with environment variable overrides via `PLINTH_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PlinthConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG: &str = "/etc/plinth/plinth.toml";

/// Config file in the working directory.
pub const LOCAL_CONFIG: &str = "plinth.toml";

/// Per-user config file under the XDG config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("plinth/plinth.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/plinth/plinth.toml`
/// 3. `~/.config/plinth/plinth.toml`
/// 4. `./plinth.toml`
/// 5. `PLINTH_*` environment variables
pub fn load_config() -> Result<PlinthConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string over the compiled defaults.
pub fn load_config_from_str(toml_content: &str) -> Result<PlinthConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PlinthConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PlinthConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PlinthConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The full layered Figment, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PlinthConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Environment provider with an explicit section mapping.
///
/// `PLINTH_PLUGINS_DEFAULT_CLASS` must map to `plugins.default_class`, so the
/// first underscore after the section name is the only split point. Keys
/// arrive with their original case.
fn env_provider() -> Env {
    Env::prefixed("PLINTH_").map(|key| {
        key.as_str()
            .to_ascii_lowercase()
            .replacen("log_", "log.", 1)
            .replacen("plugins_", "plugins.", 1)
            .replacen("platform_", "platform.", 1)
            .into()
    })
}
