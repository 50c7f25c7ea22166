// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Plinth runtime.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use std::path::PathBuf;

use plinth_core::Class;
use serde::{Deserialize, Serialize};

/// Top-level Plinth configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlinthConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Where plugins are installed and how they are classified.
    #[serde(default)]
    pub plugins: PluginsConfig,

    /// Overrides for the platform used to pick backend binaries.
    #[serde(default)]
    pub platform: PlatformConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Plugin discovery settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginsConfig {
    /// Directory scanned for plugin directories.
    #[serde(default = "default_plugins_dir")]
    pub dir: PathBuf,

    /// Class assigned to plugins found under `dir`.
    #[serde(default = "default_class")]
    pub default_class: Class,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            dir: default_plugins_dir(),
            default_class: default_class(),
        }
    }
}

fn default_plugins_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("plinth/plugins"))
        .unwrap_or_else(|| PathBuf::from("plugins"))
}

fn default_class() -> Class {
    Class::External
}

/// Platform override. Both fields must be set together; when neither is
/// set the host platform is used.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformConfig {
    /// Operating system identifier, e.g. `linux`, `darwin`, `windows`.
    #[serde(default)]
    pub os: Option<String>,

    /// Architecture identifier, e.g. `amd64`, `arm64`.
    #[serde(default)]
    pub arch: Option<String>,
}

impl PlatformConfig {
    /// The configured `(os, arch)` pair, if both are set.
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (self.os.as_deref(), self.arch.as_deref()) {
            (Some(os), Some(arch)) => Some((os, arch)),
            _ => None,
        }
    }
}
