// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend executable resolution.
//!
//! Plugin packages ship one backend binary per platform, named
//! `{base}_{os}_{arch}{ext}`. The OS and architecture identifiers follow the
//! naming used by plugin build tooling (`linux`, `darwin`, `windows`;
//! `amd64`, `arm64`, `386`), not Rust's target names, so [`Platform::host`]
//! translates them.

use std::path::{Path, PathBuf};

use plinth_core::PluginType;

/// Fixed binary base name for renderer plugins.
pub const RENDERER_EXECUTABLE: &str = "plugin_start";

/// Fixed binary base name for secrets manager plugins.
pub const SECRETS_MANAGER_EXECUTABLE: &str = "secrets_plugin_start";

/// Operating system and architecture used to pick a backend binary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
    os: String,
    arch: String,
}

impl Platform {
    /// A platform with explicit identifiers, lower-cased.
    pub fn new(os: impl AsRef<str>, arch: impl AsRef<str>) -> Self {
        Self {
            os: os.as_ref().to_lowercase(),
            arch: arch.as_ref().to_lowercase(),
        }
    }

    /// The platform this process is running on.
    pub fn host() -> Self {
        Self::new(
            plugin_os_name(std::env::consts::OS),
            plugin_arch_name(std::env::consts::ARCH),
        )
    }

    pub fn os(&self) -> &str {
        &self.os
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }

    /// File name of the binary for `base` on this platform.
    pub fn binary_name(&self, base: &str) -> String {
        let ext = if self.is_windows() { ".exe" } else { "" };
        format!("{base}_{}_{}{ext}", self.os, self.arch)
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::host()
    }
}

fn plugin_os_name(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

fn plugin_arch_name(arch: &str) -> &str {
    match arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}

/// Binary base name for a plugin of type `ty` declaring `declared`.
///
/// Renderer and secrets manager packages always use their fixed names.
pub fn executable_base(ty: PluginType, declared: &str) -> &str {
    match ty {
        PluginType::Renderer => RENDERER_EXECUTABLE,
        PluginType::SecretsManager => SECRETS_MANAGER_EXECUTABLE,
        PluginType::DataSource | PluginType::Panel | PluginType::App => declared,
    }
}

/// Full path of the backend binary under `base_dir`.
pub fn resolve_executable(
    ty: PluginType,
    declared: &str,
    base_dir: &Path,
    platform: &Platform,
) -> PathBuf {
    base_dir.join(platform.binary_name(executable_base(ty, declared)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_on_windows_gets_exe_suffix() {
        let path = resolve_executable(
            PluginType::Renderer,
            "ignored",
            Path::new("/plugins/r"),
            &Platform::new("windows", "amd64"),
        );
        assert_eq!(path, PathBuf::from("/plugins/r/plugin_start_windows_amd64.exe"));
    }

    #[test]
    fn renderer_on_linux() {
        let path = resolve_executable(
            PluginType::Renderer,
            "",
            Path::new("/plugins/r"),
            &Platform::new("linux", "amd64"),
        );
        assert_eq!(path, PathBuf::from("/plugins/r/plugin_start_linux_amd64"));
    }

    #[test]
    fn datasource_uses_declared_executable() {
        let path = resolve_executable(
            PluginType::DataSource,
            "gpx_foo",
            Path::new("/plugins/gpx"),
            &Platform::new("linux", "arm64"),
        );
        assert_eq!(path, PathBuf::from("/plugins/gpx/gpx_foo_linux_arm64"));
    }

    #[test]
    fn secrets_manager_uses_fixed_name() {
        let path = resolve_executable(
            PluginType::SecretsManager,
            "custom",
            Path::new("/plugins/s"),
            &Platform::new("Darwin", "ARM64"),
        );
        assert_eq!(path, PathBuf::from("/plugins/s/secrets_plugin_start_darwin_arm64"));
    }

    #[test]
    fn host_names_follow_plugin_conventions() {
        assert_eq!(plugin_arch_name("x86_64"), "amd64");
        assert_eq!(plugin_arch_name("aarch64"), "arm64");
        assert_eq!(plugin_arch_name("riscv64"), "riscv64");
        assert_eq!(plugin_os_name("macos"), "darwin");
        assert_eq!(plugin_os_name("linux"), "linux");

        let host = Platform::host();
        assert_eq!(host.is_windows(), cfg!(windows));
    }
}
