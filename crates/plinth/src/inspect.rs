// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `plinth inspect` and `plinth list` command implementations.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use plinth_config::PlinthConfig;
use plinth_core::{Class, PluginError, PluginType, SignatureStatus, Target};
use plinth_plugin::{discover, load_plugin, Platform, Plugin, PluginRegistry};
use serde::Serialize;
use tracing::{debug, warn};

/// Structured descriptor summary for `--json` output.
#[derive(Debug, Serialize)]
pub struct PluginReport {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub plugin_type: PluginType,
    pub class: Class,
    pub signature: SignatureStatus,
    pub target: Target,
    pub executable: Option<PathBuf>,
    pub static_route: Option<PathBuf>,
    pub module: String,
    pub parent: Option<String>,
    pub children: Vec<String>,
}

impl PluginReport {
    fn from_plugin(plugin: &Plugin) -> Self {
        let manifest = plugin.manifest();
        let executable = if manifest.backend
            || plugin.is_renderer()
            || plugin.is_secrets_manager()
        {
            plugin.executable_path()
        } else {
            None
        };
        Self {
            id: plugin.id().to_string(),
            name: manifest.name.clone(),
            version: manifest.info.version.clone(),
            plugin_type: plugin.plugin_type(),
            class: plugin.class(),
            signature: plugin.signature().status(),
            target: plugin.target(),
            executable,
            static_route: plugin.static_route().map(|r| r.directory),
            module: plugin.module().module.clone(),
            parent: plugin.parent().map(str::to_string),
            children: plugin.children().to_vec(),
        }
    }
}

/// Platform used for executable resolution: the configured override, or
/// the host.
pub fn configured_platform(config: &PlinthConfig) -> Platform {
    match config.platform.pair() {
        Some((os, arch)) => Platform::new(os, arch),
        None => Platform::host(),
    }
}

// Plugins that fail to register (duplicate id, bad links) are skipped.
fn build_registry(plugins: Vec<Plugin>, platform: &Platform) -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    for plugin in plugins {
        let id = plugin.id().to_string();
        let base = plugin.base().map(|b| b.display().to_string()).unwrap_or_default();
        if let Err(e) = registry.register(plugin.with_platform(platform.clone())) {
            warn!(plugin_id = %id, base = %base, error = %e, "skipping plugin");
        }
    }
    registry
}

/// Run `plinth inspect <dir>`.
pub fn run_inspect(
    config: &PlinthConfig,
    dir: &Path,
    class: Option<Class>,
    json: bool,
    plain: bool,
) -> Result<(), PluginError> {
    let class = class.unwrap_or(config.plugins.default_class);
    let platform = configured_platform(config);
    debug!(dir = %dir.display(), %class, os = platform.os(), arch = platform.arch(), "inspecting plugin");

    let plugins = load_plugin(dir, class)?;
    let root_id = plugins
        .first()
        .map(|p| p.id().to_string())
        .ok_or_else(|| PluginError::NotExist {
            path: dir.to_path_buf(),
        })?;
    let registry = build_registry(plugins, &platform);

    let mut reports = Vec::new();
    if let Some(root) = registry.get(&root_id) {
        collect_reports(&registry, &root, &mut reports);
    }

    if json {
        print_json(&reports)
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        for report in &reports {
            print_report(report, use_color);
        }
        Ok(())
    }
}

// Root first, then descendants depth-first.
fn collect_reports(registry: &PluginRegistry, plugin: &Arc<Plugin>, out: &mut Vec<PluginReport>) {
    out.push(PluginReport::from_plugin(plugin));
    for child in registry.children(plugin.id()) {
        collect_reports(registry, &child, out);
    }
}

/// Run `plinth list [root]`.
pub fn run_list(
    config: &PlinthConfig,
    root: Option<&Path>,
    plugin_type: Option<PluginType>,
    json: bool,
) -> Result<(), PluginError> {
    let root = root.unwrap_or(config.plugins.dir.as_path());
    let plugins = discover(root, config.plugins.default_class)?;
    let registry = build_registry(plugins, &configured_platform(config));

    let selected = match plugin_type {
        Some(ty) => registry.find_by_type(ty),
        None => registry.list(),
    };
    let reports: Vec<PluginReport> = selected
        .iter()
        .map(|p| PluginReport::from_plugin(p))
        .collect();

    if json {
        return print_json(&reports);
    }
    if reports.is_empty() {
        println!("no plugins found under {}", root.display());
        return Ok(());
    }
    println!("{:<32} {:<14} {:<9} {:<10}", "ID", "TYPE", "CLASS", "VERSION");
    for report in &reports {
        println!(
            "{:<32} {:<14} {:<9} {:<10}",
            report.id, report.plugin_type, report.class, report.version
        );
    }
    Ok(())
}

fn print_json(reports: &[PluginReport]) -> Result<(), PluginError> {
    let rendered = serde_json::to_string_pretty(reports)
        .map_err(|e| PluginError::Internal(format!("failed to render report: {e}")))?;
    println!("{rendered}");
    Ok(())
}

fn print_report(report: &PluginReport, use_color: bool) {
    println!();
    if use_color {
        use colored::Colorize;
        println!("  {} ({})", report.id.bold(), report.name);
    } else {
        println!("  {} ({})", report.id, report.name);
    }
    println!("  {}", "-".repeat(35));
    println!("    Type:       {}", report.plugin_type);
    println!("    Class:      {}", report.class);
    println!("    Signature:  {}", report.signature);
    println!("    Target:     {}", report.target);
    println!("    Module:     {}", report.module);
    println!("    Executable: {}", display_or_none(report.executable.as_deref()));
    println!("    Static:     {}", display_or_none(report.static_route.as_deref()));
    if let Some(parent) = &report.parent {
        println!("    Parent:     {parent}");
    }
    if !report.children.is_empty() {
        println!("    Children:   {}", report.children.join(", "));
    }
}

fn display_or_none(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_manifest(dir: &Path, json: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join("plugin.json"), json).unwrap();
    }

    fn config_for(dir: &Path) -> PlinthConfig {
        let mut config = PlinthConfig::default();
        config.plugins.dir = dir.to_path_buf();
        config.platform.os = Some("linux".to_string());
        config.platform.arch = Some("amd64".to_string());
        config
    }

    #[test]
    fn report_resolves_executable_for_configured_platform() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(
            dir.path(),
            r#"{"id": "acme-datasource", "type": "datasource", "name": "Acme",
                "backend": true, "executable": "gpx_acme", "info": {"version": "1.2.0"}}"#,
        );
        let config = config_for(dir.path());

        let plugins = load_plugin(dir.path(), Class::External).unwrap();
        let registry = build_registry(plugins, &configured_platform(&config));
        let plugin = registry.get("acme-datasource").unwrap();
        let report = PluginReport::from_plugin(&plugin);

        let base = dir.path().canonicalize().unwrap();
        assert_eq!(report.executable, Some(base.join("gpx_acme_linux_amd64")));
        assert_eq!(report.static_route, Some(base));
        assert_eq!(report.target, Target::Unknown);
        assert_eq!(report.version, "1.2.0");
    }

    #[test]
    fn frontend_only_plugin_has_no_executable() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), r#"{"id": "acme-panel", "type": "panel", "name": "Panel"}"#);
        let plugins = load_plugin(dir.path(), Class::Core).unwrap();
        let report = PluginReport::from_plugin(&plugins[0]);
        assert!(report.executable.is_none());
        assert!(report.static_route.is_none());
        assert_eq!(report.target, Target::None);
        assert_eq!(report.signature, SignatureStatus::Internal);
    }

    #[test]
    fn inspect_and_list_succeed_on_a_tree() {
        let root = tempfile::tempdir().unwrap();
        write_manifest(
            &root.path().join("acme-app"),
            r#"{"id": "acme-app", "type": "app", "name": "Acme"}"#,
        );
        write_manifest(
            &root.path().join("acme-app/panels/status"),
            r#"{"id": "acme-status-panel", "type": "panel", "name": "Status"}"#,
        );
        let config = config_for(root.path());

        run_inspect(&config, &root.path().join("acme-app"), None, true, true).unwrap();
        run_list(&config, None, None, false).unwrap();
        run_list(&config, None, Some(PluginType::Panel), true).unwrap();
    }

    #[test]
    fn duplicate_ids_are_skipped_when_listing() {
        let root = tempfile::tempdir().unwrap();
        write_manifest(
            &root.path().join("one"),
            r#"{"id": "dup", "type": "panel", "name": "One"}"#,
        );
        write_manifest(
            &root.path().join("two"),
            r#"{"id": "dup", "type": "panel", "name": "Two"}"#,
        );
        write_manifest(
            &root.path().join("three"),
            r#"{"id": "acme-three", "type": "datasource", "name": "Three"}"#,
        );
        let config = config_for(root.path());

        let plugins = discover(root.path(), Class::External).unwrap();
        let registry = build_registry(plugins, &configured_platform(&config));
        let ids: Vec<String> = registry.list().iter().map(|p| p.id().to_string()).collect();
        assert_eq!(ids, vec!["acme-three", "dup"]);
        assert_eq!(registry.get("dup").unwrap().manifest().name, "One");

        run_list(&config, None, None, true).unwrap();
    }

    #[test]
    fn inspect_missing_dir_fails() {
        let root = tempfile::tempdir().unwrap();
        let config = config_for(root.path());
        let err = run_inspect(&config, &root.path().join("absent"), None, false, true).unwrap_err();
        assert!(err.is_not_exist());
    }
}
