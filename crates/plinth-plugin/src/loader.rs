// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loading plugin descriptors from disk.
//!
//! A plugin directory holds a `plugin.json` manifest. Any subdirectory that
//! holds its own `plugin.json` is a nested plugin and becomes a child of the
//! nearest enclosing plugin.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use plinth_core::{Class, PluginError, PluginFs, PluginType, Signature};
use tracing::{debug, warn};

use crate::fs::LocalFs;
use crate::manifest::{parse_manifest, Manifest, INCLUDE_DASHBOARD};
use crate::plugin::{AppFields, ModuleFields, Plugin};

/// Manifest file name inside a plugin directory.
pub const MANIFEST_FILE: &str = "plugin.json";

const INCLUDE_PAGE: &str = "page";

/// Load the plugin rooted at `dir` together with its nested plugins.
///
/// The returned list starts with the root plugin, followed by its
/// descendants depth-first. Parent and child links are set by id. A nested
/// plugin that fails to load is skipped with a warning; a failure for the
/// root plugin is returned.
pub fn load_plugin(dir: &Path, class: Class) -> Result<Vec<Plugin>, PluginError> {
    let mut out = Vec::new();
    load_tree(dir, class, None, &mut out)?;
    Ok(out)
}

/// Load every plugin directory directly under `root`.
///
/// Directories that fail to load are logged and skipped.
pub fn discover(root: &Path, class: Class) -> Result<Vec<Plugin>, PluginError> {
    let mut plugins = Vec::new();
    for dir in subdirectories(root)? {
        if !dir.join(MANIFEST_FILE).is_file() {
            debug!(dir = %dir.display(), "no plugin manifest, skipping");
            continue;
        }
        match load_plugin(&dir, class) {
            Ok(mut loaded) => plugins.append(&mut loaded),
            Err(e) => warn!(dir = %dir.display(), error = %e, "failed to load plugin"),
        }
    }
    Ok(plugins)
}

fn load_tree(
    dir: &Path,
    class: Class,
    parent: Option<(&str, PluginType)>,
    out: &mut Vec<Plugin>,
) -> Result<(), PluginError> {
    let fs = LocalFs::new(dir)?;
    let manifest = read_manifest(&fs)?;
    let id = manifest.id.clone();
    let ty = manifest.plugin_type;
    let app = app_fields(&manifest, parent);
    let module = module_fields(&manifest, class);
    let signature = if class == Class::Core {
        Signature::internal()
    } else {
        Signature::default()
    };

    let mut plugin = Plugin::new(manifest, Some(Arc::new(fs)), class)
        .with_signature(signature)
        .with_app_fields(app)
        .with_module(module);
    plugin.set_parent(parent.map(|(parent_id, _)| parent_id.to_string()));

    let index = out.len();
    out.push(plugin);

    let mut nested = Vec::new();
    find_nested(dir, &mut nested)?;
    for child_dir in nested {
        let before = out.len();
        match load_tree(&child_dir, class, Some((id.as_str(), ty)), out) {
            Ok(()) => {
                let child_id = out[before].id().to_string();
                out[index].add_child(child_id);
            }
            Err(e) => {
                out.truncate(before);
                warn!(plugin_id = %id, dir = %child_dir.display(), error = %e, "failed to load nested plugin");
            }
        }
    }
    Ok(())
}

fn read_manifest(fs: &LocalFs) -> Result<Manifest, PluginError> {
    let mut json = String::new();
    fs.open(Path::new(MANIFEST_FILE))?
        .read_to_string(&mut json)
        .map_err(|e| PluginError::ReadFailure {
            path: fs.base().join(MANIFEST_FILE),
            source: e,
        })?;
    parse_manifest(&json)
}

// Collect the nearest directories below `dir` that hold a manifest. Search
// stops at each hit; deeper plugins belong to that hit instead.
fn find_nested(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), PluginError> {
    for sub in subdirectories(dir)? {
        if sub.join(MANIFEST_FILE).is_file() {
            out.push(sub);
        } else {
            find_nested(&sub, out)?;
        }
    }
    Ok(())
}

// Real subdirectories of `dir`, sorted by name. Symlinks are not followed.
fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>, PluginError> {
    let entries = std::fs::read_dir(dir).map_err(|e| PluginError::ReadFailure {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PluginError::ReadFailure {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
        if is_dir && entry.file_name() != "node_modules" {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn app_fields(manifest: &Manifest, parent: Option<(&str, PluginType)>) -> AppFields {
    let included_in_app_id = parent
        .filter(|(_, ty)| *ty == PluginType::App)
        .map(|(id, _)| id.to_string());

    let default_nav_url = if manifest.plugin_type == PluginType::App {
        manifest
            .includes
            .iter()
            .find(|include| include.default_nav)
            .map(|include| match include.kind.as_str() {
                INCLUDE_PAGE => format!("/plugins/{}/page/{}", manifest.id, include.slug),
                INCLUDE_DASHBOARD => format!("/d/{}", include.uid),
                _ => String::new(),
            })
            .unwrap_or_default()
    } else {
        String::new()
    };

    AppFields {
        included_in_app_id,
        default_nav_url,
        pinned: false,
    }
}

fn module_fields(manifest: &Manifest, class: Class) -> ModuleFields {
    let id = &manifest.id;
    if class == Class::Core {
        ModuleFields {
            module: format!("core:plugin/{id}"),
            base_url: format!("public/app/plugins/{}/{id}", manifest.plugin_type),
        }
    } else {
        ModuleFields {
            module: format!("public/plugins/{id}/module.js"),
            base_url: format!("public/plugins/{id}"),
        }
    }
}
