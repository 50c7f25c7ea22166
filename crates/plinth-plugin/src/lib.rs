// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin descriptors, manifests, and the registry.
//!
//! A [`Plugin`] is the runtime view of one installed plugin: its parsed
//! [`Manifest`], a sandboxed filesystem handle, classification, and an
//! optional backend client that capability calls are forwarded to. Loaded
//! descriptors live in a [`PluginRegistry`]; [`PluginDto`] is the read-only
//! snapshot handed to listing and display code.

pub mod classifier;
pub mod dto;
pub mod executable;
pub mod fs;
pub mod loader;
pub mod manifest;
pub mod plugin;
pub mod registry;
pub mod sanitize;

pub use classifier::{
    is_app, is_bundled_plugin, is_core_plugin, is_external_plugin, is_renderer,
    is_secrets_manager, is_valid_type,
};
pub use dto::PluginDto;
pub use executable::{resolve_executable, Platform, RENDERER_EXECUTABLE, SECRETS_MANAGER_EXECUTABLE};
pub use fs::LocalFs;
pub use loader::{discover, load_plugin, MANIFEST_FILE};
pub use manifest::{parse_manifest, Include, Manifest, Route};
pub use plugin::{AppFields, ModuleFields, Plugin, StaticRoute};
pub use registry::PluginRegistry;
pub use sanitize::CleanPathSanitizer;
