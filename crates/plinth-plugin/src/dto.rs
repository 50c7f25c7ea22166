// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only plugin views.
//!
//! A [`PluginDto`] is a value snapshot of a descriptor for listing, display,
//! and authorization code. It carries no backend client and exposes no
//! lifecycle or capability calls.

use std::path::Path;
use std::sync::Arc;

use plinth_core::{Class, PluginFs, PluginType, Signature};

use crate::classifier;
use crate::manifest::{Include, Manifest};
use crate::plugin::{AppFields, ModuleFields};

/// Immutable projection of a [`Plugin`](crate::Plugin).
#[derive(Clone)]
pub struct PluginDto {
    manifest: Manifest,
    class: Class,
    app: AppFields,
    signature: Signature,
    module: ModuleFields,
    fs: Option<Arc<dyn PluginFs>>,
    supports_streaming: bool,
}

impl PluginDto {
    /// Build a view without a descriptor, e.g. for catalog entries that are
    /// not installed. Such a view has no filesystem, so [`PluginDto::base`]
    /// is `None`.
    pub fn new(
        manifest: Manifest,
        class: Class,
        app: AppFields,
        signature: Signature,
        module: ModuleFields,
        supports_streaming: bool,
    ) -> Self {
        Self::from_parts(manifest, class, app, signature, module, None, supports_streaming)
    }

    pub(crate) fn from_parts(
        manifest: Manifest,
        class: Class,
        app: AppFields,
        signature: Signature,
        module: ModuleFields,
        fs: Option<Arc<dyn PluginFs>>,
        supports_streaming: bool,
    ) -> Self {
        Self {
            manifest,
            class,
            app,
            signature,
            module,
            fs,
            supports_streaming,
        }
    }

    /// Unique plugin id.
    pub fn id(&self) -> &str {
        &self.manifest.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    /// Declared plugin type.
    pub fn plugin_type(&self) -> PluginType {
        self.manifest.plugin_type
    }

    /// The parsed manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Where the plugin was installed from.
    pub fn class(&self) -> Class {
        self.class
    }

    /// App-related fields.
    pub fn app(&self) -> &AppFields {
        &self.app
    }

    /// Signature verification result.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Frontend module location.
    pub fn module(&self) -> &ModuleFields {
        &self.module
    }

    /// Includes of type `dashboard`.
    pub fn dashboard_includes(&self) -> Vec<&Include> {
        self.manifest.dashboard_includes()
    }

    /// Whether the backend attached at snapshot time handled streaming.
    pub fn supports_streaming(&self) -> bool {
        self.supports_streaming
    }

    /// True for `app` plugins.
    pub fn is_app(&self) -> bool {
        classifier::is_app(self.plugin_type())
    }

    /// True when shipped with the runtime itself.
    pub fn is_core_plugin(&self) -> bool {
        classifier::is_core_plugin(self.class)
    }

    /// Plugin root on disk, if the view was taken from a descriptor with a
    /// filesystem.
    pub fn base(&self) -> Option<&Path> {
        self.fs.as_ref().map(|fs| fs.base())
    }
}

impl std::fmt::Debug for PluginDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginDto")
            .field("id", &self.manifest.id)
            .field("type", &self.manifest.plugin_type)
            .field("class", &self.class)
            .field("signature", &self.signature.status())
            .field("base", &self.base())
            .field("supports_streaming", &self.supports_streaming)
            .finish()
    }
}
