// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem handle and path sanitizer consumed by plugin descriptors.

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::PluginError;

/// An open plugin file. Dropping it releases the underlying handle.
pub type PluginFile = Box<dyn Read + Send>;

/// Scoped view over a plugin's installation directory.
pub trait PluginFs: Send + Sync + 'static {
    /// Opens `relative` under the plugin root.
    ///
    /// Implementations return [`PluginError::NotExist`] for missing files and
    /// [`PluginError::ReadFailure`] for every other I/O error.
    fn open(&self, relative: &Path) -> Result<PluginFile, PluginError>;

    /// Absolute path of the plugin root.
    fn base(&self) -> &Path;
}

/// Normalizes a caller-supplied path into one relative to the plugin root.
pub trait PathSanitizer: Send + Sync + 'static {
    /// Returns the cleaned relative path, or [`PluginError::PathEscape`]
    /// if it would leave the root.
    fn clean(&self, relative: &str) -> Result<PathBuf, PluginError>;
}
