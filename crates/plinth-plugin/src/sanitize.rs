// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lexical path cleaning for plugin file requests.

use std::path::{Component, Path, PathBuf};

use plinth_core::{PathSanitizer, PluginError};

/// Cleans request paths into paths relative to the plugin root.
///
/// Leading separators are dropped (a request for `/img/logo.svg` means
/// `img/logo.svg` under the root), `.` segments are removed, and `..`
/// segments consume the previous segment. A `..` with nothing left to
/// consume is an escape and is rejected. Backslashes are treated as
/// separators on every platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanPathSanitizer;

impl PathSanitizer for CleanPathSanitizer {
    fn clean(&self, relative: &str) -> Result<PathBuf, PluginError> {
        let normalized = relative.replace('\\', "/");
        let mut parts = Vec::new();

        for component in Path::new(&normalized).components() {
            match component {
                Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
                Component::ParentDir => {
                    if parts.pop().is_none() {
                        return Err(PluginError::PathEscape {
                            path: relative.to_string(),
                        });
                    }
                }
                Component::Normal(part) => parts.push(part),
            }
        }

        Ok(parts.into_iter().collect())
    }
}
