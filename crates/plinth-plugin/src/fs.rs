// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local-disk plugin filesystem.

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use plinth_core::{PluginError, PluginFile, PluginFs};
use tracing::debug;

/// A [`PluginFs`] rooted at a directory on local disk.
///
/// The root is canonicalized on construction. Every open re-resolves the
/// target and rejects anything that lands outside the root, including
/// symlinks pointing elsewhere.
#[derive(Debug, Clone)]
pub struct LocalFs {
    root: PathBuf,
}

impl LocalFs {
    /// Root a filesystem at `base`, which must be an existing directory.
    pub fn new(base: impl AsRef<Path>) -> Result<Self, PluginError> {
        let base = base.as_ref();
        let root = base.canonicalize().map_err(|e| io_error(base, e))?;
        if !root.is_dir() {
            return Err(PluginError::NotExist { path: root });
        }
        Ok(Self { root })
    }
}

impl PluginFs for LocalFs {
    fn open(&self, relative: &Path) -> Result<PluginFile, PluginError> {
        if relative.is_absolute() {
            return Err(PluginError::PathEscape {
                path: relative.display().to_string(),
            });
        }

        let resolved = self
            .root
            .join(relative)
            .canonicalize()
            .map_err(|e| io_error(relative, e))?;
        if !resolved.starts_with(&self.root) {
            debug!(path = %relative.display(), "resolved path leaves plugin root");
            return Err(PluginError::PathEscape {
                path: relative.display().to_string(),
            });
        }
        if resolved.is_dir() {
            return Err(PluginError::NotExist {
                path: relative.to_path_buf(),
            });
        }

        let file = File::open(&resolved).map_err(|e| io_error(relative, e))?;
        Ok(Box::new(file))
    }

    fn base(&self) -> &Path {
        &self.root
    }
}

fn io_error(path: &Path, err: std::io::Error) -> PluginError {
    if err.kind() == ErrorKind::NotFound {
        PluginError::NotExist {
            path: path.to_path_buf(),
        }
    } else {
        PluginError::ReadFailure {
            path: path.to_path_buf(),
            source: err,
        }
    }
}
