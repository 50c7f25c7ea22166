// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory plugin filesystem.

use std::collections::{HashMap, HashSet};
use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use plinth_core::{PluginError, PluginFile, PluginFs};

/// A [`PluginFs`] backed by a map of relative paths to contents.
///
/// Counts every `open` call so tests can assert that rejected paths never
/// reach the filesystem. Paths added with `with_unreadable_file` exist but
/// fail to open with a permission error.
pub struct MemoryFs {
    base: PathBuf,
    files: HashMap<PathBuf, Vec<u8>>,
    unreadable: HashSet<PathBuf>,
    opens: AtomicUsize,
}

impl MemoryFs {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            files: HashMap::new(),
            unreadable: HashSet::new(),
            opens: AtomicUsize::new(0),
        }
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    pub fn with_unreadable_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.unreadable.insert(path.into());
        self
    }

    /// Number of times `open` has been called.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl PluginFs for MemoryFs {
    fn open(&self, relative: &Path) -> Result<PluginFile, PluginError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.unreadable.contains(relative) {
            return Err(PluginError::ReadFailure {
                path: relative.to_path_buf(),
                source: std::io::Error::new(ErrorKind::PermissionDenied, "permission denied"),
            });
        }
        match self.files.get(relative) {
            Some(contents) => Ok(Box::new(Cursor::new(contents.clone()))),
            None => Err(PluginError::NotExist {
                path: relative.to_path_buf(),
            }),
        }
    }

    fn base(&self) -> &Path {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn open_reads_contents_and_counts() {
        let fs = MemoryFs::new("/plugins/acme").with_file("README.md", "# Acme");
        let mut out = String::new();
        fs.open(Path::new("README.md"))
            .unwrap()
            .read_to_string(&mut out)
            .unwrap();
        assert_eq!(out, "# Acme");
        assert!(fs.open(Path::new("missing.txt")).err().unwrap().is_not_exist());
        assert_eq!(fs.open_count(), 2);
        assert_eq!(fs.base(), Path::new("/plugins/acme"));
    }

    #[test]
    fn unreadable_file_is_a_read_failure() {
        let fs = MemoryFs::new("/plugins/acme").with_unreadable_file("secret.key");
        match fs.open(Path::new("secret.key")) {
            Err(PluginError::ReadFailure { path, source }) => {
                assert_eq!(path, Path::new("secret.key"));
                assert_eq!(source.kind(), ErrorKind::PermissionDenied);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("unreadable file opened"),
        }
    }
}
