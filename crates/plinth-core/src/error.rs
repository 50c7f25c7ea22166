// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Plinth plugin runtime.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type used across descriptors, backend clients, and loaders.
///
/// Only [`PluginError::Unavailable`] is synthesized by a descriptor when it
/// delegates a capability call. Every other error a backend client returns is
/// handed back to the caller untouched.
#[derive(Debug, Error)]
pub enum PluginError {
    /// No backend client is attached to the plugin.
    #[error("plugin unavailable: {plugin_id} has no backend client attached")]
    Unavailable { plugin_id: String },

    /// The requested file or resource does not exist.
    #[error("file does not exist: {}", path.display())]
    NotExist { path: PathBuf },

    /// The file exists but could not be read.
    #[error("file could not be read: {}: {source}", path.display())]
    ReadFailure {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The manifest declares a plugin type outside the supported set.
    #[error("invalid plugin type '{0}'. Expected one of: datasource, panel, app, renderer, secretsmanager")]
    InvalidType(String),

    /// A requested path resolves outside the plugin root.
    #[error("path escapes plugin root: {path}")]
    PathEscape { path: String },

    /// The manifest is malformed or missing required fields.
    #[error("invalid plugin manifest: {0}")]
    Manifest(String),

    /// A parent/child link would be invalid (unknown id, cycle, duplicate).
    #[error("invalid plugin hierarchy: {0}")]
    Hierarchy(String),

    /// Error reported by the backend itself.
    #[error("backend error: {message}")]
    Backend {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,

    /// The caller's deadline passed before the operation completed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The receiving side of a response or stream sender has gone away.
    #[error("response receiver closed")]
    SenderClosed,

    /// Internal failure outside the plugin itself (e.g. rendering output).
    #[error("internal error: {0}")]
    Internal(String),
}

impl PluginError {
    /// Convenience constructor for backend errors without an underlying cause.
    pub fn backend(message: impl Into<String>) -> Self {
        PluginError::Backend {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true when no backend client was attached.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, PluginError::Unavailable { .. })
    }

    /// Returns true when the requested file or resource is missing.
    pub fn is_not_exist(&self) -> bool {
        matches!(self, PluginError::NotExist { .. })
    }

    /// Returns true when retrying after the supervisor finishes launching
    /// the backend can succeed.
    pub fn is_retryable(&self) -> bool {
        self.is_unavailable()
    }
}
