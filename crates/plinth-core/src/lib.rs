// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Plinth plugin runtime.
//!
//! This crate provides the error type, shared enums, capability protocol
//! types, and the trait seams (backend client, renderer and secrets-manager
//! handles, filesystem, path sanitizer) that plugin descriptors are built on.

pub mod context;
pub mod error;
pub mod protocol;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use context::CallContext;
pub use error::PluginError;
pub use traits::{
    BackendClient, PathSanitizer, PluginFile, PluginFs, RendererClient, SecretsManagerClient,
};
pub use types::{
    is_valid_type, Class, FailureStatus, PluginType, Signature, SignatureError, SignatureStatus,
    SignatureType, Target,
};
