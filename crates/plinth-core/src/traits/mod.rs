// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between a plugin descriptor and its external collaborators.
//!
//! The backend client and the typed capability handles use `#[async_trait]`
//! so descriptors can hold them as trait objects. The filesystem and path
//! sanitizer traits are synchronous.

pub mod capability;
pub mod client;
pub mod fs;

pub use capability::{RendererClient, SecretsManagerClient};
pub use client::BackendClient;
pub use fs::{PathSanitizer, PluginFile, PluginFs};
