// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed handles for renderer and secrets-manager backends.
//!
//! These sit next to the generic [`BackendClient`](super::BackendClient) on a
//! descriptor. The supervisor attaches them once the backend has announced
//! the matching capability.

use async_trait::async_trait;

use crate::context::CallContext;
use crate::error::PluginError;
use crate::protocol::{RenderRequest, RenderResponse, SecretKey};

/// Image rendering capability of a `renderer` plugin.
#[async_trait]
pub trait RendererClient: Send + Sync + 'static {
    /// Render `req.url` into `req.file_path`.
    async fn render(
        &self,
        ctx: &CallContext,
        req: RenderRequest,
    ) -> Result<RenderResponse, PluginError>;
}

/// Secret storage capability of a `secretsmanager` plugin.
#[async_trait]
pub trait SecretsManagerClient: Send + Sync + 'static {
    /// Returns `None` when no secret is stored under `key`.
    async fn get_secret(
        &self,
        ctx: &CallContext,
        key: &SecretKey,
    ) -> Result<Option<String>, PluginError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set_secret(
        &self,
        ctx: &CallContext,
        key: SecretKey,
        value: String,
    ) -> Result<(), PluginError>;

    /// Deleting a missing key succeeds.
    async fn delete_secret(&self, ctx: &CallContext, key: &SecretKey) -> Result<(), PluginError>;

    async fn list_secrets(
        &self,
        ctx: &CallContext,
        org_id: i64,
    ) -> Result<Vec<SecretKey>, PluginError>;
}
