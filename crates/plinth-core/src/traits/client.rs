// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handle to a live plugin backend.

use async_trait::async_trait;

use crate::context::CallContext;
use crate::error::PluginError;
use crate::protocol::{
    CallResourceRequest, CheckHealthRequest, CheckHealthResult, CollectMetricsRequest,
    CollectMetricsResult, PublishStreamRequest, PublishStreamResponse, QueryDataRequest,
    QueryDataResponse, ResourceResponseSender, RunStreamRequest, StreamSender,
    SubscribeStreamRequest, SubscribeStreamResponse,
};
use crate::types::Target;

/// A connection to a plugin backend, in-process or out-of-process.
///
/// Implemented by the process supervisor's transport and attached to a
/// descriptor once launch and handshake succeed. Every method receives the
/// caller's [`CallContext`] and is expected to honour its cancellation and
/// deadline.
#[async_trait]
pub trait BackendClient: Send + Sync + 'static {
    /// Starts the backend.
    async fn start(&self, ctx: &CallContext) -> Result<(), PluginError>;

    /// Stops the backend. Stopping an already stopped backend must succeed.
    async fn stop(&self, ctx: &CallContext) -> Result<(), PluginError>;

    /// Returns true if the supervisor restarts this backend when it exits.
    fn is_managed(&self) -> bool;

    /// Returns true once the backend process has exited.
    fn exited(&self) -> bool;

    /// Marks the backend as permanently retired.
    fn decommission(&self) -> Result<(), PluginError>;

    fn is_decommissioned(&self) -> bool;

    /// Where this backend executes.
    fn target(&self) -> Target;

    /// Returns true if this backend handles the streaming protocol.
    ///
    /// Callers probe this before issuing stream calls; a backend that
    /// returns false may reject them.
    fn supports_streaming(&self) -> bool;

    async fn query_data(
        &self,
        ctx: &CallContext,
        req: QueryDataRequest,
    ) -> Result<QueryDataResponse, PluginError>;

    async fn call_resource(
        &self,
        ctx: &CallContext,
        req: CallResourceRequest,
        sender: ResourceResponseSender,
    ) -> Result<(), PluginError>;

    async fn check_health(
        &self,
        ctx: &CallContext,
        req: CheckHealthRequest,
    ) -> Result<CheckHealthResult, PluginError>;

    async fn collect_metrics(
        &self,
        ctx: &CallContext,
        req: CollectMetricsRequest,
    ) -> Result<CollectMetricsResult, PluginError>;

    async fn subscribe_stream(
        &self,
        ctx: &CallContext,
        req: SubscribeStreamRequest,
    ) -> Result<SubscribeStreamResponse, PluginError>;

    async fn publish_stream(
        &self,
        ctx: &CallContext,
        req: PublishStreamRequest,
    ) -> Result<PublishStreamResponse, PluginError>;

    /// Runs a stream until it ends, the backend fails, or `ctx` is cancelled.
    async fn run_stream(
        &self,
        ctx: &CallContext,
        req: RunStreamRequest,
        sender: StreamSender,
    ) -> Result<(), PluginError>;
}
