// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock backend client for deterministic descriptor tests.
//!
//! `MockBackendClient` implements `BackendClient` with canned results and
//! records every call together with the context it was given, so tests can
//! assert that requests and cancellation signals arrive untouched.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use plinth_core::protocol::{
    CallResourceRequest, CallResourceResponse, CheckHealthRequest, CheckHealthResult,
    CollectMetricsRequest, CollectMetricsResult, PublishStreamRequest, PublishStreamResponse,
    QueryDataRequest, QueryDataResponse, ResourceResponseSender, RunStreamRequest, StreamPacket,
    StreamSender, SubscribeStreamRequest, SubscribeStreamResponse,
};
use plinth_core::{BackendClient, CallContext, PluginError, Target};

/// A call observed by [`MockBackendClient`], with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Start,
    Stop,
    QueryData(QueryDataRequest),
    CallResource(CallResourceRequest),
    CheckHealth(CheckHealthRequest),
    CollectMetrics(CollectMetricsRequest),
    SubscribeStream(SubscribeStreamRequest),
    PublishStream(PublishStreamRequest),
    RunStream(RunStreamRequest),
}

/// A backend client that returns pre-configured results.
///
/// By default it is managed, runs locally, supports streaming, and returns
/// empty successful results. Use the `with_*` builders to change that.
pub struct MockBackendClient {
    calls: Mutex<Vec<RecordedCall>>,
    contexts: Mutex<Vec<CallContext>>,
    running: AtomicBool,
    exited: AtomicBool,
    decommissioned: AtomicBool,
    managed: bool,
    streaming: bool,
    target: Target,
    failure: Option<String>,
    query_response: QueryDataResponse,
    resource_responses: Vec<CallResourceResponse>,
    health: CheckHealthResult,
    metrics: CollectMetricsResult,
    subscribe_response: SubscribeStreamResponse,
    publish_response: PublishStreamResponse,
    stream_packets: Vec<StreamPacket>,
}

impl MockBackendClient {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            contexts: Mutex::new(Vec::new()),
            running: AtomicBool::new(false),
            exited: AtomicBool::new(false),
            decommissioned: AtomicBool::new(false),
            managed: true,
            streaming: true,
            target: Target::Local,
            failure: None,
            query_response: QueryDataResponse::default(),
            resource_responses: Vec::new(),
            health: CheckHealthResult::default(),
            metrics: CollectMetricsResult::default(),
            subscribe_response: SubscribeStreamResponse::default(),
            publish_response: PublishStreamResponse::default(),
            stream_packets: Vec::new(),
        }
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_managed(mut self, managed: bool) -> Self {
        self.managed = managed;
        self
    }

    /// Every capability call fails with a backend error carrying `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn with_query_response(mut self, response: QueryDataResponse) -> Self {
        self.query_response = response;
        self
    }

    /// Responses pushed into the sender, in order, on every resource call.
    pub fn with_resource_responses(mut self, responses: Vec<CallResourceResponse>) -> Self {
        self.resource_responses = responses;
        self
    }

    pub fn with_health(mut self, health: CheckHealthResult) -> Self {
        self.health = health;
        self
    }

    pub fn with_metrics(mut self, metrics: CollectMetricsResult) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_subscribe_response(mut self, response: SubscribeStreamResponse) -> Self {
        self.subscribe_response = response;
        self
    }

    pub fn with_publish_response(mut self, response: PublishStreamResponse) -> Self {
        self.publish_response = response;
        self
    }

    /// Packets pushed into the sender, in order, on every stream run.
    pub fn with_stream_packets(mut self, packets: Vec<StreamPacket>) -> Self {
        self.stream_packets = packets;
        self
    }

    /// All calls observed so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Contexts received alongside each call, oldest first.
    pub fn contexts(&self) -> Vec<CallContext> {
        self.contexts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn record(&self, ctx: &CallContext, call: RecordedCall) {
        debug!(?call, "mock backend call");
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        self.contexts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ctx.clone());
    }

    fn check_failure(&self) -> Result<(), PluginError> {
        match &self.failure {
            Some(message) => Err(PluginError::backend(message.clone())),
            None => Ok(()),
        }
    }
}

impl Default for MockBackendClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendClient for MockBackendClient {
    async fn start(&self, ctx: &CallContext) -> Result<(), PluginError> {
        self.record(ctx, RecordedCall::Start);
        if self.decommissioned.load(Ordering::SeqCst) {
            return Err(PluginError::backend("backend is decommissioned"));
        }
        self.running.store(true, Ordering::SeqCst);
        self.exited.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self, ctx: &CallContext) -> Result<(), PluginError> {
        self.record(ctx, RecordedCall::Stop);
        self.running.store(false, Ordering::SeqCst);
        self.exited.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_managed(&self) -> bool {
        self.managed
    }

    fn exited(&self) -> bool {
        self.exited.load(Ordering::SeqCst)
    }

    fn decommission(&self) -> Result<(), PluginError> {
        self.decommissioned.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_decommissioned(&self) -> bool {
        self.decommissioned.load(Ordering::SeqCst)
    }

    fn target(&self) -> Target {
        self.target
    }

    fn supports_streaming(&self) -> bool {
        self.streaming
    }

    async fn query_data(
        &self,
        ctx: &CallContext,
        req: QueryDataRequest,
    ) -> Result<QueryDataResponse, PluginError> {
        self.record(ctx, RecordedCall::QueryData(req));
        self.check_failure()?;
        Ok(self.query_response.clone())
    }

    async fn call_resource(
        &self,
        ctx: &CallContext,
        req: CallResourceRequest,
        sender: ResourceResponseSender,
    ) -> Result<(), PluginError> {
        self.record(ctx, RecordedCall::CallResource(req));
        self.check_failure()?;
        for response in &self.resource_responses {
            sender.send(response.clone()).await?;
        }
        Ok(())
    }

    async fn check_health(
        &self,
        ctx: &CallContext,
        req: CheckHealthRequest,
    ) -> Result<CheckHealthResult, PluginError> {
        self.record(ctx, RecordedCall::CheckHealth(req));
        self.check_failure()?;
        Ok(self.health.clone())
    }

    async fn collect_metrics(
        &self,
        ctx: &CallContext,
        req: CollectMetricsRequest,
    ) -> Result<CollectMetricsResult, PluginError> {
        self.record(ctx, RecordedCall::CollectMetrics(req));
        self.check_failure()?;
        Ok(self.metrics.clone())
    }

    async fn subscribe_stream(
        &self,
        ctx: &CallContext,
        req: SubscribeStreamRequest,
    ) -> Result<SubscribeStreamResponse, PluginError> {
        self.record(ctx, RecordedCall::SubscribeStream(req));
        self.check_failure()?;
        Ok(self.subscribe_response.clone())
    }

    async fn publish_stream(
        &self,
        ctx: &CallContext,
        req: PublishStreamRequest,
    ) -> Result<PublishStreamResponse, PluginError> {
        self.record(ctx, RecordedCall::PublishStream(req));
        self.check_failure()?;
        Ok(self.publish_response.clone())
    }

    async fn run_stream(
        &self,
        ctx: &CallContext,
        req: RunStreamRequest,
        sender: StreamSender,
    ) -> Result<(), PluginError> {
        self.record(ctx, RecordedCall::RunStream(req));
        self.check_failure()?;
        for packet in &self.stream_packets {
            if ctx.is_cancelled() {
                return Err(PluginError::Cancelled);
            }
            sender.send(packet.clone()).await?;
        }
        Ok(())
    }
}
