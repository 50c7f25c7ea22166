// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response types for the backend capability protocols.
//!
//! These are the in-memory shapes a descriptor hands to its backend client.
//! How a client encodes them for its transport is the client's concern.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::PluginError;

/// Identity of the plugin instance a request targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginContext {
    pub org_id: i64,
    pub plugin_id: String,
    pub user: Option<String>,
    /// Instance settings of the data source or app being called, if any.
    pub instance_settings: Option<serde_json::Value>,
}

// --- Query ---

/// A single query inside a [`QueryDataRequest`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataQuery {
    pub ref_id: String,
    pub query_type: String,
    pub max_data_points: i64,
    pub interval_ms: i64,
    pub json: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryDataRequest {
    pub plugin_context: PluginContext,
    pub headers: HashMap<String, String>,
    pub queries: Vec<DataQuery>,
}

/// Result for one query, keyed by `ref_id` in [`QueryDataResponse`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataResponse {
    pub frames: Vec<serde_json::Value>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryDataResponse {
    pub responses: HashMap<String, DataResponse>,
}

// --- Resources ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallResourceRequest {
    pub plugin_context: PluginContext,
    pub path: String,
    pub method: String,
    pub url: String,
    pub headers: HashMap<String, Vec<String>>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallResourceResponse {
    pub status: u16,
    pub headers: HashMap<String, Vec<String>>,
    pub body: Vec<u8>,
}

/// Sink for the (possibly chunked) responses of a resource call.
#[derive(Debug, Clone)]
pub struct ResourceResponseSender {
    tx: mpsc::Sender<CallResourceResponse>,
}

impl ResourceResponseSender {
    /// Create a sender and the receiver that collects its responses.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<CallResourceResponse>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }

    pub async fn send(&self, response: CallResourceResponse) -> Result<(), PluginError> {
        self.tx
            .send(response)
            .await
            .map_err(|_| PluginError::SenderClosed)
    }
}

// --- Health ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckHealthRequest {
    pub plugin_context: PluginContext,
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    #[default]
    Unknown,
    Ok,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckHealthResult {
    pub status: HealthStatus,
    pub message: String,
    pub json_details: Option<serde_json::Value>,
}

// --- Metrics ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectMetricsRequest {
    pub plugin_context: PluginContext,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectMetricsResult {
    /// Metrics in Prometheus text exposition format.
    pub prometheus_metrics: Vec<u8>,
}

// --- Streaming ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamStatus {
    #[default]
    Ok,
    NotFound,
    PermissionDenied,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscribeStreamRequest {
    pub plugin_context: PluginContext,
    pub path: String,
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscribeStreamResponse {
    pub status: StreamStatus,
    pub initial_data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishStreamRequest {
    pub plugin_context: PluginContext,
    pub path: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishStreamResponse {
    pub status: StreamStatus,
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStreamRequest {
    pub plugin_context: PluginContext,
    pub path: String,
    pub data: Option<serde_json::Value>,
}

/// One message pushed by a running stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamPacket {
    pub data: serde_json::Value,
}

/// Sink a backend pushes [`StreamPacket`]s into while a stream runs.
#[derive(Debug, Clone)]
pub struct StreamSender {
    tx: mpsc::Sender<StreamPacket>,
}

impl StreamSender {
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<StreamPacket>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }

    pub async fn send(&self, packet: StreamPacket) -> Result<(), PluginError> {
        self.tx
            .send(packet)
            .await
            .map_err(|_| PluginError::SenderClosed)
    }

    /// Serialize `value` as JSON and push it as a packet.
    pub async fn send_json<T: Serialize>(&self, value: &T) -> Result<(), PluginError> {
        let data = serde_json::to_value(value).map_err(|e| PluginError::Backend {
            message: format!("failed to encode stream packet: {e}"),
            source: Some(Box::new(e)),
        })?;
        self.send(StreamPacket { data }).await
    }
}

// --- Rendering ---

/// Request to render a dashboard URL into an image file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub device_scale_factor: f64,
    /// Where the renderer writes its output.
    pub file_path: String,
    pub timeout_ms: u64,
    pub timezone: String,
    pub headers: HashMap<String, String>,
    pub auth_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderResponse {
    /// Renderer-side failure message; `None` on success.
    pub error: Option<String>,
}

// --- Secrets ---

/// Address of one secret held by a secrets manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecretKey {
    pub org_id: i64,
    pub namespace: String,
    #[serde(rename = "type")]
    pub kind: String,
}
