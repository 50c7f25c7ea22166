// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Plinth integration tests.
//!
//! Provides mock collaborators for fast, deterministic tests without
//! launching real plugin processes.
//!
//! # Components
//!
//! - [`MockBackendClient`] - Backend client that records calls and returns canned results
//! - [`MemoryFs`] - In-memory plugin filesystem that counts open attempts

pub mod memory_fs;
pub mod mock_client;

pub use memory_fs::MemoryFs;
pub use mock_client::{MockBackendClient, RecordedCall};
