// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Caller-supplied cancellation and deadline for capability calls.
//!
//! A [`CallContext`] travels with every lifecycle and capability call. The
//! descriptor forwards it to the backend client as-is; only the client decides
//! how to honour it on the wire.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::PluginError;

/// Cancellation signal plus optional deadline for a single call tree.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context bound to an existing cancellation token.
    pub fn with_token(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    /// Derive a child context with a deadline `timeout` from now.
    ///
    /// The child never extends an earlier deadline held by `self`, and
    /// cancelling `self` cancels the child.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let proposed = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(existing) if existing < proposed => existing,
            _ => proposed,
        };
        Self {
            cancel: self.cancel.child_token(),
            deadline: Some(deadline),
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, if one is set.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel this context and every context derived from it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Drive `fut` until it completes, the context is cancelled, or the
    /// deadline passes.
    ///
    /// Backend clients use this to honour the caller's context around
    /// transport I/O.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, PluginError>
    where
        F: Future<Output = Result<T, PluginError>>,
    {
        let result = match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.cancel.cancelled() => Err(PluginError::Cancelled),
                    _ = tokio::time::sleep_until(deadline) => Err(PluginError::DeadlineExceeded),
                    res = fut => res,
                }
            }
            None => {
                tokio::select! {
                    _ = self.cancel.cancelled() => Err(PluginError::Cancelled),
                    res = fut => res,
                }
            }
        };
        if let Err(e @ (PluginError::Cancelled | PluginError::DeadlineExceeded)) = &result {
            debug!(error = %e, "call abandoned");
        }
        result
    }
}
