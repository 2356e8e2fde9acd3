// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for queue construction and registry bookkeeping.

use thiserror::Error;

use super::ValidationError;

#[derive(Debug, Error)]
pub enum QueueError {
    /// The Tokio scheduler was built outside of a runtime
    #[error("No Tokio runtime is available to drive queue timers: {reason}")]
    NoRuntime { reason: String },

    /// The registry has no queue at the requested index
    #[error("No queue registered at index {index} ({count} queues registered)")]
    QueueNotFound { index: usize, count: usize },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
