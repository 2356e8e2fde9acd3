// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for queue registry bookkeeping.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A queue was created and registered.
///
/// # Log Level
/// `info!` - Important operational event
pub struct QueueCreated<'a> {
    pub name: Option<&'a str>,
    pub queue_count: usize,
}

impl Display for QueueCreated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Created queue '{}' ({} registered)",
            self.name.unwrap_or("anonymous"),
            self.queue_count
        )
    }
}

impl StructuredLog for QueueCreated<'_> {
    fn log(&self) {
        tracing::info!(name = self.name, queue_count = self.queue_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("queue_created", span_name = name, queue = self.name)
    }
}

/// One or more queues were paused and dropped from the registry.
///
/// # Log Level
/// `info!` - Important operational event
pub struct QueuesDeleted {
    pub deleted: usize,
    pub remaining: usize,
}

impl Display for QueuesDeleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Deleted {} queues, {} remain",
            self.deleted, self.remaining
        )
    }
}

impl StructuredLog for QueuesDeleted {
    fn log(&self) {
        tracing::info!(deleted = self.deleted, remaining = self.remaining, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("queues_deleted", span_name = name, deleted = self.deleted)
    }
}
