// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use serde_yaml::Value;

use crate::backends::TokioScheduler;
use crate::config::QueueConfig;
use crate::engine::QueueEngine;
use crate::errors::QueueError;
use crate::observability::messages::{registry::*, StructuredLog};
use crate::traits::{AssetLoader, Scheduler};

/// A queue tracked by a registry, optionally under a name.
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub name: Option<String>,
    pub queue: QueueEngine,
}

/// Tracks the queues an application created and tears them down together.
///
/// Every queue created here shares the registry's scheduler and asset loader.
pub struct QueueRegistry {
    queues: Vec<QueueEntry>,
    scheduler: Arc<dyn Scheduler>,
    loader: Arc<dyn AssetLoader>,
}

impl QueueRegistry {
    pub fn new(scheduler: Arc<dyn Scheduler>, loader: Arc<dyn AssetLoader>) -> Self {
        Self {
            queues: Vec::new(),
            scheduler,
            loader,
        }
    }

    /// Registry driven by the Tokio runtime of the calling context.
    pub fn with_tokio(loader: Arc<dyn AssetLoader>) -> Result<Self, QueueError> {
        Ok(Self::new(Arc::new(TokioScheduler::new()?), loader))
    }

    /// Create and track a queue with an already-resolved config.
    pub fn create(&mut self, config: QueueConfig, name: Option<&str>) -> QueueEngine {
        let queue = QueueEngine::new(
            config,
            Arc::clone(&self.scheduler),
            Arc::clone(&self.loader),
        );

        self.queues.push(QueueEntry {
            name: name.map(str::to_string),
            queue: queue.clone(),
        });

        QueueCreated {
            name,
            queue_count: self.queues.len(),
        }
        .log();
        queue
    }

    /// Create a queue from a loosely-typed config document merged over the defaults.
    ///
    /// Nothing is registered when the document is not a key/value mapping.
    pub fn create_from_value(
        &mut self,
        config: Option<&Value>,
        name: Option<&str>,
    ) -> Result<QueueEngine, QueueError> {
        let config = QueueConfig::from_value(config)?;
        Ok(self.create(config, name))
    }

    pub fn get_all(&self) -> &[QueueEntry] {
        &self.queues
    }

    /// First queue registered under `name`.
    pub fn get(&self, name: &str) -> Option<&QueueEngine> {
        self.queues
            .iter()
            .find(|entry| entry.name.as_deref() == Some(name))
            .map(|entry| &entry.queue)
    }

    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    /// Pause and forget the queue at `index`.
    pub fn delete(&mut self, index: usize) -> Result<&mut Self, QueueError> {
        if index >= self.queues.len() {
            return Err(QueueError::QueueNotFound {
                index,
                count: self.queues.len(),
            });
        }

        let entry = self.queues.remove(index);
        entry.queue.pause();

        QueuesDeleted {
            deleted: 1,
            remaining: self.queues.len(),
        }
        .log();
        Ok(self)
    }

    /// Pause and forget every queue.
    pub fn delete_all(&mut self) -> &mut Self {
        let deleted = self.queues.len();
        for entry in self.queues.drain(..) {
            entry.queue.pause();
        }

        QueuesDeleted {
            deleted,
            remaining: 0,
        }
        .log();
        self
    }
}
