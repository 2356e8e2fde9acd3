// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Callback run once when a timer fires.
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Background work handed to the scheduler (asset preload batches).
pub type BackgroundTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Opaque handle for a single scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Timer and task capability a queue is driven by.
///
/// A queue keeps at most one handle returned by `schedule_once` and always
/// cancels it before arming a new one. `cancel` must stop the concrete timer,
/// and cancelling a handle that already fired is a no-op.
pub trait Scheduler: Send + Sync {
    /// Arm a one-shot timer that runs `callback` after `delay`.
    ///
    /// The callback must never run before this call returns; queues arm
    /// timers while holding their state lock.
    fn schedule_once(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;

    /// Cancel a pending timer.
    fn cancel(&self, handle: TimerHandle);

    /// Run a background task to completion without waiting for it.
    fn spawn(&self, task: BackgroundTask);
}
