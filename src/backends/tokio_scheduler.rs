// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;

use crate::errors::QueueError;
use crate::traits::{BackgroundTask, Scheduler, TimerCallback, TimerHandle};
use crate::utils::lock_unpoisoned;

/// Scheduler backed by a Tokio runtime.
///
/// Each timer is a spawned task that sleeps for its delay and then runs the
/// callback. A timer only fires if it is still registered when the sleep
/// ends, so `cancel` wins even when the abort arrives after the sleep has
/// already completed.
pub struct TokioScheduler {
    runtime: Handle,
    timers: Arc<Mutex<HashMap<u64, AbortHandle>>>,
    next_id: AtomicU64,
}

impl TokioScheduler {
    /// Create a scheduler on the runtime of the calling context.
    pub fn new() -> Result<Self, QueueError> {
        let runtime = Handle::try_current().map_err(|e| QueueError::NoRuntime {
            reason: e.to_string(),
        })?;
        Ok(Self::with_handle(runtime))
    }

    /// Create a scheduler on an explicit runtime.
    pub fn with_handle(runtime: Handle) -> Self {
        Self {
            runtime,
            timers: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of timers armed and not yet fired or cancelled.
    pub fn pending(&self) -> usize {
        lock_unpoisoned(&self.timers).len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_once(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let timers = Arc::clone(&self.timers);

        // Held across spawn so the task cannot look itself up before it is registered.
        let mut registered = lock_unpoisoned(&self.timers);
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let still_armed = lock_unpoisoned(&timers).remove(&id).is_some();
            if still_armed {
                callback();
            }
        });
        registered.insert(id, task.abort_handle());

        TimerHandle::new(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some(task) = lock_unpoisoned(&self.timers).remove(&handle.id()) {
            task.abort();
        }
    }

    fn spawn(&self, task: BackgroundTask) {
        self.runtime.spawn(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_callback(counter: &Arc<AtomicUsize>) -> TimerCallback {
        let counter = Arc::clone(counter);
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_new_outside_runtime_fails() {
        let result = TokioScheduler::new();
        assert!(matches!(result, Err(QueueError::NoRuntime { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_after_delay() {
        let scheduler = TokioScheduler::new().unwrap();
        let fired = Arc::new(AtomicUsize::new(0));

        scheduler.schedule_once(Duration::from_millis(500), counting_callback(&fired));
        assert_eq!(scheduler.pending(), 1);

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_timer_never_fires() {
        let scheduler = TokioScheduler::new().unwrap();
        let fired = Arc::new(AtomicUsize::new(0));

        let handle = scheduler.schedule_once(Duration::from_millis(100), counting_callback(&fired));
        scheduler.cancel(handle);
        assert_eq!(scheduler.pending(), 0);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        // Cancelling twice is harmless
        scheduler.cancel(handle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_runs_background_task() {
        let scheduler = TokioScheduler::new().unwrap();
        let done = Arc::new(AtomicUsize::new(0));
        let task_done = Arc::clone(&done);

        scheduler.spawn(Box::pin(async move {
            task_done.fetch_add(1, Ordering::SeqCst);
        }));

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }
}
