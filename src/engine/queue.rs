// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The queue engine: an ordered list of steps, a cursor and a single timer.
//!
//! # Dispatch
//!
//! Every control entry point ends in one dispatch:
//!
//! 1. Resolve the target index. Past the end, a looping queue with loop budget
//!    left wraps to index 0 and counts a loop; otherwise the queue goes idle.
//! 2. A step with assets still to preload hands them to the asset loader and
//!    stops. When every asset has signalled, the step continues from 3.
//! 3. Arm the next timer (only while playing), then run the step action.
//! 4. An auto-destroy step removes itself and leaves the cursor on its old
//!    slot, so the step that moved into that slot is the next one to fire.
//!
//! A timer captures nothing about the cursor: when it fires it advances from
//! wherever the cursor is at that moment.
//!
//! # Locking
//!
//! State lives behind one mutex that is never held while a step action runs,
//! so actions can drive the queue re-entrantly. A timer or preload batch that
//! completes on another worker while an action runs is deferred and replayed
//! once that action (and its auto-destroy) has finished, so actions never
//! overlap.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinSet;

use crate::config::QueueConfig;
use crate::engine::step::{Step, StepContext, StepId, StepInput};
use crate::errors::ValidationError;
use crate::observability::messages::{queue::*, StructuredLog};
use crate::traits::{AssetLoader, Scheduler, TimerHandle};
use crate::utils::lock_unpoisoned;

/// One sequencing session.
///
/// `QueueEngine` is a cheap handle; clones drive the same queue. Timers and
/// preload tasks only hold weak references, so dropping every handle stops
/// the queue.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use the_stepper::backends::{NoopAssetLoader, TokioScheduler};
/// use the_stepper::config::QueueConfig;
/// use the_stepper::engine::{QueueEngine, StepDefinition};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let queue = QueueEngine::new(
///     QueueConfig::default(),
///     Arc::new(TokioScheduler::new()?),
///     Arc::new(NoopAssetLoader::new()),
/// );
///
/// queue
///     .add(StepDefinition::new().named("intro").with_delay_ms(10))?
///     .add(StepDefinition::new().named("outro"))?;
///
/// queue.play();
/// queue.wait_idle().await;
/// assert_eq!(queue.current(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct QueueEngine {
    inner: Arc<QueueInner>,
}

struct QueueInner {
    config: QueueConfig,
    scheduler: Arc<dyn Scheduler>,
    loader: Arc<dyn AssetLoader>,
    state: Mutex<QueueState>,
    idle: Notify,
    next_step_id: AtomicU64,
}

struct QueueState {
    steps: Vec<Step>,
    /// Index of the most recently dispatched step. May sit one past the end
    /// or below zero after `prev`.
    current: isize,
    /// Whether the step at `current` has been dispatched yet.
    dispatched: bool,
    playing: bool,
    loops: u32,
    /// The last fired step removed itself, so `current` already names the
    /// step that follows it.
    recent_destroy: bool,
    /// The step at `current` is waiting on its assets.
    preload_pending: bool,
    idle: bool,
    timer: Option<ArmedTimer>,
    timer_generation: u64,
    /// Bumped on every dispatch; stale preload batches compare against it.
    dispatch_seq: u64,
    /// Step actions currently on the stack, counting re-entrant ones.
    firing: u32,
    /// Work that arrived while an action was running.
    deferred: Option<Deferred>,
}

struct ArmedTimer {
    handle: TimerHandle,
    generation: u64,
}

/// Where a dispatch should go, resolved under the state lock.
enum Target {
    /// Resume: the pending step if nothing fired at the cursor yet, else the next one.
    Resume,
    Advance,
    Back,
    Timer(u64),
    /// A timer that fired while an action was running.
    DeferredTimer,
}

enum Deferred {
    Timer,
    Preload(PreloadJob),
}

struct PreloadJob {
    step_id: StepId,
    urls: Vec<String>,
    dispatch_seq: u64,
}

impl QueueState {
    fn new() -> Self {
        Self {
            steps: Vec::new(),
            current: 0,
            dispatched: false,
            playing: false,
            loops: 0,
            recent_destroy: false,
            preload_pending: false,
            idle: false,
            timer: None,
            timer_generation: 0,
            dispatch_seq: 0,
            firing: 0,
            deferred: None,
        }
    }

    fn advance_target(&self) -> isize {
        if self.recent_destroy || !self.dispatched {
            self.current
        } else {
            self.current + 1
        }
    }

    fn position(&self, id: StepId) -> Option<usize> {
        self.steps.iter().position(|step| step.id() == id)
    }
}

impl QueueEngine {
    /// Create an empty, paused queue.
    pub fn new(
        config: QueueConfig,
        scheduler: Arc<dyn Scheduler>,
        loader: Arc<dyn AssetLoader>,
    ) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                config,
                scheduler,
                loader,
                state: Mutex::new(QueueState::new()),
                idle: Notify::new(),
                next_step_id: AtomicU64::new(1),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, QueueState> {
        lock_unpoisoned(&self.inner.state)
    }

    fn downgrade(&self) -> Weak<QueueInner> {
        Arc::downgrade(&self.inner)
    }

    fn from_weak(weak: &Weak<QueueInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// Append one step or a nested sequence of steps.
    ///
    /// The whole input is validated first; on error nothing is appended. A
    /// pending timer is left alone.
    pub fn add(&self, input: impl Into<StepInput>) -> Result<&Self, ValidationError> {
        let definitions = input.into().into_definitions()?;
        let steps: Vec<Step> = definitions
            .into_iter()
            .map(|definition| {
                let id = StepId::new(self.inner.next_step_id.fetch_add(1, Ordering::Relaxed));
                Step::from_definition(id, definition)
            })
            .collect();

        self.state().steps.extend(steps);
        Ok(self)
    }

    /// Start playing from the pending step.
    ///
    /// The first step fires immediately; delays only separate consecutive
    /// steps. Calling `play` while already playing does nothing.
    pub fn play(&self) -> &Self {
        {
            let mut state = self.state();
            if state.playing {
                return self;
            }
            state.playing = true;

            // The pending preload arms the timer itself once its assets arrive.
            if state.preload_pending {
                return self;
            }
        }

        self.dispatch(Target::Resume);
        self
    }

    /// Cancel the pending timer and stop playing.
    ///
    /// The cursor, steps and loop count are untouched. A preload in flight
    /// keeps loading and still fires its step, but will not arm a timer.
    pub fn pause(&self) -> &Self {
        let mut state = self.state();
        let cancelled_timer = self.cancel_timer(&mut state);
        state.playing = false;

        QueuePaused {
            current: state.current,
            cancelled_timer,
        }
        .log();
        self
    }

    /// Pause, then fire the following step now.
    ///
    /// After an auto-destroy removal the cursor already names the following
    /// step, so that slot fires instead of the one after it. No timer is
    /// armed; call `play` to continue from there.
    pub fn next(&self) -> &Self {
        self.stop_for_navigation();
        self.dispatch(Target::Advance);
        self
    }

    /// Pause, then fire the previous step now.
    pub fn prev(&self) -> &Self {
        self.stop_for_navigation();
        self.dispatch(Target::Back);
        self
    }

    fn stop_for_navigation(&self) {
        let mut state = self.state();
        let cancelled_timer = self.cancel_timer(&mut state);
        state.playing = false;

        QueuePaused {
            current: state.current,
            cancelled_timer,
        }
        .log();
    }

    /// Snapshot of the steps in execution order.
    pub fn steps(&self) -> Vec<Step> {
        self.state().steps.clone()
    }

    pub fn len(&self) -> usize {
        self.state().steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().steps.is_empty()
    }

    pub fn current(&self) -> isize {
        self.state().current
    }

    pub fn is_playing(&self) -> bool {
        self.state().playing
    }

    /// Completed wrap-arounds so far.
    pub fn loops(&self) -> u32 {
        self.state().loops
    }

    pub fn config(&self) -> &QueueConfig {
        &self.inner.config
    }

    /// True once a dispatch found nothing left to run.
    pub fn is_idle(&self) -> bool {
        self.state().idle
    }

    /// Wait until a dispatch finds nothing left to run.
    ///
    /// A looping queue without a loop cap never goes idle.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            if self.is_idle() {
                return;
            }
            notified.await;
        }
    }

    fn dispatch(&self, target: Target) {
        let (step, dispatch_seq) = {
            let mut state = self.state();

            let target = match target {
                Target::Resume | Target::Advance => state.advance_target(),
                Target::Back => state.current - 1,
                Target::Timer(generation) => {
                    let armed = matches!(&state.timer, Some(timer) if timer.generation == generation);
                    if !armed || !state.playing {
                        return;
                    }
                    state.timer = None;
                    if state.firing > 0 {
                        state.deferred = Some(Deferred::Timer);
                        return;
                    }
                    state.advance_target()
                }
                Target::DeferredTimer => {
                    if !state.playing || state.timer.is_some() {
                        return;
                    }
                    state.advance_target()
                }
            };

            state.recent_destroy = false;
            state.preload_pending = false;
            state.dispatch_seq += 1;
            let dispatch_seq = state.dispatch_seq;

            let Some(index) = self.resolve(&mut state, target) else {
                self.go_idle(&mut state);
                return;
            };

            state.current = index as isize;
            state.dispatched = true;
            state.idle = false;

            let step = state.steps[index].clone();
            StepDispatched {
                step_id: step.id().get(),
                step_name: step.name(),
                index,
                step_count: state.steps.len(),
            }
            .log();

            if step.needs_preload() {
                state.preload_pending = true;
                drop(state);
                self.start_preload(PreloadJob {
                    step_id: step.id(),
                    urls: step.preload().to_vec(),
                    dispatch_seq,
                });
                return;
            }

            self.arm_timer(&mut state, step.delay_or(self.inner.config.default_delay()));
            state.firing += 1;
            (step, dispatch_seq)
        };

        self.fire(step, dispatch_seq);
    }

    /// Map a target index onto an existing step, wrapping when looping allows it.
    fn resolve(&self, state: &mut QueueState, target: isize) -> Option<usize> {
        if target < 0 {
            state.current = target;
            state.dispatched = true;
            return None;
        }

        let target = target as usize;
        if target < state.steps.len() {
            return Some(target);
        }

        if state.steps.is_empty() || !self.inner.config.allows_another_loop(state.loops) {
            return None;
        }

        state.loops += 1;
        LoopWrapped {
            loops: state.loops,
            max_loops: self.inner.config.max_loops,
        }
        .log();
        Some(0)
    }

    fn go_idle(&self, state: &mut QueueState) {
        state.idle = true;
        QueueIdle {
            step_count: state.steps.len(),
            loops: state.loops,
        }
        .log();
        self.inner.idle.notify_waiters();
    }

    /// Run the step action. The caller has already counted it in `firing`.
    fn fire(&self, step: Step, dispatch_seq: u64) {
        if let Some(action) = step.action() {
            action(&StepContext {
                step: &step,
                queue: self,
            });
        }

        if step.is_auto_destroy() {
            self.destroy(step.id(), dispatch_seq);
        }

        let deferred = {
            let mut state = self.state();
            state.firing = state.firing.saturating_sub(1);
            if state.firing == 0 {
                state.deferred.take()
            } else {
                None
            }
        };

        match deferred {
            Some(Deferred::Timer) => self.dispatch(Target::DeferredTimer),
            Some(Deferred::Preload(job)) => self.finish_preload(job),
            None => {}
        }
    }

    fn destroy(&self, id: StepId, dispatch_seq: u64) {
        let mut state = self.state();
        let Some(index) = state.position(id) else {
            return;
        };
        state.steps.remove(index);

        if state.dispatch_seq == dispatch_seq {
            state.current = index as isize;
            state.recent_destroy = true;
        } else if (index as isize) < state.current {
            // The action already moved the cursor past this step.
            state.current -= 1;
        }

        StepDestroyed {
            step_id: id.get(),
            index,
            remaining: state.steps.len(),
        }
        .log();
    }

    /// Cancel-before-replace; only a playing queue gets a new timer.
    fn arm_timer(&self, state: &mut QueueState, delay: Duration) {
        self.cancel_timer(state);
        if !state.playing {
            return;
        }

        state.timer_generation += 1;
        let generation = state.timer_generation;
        let queue = self.downgrade();

        let handle = self.inner.scheduler.schedule_once(
            delay,
            Box::new(move || {
                if let Some(queue) = Self::from_weak(&queue) {
                    queue.dispatch(Target::Timer(generation));
                }
            }),
        );

        state.timer = Some(ArmedTimer { handle, generation });
        TimerArmed { generation, delay }.log();
    }

    fn cancel_timer(&self, state: &mut QueueState) -> bool {
        if matches!(state.deferred, Some(Deferred::Timer)) {
            state.deferred = None;
        }
        match state.timer.take() {
            Some(timer) => {
                self.inner.scheduler.cancel(timer.handle);
                true
            }
            None => false,
        }
    }

    /// Load every asset concurrently; the step continues once all of them signal.
    fn start_preload(&self, job: PreloadJob) {
        PreloadStarted {
            step_id: job.step_id.get(),
            asset_count: job.urls.len(),
        }
        .log();

        let queue = self.downgrade();
        let loader = Arc::clone(&self.inner.loader);

        self.inner.scheduler.spawn(Box::pin(async move {
            let mut loads = JoinSet::new();
            for url in job.urls.iter().cloned() {
                let loader = Arc::clone(&loader);
                loads.spawn(async move { loader.load(&url).await });
            }
            while loads.join_next().await.is_some() {}

            if let Some(queue) = Self::from_weak(&queue) {
                queue.finish_preload(job);
            }
        }));
    }

    fn finish_preload(&self, job: PreloadJob) {
        let step = {
            let mut state = self.state();
            if state.firing > 0 {
                state.deferred = Some(Deferred::Preload(job));
                return;
            }

            let stale = state.dispatch_seq != job.dispatch_seq;
            let Some(index) = state.position(job.step_id) else {
                return;
            };
            state.steps[index].mark_preloaded();

            PreloadCompleted {
                step_id: job.step_id.get(),
                asset_count: job.urls.len(),
                stale,
            }
            .log();

            // The queue was navigated elsewhere while these assets loaded.
            if stale {
                return;
            }

            state.preload_pending = false;
            let step = state.steps[index].clone();
            self.arm_timer(&mut state, step.delay_or(self.inner.config.default_delay()));
            state.firing += 1;
            step
        };

        self.fire(step, job.dispatch_seq);
    }
}

impl fmt::Debug for QueueEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("QueueEngine")
            .field("config", &self.inner.config)
            .field("step_count", &state.steps.len())
            .field("current", &state.current)
            .field("playing", &state.playing)
            .field("loops", &state.loops)
            .field("idle", &state.idle)
            .finish()
    }
}
