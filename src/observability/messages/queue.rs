// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for queue engine events.
//!
//! The engine reports what it did, never what went wrong: invalid input is
//! returned to the caller and stalled preloads stay silent.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A step was resolved and is about to fire.
///
/// # Log Level
/// `debug!` - Per-step progress
pub struct StepDispatched<'a> {
    pub step_id: u64,
    pub step_name: Option<&'a str>,
    pub index: usize,
    pub step_count: usize,
}

impl Display for StepDispatched<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dispatching step {} ({}) at index {} of {}",
            self.step_id,
            self.step_name.unwrap_or("unnamed"),
            self.index,
            self.step_count
        )
    }
}

impl StructuredLog for StepDispatched<'_> {
    fn log(&self) {
        tracing::debug!(
            step_id = self.step_id,
            step_name = self.step_name,
            index = self.index,
            step_count = self.step_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "step_dispatch",
            span_name = name,
            step_id = self.step_id,
            step_name = self.step_name,
            index = self.index,
        )
    }
}

/// A step fired through the built-in `log` action.
///
/// # Log Level
/// `info!` - Visible progress through a sequence
pub struct StepFired<'a> {
    pub step_id: u64,
    pub step_name: Option<&'a str>,
    pub remaining: usize,
}

impl Display for StepFired<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Step {} ({}) fired, {} steps in queue",
            self.step_id,
            self.step_name.unwrap_or("unnamed"),
            self.remaining
        )
    }
}

impl StructuredLog for StepFired<'_> {
    fn log(&self) {
        tracing::info!(
            step_id = self.step_id,
            step_name = self.step_name,
            remaining = self.remaining,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("step_fired", span_name = name, step_id = self.step_id)
    }
}

/// The cursor ran past the last step and wrapped back to the first one.
///
/// # Log Level
/// `debug!` - Per-pass progress
///
/// # Example
/// ```
/// use the_stepper::observability::messages::queue::LoopWrapped;
///
/// let msg = LoopWrapped { loops: 2, max_loops: None };
/// assert_eq!(msg.to_string(), "Queue wrapped to the first step (loop 2 of unbounded)");
/// ```
pub struct LoopWrapped {
    pub loops: u32,
    pub max_loops: Option<u32>,
}

impl Display for LoopWrapped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.max_loops {
            Some(max) => write!(f, "Queue wrapped to the first step (loop {} of {})", self.loops, max),
            None => write!(f, "Queue wrapped to the first step (loop {} of unbounded)", self.loops),
        }
    }
}

impl StructuredLog for LoopWrapped {
    fn log(&self) {
        tracing::debug!(loops = self.loops, max_loops = self.max_loops, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("loop_wrapped", span_name = name, loops = self.loops)
    }
}

/// Dispatch found no step to run and the queue went idle.
///
/// # Log Level
/// `info!` - The sequence finished
pub struct QueueIdle {
    pub step_count: usize,
    pub loops: u32,
}

impl Display for QueueIdle {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Queue reached the end of {} steps after {} loops and is idle",
            self.step_count, self.loops
        )
    }
}

impl StructuredLog for QueueIdle {
    fn log(&self) {
        tracing::info!(step_count = self.step_count, loops = self.loops, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("queue_idle", span_name = name, step_count = self.step_count)
    }
}

/// The next timer was armed.
///
/// # Log Level
/// `trace!` - Timer bookkeeping
pub struct TimerArmed {
    pub generation: u64,
    pub delay: Duration,
}

impl Display for TimerArmed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Armed timer {} for {:?}", self.generation, self.delay)
    }
}

impl StructuredLog for TimerArmed {
    fn log(&self) {
        tracing::trace!(
            generation = self.generation,
            delay_ms = self.delay.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("timer_armed", span_name = name, generation = self.generation)
    }
}

/// A step started loading its assets.
///
/// # Log Level
/// `debug!` - Per-step progress
pub struct PreloadStarted {
    pub step_id: u64,
    pub asset_count: usize,
}

impl Display for PreloadStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Preloading {} assets for step {}",
            self.asset_count, self.step_id
        )
    }
}

impl StructuredLog for PreloadStarted {
    fn log(&self) {
        tracing::debug!(step_id = self.step_id, asset_count = self.asset_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "preload",
            span_name = name,
            step_id = self.step_id,
            asset_count = self.asset_count,
        )
    }
}

/// Every asset of a step finished loading.
///
/// # Log Level
/// `debug!` - Per-step progress
pub struct PreloadCompleted {
    pub step_id: u64,
    pub asset_count: usize,
    pub stale: bool,
}

impl Display for PreloadCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Preloaded {} assets for step {}",
            self.asset_count, self.step_id
        )?;
        if self.stale {
            write!(f, " after the queue moved on")?;
        }
        Ok(())
    }
}

impl StructuredLog for PreloadCompleted {
    fn log(&self) {
        tracing::debug!(
            step_id = self.step_id,
            asset_count = self.asset_count,
            stale = self.stale,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("preload_completed", span_name = name, step_id = self.step_id)
    }
}

/// A one-shot step removed itself after firing.
///
/// # Log Level
/// `debug!` - Per-step progress
pub struct StepDestroyed {
    pub step_id: u64,
    pub index: usize,
    pub remaining: usize,
}

impl Display for StepDestroyed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Removed auto-destroy step {} from index {}, {} steps remain",
            self.step_id, self.index, self.remaining
        )
    }
}

impl StructuredLog for StepDestroyed {
    fn log(&self) {
        tracing::debug!(
            step_id = self.step_id,
            index = self.index,
            remaining = self.remaining,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("step_destroyed", span_name = name, step_id = self.step_id)
    }
}

/// The queue was paused.
///
/// # Log Level
/// `debug!` - Control event
pub struct QueuePaused {
    pub current: isize,
    pub cancelled_timer: bool,
}

impl Display for QueuePaused {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Queue paused at index {}", self.current)?;
        if self.cancelled_timer {
            write!(f, ", pending timer cancelled")?;
        }
        Ok(())
    }
}

impl StructuredLog for QueuePaused {
    fn log(&self) {
        tracing::debug!(
            current = self.current as i64,
            cancelled_timer = self.cancelled_timer,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("queue_paused", span_name = name, current = self.current as i64)
    }
}
