// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Diagnostic output goes through message structs that implement `Display` and
//! [`messages::StructuredLog`], so the wording of a log line lives next to its
//! fields instead of being repeated at every call site.
//!
//! Messages are organized by subsystem:
//! * `messages::queue` - step dispatch, looping, preloading and pausing
//! * `messages::registry` - queue creation and teardown
//! * `messages::asset` - asset loader events
//!
//! # Usage
//!
//! ```rust
//! use the_stepper::observability::messages::queue::LoopWrapped;
//! use the_stepper::observability::messages::StructuredLog;
//!
//! LoopWrapped { loops: 1, max_loops: Some(3) }.log();
//! ```

pub mod messages;
