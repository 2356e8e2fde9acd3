// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod queue;

pub use config::{ConfigError, SequenceError, ValidationError};
pub use queue::QueueError;
