// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod action_map;
mod loader;
mod queue_config;
mod steps;

pub mod consts;

pub use action_map::ActionMap;
pub use loader::{load_sequence, parse_sequence, Sequence, SequenceFormat};
pub use queue_config::QueueConfig;
pub use steps::parse_steps;
