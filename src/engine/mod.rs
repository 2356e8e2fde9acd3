// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod queue;
pub mod registry;
pub mod step;

pub use queue::QueueEngine;
pub use registry::{QueueEntry, QueueRegistry};
pub use step::{Step, StepAction, StepContext, StepDefinition, StepId, StepInput};
