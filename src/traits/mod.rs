// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod asset_loader;
pub mod scheduler;

pub use asset_loader::AssetLoader;
pub use scheduler::{BackgroundTask, Scheduler, TimerCallback, TimerHandle};
