// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Runtime backends for queues.
//!
//! * `TokioScheduler` - timers and background tasks on a Tokio runtime
//! * `FsAssetLoader` - preloads assets from the local filesystem
//! * `NoopAssetLoader` - completes every preload immediately
//!
//! ```text
//! QueueEngine → Scheduler (timers, preload tasks) → AssetLoader (one load per URL)
//! ```

pub mod fs_loader;
pub mod stub;
pub mod tokio_scheduler;

pub use fs_loader::FsAssetLoader;
pub use stub::NoopAssetLoader;
pub use tokio_scheduler::TokioScheduler;
