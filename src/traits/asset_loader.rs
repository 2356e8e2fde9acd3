// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

/// Loads a single asset ahead of the step that needs it.
///
/// Returning from `load` is the only completion signal. There is no failure
/// channel: an implementation that cannot load an asset should simply never
/// return, which stalls the owning step.
#[async_trait]
pub trait AssetLoader: Send + Sync {
    async fn load(&self, url: &str);

    fn name(&self) -> &'static str;
}
