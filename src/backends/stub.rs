// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::traits::AssetLoader;

/// An asset loader that completes every load immediately
pub struct NoopAssetLoader;

impl NoopAssetLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoopAssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetLoader for NoopAssetLoader {
    async fn load(&self, _url: &str) {}

    fn name(&self) -> &'static str {
        "noop"
    }
}

/// An asset loader whose loads only complete when a test releases them
#[cfg(test)]
pub struct ManualAssetLoader {
    gates: std::sync::Mutex<std::collections::HashMap<String, std::sync::Arc<tokio::sync::Notify>>>,
    requested: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl ManualAssetLoader {
    pub fn new() -> Self {
        Self {
            gates: std::sync::Mutex::new(std::collections::HashMap::new()),
            requested: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Let one pending (or future) load of `url` finish.
    pub fn complete(&self, url: &str) {
        self.gate(url).notify_one();
    }

    /// Every URL passed to `load`, in request order.
    pub fn requested(&self) -> Vec<String> {
        crate::utils::lock_unpoisoned(&self.requested).clone()
    }

    fn gate(&self, url: &str) -> std::sync::Arc<tokio::sync::Notify> {
        crate::utils::lock_unpoisoned(&self.gates)
            .entry(url.to_string())
            .or_default()
            .clone()
    }
}

#[cfg(test)]
#[async_trait]
impl AssetLoader for ManualAssetLoader {
    async fn load(&self, url: &str) {
        crate::utils::lock_unpoisoned(&self.requested).push(url.to_string());
        let gate = self.gate(url);
        gate.notified().await;
    }

    fn name(&self) -> &'static str {
        "manual"
    }
}
