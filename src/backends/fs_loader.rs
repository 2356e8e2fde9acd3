// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::path::PathBuf;

use crate::observability::messages::{asset::*, StructuredLog};
use crate::traits::AssetLoader;

/// Loads assets from the local filesystem.
///
/// URLs are treated as paths, optionally prefixed with `file://`, and resolved
/// against `root` when relative. An asset that cannot be read logs a warning
/// and never completes.
pub struct FsAssetLoader {
    root: PathBuf,
}

impl FsAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, url: &str) -> PathBuf {
        let path = PathBuf::from(url.strip_prefix("file://").unwrap_or(url));
        if path.is_absolute() {
            path
        } else {
            self.root.join(path)
        }
    }
}

#[async_trait]
impl AssetLoader for FsAssetLoader {
    async fn load(&self, url: &str) {
        match tokio::fs::read(self.resolve(url)).await {
            Ok(bytes) => {
                AssetLoaded {
                    loader: self.name(),
                    url,
                    bytes: bytes.len(),
                }
                .log();
            }
            Err(error) => {
                AssetLoadStalled {
                    loader: self.name(),
                    url,
                    error: &error,
                }
                .log();
                std::future::pending::<()>().await;
            }
        }
    }

    fn name(&self) -> &'static str {
        "fs"
    }
}
