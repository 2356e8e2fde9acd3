// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for asset loader events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// An asset finished loading.
///
/// # Log Level
/// `trace!` - Per-asset progress
pub struct AssetLoaded<'a> {
    pub loader: &'a str,
    pub url: &'a str,
    pub bytes: usize,
}

impl Display for AssetLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Loaded asset '{}' ({} bytes) with {}", self.url, self.bytes, self.loader)
    }
}

impl StructuredLog for AssetLoaded<'_> {
    fn log(&self) {
        tracing::trace!(loader = self.loader, url = self.url, bytes = self.bytes, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("asset_loaded", span_name = name, url = self.url)
    }
}

/// An asset could not be loaded and will never signal completion.
///
/// # Log Level
/// `warn!` - The step waiting on this asset is stalled
///
/// # Example
/// ```
/// use the_stepper::observability::messages::asset::AssetLoadStalled;
///
/// let error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
/// let msg = AssetLoadStalled { loader: "fs", url: "intro.png", error: &error };
/// assert!(msg.to_string().contains("intro.png"));
/// ```
pub struct AssetLoadStalled<'a> {
    pub loader: &'a str,
    pub url: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for AssetLoadStalled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Asset '{}' failed to load with {}: {}. The waiting step will not fire",
            self.url, self.loader, self.error
        )
    }
}

impl StructuredLog for AssetLoadStalled<'_> {
    fn log(&self) {
        tracing::warn!(
            loader = self.loader,
            url = self.url,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("asset_stalled", span_name = name, url = self.url)
    }
}
