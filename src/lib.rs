// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // schedulers and asset loaders
pub mod config;     // queue config, step documents, sequence files
pub mod engine;     // queue engine + registry
pub mod errors;     // error handling
pub mod observability;
pub mod traits;     // scheduler / loader seams
pub mod utils;
