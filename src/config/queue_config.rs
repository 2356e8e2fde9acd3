// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::consts::DEFAULT_DELAY_MS;
use crate::config::steps::describe;
use crate::errors::ValidationError;

/// Behaviour of a single queue, resolved once when the queue is created.
///
/// Fields missing from user input keep their defaults; keys the queue does
/// not recognise are kept in `extra` so applications can attach their own
/// settings.
///
/// # Fields
/// * `looping` (`loop`) - wrap back to the first step after the last one
/// * `max_loops` (`maxLoops`) - cap on wrap-arounds, unbounded when absent
/// * `default_delay_ms` (`defaultDelay`) - gap used by steps without their own delay
///
/// # Example
/// ```yaml
/// loop: true
/// max_loops: 3
/// default_delay_ms: 1500
/// theme: dark        # kept in `extra`
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    #[serde(rename = "loop")]
    pub looping: bool,
    #[serde(alias = "maxLoops")]
    pub max_loops: Option<u32>,
    #[serde(alias = "defaultDelay", alias = "default_delay")]
    pub default_delay_ms: u64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            looping: false,
            max_loops: None,
            default_delay_ms: DEFAULT_DELAY_MS,
            extra: BTreeMap::new(),
        }
    }
}

impl QueueConfig {
    /// Merge a loosely-typed config document over the defaults.
    ///
    /// An absent or null document yields the defaults. Anything other than a
    /// key/value mapping, or a mapping with mistyped known fields, is rejected.
    ///
    /// # Example
    /// ```
    /// use the_stepper::config::QueueConfig;
    ///
    /// let doc: serde_yaml::Value = serde_yaml::from_str("loop: true").unwrap();
    /// let config = QueueConfig::from_value(Some(&doc)).unwrap();
    /// assert!(config.looping);
    /// assert_eq!(config.default_delay_ms, 1000);
    ///
    /// assert!(QueueConfig::from_value(Some(&serde_yaml::Value::from(123))).is_err());
    /// ```
    pub fn from_value(value: Option<&Value>) -> Result<Self, ValidationError> {
        match value {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(mapping @ Value::Mapping(_)) => serde_yaml::from_value(mapping.clone())
                .map_err(|e| ValidationError::InvalidConfig {
                    reason: e.to_string(),
                }),
            Some(other) => Err(ValidationError::InvalidConfig {
                reason: format!("found {}", describe(other)),
            }),
        }
    }

    pub fn default_delay(&self) -> Duration {
        Duration::from_millis(self.default_delay_ms)
    }

    /// Whether a queue that has wrapped `loops` times may wrap once more.
    pub fn allows_another_loop(&self, loops: u32) -> bool {
        self.looping && self.max_loops.map_or(true, |max| loops < max)
    }
}
