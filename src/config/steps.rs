// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Shape validation for steps declared as YAML/JSON/TOML documents.
//!
//! Typed [`StepDefinition`]s can only get the delay wrong. Documents can get
//! every field wrong, so each one is checked here before a definition is
//! built:
//!
//! * `next_delay` (`nextDelay`, `next_delay_ms`) - a number, zero or greater
//! * `action` (`fn`) - the name of an action in the [`ActionMap`]
//! * `auto_destroy` (`autoDestroy`) - a boolean
//! * `preload` - a sequence of strings
//! * `name` - a string; numbers and booleans are used as written
//!
//! A sequence of documents becomes [`StepInput::Many`], nested sequences included.
//!
//! ```rust
//! use the_stepper::config::{parse_steps, ActionMap};
//!
//! let doc: serde_yaml::Value = serde_yaml::from_str(r#"
//! - name: intro
//!   action: log
//!   next_delay: 500
//! - name: flash
//!   auto_destroy: true
//! "#).unwrap();
//!
//! assert!(parse_steps(&doc, &ActionMap::with_builtins()).is_ok());
//! ```

use serde_yaml::{Mapping, Value};

use crate::config::ActionMap;
use crate::engine::{StepDefinition, StepInput};
use crate::errors::ValidationError;

/// Short description of a value for error messages.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string '{}'", s),
        Value::Sequence(_) => "a sequence".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(tagged) => format!("tagged value {}", tagged.tag),
    }
}

fn field<'a>(mapping: &'a Mapping, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| mapping.get(*key))
}

/// Turn a step document (or a sequence of them) into validated input for `add`.
pub fn parse_steps(value: &Value, actions: &ActionMap) -> Result<StepInput, ValidationError> {
    match value {
        Value::Null => Err(ValidationError::MissingStep),
        Value::Sequence(items) => items
            .iter()
            .map(|item| parse_steps(item, actions))
            .collect::<Result<Vec<_>, _>>()
            .map(StepInput::Many),
        Value::Mapping(mapping) => parse_step(mapping, actions).map(StepInput::Single),
        other => Err(ValidationError::InvalidStep {
            found: describe(other),
        }),
    }
}

fn parse_step(mapping: &Mapping, actions: &ActionMap) -> Result<StepDefinition, ValidationError> {
    let mut definition = StepDefinition::new();

    if let Some(name) = field(mapping, &["name"]) {
        match name {
            Value::String(name) => definition.name = Some(name.clone()),
            Value::Number(number) => definition.name = Some(number.to_string()),
            Value::Bool(flag) => definition.name = Some(flag.to_string()),
            Value::Null => {}
            other => {
                return Err(ValidationError::InvalidName {
                    found: describe(other),
                })
            }
        }
    }

    if let Some(delay) = field(mapping, &["next_delay", "nextDelay", "next_delay_ms"]) {
        definition.next_delay_ms = parse_delay(delay)?;
    }

    if let Some(action) = field(mapping, &["action", "fn"]) {
        definition.action = match action {
            Value::Null => None,
            Value::String(name) => Some(
                actions
                    .get(name)
                    .cloned()
                    .ok_or_else(|| ValidationError::InvalidAction {
                        action: name.clone(),
                    })?,
            ),
            other => {
                return Err(ValidationError::InvalidAction {
                    action: describe(other),
                })
            }
        };
    }

    if let Some(auto_destroy) = field(mapping, &["auto_destroy", "autoDestroy"]) {
        definition.auto_destroy = match auto_destroy {
            Value::Null => None,
            Value::Bool(flag) => Some(*flag),
            other => {
                return Err(ValidationError::InvalidAutoDestroy {
                    found: describe(other),
                })
            }
        };
    }

    if let Some(preload) = field(mapping, &["preload"]) {
        definition.preload = match preload {
            Value::Null => None,
            Value::Sequence(urls) => Some(parse_preload(urls)?),
            other => {
                return Err(ValidationError::InvalidPreload {
                    reason: format!("found {}", describe(other)),
                })
            }
        };
    }

    definition.validate()?;
    Ok(definition)
}

/// Whole milliseconds; fractional values are truncated.
fn parse_delay(delay: &Value) -> Result<Option<i64>, ValidationError> {
    match delay {
        Value::Null => Ok(None),
        Value::Number(number) => {
            if let Some(ms) = number.as_i64() {
                return Ok(Some(ms));
            }
            if let Some(ms) = number.as_u64() {
                return Ok(Some(i64::try_from(ms).unwrap_or(i64::MAX)));
            }
            match number.as_f64() {
                Some(ms) if ms.is_nan() => Err(ValidationError::InvalidDelay {
                    found: describe(delay),
                }),
                Some(ms) if ms < 0.0 => Err(ValidationError::NegativeDelay {
                    delay_ms: ms.floor() as i64,
                }),
                Some(ms) => Ok(Some(ms.trunc() as i64)),
                None => Err(ValidationError::InvalidDelay {
                    found: describe(delay),
                }),
            }
        }
        other => Err(ValidationError::InvalidDelay {
            found: describe(other),
        }),
    }
}

fn parse_preload(urls: &[Value]) -> Result<Vec<String>, ValidationError> {
    urls.iter()
        .enumerate()
        .map(|(position, url)| match url {
            Value::String(url) => Ok(url.clone()),
            other => Err(ValidationError::InvalidPreload {
                reason: format!("entry {} is {}", position, describe(other)),
            }),
        })
        .collect()
}
