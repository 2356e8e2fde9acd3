// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised synchronously when a step or a queue config has the wrong shape.
///
/// A failed `add` or `create` never changes engine or registry state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// `add` was called without a step
    #[error("Not enough arguments: a step or a sequence of steps is required")]
    MissingStep,

    /// A step name was a sequence or a mapping instead of a scalar
    #[error("Step name must be a string, got {found}")]
    InvalidName { found: String },

    /// A step document was neither a mapping nor a sequence of steps
    #[error("Step should be a key/value object or a sequence of steps, got {found}")]
    InvalidStep { found: String },

    /// The step declared a negative delay
    #[error("Step delay must be zero or greater, got {delay_ms}ms")]
    NegativeDelay { delay_ms: i64 },

    /// The step declared a delay that is not a number
    #[error("Step delay must be a number of milliseconds, got {found}")]
    InvalidDelay { found: String },

    /// The step action cannot be invoked
    #[error("Step action '{action}' is not invocable")]
    InvalidAction { action: String },

    /// `auto_destroy` was present but not a boolean
    #[error("Step auto_destroy must be a boolean, got {found}")]
    InvalidAutoDestroy { found: String },

    /// `preload` was present but not a sequence of strings
    #[error("Step preload must be a sequence of URLs: {reason}")]
    InvalidPreload { reason: String },

    /// The queue config was not a key/value structure or had mistyped fields
    #[error("Config object should be a key/value object: {reason}")]
    InvalidConfig { reason: String },
}

/// Errors that can occur while loading a sequence file from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read sequence file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse sequence file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: SequenceError,
    },

    #[error("Invalid sequence file '{path}': {source}")]
    Validation {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}

/// Errors parsing sequence text that is not yet tied to a file path.
#[derive(Debug, Error)]
pub enum SequenceError {
    #[error("Invalid YAML sequence: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON sequence: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML sequence: {0}")]
    Toml(#[from] toml::de::Error),

    /// The document parsed but its top level is not a key/value structure
    #[error("A sequence must be a key/value document, got {found}")]
    NotAMapping { found: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl SequenceError {
    /// Attach the file the sequence text came from.
    pub(crate) fn at(self, path: &Path) -> ConfigError {
        let path = path.to_path_buf();
        match self {
            SequenceError::Validation(source) => ConfigError::Validation { path, source },
            source => ConfigError::Parse { path, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let test_cases = vec![
            (ValidationError::MissingStep, "Not enough arguments"),
            (
                ValidationError::NegativeDelay { delay_ms: -5 },
                "got -5ms",
            ),
            (
                ValidationError::InvalidAction {
                    action: "launch".to_string(),
                },
                "'launch' is not invocable",
            ),
            (
                ValidationError::InvalidConfig {
                    reason: "found 123".to_string(),
                },
                "key/value object",
            ),
        ];

        for (error, expected) in test_cases {
            let message = error.to_string();
            assert!(
                message.contains(expected),
                "'{}' should contain '{}'",
                message,
                expected
            );
        }
    }

    #[test]
    fn test_config_error_keeps_validation_source() {
        let error = ConfigError::Validation {
            path: PathBuf::from("intro.yaml"),
            source: ValidationError::MissingStep,
        };

        assert!(error.to_string().contains("intro.yaml"));
        let source = std::error::Error::source(&error).map(|s| s.to_string());
        assert_eq!(source, Some(ValidationError::MissingStep.to_string()));
    }

    #[test]
    fn test_sequence_error_at_path() {
        let validation = SequenceError::from(ValidationError::MissingStep).at(Path::new("a.yaml"));
        assert!(matches!(
            validation,
            ConfigError::Validation {
                source: ValidationError::MissingStep,
                ..
            }
        ));

        let parse = SequenceError::NotAMapping {
            found: "a sequence".to_string(),
        }
        .at(Path::new("b.yaml"));
        assert!(matches!(
            parse,
            ConfigError::Parse {
                source: SequenceError::NotAMapping { .. },
                ..
            }
        ));
        assert!(parse.to_string().contains("b.yaml"));
        assert!(parse.to_string().contains("key/value document"));
    }
}
