// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use serde_yaml::Value;
use std::fs;
use std::path::Path;

use crate::config::steps::describe;
use crate::config::{parse_steps, ActionMap, QueueConfig};
use crate::engine::StepInput;
use crate::errors::{ConfigError, SequenceError};

/// A queue described by a sequence file: its config and its steps.
///
/// # Example
/// ```yaml
/// name: slideshow
/// config:
///   loop: true
///   max_loops: 2
///   default_delay_ms: 3000
/// steps:
///   - name: cover
///     action: print
///     preload: [cover.png]
///   - name: credits
///     next_delay: 5000
///     action: log
/// ```
#[derive(Debug)]
pub struct Sequence {
    pub name: Option<String>,
    pub config: QueueConfig,
    pub steps: StepInput,
}

/// Text formats a sequence file may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceFormat {
    Yaml,
    Json,
    Toml,
}

impl SequenceFormat {
    /// Pick the format from the file extension, defaulting to YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SequenceFormat::Json,
            Some(ext) if ext.eq_ignore_ascii_case("toml") => SequenceFormat::Toml,
            _ => SequenceFormat::Yaml,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SequenceDocument {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    config: Option<Value>,
    #[serde(default)]
    steps: Value,
}

/// Load a sequence file, validating its config and every step.
pub fn load_sequence<P: AsRef<Path>>(path: P, actions: &ActionMap) -> Result<Sequence, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_sequence(&content, SequenceFormat::from_path(path), actions).map_err(|e| e.at(path))
}

/// Parse sequence text that did not come from a file.
pub fn parse_sequence(
    content: &str,
    format: SequenceFormat,
    actions: &ActionMap,
) -> Result<Sequence, SequenceError> {
    let document: Value = match format {
        SequenceFormat::Yaml => serde_yaml::from_str(content)?,
        SequenceFormat::Json => serde_json::from_str(content)?,
        SequenceFormat::Toml => toml::from_str(content)?,
    };

    if !document.is_mapping() {
        return Err(SequenceError::NotAMapping {
            found: describe(&document),
        });
    }

    let document: SequenceDocument = serde_yaml::from_value(document)?;

    let config = QueueConfig::from_value(document.config.as_ref())?;
    let steps = parse_steps(&document.steps, actions)?;

    Ok(Sequence {
        name: document.name,
        config,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;
    use tempfile::tempdir;

    #[test]
    fn test_parse_yaml_sequence() {
        let yaml = r#"
name: slideshow
config:
  loop: true
  max_loops: 2
steps:
  - name: cover
    action: print
  - name: credits
    next_delay: 5000
"#;

        let sequence = parse_sequence(yaml, SequenceFormat::Yaml, &ActionMap::with_builtins()).unwrap();
        assert_eq!(sequence.name.as_deref(), Some("slideshow"));
        assert!(sequence.config.looping);
        assert_eq!(sequence.config.max_loops, Some(2));
        assert_eq!(sequence.steps.into_definitions().unwrap().len(), 2);
    }

    #[test]
    fn test_parse_json_sequence() {
        let json = r#"{
            "config": { "defaultDelay": 250 },
            "steps": [{ "name": "a", "autoDestroy": true }, { "name": "b" }]
        }"#;

        let sequence = parse_sequence(json, SequenceFormat::Json, &ActionMap::new()).unwrap();
        assert_eq!(sequence.config.default_delay_ms, 250);
        let steps = sequence.steps.into_definitions().unwrap();
        assert_eq!(steps[0].auto_destroy, Some(true));
    }

    #[test]
    fn test_parse_toml_sequence() {
        let text = r#"
name = "toml"

[config]
loop = true

[[steps]]
name = "only"
next_delay = 10
preload = ["a.png"]
"#;

        let sequence = parse_sequence(text, SequenceFormat::Toml, &ActionMap::new()).unwrap();
        assert!(sequence.config.looping);
        let steps = sequence.steps.into_definitions().unwrap();
        assert_eq!(steps[0].next_delay_ms, Some(10));
        assert_eq!(steps[0].preload, Some(vec!["a.png".to_string()]));
    }

    #[test]
    fn test_missing_steps_is_a_validation_error() {
        let result = parse_sequence("name: empty\n", SequenceFormat::Yaml, &ActionMap::new());
        assert!(matches!(
            result,
            Err(SequenceError::Validation(ValidationError::MissingStep))
        ));
    }

    #[test]
    fn test_non_mapping_config_is_rejected() {
        let result = parse_sequence(
            "config: 123\nsteps: []\n",
            SequenceFormat::Yaml,
            &ActionMap::new(),
        );
        assert!(matches!(
            result,
            Err(SequenceError::Validation(ValidationError::InvalidConfig { .. }))
        ));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SequenceFormat::from_path(Path::new("a.json")), SequenceFormat::Json);
        assert_eq!(SequenceFormat::from_path(Path::new("a.TOML")), SequenceFormat::Toml);
        assert_eq!(SequenceFormat::from_path(Path::new("a.yml")), SequenceFormat::Yaml);
        assert_eq!(SequenceFormat::from_path(Path::new("noext")), SequenceFormat::Yaml);
    }

    #[test]
    fn test_load_sequence_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "steps:\n  - next_delay: -3\n").unwrap();

        let error = load_sequence(&path, &ActionMap::new()).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::Validation {
                source: ValidationError::NegativeDelay { delay_ms: -3 },
                ..
            }
        ));
        assert!(error.to_string().contains("broken.yaml"));
    }

    #[test]
    fn test_load_sequence_missing_file() {
        let dir = tempdir().unwrap();
        let error = load_sequence(dir.path().join("nope.yaml"), &ActionMap::new()).unwrap_err();
        assert!(matches!(error, ConfigError::Io { .. }));
    }

    #[test]
    fn test_syntax_errors_keep_their_source() {
        let actions = ActionMap::new();

        let yaml = parse_sequence("steps: [unclosed", SequenceFormat::Yaml, &actions);
        assert!(matches!(yaml, Err(SequenceError::Yaml(_))));

        let json = parse_sequence("{ \"steps\": ", SequenceFormat::Json, &actions);
        assert!(matches!(json, Err(SequenceError::Json(_))));

        let toml = parse_sequence("steps = [", SequenceFormat::Toml, &actions);
        assert!(matches!(toml, Err(SequenceError::Toml(_))));
    }

    #[test]
    fn test_top_level_sequence_is_rejected() {
        let result = parse_sequence("- name: a\n", SequenceFormat::Yaml, &ActionMap::new());
        assert!(matches!(
            result,
            Err(SequenceError::NotAMapping { ref found }) if found == "a sequence"
        ));
    }

    #[test]
    fn test_load_sequence_wraps_parse_errors_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let error = load_sequence(&path, &ActionMap::new()).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::Parse {
                source: SequenceError::Json(_),
                ..
            }
        ));
        assert!(error.to_string().contains("broken.json"));
    }
}
