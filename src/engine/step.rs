// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Step model: what users declare, what the queue stores, and what actions see.
//!
//! A [`StepDefinition`] is user input and may be invalid. Adding it to a queue
//! validates it and turns it into a [`Step`] with a stable [`StepId`], so the
//! queue can find the step again after other steps were removed around it.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::QueueEngine;
use crate::errors::ValidationError;

/// Callback invoked when a step fires.
pub type StepAction = Arc<dyn Fn(&StepContext<'_>) + Send + Sync>;

/// What a step action receives: the fired step and the queue that fired it.
///
/// Actions run with no queue lock held, so they may call `next`, `prev`,
/// `pause` or `add` on `queue`.
pub struct StepContext<'a> {
    pub step: &'a Step,
    pub queue: &'a QueueEngine,
}

/// Stable identity of a step within its queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(u64);

impl StepId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A step as declared by the caller.
///
/// # Example
/// ```
/// use the_stepper::engine::StepDefinition;
///
/// let step = StepDefinition::new()
///     .named("title card")
///     .with_delay_ms(2_500)
///     .with_preload(["title.png", "logo.png"])
///     .with_action(|ctx| println!("showing {}", ctx.step.id()));
///
/// assert!(step.validate().is_ok());
/// ```
#[derive(Clone, Default)]
pub struct StepDefinition {
    pub name: Option<String>,
    /// Gap before the following step, in milliseconds. Zero or absent falls
    /// back to the queue's default delay.
    pub next_delay_ms: Option<i64>,
    pub action: Option<StepAction>,
    pub auto_destroy: Option<bool>,
    pub preload: Option<Vec<String>>,
}

impl StepDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_delay_ms(mut self, delay_ms: i64) -> Self {
        self.next_delay_ms = Some(delay_ms);
        self
    }

    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&StepContext<'_>) + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    pub fn with_shared_action(mut self, action: StepAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Remove the step from its queue right after it fires once.
    pub fn auto_destroy(mut self) -> Self {
        self.auto_destroy = Some(true);
        self
    }

    pub fn with_preload<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preload = Some(urls.into_iter().map(Into::into).collect());
        self
    }

    /// Check the step shape without adding it anywhere.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.next_delay_ms {
            Some(delay_ms) if delay_ms < 0 => Err(ValidationError::NegativeDelay { delay_ms }),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinition")
            .field("name", &self.name)
            .field("next_delay_ms", &self.next_delay_ms)
            .field("has_action", &self.action.is_some())
            .field("auto_destroy", &self.auto_destroy)
            .field("preload", &self.preload)
            .finish()
    }
}

/// A validated step owned by a queue.
#[derive(Clone)]
pub struct Step {
    id: StepId,
    name: Option<String>,
    next_delay: Option<Duration>,
    action: Option<StepAction>,
    auto_destroy: bool,
    preload: Vec<String>,
    preloaded: bool,
}

impl Step {
    /// Build a stored step from a definition that already passed `validate`.
    pub(crate) fn from_definition(id: StepId, definition: StepDefinition) -> Self {
        let next_delay = definition
            .next_delay_ms
            .filter(|delay_ms| *delay_ms > 0)
            .map(|delay_ms| Duration::from_millis(delay_ms as u64));

        Self {
            id,
            name: definition.name,
            next_delay,
            action: definition.action,
            auto_destroy: definition.auto_destroy.unwrap_or(false),
            preload: definition.preload.unwrap_or_default(),
            preloaded: false,
        }
    }

    pub fn id(&self) -> StepId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The step's own delay; `None` means the queue default applies.
    pub fn next_delay(&self) -> Option<Duration> {
        self.next_delay
    }

    pub fn action(&self) -> Option<&StepAction> {
        self.action.as_ref()
    }

    pub fn is_auto_destroy(&self) -> bool {
        self.auto_destroy
    }

    pub fn preload(&self) -> &[String] {
        &self.preload
    }

    pub fn is_preloaded(&self) -> bool {
        self.preloaded
    }

    pub(crate) fn mark_preloaded(&mut self) {
        self.preloaded = true;
    }

    /// An empty preload list has nothing to wait for.
    pub(crate) fn needs_preload(&self) -> bool {
        !self.preload.is_empty() && !self.preloaded
    }

    pub(crate) fn delay_or(&self, default_delay: Duration) -> Duration {
        self.next_delay.unwrap_or(default_delay)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("next_delay", &self.next_delay)
            .field("has_action", &self.action.is_some())
            .field("auto_destroy", &self.auto_destroy)
            .field("preload", &self.preload)
            .field("preloaded", &self.preloaded)
            .finish()
    }
}

/// Argument to `QueueEngine::add`: one step, a nested sequence, or nothing.
#[derive(Debug, Clone)]
pub enum StepInput {
    Missing,
    Single(StepDefinition),
    Many(Vec<StepInput>),
}

impl StepInput {
    /// Flatten nested sequences in order, validating every step.
    ///
    /// Fails on the first invalid element without returning any of the others.
    pub(crate) fn into_definitions(self) -> Result<Vec<StepDefinition>, ValidationError> {
        let mut definitions = Vec::new();
        self.collect_into(&mut definitions)?;
        Ok(definitions)
    }

    fn collect_into(self, definitions: &mut Vec<StepDefinition>) -> Result<(), ValidationError> {
        match self {
            StepInput::Missing => Err(ValidationError::MissingStep),
            StepInput::Single(definition) => {
                definition.validate()?;
                definitions.push(definition);
                Ok(())
            }
            StepInput::Many(inputs) => inputs
                .into_iter()
                .try_for_each(|input| input.collect_into(definitions)),
        }
    }
}

impl From<StepDefinition> for StepInput {
    fn from(definition: StepDefinition) -> Self {
        StepInput::Single(definition)
    }
}

impl From<Vec<StepDefinition>> for StepInput {
    fn from(definitions: Vec<StepDefinition>) -> Self {
        StepInput::Many(definitions.into_iter().map(StepInput::Single).collect())
    }
}

impl From<Vec<StepInput>> for StepInput {
    fn from(inputs: Vec<StepInput>) -> Self {
        StepInput::Many(inputs)
    }
}

impl<T: Into<StepInput>> From<Option<T>> for StepInput {
    fn from(input: Option<T>) -> Self {
        input.map_or(StepInput::Missing, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_delay_is_rejected() {
        let result = StepDefinition::new().with_delay_ms(-1).validate();
        assert_eq!(result, Err(ValidationError::NegativeDelay { delay_ms: -1 }));
    }

    #[test]
    fn test_zero_delay_falls_back_to_default() {
        let step = Step::from_definition(StepId::new(1), StepDefinition::new().with_delay_ms(0));
        assert_eq!(step.next_delay(), None);
        assert_eq!(step.delay_or(Duration::from_millis(1000)), Duration::from_millis(1000));

        let step = Step::from_definition(StepId::new(2), StepDefinition::new().with_delay_ms(250));
        assert_eq!(step.delay_or(Duration::from_millis(1000)), Duration::from_millis(250));
    }

    #[test]
    fn test_empty_preload_needs_nothing() {
        let step = Step::from_definition(
            StepId::new(1),
            StepDefinition::new().with_preload(Vec::<String>::new()),
        );
        assert!(!step.needs_preload());

        let mut step = Step::from_definition(
            StepId::new(2),
            StepDefinition::new().with_preload(["a.png"]),
        );
        assert!(step.needs_preload());
        step.mark_preloaded();
        assert!(!step.needs_preload());
        assert!(step.is_preloaded());
    }

    #[test]
    fn test_nested_input_flattens_in_order() {
        let input = StepInput::Many(vec![
            StepDefinition::new().named("a").into(),
            vec![
                StepDefinition::new().named("b"),
                StepDefinition::new().named("c"),
            ]
            .into(),
            StepDefinition::new().named("d").into(),
        ]);

        let names: Vec<_> = input
            .into_definitions()
            .unwrap()
            .into_iter()
            .map(|d| d.name.unwrap())
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_missing_input_fails_anywhere_in_the_tree() {
        let none: Option<StepDefinition> = None;
        assert_eq!(
            StepInput::from(none).into_definitions().unwrap_err(),
            ValidationError::MissingStep
        );

        let nested = StepInput::Many(vec![
            StepDefinition::new().into(),
            StepInput::Missing,
        ]);
        assert_eq!(nested.into_definitions().unwrap_err(), ValidationError::MissingStep);
    }

    #[test]
    fn test_empty_sequence_is_valid() {
        let input = StepInput::from(Vec::<StepDefinition>::new());
        assert!(input.into_definitions().unwrap().is_empty());
    }
}
