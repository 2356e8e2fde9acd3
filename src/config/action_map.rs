// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::consts::{BUILTIN_LOG_ACTION, BUILTIN_PRINT_ACTION};
use crate::engine::{StepAction, StepContext};
use crate::observability::messages::{queue::StepFired, StructuredLog};

/// Named step actions that step documents can refer to.
///
/// Steps declared in YAML cannot carry closures, so they name an action
/// instead. A name missing from the map makes the step "not invocable".
///
/// # Example
/// ```
/// use the_stepper::config::ActionMap;
///
/// let mut actions = ActionMap::with_builtins();
/// actions.insert("beep", |_ctx| println!("beep"));
///
/// assert!(actions.contains_key("beep"));
/// assert!(actions.contains_key("log"));
/// assert!(!actions.contains_key("launch"));
/// ```
#[derive(Clone, Default)]
pub struct ActionMap(pub HashMap<String, StepAction>);

impl ActionMap {
    /// Create a new empty action map
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Map pre-populated with the `log` and `print` actions
    pub fn with_builtins() -> Self {
        let mut actions = Self::new();
        actions.insert(BUILTIN_LOG_ACTION, |ctx: &StepContext<'_>| {
            StepFired {
                step_id: ctx.step.id().get(),
                step_name: ctx.step.name(),
                remaining: ctx.queue.len(),
            }
            .log();
        });
        actions.insert(BUILTIN_PRINT_ACTION, |ctx: &StepContext<'_>| match ctx.step.name() {
            Some(name) => println!("{}", name),
            None => println!("step {}", ctx.step.id()),
        });
        actions
    }

    /// Register an action under `name`, replacing any previous one
    pub fn insert<F>(&mut self, name: impl Into<String>, action: F)
    where
        F: Fn(&StepContext<'_>) + Send + Sync + 'static,
    {
        self.0.insert(name.into(), Arc::new(action));
    }

    /// Register an already shared action
    pub fn insert_shared(&mut self, name: impl Into<String>, action: StepAction) {
        self.0.insert(name.into(), action);
    }

    pub fn get(&self, name: &str) -> Option<&StepAction> {
        self.0.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

impl fmt::Debug for ActionMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.0.keys().collect();
        names.sort();
        f.debug_struct("ActionMap")
            .field("action_count", &self.0.len())
            .field("actions", &names)
            .finish()
    }
}

impl From<HashMap<String, StepAction>> for ActionMap {
    fn from(map: HashMap<String, StepAction>) -> Self {
        Self(map)
    }
}
