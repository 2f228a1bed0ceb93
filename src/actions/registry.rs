//! Action registry - the closed set of handlers known at startup

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::builtin;
use super::trait_def::Action;

#[derive(Default)]
pub struct ActionRegistry {
    actions: HashMap<String, Arc<dyn Action>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in actions
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for action in builtin::all() {
            registry.actions.insert(action.name().to_string(), action);
        }
        registry
    }

    /// Register an action
    pub fn register<A: Action + 'static>(&mut self, action: A) -> Result<(), String> {
        self.register_arc(Arc::new(action))
    }

    fn register_arc(&mut self, action: Arc<dyn Action>) -> Result<(), String> {
        let name = action.name().to_string();

        if self.actions.contains_key(&name) {
            return Err(format!("Action '{}' already registered", name));
        }

        debug!("Registering action: {}", name);
        self.actions.insert(name, action);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Action>> {
        self.actions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Tokens from `calls` that have no registered action
    pub fn missing<'a>(&self, calls: &[&'a str]) -> Vec<&'a str> {
        let missing: Vec<&str> = calls.iter().copied().filter(|c| !self.contains(c)).collect();
        if missing.is_empty() {
            info!("All {} menu calls have a registered action", calls.len());
        }
        missing
    }
}
