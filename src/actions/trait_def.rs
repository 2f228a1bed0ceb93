//! Action trait definitions

use crate::domain::entities::Rendering;

/// A named handler that consumes the user's next free-text message.
///
/// Menu leaves reference actions by name through their `call` token.
pub trait Action: Send + Sync {
    /// Unique identifier, matched against `call` tokens
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// Run the action on the user's input
    fn execute(&self, input: &str) -> Result<ActionReply, String>;
}

/// Reply text plus an optional follow-up menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReply {
    pub text: String,
    pub markup: Option<Rendering>,
}

impl ActionReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: None,
        }
    }

    pub fn with_markup(mut self, markup: Rendering) -> Self {
        self.markup = Some(markup);
        self
    }
}
