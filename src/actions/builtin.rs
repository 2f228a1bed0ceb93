//! Built-in text actions

use std::sync::Arc;

use super::trait_def::{Action, ActionReply};

pub fn all() -> Vec<Arc<dyn Action>> {
    vec![Arc::new(Echo), Arc::new(Caps), Arc::new(Reverse), Arc::new(Count)]
}

pub struct Echo;

impl Action for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Repeat the text back"
    }

    fn execute(&self, input: &str) -> Result<ActionReply, String> {
        Ok(ActionReply::text(input))
    }
}

pub struct Caps;

impl Action for Caps {
    fn name(&self) -> &str {
        "caps"
    }

    fn description(&self) -> &str {
        "Upper-case the text"
    }

    fn execute(&self, input: &str) -> Result<ActionReply, String> {
        Ok(ActionReply::text(input.to_uppercase()))
    }
}

pub struct Reverse;

impl Action for Reverse {
    fn name(&self) -> &str {
        "reverse"
    }

    fn description(&self) -> &str {
        "Reverse the characters"
    }

    fn execute(&self, input: &str) -> Result<ActionReply, String> {
        Ok(ActionReply::text(input.chars().rev().collect::<String>()))
    }
}

pub struct Count;

impl Action for Count {
    fn name(&self) -> &str {
        "count"
    }

    fn description(&self) -> &str {
        "Count characters, words and lines"
    }

    fn execute(&self, input: &str) -> Result<ActionReply, String> {
        let chars = input.chars().count();
        let words = input.split_whitespace().count();
        let lines = input.lines().count();
        Ok(ActionReply::text(format!(
            "Characters: {}\nWords: {}\nLines: {}",
            chars, words, lines
        )))
    }
}
