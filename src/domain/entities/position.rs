use serde::{Deserialize, Serialize};

/// Persisted per-user pointer: the open submenu or the selected action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub current: String,
}

impl Position {
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
        }
    }
}
