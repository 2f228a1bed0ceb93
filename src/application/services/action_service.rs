use std::sync::Arc;

use crate::actions::{ActionRegistry, ActionReply};
use crate::application::errors::DispatchError;
use super::PositionCache;

/// Routes free text to the action the user last selected
pub struct ActionDispatcher {
    registry: Arc<ActionRegistry>,
    positions: PositionCache,
}

impl ActionDispatcher {
    pub fn new(registry: Arc<ActionRegistry>, positions: PositionCache) -> Self {
        Self { registry, positions }
    }

    pub async fn dispatch(&self, user_id: &str, text: &str) -> Result<ActionReply, DispatchError> {
        let position = self
            .positions
            .button(user_id)
            .await?
            .ok_or_else(|| DispatchError::NoActiveAction(user_id.to_string()))?;

        let action = self
            .registry
            .get(&position.current)
            .ok_or_else(|| DispatchError::UnknownAction(position.current.clone()))?;

        tracing::debug!("Running action '{}' for user {}", action.name(), user_id);
        action.execute(text).map_err(|reason| DispatchError::ExecutionFailed {
            action: position.current,
            reason,
        })
    }
}
