use std::sync::Arc;

use crate::application::errors::StorageError;
use crate::domain::entities::Position;
use crate::domain::traits::Store;

/// Typed access to the per-user navigation and button records.
///
/// No caching: every read goes to the store.
#[derive(Clone)]
pub struct PositionCache {
    store: Arc<dyn Store>,
}

impl PositionCache {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn state_key(user_id: &str) -> String {
        format!("state_{}", user_id)
    }

    pub fn button_key(user_id: &str) -> String {
        format!("button_{}", user_id)
    }

    /// Submenu the user currently has open
    pub async fn navigation(&self, user_id: &str) -> Result<Option<Position>, StorageError> {
        self.read(&Self::state_key(user_id)).await
    }

    pub async fn set_navigation(&self, user_id: &str, label: &str) -> Result<(), StorageError> {
        self.write(&Self::state_key(user_id), &Position::new(label)).await
    }

    /// Action that will consume the user's next free-text message
    pub async fn button(&self, user_id: &str) -> Result<Option<Position>, StorageError> {
        self.read(&Self::button_key(user_id)).await
    }

    pub async fn set_button(&self, user_id: &str, action: &str) -> Result<(), StorageError> {
        self.write(&Self::button_key(user_id), &Position::new(action)).await
    }

    /// Forget both records for the user
    pub async fn clear(&self, user_id: &str) -> Result<(), StorageError> {
        self.store.delete(&Self::state_key(user_id)).await?;
        self.store.delete(&Self::button_key(user_id)).await
    }

    async fn read(&self, key: &str) -> Result<Option<Position>, StorageError> {
        match self.store.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn write(&self, key: &str, position: &Position) -> Result<(), StorageError> {
        let raw = serde_json::to_string(position)?;
        self.store.set(key, &raw).await
    }
}
