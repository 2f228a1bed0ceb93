use async_trait::async_trait;
use crate::application::errors::StorageError;
use crate::domain::entities::Identity;

/// Store trait - key/value persistence. Each call is atomic per key.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Identity persistence: user id to correlation token and back
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn get_token(&self, user_id: &str) -> Result<Option<String>, StorageError>;
    /// Insert unless the user already has a record. False when one existed.
    async fn put_identity(&self, identity: &Identity) -> Result<bool, StorageError>;
    /// All user ids registered under `token`
    async fn find_users_by_token(&self, token: &str) -> Result<Vec<String>, StorageError>;
}
