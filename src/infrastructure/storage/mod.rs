//! Store implementations

pub mod sqlite;

use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::errors::StorageError;
use crate::domain::entities::Identity;
use crate::domain::traits::{IdentityStore, Store};
use crate::infrastructure::config::{StorageConfig, StorageKind};

pub use sqlite::SqliteStore;

/// Open the configured backend. One instance serves both roles.
pub fn open(config: &StorageConfig) -> Result<(Arc<dyn Store>, Arc<dyn IdentityStore>), StorageError> {
    match config.kind {
        StorageKind::Memory => {
            tracing::warn!("Using in-memory storage, state is lost on restart");
            let store = Arc::new(MemoryStore::new());
            let kv: Arc<dyn Store> = store.clone();
            let identities: Arc<dyn IdentityStore> = store;
            Ok((kv, identities))
        }
        StorageKind::Sqlite => {
            tracing::info!("Opening SQLite store at {}", config.path.display());
            let store = Arc::new(SqliteStore::open(&config.path)?);
            let kv: Arc<dyn Store> = store.clone();
            let identities: Arc<dyn IdentityStore> = store;
            Ok((kv, identities))
        }
    }
}

/// In-memory store for development and tests. Lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    identities: Arc<RwLock<HashMap<String, Identity>>>,
    kv: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let kv = self.kv.read().await;
        Ok(kv.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut kv = self.kv.write().await;
        kv.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut kv = self.kv.write().await;
        kv.remove(key);
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn get_token(&self, user_id: &str) -> Result<Option<String>, StorageError> {
        let identities = self.identities.read().await;
        Ok(identities.get(user_id).map(|i| i.token.clone()))
    }

    async fn put_identity(&self, identity: &Identity) -> Result<bool, StorageError> {
        let mut identities = self.identities.write().await;
        match identities.entry(identity.user_id.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(identity.clone());
                Ok(true)
            }
        }
    }

    async fn find_users_by_token(&self, token: &str) -> Result<Vec<String>, StorageError> {
        let identities = self.identities.read().await;
        Ok(identities
            .values()
            .filter(|i| i.token == token)
            .map(|i| i.user_id.clone())
            .collect())
    }
}
