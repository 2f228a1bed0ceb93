use std::sync::Arc;

use crate::application::errors::{IdentityError, StorageError};
use crate::domain::entities::Identity;
use crate::domain::traits::IdentityStore;

/// Outcome of `/start`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    New(String),
    Existing(String),
}

impl Registration {
    pub fn token(&self) -> &str {
        match self {
            Registration::New(token) | Registration::Existing(token) => token,
        }
    }
}

pub struct IdentityService {
    store: Arc<dyn IdentityStore>,
}

impl IdentityService {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Create the user's token on first contact. Existing tokens never change.
    pub async fn register(&self, user_id: &str) -> Result<Registration, StorageError> {
        if let Some(token) = self.store.get_token(user_id).await? {
            return Ok(Registration::Existing(token));
        }

        let identity = Identity::generate(user_id);
        if self.store.put_identity(&identity).await? {
            tracing::info!("Registered new user {}", user_id);
            return Ok(Registration::New(identity.token));
        }

        // Lost a race with a concurrent /start; the first record stands
        let token = self
            .store
            .get_token(user_id)
            .await?
            .ok_or_else(|| StorageError::Backend(format!("identity for {} vanished", user_id)))?;
        Ok(Registration::Existing(token))
    }

    pub async fn token_for(&self, user_id: &str) -> Result<Option<String>, StorageError> {
        self.store.get_token(user_id).await
    }

    /// Reverse lookup; anything but exactly one match is an error
    pub async fn find_user_by_token(&self, token: &str) -> Result<String, IdentityError> {
        let mut users = self.store.find_users_by_token(token).await?;
        match users.len() {
            0 => Err(IdentityError::NotFound(token.to_string())),
            1 => Ok(users.remove(0)),
            count => Err(IdentityError::Ambiguous {
                token: token.to_string(),
                count,
            }),
        }
    }
}
