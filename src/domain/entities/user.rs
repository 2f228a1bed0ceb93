use chrono::{DateTime, Utc};

/// Represents a platform user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    pub id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
            first_name: None,
            last_name: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

/// Maps a platform user id to an opaque correlation token.
///
/// External systems address the user through the token and never learn the
/// platform id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Fresh identity with a random 128-bit token as 32 hex chars
    pub fn generate(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: uuid::Uuid::new_v4().simple().to_string(),
            created_at: Utc::now(),
        }
    }
}
