//! SQLite-backed store. Survives restarts and can be shared by one host's
//! instances through the same database file.

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::application::errors::StorageError;
use crate::domain::entities::Identity;
use crate::domain::traits::{IdentityStore, Store};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        let store = Self { conn: Mutex::new(conn) };
        store.init_tables()?;
        Ok(store)
    }

    fn init_tables(&self) -> Result<(), StorageError> {
        let conn = self.lock()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS positions (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                user_id TEXT PRIMARY KEY,
                token TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute("CREATE INDEX IF NOT EXISTS idx_users_token ON users(token)", [])?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Backend("Lock poisoned".to_string()))
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.lock()?;
        let value = conn
            .query_row("SELECT value FROM positions WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO positions (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM positions WHERE key = ?1", [key])?;
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for SqliteStore {
    async fn get_token(&self, user_id: &str) -> Result<Option<String>, StorageError> {
        let conn = self.lock()?;
        let token = conn
            .query_row("SELECT token FROM users WHERE user_id = ?1", [user_id], |row| row.get(0))
            .optional()?;
        Ok(token)
    }

    async fn put_identity(&self, identity: &Identity) -> Result<bool, StorageError> {
        let conn = self.lock()?;
        let inserted = conn.execute(
            "INSERT INTO users (user_id, token, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO NOTHING",
            rusqlite::params![identity.user_id, identity.token, identity.created_at.to_rfc3339()],
        )?;
        Ok(inserted == 1)
    }

    async fn find_users_by_token(&self, token: &str) -> Result<Vec<String>, StorageError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT user_id FROM users WHERE token = ?1 ORDER BY user_id")?;
        let rows = stmt.query_map([token], |row| row.get::<_, String>(0))?;

        let mut users = Vec::new();
        for user in rows {
            users.push(user?);
        }
        Ok(users)
    }
}
