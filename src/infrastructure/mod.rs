//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration and menu loading
//! - Storage: Data persistence
//! - Adapters: Platform integrations (Telegram, console)
//! - Server: Webhook HTTP endpoints

pub mod config;
pub mod storage;
pub mod adapters;
pub mod server;
