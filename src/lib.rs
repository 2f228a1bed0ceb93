//! Menu-driven Telegram bot: navigation engine, action dispatch and webhook server

pub mod actions;
pub mod application;
pub mod domain;
pub mod infrastructure;
