//! Application services - Business logic orchestration

pub mod action_service;
pub mod call_pattern;
pub mod cron_service;
pub mod identity_service;
pub mod menu_service;
pub mod position_service;

pub use action_service::ActionDispatcher;
pub use call_pattern::CallPattern;
pub use cron_service::CronService;
pub use identity_service::{IdentityService, Registration};
pub use menu_service::{MenuResolver, Selection};
pub use position_service::PositionCache;
