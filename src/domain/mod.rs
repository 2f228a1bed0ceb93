//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (MenuTree, Message, Identity)
//! - Traits: Abstractions for infrastructure (Bot, Store, IdentityStore)

pub mod entities;
pub mod traits;
