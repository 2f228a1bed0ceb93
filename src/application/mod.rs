//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Menu resolution, action dispatch, identities
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing and dispatching

pub mod errors;
pub mod services;
pub mod messaging;
