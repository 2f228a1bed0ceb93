//! Actions invoked from menu leaves

pub mod builtin;
pub mod registry;
pub mod trait_def;

pub use registry::ActionRegistry;
pub use trait_def::{Action, ActionReply};
