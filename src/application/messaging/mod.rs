//! Message handling - Parsing inbound updates and routing them

pub mod dispatcher;
pub mod inline;
pub mod parser;
#[cfg(test)]
pub(crate) mod testing;

pub use dispatcher::{MenuSettings, MessageDispatcher};
pub use parser::MessageParser;
