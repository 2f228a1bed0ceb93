//! Domain entities - Core business objects with no external dependencies

pub mod command;
pub mod menu;
pub mod message;
pub mod position;
pub mod rendering;
pub mod user;

pub use command::BotCommand;
pub use menu::{MenuEntry, MenuItem, MenuNode, MenuTree};
pub use message::{Content, Message};
pub use position::Position;
pub use rendering::{CallbackButton, InlineArticle, ParseMode, Rendering};
pub use user::{Identity, User};
