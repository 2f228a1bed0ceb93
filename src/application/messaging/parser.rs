//! Message parser - Parses raw platform input into structured messages

use crate::domain::entities::{Content, Message, User};

/// Parses incoming input into Message objects
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    /// Parse a text message
    pub fn parse(&self, chat_id: impl Into<String>, text: impl Into<String>, sender: Option<User>) -> Message {
        let text = text.into();
        let chat_id = chat_id.into();

        if text.starts_with(&self.command_prefix) {
            return self.parse_command(chat_id, &text, sender);
        }

        Message::new(chat_id, Content::Text(text)).with_sender_opt(sender)
    }

    /// Parse a command message
    fn parse_command(&self, chat_id: String, text: &str, sender: Option<User>) -> Message {
        let cmd_text = text.trim_start_matches(self.command_prefix.as_str());

        let mut parts = cmd_text.split_whitespace();
        let name = parts.next().unwrap_or("").to_string();
        let args = parts.map(|s| s.to_string()).collect();

        Message::new(chat_id, Content::Command { name, args }).with_sender_opt(sender)
    }

    /// Parse a callback query (inline button press)
    pub fn parse_callback(
        &self,
        chat_id: impl Into<String>,
        query_id: impl Into<String>,
        data: impl Into<String>,
        user: User,
    ) -> Message {
        let content = Content::CallbackData {
            query_id: query_id.into(),
            data: data.into(),
        };
        Message::new(chat_id, content).with_sender(user)
    }

    /// Parse an inline query. Inline queries have no chat; the user id stands in.
    pub fn parse_inline_query(&self, query_id: impl Into<String>, query: impl Into<String>, user: User) -> Message {
        let content = Content::InlineQuery {
            query_id: query_id.into(),
            query: query.into(),
        };
        Message::new(user.id.clone(), content).with_sender(user)
    }
}

impl Default for MessageParser {
    fn default() -> Self {
        Self::new("/")
    }
}
