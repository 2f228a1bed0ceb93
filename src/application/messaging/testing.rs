//! Test double for the Bot trait

use async_trait::async_trait;
use std::sync::Mutex;

use crate::application::errors::BotError;
use crate::domain::entities::{InlineArticle, Rendering};
use crate::domain::traits::{Bot, BotInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text { chat_id: String, text: String },
    Menu { chat_id: String, text: String, menu: Rendering },
    CallbackAnswer { callback_id: String },
    Inline { query_id: String, results: Vec<InlineArticle> },
}

/// Records everything it is asked to send
#[derive(Default)]
pub struct RecordingBot {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingBot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Sent> {
        self.sent.lock().unwrap().last().cloned()
    }

    fn push(&self, sent: Sent) {
        self.sent.lock().unwrap().push(sent);
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn start(&self) -> Result<(), BotError> {
        Ok(())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        self.push(Sent::Text {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
        });
        Ok("1".to_string())
    }

    async fn send_menu(&self, chat_id: &str, text: &str, menu: &Rendering) -> Result<String, BotError> {
        self.push(Sent::Menu {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
            menu: menu.clone(),
        });
        Ok("1".to_string())
    }

    async fn answer_callback(&self, callback_id: &str, _text: Option<&str>) -> Result<(), BotError> {
        self.push(Sent::CallbackAnswer {
            callback_id: callback_id.to_string(),
        });
        Ok(())
    }

    async fn answer_inline_query(&self, query_id: &str, results: &[InlineArticle]) -> Result<(), BotError> {
        self.push(Sent::Inline {
            query_id: query_id.to_string(),
            results: results.to_vec(),
        });
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: "0".to_string(),
            name: "recording".to_string(),
            username: "recording_bot".to_string(),
        }
    }
}
