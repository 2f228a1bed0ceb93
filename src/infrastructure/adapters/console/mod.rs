//! Console adapter for development/testing

use async_trait::async_trait;
use crate::domain::entities::{InlineArticle, Rendering};
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
}

impl ConsoleAdapter {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name,
                username: "console".to_string(),
            },
        }
    }

    pub fn read_line(&self, prompt: &str) -> Option<String> {
        use std::io::Write;
        print!("{}", prompt);
        std::io::stdout().flush().ok()?;
        let mut input = String::new();
        match std::io::stdin().read_line(&mut input) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(input.trim().to_string()),
        }
    }
}

/// One line per keyboard, the way a user would see it
pub fn describe(menu: &Rendering) -> String {
    match menu {
        Rendering::SelectableList { labels } => format!("  [Keyboard] {}", labels.join(" | ")),
        Rendering::CallbackList { buttons } => {
            let row: Vec<String> = buttons.iter().map(|b| format!("{} (!{})", b.name, b.token)).collect();
            format!("  [Buttons] {}", row.join(" | "))
        }
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        Ok(())
    }

    async fn send_message(&self, _chat_id: &str, text: &str) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        Ok("console_msg".to_string())
    }

    async fn send_menu(&self, _chat_id: &str, text: &str, menu: &Rendering) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        println!("{}", describe(menu));
        Ok("console_msg".to_string())
    }

    async fn answer_callback(&self, _callback_id: &str, _text: Option<&str>) -> Result<(), BotError> {
        Ok(())
    }

    async fn answer_inline_query(&self, _query_id: &str, results: &[InlineArticle]) -> Result<(), BotError> {
        for article in results {
            println!("  [{}] {}", article.title, article.message_text);
        }
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::CallbackButton;

    #[test]
    fn test_describe_menus() {
        let keyboard = Rendering::SelectableList {
            labels: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(describe(&keyboard), "  [Keyboard] A | B");

        let buttons = Rendering::CallbackList {
            buttons: vec![CallbackButton::new("Shout", "caps")],
        };
        assert_eq!(describe(&buttons), "  [Buttons] Shout (!caps)");
    }
}
