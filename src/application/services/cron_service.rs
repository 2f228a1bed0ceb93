use crate::application::errors::BotError;
use crate::domain::traits::Bot;

/// Periodic notification, triggered externally through `/cron`
pub struct CronService {
    chat_id: Option<String>,
    text: String,
}

impl CronService {
    pub fn new(chat_id: Option<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
        }
    }

    /// Send the configured text. Returns false when no chat is configured.
    pub async fn run(&self, bot: &dyn Bot) -> Result<bool, BotError> {
        let Some(chat_id) = self.chat_id.as_deref() else {
            tracing::info!("Cron triggered but no chat configured, skipping");
            return Ok(false);
        };

        bot.send_message(chat_id, &self.text).await?;
        tracing::info!("Cron message sent to {}", chat_id);
        Ok(true)
    }
}
