//! Telegram adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::{Duration, Instant};

use crate::application::errors::BotError;
use crate::application::messaging::MessageParser;
use crate::domain::entities::{self, BotCommand, InlineArticle, Rendering};
use crate::domain::traits::{Bot, BotInfo};

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Give up on setWebhook flood control after this long
const WEBHOOK_RETRY_LIMIT: Duration = Duration::from_secs(60);

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
    pub inline_query: Option<InlineQuery>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InlineQuery {
    pub id: String,
    pub from: User,
    pub query: String,
}

impl User {
    fn to_entity(&self) -> entities::User {
        let mut user = entities::User::new(self.id.to_string());
        user.username = self.username.clone();
        user.first_name = self.first_name.clone();
        user.last_name = self.last_name.clone();
        user
    }
}

impl Update {
    /// Convert to a platform-neutral message. Updates we do not handle yield None.
    pub fn into_message(self, parser: &MessageParser) -> Option<entities::Message> {
        if let Some(msg) = self.message {
            let text = msg.text?;
            let sender = msg.from.as_ref().map(User::to_entity);
            return Some(parser.parse(msg.chat.id.to_string(), text, sender).with_platform("telegram"));
        }

        if let Some(cb) = self.callback_query {
            let data = cb.data?;
            let chat_id = cb.message.as_ref().map(|m| m.chat.id).unwrap_or(cb.from.id);
            return Some(
                parser
                    .parse_callback(chat_id.to_string(), cb.id, data, cb.from.to_entity())
                    .with_platform("telegram"),
            );
        }

        if let Some(iq) = self.inline_query {
            return Some(
                parser
                    .parse_inline_query(iq.id, iq.query, iq.from.to_entity())
                    .with_platform("telegram"),
            );
        }

        None
    }
}

/// Envelope wrapped around every Bot API reply
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    retry_after: Option<u64>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, BotError> {
        if self.ok {
            return self
                .result
                .ok_or_else(|| BotError::Parse("missing result in ok response".to_string()));
        }

        if self.error_code == Some(429) {
            let secs = self.parameters.and_then(|p| p.retry_after).unwrap_or(1);
            return Err(BotError::RateLimited {
                retry_after: Duration::from_secs(secs),
            });
        }

        Err(BotError::Api(
            self.description.unwrap_or_else(|| "unknown error".to_string()),
        ))
    }
}

/// Current webhook registration as reported by getWebhookInfo
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookInfo {
    pub url: String,
    #[serde(default)]
    pub pending_update_count: i64,
    pub last_error_message: Option<String>,
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            token: token.into(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                username: name.clone(),
                name,
            },
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    async fn post<R: Serialize + ?Sized, T: DeserializeOwned>(&self, method: &str, request: &R) -> Result<T, BotError> {
        let response = self.client
            .post(self.api_url(method))
            .json(request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let data: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        data.into_result()
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: String,
        }

        let data: BotInfoResponse = self.post("getMe", &json!({})).await?;
        self.info = BotInfo {
            id: data.id.to_string(),
            name: data.first_name,
            username: data.username,
        };

        Ok(())
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: i64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: i64,
            allowed_updates: Vec<String>,
        }

        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec![
                "message".to_string(),
                "callback_query".to_string(),
                "inline_query".to_string(),
            ],
        };

        self.post("getUpdates", &request).await
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Update]) -> i64 {
        updates.iter()
            .map(|u| u.update_id + 1)
            .max()
            .unwrap_or(0)
    }

    /// Point Telegram at our webhook, waiting out flood control
    pub async fn set_webhook(&self, url: &str) -> Result<(), BotError> {
        let request = json!({ "url": url });
        let started = Instant::now();

        loop {
            match self.post::<_, bool>("setWebhook", &request).await {
                Ok(_) => {
                    tracing::info!("Webhook set to {}", url);
                    return Ok(());
                }
                Err(BotError::RateLimited { retry_after }) if started.elapsed() + retry_after <= WEBHOOK_RETRY_LIMIT => {
                    tracing::warn!("setWebhook rate limited, retrying in {:?}", retry_after);
                    tokio::time::sleep(retry_after).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn delete_webhook(&self) -> Result<(), BotError> {
        let _: bool = self.post("deleteWebhook", &json!({})).await?;
        Ok(())
    }

    pub async fn get_webhook_info(&self) -> Result<WebhookInfo, BotError> {
        self.post("getWebhookInfo", &json!({})).await
    }

    /// Register bot commands with Telegram
    pub async fn register_commands(&self) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct Command {
            command: String,
            description: String,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest {
            commands: Vec<Command>,
        }

        let request = SetMyCommandsRequest {
            commands: BotCommand::all()
                .iter()
                .map(|c| Command {
                    command: c.name().to_string(),
                    description: c.description().to_string(),
                })
                .collect(),
        };

        let _: bool = self.post("setMyCommands", &request).await?;
        tracing::info!("Registered {} bot commands", request.commands.len());
        Ok(())
    }

    async fn send(&self, chat_id: &str, text: &str, reply_markup: Option<Value>) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: &'a str,
            text: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            reply_markup: Option<Value>,
        }

        #[derive(Deserialize)]
        struct MessageResult {
            message_id: i64,
        }

        let request = SendMessageRequest { chat_id, text, reply_markup };
        let result: MessageResult = self.post("sendMessage", &request).await?;
        Ok(result.message_id.to_string())
    }
}

/// Keyboard markup for a rendering: a reply keyboard for submenus, inline buttons for leaves
pub fn reply_markup(menu: &Rendering) -> Value {
    match menu {
        Rendering::SelectableList { labels } => {
            let row: Vec<Value> = labels.iter().map(|l| json!({ "text": l })).collect();
            json!({ "keyboard": [row], "resize_keyboard": true })
        }
        Rendering::CallbackList { buttons } => {
            let row: Vec<Value> = buttons
                .iter()
                .map(|b| json!({ "text": b.name, "callback_data": b.token }))
                .collect();
            json!({ "inline_keyboard": [row] })
        }
    }
}

fn inline_result(article: &InlineArticle) -> Value {
    let mut content = json!({ "message_text": article.message_text });
    if let Some(mode) = article.parse_mode {
        content["parse_mode"] = json!(mode.as_str());
    }
    json!({
        "type": "article",
        "id": article.id,
        "title": article.title,
        "input_message_content": content,
    })
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting Telegram bot: @{}", self.info.username);
        Ok(())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        tracing::debug!("Sending to {}: {}", chat_id, text);
        self.send(chat_id, text, None).await
    }

    async fn send_menu(&self, chat_id: &str, text: &str, menu: &Rendering) -> Result<String, BotError> {
        tracing::debug!("Sending menu to {}: {:?}", chat_id, menu);
        self.send(chat_id, text, Some(reply_markup(menu))).await
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct AnswerRequest<'a> {
            callback_query_id: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            text: Option<&'a str>,
        }

        let request = AnswerRequest {
            callback_query_id: callback_id,
            text,
        };
        let _: bool = self.post("answerCallbackQuery", &request).await?;
        Ok(())
    }

    async fn answer_inline_query(&self, query_id: &str, results: &[InlineArticle]) -> Result<(), BotError> {
        let request = json!({
            "inline_query_id": query_id,
            "results": results.iter().map(inline_result).collect::<Vec<_>>(),
        });
        let _: bool = self.post("answerInlineQuery", &request).await?;
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
