//! HTTP surface: Telegram webhook, notification endpoint, cron trigger

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::application::errors::{BotError, IdentityError};
use crate::application::messaging::{MessageDispatcher, MessageParser};
use crate::application::services::CronService;
use crate::domain::traits::Bot;
use crate::infrastructure::adapters::telegram::Update;

pub const HEALTHCHECK_REPLY: &str = "The bot is still running fine :)";

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<MessageDispatcher>,
    pub bot: Arc<dyn Bot>,
    pub cron: Arc<CronService>,
    pub parser: Arc<MessageParser>,
    pub name: String,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthcheck", get(healthcheck))
        .route("/webhook", post(webhook))
        .route("/tg", get(notify_usage).post(notify))
        .route("/cron", get(cron))
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(bind: &str, state: AppState) -> Result<(), BotError> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| BotError::Network(format!("bind {}: {}", bind, e)))?;
    tracing::info!("Webhook server listening on {}", bind);

    axum::serve(listener, create_router(state))
        .await
        .map_err(|e| BotError::Network(e.to_string()))
}

async fn index(State(state): State<AppState>) -> String {
    state.name.clone()
}

async fn healthcheck() -> &'static str {
    HEALTHCHECK_REPLY
}

/// Always 200 so Telegram does not redeliver updates we cannot use
async fn webhook(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!("Discarding malformed update: {}", e);
            return StatusCode::OK;
        }
    };

    let update_id = update.update_id;
    match update.into_message(&state.parser) {
        Some(message) => state.dispatcher.process(state.bot.as_ref(), message).await,
        None => tracing::debug!("Ignoring update {} with nothing to handle", update_id),
    }
    StatusCode::OK
}

#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    pub hash: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

async fn notify(
    State(state): State<AppState>,
    Json(request): Json<NotifyRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::BadRequest("text must not be empty".to_string()));
    }

    let user_id = state.dispatcher.identity().find_user_by_token(&request.hash).await?;
    state.bot.send_message(&user_id, &request.text).await?;
    tracing::info!("Notification delivered to {}", user_id);

    Ok(Json(MessageResponse {
        message: "message sent".to_string(),
    }))
}

async fn notify_usage() -> impl IntoResponse {
    Json(json!({
        "usage": "POST /tg with a JSON body",
        "body": { "hash": "<token from /token>", "text": "<message to deliver>" },
    }))
}

async fn cron(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let sent = state.cron.run(state.bot.as_ref()).await?;
    let message = if sent { "cron message sent" } else { "cron not configured" };
    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl From<IdentityError> for AppError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::NotFound(_) => AppError::NotFound(e.to_string()),
            IdentityError::Ambiguous { .. } => AppError::Conflict(e.to_string()),
            IdentityError::Storage(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<BotError> for AppError {
    fn from(e: BotError) -> Self {
        match e {
            BotError::Identity(inner) => inner.into(),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(MessageResponse { message })).into_response()
    }
}
