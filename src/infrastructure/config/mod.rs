//! Configuration management

pub mod menu;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::application::errors::ConfigError;
use crate::application::messaging::MenuSettings;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub telegram: TelegramConfig,
    pub server: ServerConfig,
    pub menu: MenuConfig,
    pub storage: StorageConfig,
    pub cron: CronConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "menubot".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelegramConfig {
    pub token: Option<String>,
    /// Public base URL; the bot registers `<url>/webhook`
    pub webhook_url: Option<String>,
}

impl TelegramConfig {
    /// Webhook URL unless unset or the literal "None"
    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty() && *url != "None")
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct MenuConfig {
    pub path: PathBuf,
    pub back_label: String,
    /// Sent along with every menu keyboard
    pub select_prompt: String,
    /// Sent after a leaf button press, asking for the action's input
    pub input_prompt: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("menu.yaml"),
            back_label: "\u{2B05} Back".to_string(),
            select_prompt: "Select option".to_string(),
            input_prompt: "Send me your text".to_string(),
        }
    }
}

impl MenuConfig {
    pub fn settings(&self) -> MenuSettings {
        MenuSettings {
            back_label: self.back_label.clone(),
            select_prompt: self.select_prompt.clone(),
            input_prompt: self.input_prompt.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StorageConfig {
    pub kind: StorageKind,
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::Memory,
            path: PathBuf::from("menubot.db"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CronConfig {
    pub chat_id: Option<String>,
    pub text: String,
}

impl Default for CronConfig {
    fn default() -> Self {
        Self {
            chat_id: None,
            text: "Scheduled check-in".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn load_env() -> Self {
        Config::default().with_env()
    }

    /// Defaults when `path` does not exist. A file that exists but does not
    /// parse is an error, never a silent fallback.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::load_env());
        }
        Ok(Self::load(path)?.with_env())
    }

    /// Overlay environment variables on top of file values
    pub fn with_env(mut self) -> Self {
        if let Ok(token) = std::env::var("TELEGRAM_TOKEN") {
            self.telegram.token = Some(token);
        }

        if let Ok(url) = std::env::var("TELEGRAM_WEBHOOK_URL") {
            self.telegram.webhook_url = Some(url);
        }

        if let Ok(bind) = std::env::var("MENUBOT_BIND") {
            self.server.bind = bind;
        }

        if let Ok(path) = std::env::var("MENUBOT_MENU") {
            self.menu.path = PathBuf::from(path);
        }

        self
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = Config::from_yaml(
            "telegram:\n  token: abc\nstorage:\n  kind: sqlite\n  path: /tmp/bot.db\n",
        )
        .unwrap();

        assert_eq!(config.telegram.token.as_deref(), Some("abc"));
        assert_eq!(config.storage.kind, StorageKind::Sqlite);
        assert_eq!(config.storage.path, PathBuf::from("/tmp/bot.db"));
        assert_eq!(config.menu.back_label, "\u{2B05} Back");
        assert_eq!(config.server.bind, "0.0.0.0:8080");
    }

    #[test]
    fn test_default_config_survives_yaml() {
        let yaml = Config::default().to_yaml().unwrap();
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.menu.select_prompt, "Select option");
        assert_eq!(config.storage.kind, StorageKind::Memory);
    }

    #[test]
    fn test_webhook_url_none_literal() {
        let mut telegram = TelegramConfig::default();
        assert_eq!(telegram.webhook_url(), None);

        telegram.webhook_url = Some("None".to_string());
        assert_eq!(telegram.webhook_url(), None);

        telegram.webhook_url = Some("https://bot.example.com".to_string());
        assert_eq!(telegram.webhook_url(), Some("https://bot.example.com"));
    }

    #[test]
    fn test_rejects_malformed_yaml() {
        assert!(matches!(Config::from_yaml("bot: [unclosed"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_broken_config_file_is_fatal() {
        let path = std::env::temp_dir().join(format!("menubot-config-{}.yaml", uuid::Uuid::new_v4().simple()));
        std::fs::write(&path, "storage:\n  kind: [sqlite\n").unwrap();

        let result = Config::load_or_default(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let path = std::env::temp_dir().join(format!("menubot-absent-{}.yaml", uuid::Uuid::new_v4().simple()));
        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.storage.kind, StorageKind::Memory);
    }

    #[test]
    fn test_config_file_is_read() {
        let path = std::env::temp_dir().join(format!("menubot-config-{}.yaml", uuid::Uuid::new_v4().simple()));
        std::fs::write(&path, "storage:\n  kind: sqlite\n").unwrap();

        let result = Config::load_or_default(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(result.unwrap().storage.kind, StorageKind::Sqlite);
    }
}
