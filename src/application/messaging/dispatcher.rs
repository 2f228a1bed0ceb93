//! Message dispatcher - Routes inbound messages to the menu, actions and commands

use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::actions::ActionRegistry;
use crate::application::errors::{BotError, ConfigError, DispatchError};
use crate::application::services::{
    ActionDispatcher, CallPattern, IdentityService, MenuResolver, PositionCache, Registration, Selection,
};
use crate::domain::entities::{BotCommand, Content, Message, MenuTree};
use crate::domain::traits::{Bot, IdentityStore, Store};
use super::inline;

pub const WELCOME: &str = "Welcome";
pub const WELCOME_BACK: &str = "Welcome back";
pub const ERROR_REPLY: &str = "An error occurred. Please try again later.";

/// Text starting with a pictograph is a menu key press
static MENU_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        "^[",
        "\u{1F1E0}-\u{1F1FF}", // flags
        "\u{1F300}-\u{1F5FF}", // symbols & pictographs
        "\u{1F600}-\u{1F64F}", // emoticons
        "\u{1F680}-\u{1F6FF}", // transport & map
        "\u{1F700}-\u{1F77F}", // alchemical
        "\u{1F780}-\u{1F7FF}", // geometric shapes extended
        "\u{1F800}-\u{1F8FF}", // supplemental arrows-c
        "\u{1F900}-\u{1F9FF}", // supplemental symbols
        "\u{1FA00}-\u{1FA6F}", // chess
        "\u{1FA70}-\u{1FAFF}", // symbols extended-a
        "\u{2702}-\u{27B0}",   // dingbats
        "\u{24C2}-\u{1F251}",
        "]+"
    ))
    .expect("menu key pattern is valid")
});

/// Prompt texts and the back label shown in submenus
#[derive(Debug, Clone)]
pub struct MenuSettings {
    pub back_label: String,
    pub select_prompt: String,
    pub input_prompt: String,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            back_label: "\u{2B05} Back".to_string(),
            select_prompt: "Select option".to_string(),
            input_prompt: "Send me your text".to_string(),
        }
    }
}

/// Message dispatcher - one call per inbound update, no shared mutable state
pub struct MessageDispatcher {
    resolver: MenuResolver,
    actions: ActionDispatcher,
    identity: IdentityService,
    positions: PositionCache,
    call_pattern: CallPattern,
    settings: MenuSettings,
}

impl MessageDispatcher {
    pub fn new(
        menu: Arc<MenuTree>,
        store: Arc<dyn Store>,
        identities: Arc<dyn IdentityStore>,
        registry: ActionRegistry,
        settings: MenuSettings,
    ) -> Result<Self, ConfigError> {
        let call_pattern = CallPattern::from_menu(&menu)?;
        for call in registry.missing(&menu.calls()) {
            warn!("Menu call '{}' has no registered action", call);
        }

        let positions = PositionCache::new(store);
        Ok(Self {
            resolver: MenuResolver::new(menu, positions.clone(), settings.back_label.clone()),
            actions: ActionDispatcher::new(Arc::new(registry), positions.clone()),
            identity: IdentityService::new(identities),
            positions,
            call_pattern,
            settings,
        })
    }

    pub fn identity(&self) -> &IdentityService {
        &self.identity
    }

    pub fn resolver(&self) -> &MenuResolver {
        &self.resolver
    }

    pub fn call_pattern(&self) -> &CallPattern {
        &self.call_pattern
    }

    /// Handle a message, turning any failure into a log line and a generic reply
    pub async fn process(&self, bot: &dyn Bot, message: Message) {
        if let Err(e) = self.handle(bot, &message).await {
            error!(
                "Exception while handling {} from chat {}: {}",
                message.content.kind(),
                message.chat_id,
                e
            );
            if matches!(message.content, Content::InlineQuery { .. }) {
                return;
            }
            if let Err(e) = bot.send_message(&message.chat_id, ERROR_REPLY).await {
                error!("Failed to send error reply: {}", e);
            }
        }
    }

    pub async fn handle(&self, bot: &dyn Bot, message: &Message) -> Result<(), BotError> {
        let Some(user_id) = message.user_id() else {
            debug!("Ignoring {} without a sender", message.content.kind());
            return Ok(());
        };
        let chat_id = message.chat_id.as_str();

        match &message.content {
            Content::Command { name, .. } => self.handle_command(bot, chat_id, user_id, name).await,
            Content::Text(text) if self.is_menu_key(text) => self.handle_menu_key(bot, chat_id, user_id, text).await,
            Content::Text(text) => self.handle_text(bot, chat_id, user_id, text).await,
            Content::CallbackData { query_id, data } => {
                self.handle_callback(bot, chat_id, user_id, query_id, data).await
            }
            Content::InlineQuery { query_id, query } => {
                info!("Inline query received: {}", query);
                bot.answer_inline_query(query_id, &inline::articles(query)).await
            }
        }
    }

    fn is_menu_key(&self, text: &str) -> bool {
        MENU_KEY.is_match(text)
            || text == self.settings.back_label
            || self.resolver.menu().occurrences(text) > 0
    }

    async fn handle_command(&self, bot: &dyn Bot, chat_id: &str, user_id: &str, name: &str) -> Result<(), BotError> {
        let Some(command) = BotCommand::parse(name) else {
            debug!("Ignoring unknown command /{} from {}", name, user_id);
            return Ok(());
        };
        info!("User /{}: {}", command.name(), user_id);

        match command {
            BotCommand::Start => {
                let reply = match self.identity.register(user_id).await? {
                    Registration::New(_) => WELCOME,
                    Registration::Existing(_) => WELCOME_BACK,
                };
                bot.send_message(chat_id, reply).await?;
            }
            BotCommand::Help => {
                bot.send_menu(chat_id, &self.settings.select_prompt, &self.resolver.root()).await?;
            }
            BotCommand::Token => {
                let reply = match self.identity.token_for(user_id).await? {
                    Some(token) => format!("Your token: {}", token),
                    None => "No token yet, send /start first".to_string(),
                };
                bot.send_message(chat_id, &reply).await?;
            }
            BotCommand::Reset => {
                self.positions.clear(user_id).await?;
                bot.send_menu(chat_id, &self.settings.select_prompt, &self.resolver.root()).await?;
            }
        }
        Ok(())
    }

    async fn handle_menu_key(&self, bot: &dyn Bot, chat_id: &str, user_id: &str, text: &str) -> Result<(), BotError> {
        info!("User: {} pressed key: {}", user_id, text);
        let selection = Selection::parse(text, &self.settings.back_label);
        let rendering = self.resolver.resolve(user_id, selection).await?;
        bot.send_menu(chat_id, &self.settings.select_prompt, &rendering).await?;
        Ok(())
    }

    async fn handle_text(&self, bot: &dyn Bot, chat_id: &str, user_id: &str, text: &str) -> Result<(), BotError> {
        info!("User: {} typed: {}", user_id, text);
        let reply = match self.actions.dispatch(user_id, text).await {
            Ok(reply) => reply,
            Err(DispatchError::NoActiveAction(_)) => {
                debug!("No action selected for {}, showing root menu", user_id);
                bot.send_menu(chat_id, &self.settings.select_prompt, &self.resolver.root()).await?;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        match &reply.markup {
            Some(markup) => bot.send_menu(chat_id, &reply.text, markup).await?,
            None => bot.send_message(chat_id, &reply.text).await?,
        };
        Ok(())
    }

    async fn handle_callback(
        &self,
        bot: &dyn Bot,
        chat_id: &str,
        user_id: &str,
        query_id: &str,
        data: &str,
    ) -> Result<(), BotError> {
        bot.answer_callback(query_id, None).await?;

        if !self.call_pattern.matches(data) {
            warn!("Unhandled callback data '{}' from {}", data, user_id);
            return Ok(());
        }

        info!("User: {} pressed button: {}", user_id, data);
        self.positions.set_button(user_id, data).await?;
        bot.send_message(chat_id, &self.settings.input_prompt).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::messaging::testing::{RecordingBot, Sent};
    use crate::domain::entities::{MenuEntry, MenuItem, Position, Rendering, User};
    use crate::application::messaging::MessageParser;
    use crate::infrastructure::storage::MemoryStore;

    const BACK: &str = "\u{2B05} Back";

    fn menu() -> MenuTree {
        MenuTree::new(vec![
            MenuEntry::submenu(
                "\u{1F34E} Fruit",
                vec![MenuEntry::leaf(
                    "\u{1F34F} Apple",
                    vec![MenuItem::new("Shout", "caps"), MenuItem::new("Buy", "buy_apple")],
                )],
            ),
            MenuEntry::submenu("Veg", vec![MenuEntry::leaf("Carrot", vec![MenuItem::new("Echo", "echo")])]),
        ])
    }

    fn setup() -> (MessageDispatcher, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let dispatcher = MessageDispatcher::new(
            Arc::new(menu()),
            store.clone(),
            store.clone(),
            ActionRegistry::with_builtins(),
            MenuSettings::default(),
        )
        .unwrap();
        (dispatcher, store)
    }

    fn text(body: &str) -> Message {
        MessageParser::default().parse("100", body, Some(User::new("7")))
    }

    fn press(data: &str) -> Message {
        MessageParser::default().parse_callback("100", "cb1", data, User::new("7"))
    }

    fn menu_sent(text: &str, menu: Rendering) -> Sent {
        Sent::Menu {
            chat_id: "100".to_string(),
            text: text.to_string(),
            menu,
        }
    }

    fn text_sent(text: &str) -> Sent {
        Sent::Text {
            chat_id: "100".to_string(),
            text: text.to_string(),
        }
    }

    fn labels(labels: &[&str]) -> Rendering {
        Rendering::SelectableList {
            labels: labels.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_start_welcomes_once() {
        let (dispatcher, _) = setup();
        let bot = RecordingBot::new();

        dispatcher.process(&bot, text("/start")).await;
        dispatcher.process(&bot, text("/start")).await;

        assert_eq!(bot.sent(), vec![text_sent(WELCOME), text_sent(WELCOME_BACK)]);
    }

    #[tokio::test]
    async fn test_help_shows_root_menu() {
        let (dispatcher, _) = setup();
        let bot = RecordingBot::new();

        dispatcher.process(&bot, text("/help")).await;
        assert_eq!(bot.last(), Some(menu_sent("Select option", labels(&["\u{1F34E} Fruit", "Veg"]))));
    }

    #[tokio::test]
    async fn test_menu_to_action_round_trip() {
        let (dispatcher, store) = setup();
        let bot = RecordingBot::new();

        dispatcher.process(&bot, text("\u{1F34E} Fruit")).await;
        assert_eq!(bot.last(), Some(menu_sent("Select option", labels(&["\u{1F34F} Apple", BACK]))));

        dispatcher.process(&bot, text("\u{1F34F} Apple")).await;
        match bot.last() {
            Some(Sent::Menu { menu, .. }) => {
                let tokens: Vec<_> = menu.buttons().unwrap().iter().map(|b| b.token.clone()).collect();
                assert_eq!(tokens, vec!["caps", "buy_apple"]);
            }
            other => panic!("expected callback menu, got {:?}", other),
        }

        dispatcher.process(&bot, press("caps")).await;
        assert_eq!(
            bot.sent()[bot.sent().len() - 2..].to_vec(),
            vec![Sent::CallbackAnswer { callback_id: "cb1".to_string() }, text_sent("Send me your text")]
        );

        dispatcher.process(&bot, text("make it loud")).await;
        assert_eq!(bot.last(), Some(text_sent("MAKE IT LOUD")));

        let positions = PositionCache::new(store);
        assert_eq!(positions.navigation("7").await.unwrap(), Some(Position::new("\u{1F34E} Fruit")));
        assert_eq!(positions.button("7").await.unwrap(), Some(Position::new("caps")));
    }

    #[tokio::test]
    async fn test_plain_label_without_emoji_is_a_menu_key() {
        let (dispatcher, _) = setup();
        let bot = RecordingBot::new();

        dispatcher.process(&bot, text("Veg")).await;
        assert_eq!(bot.last(), Some(menu_sent("Select option", labels(&["Carrot", BACK]))));

        dispatcher.process(&bot, text(BACK)).await;
        assert_eq!(bot.last(), Some(menu_sent("Select option", labels(&["\u{1F34E} Fruit", "Veg"]))));
    }

    #[tokio::test]
    async fn test_text_without_selected_action_shows_root() {
        let (dispatcher, _) = setup();
        let bot = RecordingBot::new();

        dispatcher.process(&bot, text("hello")).await;
        assert_eq!(bot.last(), Some(menu_sent("Select option", labels(&["\u{1F34E} Fruit", "Veg"]))));
    }

    #[tokio::test]
    async fn test_unregistered_action_replies_with_error() {
        let (dispatcher, _) = setup();
        let bot = RecordingBot::new();

        dispatcher.process(&bot, press("buy_apple")).await;
        dispatcher.process(&bot, text("one please")).await;
        assert_eq!(bot.last(), Some(text_sent(ERROR_REPLY)));
    }

    #[tokio::test]
    async fn test_foreign_callback_is_only_acknowledged() {
        let (dispatcher, store) = setup();
        let bot = RecordingBot::new();

        dispatcher.process(&bot, press("inftrx_42")).await;
        assert_eq!(bot.sent(), vec![Sent::CallbackAnswer { callback_id: "cb1".to_string() }]);
        assert_eq!(PositionCache::new(store).button("7").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_token_and_reset_commands() {
        let (dispatcher, store) = setup();
        let bot = RecordingBot::new();

        dispatcher.process(&bot, text("/token")).await;
        assert_eq!(bot.last(), Some(text_sent("No token yet, send /start first")));

        dispatcher.process(&bot, text("/start")).await;
        dispatcher.process(&bot, text("/token")).await;
        let token = dispatcher.identity().token_for("7").await.unwrap().unwrap();
        assert_eq!(bot.last(), Some(text_sent(&format!("Your token: {}", token))));

        dispatcher.process(&bot, text("Veg")).await;
        dispatcher.process(&bot, text("/reset")).await;
        assert_eq!(PositionCache::new(store).navigation("7").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_inline_query_answered() {
        let (dispatcher, _) = setup();
        let bot = RecordingBot::new();
        let query = MessageParser::default().parse_inline_query("iq", "hi", User::new("7"));

        dispatcher.process(&bot, query).await;
        match bot.last() {
            Some(Sent::Inline { query_id, results }) => {
                assert_eq!(query_id, "iq");
                assert_eq!(results.len(), 3);
                assert_eq!(results[0].message_text, "HI");
            }
            other => panic!("expected inline answer, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_message_without_sender_is_ignored() {
        let (dispatcher, _) = setup();
        let bot = RecordingBot::new();

        dispatcher.process(&bot, Message::from_text("100", "/start")).await;
        assert!(bot.sent().is_empty());
    }

    #[test]
    fn test_menu_key_pattern() {
        assert!(MENU_KEY.is_match("\u{1F34E} Fruit"));
        assert!(MENU_KEY.is_match(BACK));
        assert!(!MENU_KEY.is_match("Fruit"));
        assert!(!MENU_KEY.is_match("hello \u{1F34E}"));
    }
}
