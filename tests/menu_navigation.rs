//! End-to-end menu navigation against a SQLite store
//! Run with: cargo test --test menu_navigation

use async_trait::async_trait;
use std::sync::{Arc, Mutex, Once};

use menubot::actions::{Action, ActionRegistry, ActionReply};
use menubot::application::errors::{BotError, IdentityError};
use menubot::application::messaging::{MenuSettings, MessageDispatcher, MessageParser};
use menubot::application::services::{MenuResolver, PositionCache, Selection};
use menubot::domain::entities::{CallbackButton, InlineArticle, Message, Position, Rendering, User};
use menubot::domain::traits::{Bot, BotInfo};
use menubot::infrastructure::config::menu::parse_menu;
use menubot::infrastructure::storage::{MemoryStore, SqliteStore};

static INIT: Once = Once::new();

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

const MENU: &str = r#"
"🍎 Fruit":
  "🍏 Apple":
    - name: Buy
      call: buy_apple
    - name: Sell
      call: sell_apple
  "🍐 Pear":
    - name: Buy
      call: buy_pear
"🥕 Veg":
  "🥔 Potato":
    - name: Buy
      call: buy_potato
"#;

const BACK: &str = "⬅ Back";

struct Buy;

impl Action for Buy {
    fn name(&self) -> &str {
        "buy_apple"
    }

    fn description(&self) -> &str {
        "Buy apples"
    }

    fn execute(&self, input: &str) -> Result<ActionReply, String> {
        let count: u32 = input.trim().parse().map_err(|_| format!("not a number: {}", input))?;
        Ok(ActionReply::text(format!("Bought {} apples", count)))
    }
}

/// What the user would see, one line per outbound call
#[derive(Default)]
struct Transcript {
    lines: Mutex<Vec<String>>,
}

impl Transcript {
    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().unwrap())
    }
}

#[async_trait]
impl Bot for Transcript {
    async fn start(&self) -> Result<(), BotError> {
        Ok(())
    }

    async fn send_message(&self, _chat_id: &str, text: &str) -> Result<String, BotError> {
        self.lines.lock().unwrap().push(text.to_string());
        Ok("1".to_string())
    }

    async fn send_menu(&self, _chat_id: &str, _text: &str, menu: &Rendering) -> Result<String, BotError> {
        let line = match menu {
            Rendering::SelectableList { labels } => format!("keyboard: {}", labels.join(" | ")),
            Rendering::CallbackList { buttons } => {
                let tokens: Vec<&str> = buttons.iter().map(|b| b.token.as_str()).collect();
                format!("buttons: {}", tokens.join(" | "))
            }
        };
        self.lines.lock().unwrap().push(line);
        Ok("1".to_string())
    }

    async fn answer_callback(&self, _callback_id: &str, _text: Option<&str>) -> Result<(), BotError> {
        self.lines.lock().unwrap().push("ack".to_string());
        Ok(())
    }

    async fn answer_inline_query(&self, _query_id: &str, _results: &[InlineArticle]) -> Result<(), BotError> {
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: "0".to_string(),
            name: "transcript".to_string(),
            username: "transcript_bot".to_string(),
        }
    }
}

fn dispatcher(db: &std::path::Path) -> MessageDispatcher {
    let store = Arc::new(SqliteStore::open(db).unwrap());
    let mut registry = ActionRegistry::with_builtins();
    registry.register(Buy).unwrap();

    MessageDispatcher::new(
        Arc::new(parse_menu(MENU).unwrap()),
        store.clone(),
        store,
        registry,
        MenuSettings::default(),
    )
    .unwrap()
}

fn text(body: &str) -> Message {
    MessageParser::default().parse("7", body, Some(User::new("7")))
}

fn press(data: &str) -> Message {
    MessageParser::default().parse_callback("7", "cb", data, User::new("7"))
}

fn temp_db() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("menubot-{}.db", uuid::Uuid::new_v4().simple()))
}

#[tokio::test]
async fn test_fruit_veg_walkthrough() {
    ensure_init();
    let db = temp_db();
    let bot = Transcript::default();

    let first = dispatcher(&db);
    for msg in [
        text("/start"),
        text("/help"),
        text("🍎 Fruit"),
        text("🍏 Apple"),
        press("buy_apple"),
        text("3"),
        text(BACK),
        text("🥕 Veg"),
        text(BACK),
    ] {
        first.process(&bot, msg).await;
    }

    assert_eq!(
        bot.take(),
        vec![
            "Welcome",
            "keyboard: 🍎 Fruit | 🥕 Veg",
            "keyboard: 🍏 Apple | 🍐 Pear | ⬅ Back",
            "buttons: buy_apple | sell_apple",
            "ack",
            "Send me your text",
            "Bought 3 apples",
            "keyboard: 🍎 Fruit | 🥕 Veg",
            "keyboard: 🥔 Potato | ⬅ Back",
            "keyboard: 🍎 Fruit | 🥕 Veg",
        ]
    );

    // State survives a restart
    let second = dispatcher(&db);
    for msg in [text("/start"), text("12"), text("lots")] {
        second.process(&bot, msg).await;
    }
    assert_eq!(
        bot.take(),
        vec!["Welcome back", "Bought 12 apples", "An error occurred. Please try again later."]
    );

    let _ = std::fs::remove_file(&db);
}

#[tokio::test]
async fn test_unregistered_leaf_action_errors() {
    ensure_init();
    let db = temp_db();
    let bot = Transcript::default();
    let d = dispatcher(&db);

    d.process(&bot, press("buy_pear")).await;
    d.process(&bot, text("1")).await;
    assert_eq!(bot.take(), vec!["ack", "Send me your text", "An error occurred. Please try again later."]);

    let _ = std::fs::remove_file(&db);
}

#[tokio::test]
async fn test_resolver_properties() {
    ensure_init();
    let db = temp_db();
    let d = dispatcher(&db);
    let resolver = d.resolver();

    let root = resolver.resolve("9", Selection::Root).await.unwrap();
    assert_eq!(resolver.resolve("9", Selection::Root).await.unwrap(), root);
    assert_eq!(resolver.resolve("9", Selection::Label("Nope".to_string())).await.unwrap(), root);
    // Back with no navigation state goes to the root
    assert_eq!(resolver.resolve("9", Selection::Back).await.unwrap(), root);

    let fruit = resolver.resolve("9", Selection::Label("🍎 Fruit".to_string())).await.unwrap();
    resolver.resolve("9", Selection::Label("🍐 Pear".to_string())).await.unwrap();
    // Leaf selection left the open submenu alone
    assert_eq!(resolver.resolve("9", Selection::Back).await.unwrap(), root);
    assert_eq!(resolver.resolve("9", Selection::Label("🍎 Fruit".to_string())).await.unwrap(), fruit);

    let _ = std::fs::remove_file(&db);
}

#[tokio::test]
async fn test_token_lookup_round_trip() {
    ensure_init();
    let db = temp_db();
    let bot = Transcript::default();
    let d = dispatcher(&db);

    d.process(&bot, text("/start")).await;
    let token = d.identity().token_for("7").await.unwrap().unwrap();
    assert_eq!(token.len(), 32);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(d.identity().find_user_by_token(&token).await.unwrap(), "7");

    assert!(matches!(
        d.identity().find_user_by_token("feedface").await,
        Err(IdentityError::NotFound(_))
    ));

    let _ = std::fs::remove_file(&db);
}

#[tokio::test]
async fn test_plain_label_walkthrough() {
    ensure_init();
    let menu = parse_menu(
        r#"{"Fruit": {"Apple": [{"name": "Buy", "call": "buy_apple"}]}, "Veg": {"Carrot": [{"name": "Buy", "call": "buy_carrot"}]}}"#,
    )
    .unwrap();
    let positions = PositionCache::new(Arc::new(MemoryStore::new()));
    let resolver = MenuResolver::new(Arc::new(menu), positions.clone(), BACK);
    let list = |labels: &[&str]| Rendering::SelectableList {
        labels: labels.iter().map(|s| s.to_string()).collect(),
    };

    let root = resolver.resolve("u", Selection::parse("", BACK)).await.unwrap();
    assert_eq!(root, list(&["Fruit", "Veg"]));

    let fruit = resolver.resolve("u", Selection::parse("Fruit", BACK)).await.unwrap();
    assert_eq!(fruit, list(&["Apple", BACK]));
    assert_eq!(positions.navigation("u").await.unwrap(), Some(Position::new("Fruit")));

    let apple = resolver.resolve("u", Selection::parse("Apple", BACK)).await.unwrap();
    assert_eq!(
        apple,
        Rendering::CallbackList {
            buttons: vec![CallbackButton::new("Buy", "buy_apple")],
        }
    );
    assert_eq!(positions.navigation("u").await.unwrap(), Some(Position::new("Fruit")));

    let back = resolver.resolve("u", Selection::parse(BACK, BACK)).await.unwrap();
    assert_eq!(back, list(&["Fruit", "Veg"]));
}
