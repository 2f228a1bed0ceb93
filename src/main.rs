use clap::{Parser, Subcommand};
use std::sync::Arc;

use menubot::actions::ActionRegistry;
use menubot::application::errors::{BotError, ConfigError};
use menubot::application::messaging::{MessageDispatcher, MessageParser};
use menubot::application::services::{CallPattern, CronService};
use menubot::domain::entities::User;
use menubot::domain::traits::Bot;
use menubot::infrastructure::adapters::console::ConsoleAdapter;
use menubot::infrastructure::adapters::telegram::TelegramAdapter;
use menubot::infrastructure::config::{menu::load_menu, Config};
use menubot::infrastructure::server::{self, AppState};
use menubot::infrastructure::storage;

#[derive(Parser)]
#[command(name = "menubot")]
#[command(about = "A menu-driven Telegram bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the webhook endpoints
    Serve,
    /// Run with long polling instead of a webhook
    Poll,
    /// Talk to the bot on stdin
    Console,
    /// Validate the menu file and print its call pattern
    CheckMenu,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Version => {
            println!("menubot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
        Commands::CheckMenu => load_config(&cli.config, cli.token).and_then(|c| check_menu(&c)),
        Commands::Serve => load_config(&cli.config, cli.token).and_then(|c| run(serve(c))),
        Commands::Poll => load_config(&cli.config, cli.token).and_then(|c| run(poll(c))),
        Commands::Console => load_config(&cli.config, cli.token).and_then(|c| run(console(c))),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(fut: impl std::future::Future<Output = Result<(), BotError>>) -> Result<(), BotError> {
    let rt = tokio::runtime::Runtime::new().map_err(|e| BotError::Internal(e.to_string()))?;
    rt.block_on(fut)
}

fn load_config(path: &str, token_override: Option<String>) -> Result<Config, BotError> {
    let mut config = Config::load_or_default(path)?;
    if token_override.is_some() {
        config.telegram.token = token_override;
    }
    Ok(config)
}

fn init_config() -> Result<(), BotError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}

fn check_menu(config: &Config) -> Result<(), BotError> {
    let menu = load_menu(&config.menu.path)?;
    let pattern = CallPattern::from_menu(&menu)?;
    let registry = ActionRegistry::with_builtins();

    println!("Menu: {}", config.menu.path.display());
    println!("Top level: {}", menu.top_labels().collect::<Vec<_>>().join(" | "));
    println!("Call pattern: {}", pattern.as_str());
    println!("Actions: {}", registry.names().join(", "));
    for call in registry.missing(&menu.calls()) {
        println!("Warning: no action registered for '{}'", call);
    }
    Ok(())
}

fn build_dispatcher(config: &Config) -> Result<MessageDispatcher, BotError> {
    let menu = load_menu(&config.menu.path)?;
    let (store, identities) = storage::open(&config.storage)?;
    let dispatcher = MessageDispatcher::new(
        Arc::new(menu),
        store,
        identities,
        ActionRegistry::with_builtins(),
        config.menu.settings(),
    )?;
    tracing::info!("Menu loaded, call pattern {}", dispatcher.call_pattern().as_str());
    Ok(dispatcher)
}

async fn connect_telegram(config: &Config) -> Result<TelegramAdapter, BotError> {
    let token = config
        .telegram
        .token
        .clone()
        .ok_or_else(|| ConfigError::MissingField("telegram.token".to_string()))?;

    let mut bot = TelegramAdapter::new(token, &config.bot.name);
    bot.fetch_bot_info().await?;
    if let Err(e) = bot.register_commands().await {
        tracing::warn!("Failed to register commands: {}", e);
    }
    bot.start().await?;
    Ok(bot)
}

async fn serve(config: Config) -> Result<(), BotError> {
    tracing::info!("Starting {} in webhook mode", config.bot.name);
    let dispatcher = build_dispatcher(&config)?;
    let bot = connect_telegram(&config).await?;

    match config.telegram.webhook_url() {
        Some(url) => {
            let endpoint = format!("{}/webhook", url.trim_end_matches('/'));
            bot.set_webhook(&endpoint).await?;
            match bot.get_webhook_info().await {
                Ok(info) => tracing::info!(
                    "Webhook info: url={} pending={} last_error={:?}",
                    info.url,
                    info.pending_update_count,
                    info.last_error_message
                ),
                Err(e) => tracing::warn!("Failed to fetch webhook info: {}", e),
            }
        }
        None => tracing::warn!("No webhook URL configured, not registering a webhook"),
    }

    let state = AppState {
        dispatcher: Arc::new(dispatcher),
        bot: Arc::new(bot),
        cron: Arc::new(CronService::new(config.cron.chat_id.clone(), config.cron.text.clone())),
        parser: Arc::new(MessageParser::default()),
        name: config.bot.name.clone(),
    };
    server::serve(&config.server.bind, state).await
}

async fn poll(config: Config) -> Result<(), BotError> {
    tracing::info!("Starting {} in polling mode", config.bot.name);
    let dispatcher = build_dispatcher(&config)?;
    let bot = connect_telegram(&config).await?;
    bot.delete_webhook().await?;

    let parser = MessageParser::default();
    let mut offset: i64 = 0;
    let timeout_seconds = 30;

    tracing::info!("Starting message loop...");

    loop {
        match bot.get_updates(offset, timeout_seconds).await {
            Ok(updates) => {
                if !updates.is_empty() {
                    tracing::info!("Received {} updates", updates.len());
                    offset = TelegramAdapter::get_next_offset(&updates);
                }
                for update in updates {
                    if let Some(message) = update.into_message(&parser) {
                        dispatcher.process(&bot, message).await;
                    }
                }
            }
            Err(BotError::RateLimited { retry_after }) => {
                tracing::warn!("Rate limited, sleeping {:?}", retry_after);
                tokio::time::sleep(retry_after).await;
            }
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            }
        }
    }
}

/// Stdin REPL. `!token` presses the inline button with that callback token.
async fn console(config: Config) -> Result<(), BotError> {
    let dispatcher = build_dispatcher(&config)?;
    let bot = ConsoleAdapter::new(&config.bot.name);
    bot.start().await?;

    let parser = MessageParser::default();
    let user = User::new("console").with_username("console");
    println!("Type /help for the menu, !<call> to press a button, Ctrl-D to quit.");

    while let Some(input) = bot.read_line("> ") {
        if input.is_empty() {
            continue;
        }

        let message = match input.strip_prefix('!') {
            Some(data) => parser.parse_callback("console", "console", data, user.clone()),
            None => parser.parse("console", input.as_str(), Some(user.clone())),
        };
        dispatcher.process(&bot, message).await;
    }

    Ok(())
}
