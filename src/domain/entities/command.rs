/// Slash commands the bot understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    Token,
    Reset,
}

impl BotCommand {
    pub fn all() -> &'static [BotCommand] {
        &[BotCommand::Start, BotCommand::Help, BotCommand::Token, BotCommand::Reset]
    }

    pub fn name(&self) -> &'static str {
        match self {
            BotCommand::Start => "start",
            BotCommand::Help => "help",
            BotCommand::Token => "token",
            BotCommand::Reset => "reset",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BotCommand::Start => "Start the bot",
            BotCommand::Help => "Show the main menu",
            BotCommand::Token => "Show your notification token",
            BotCommand::Reset => "Forget menu position",
        }
    }

    /// Match a command name, ignoring case and a `@botname` suffix
    pub fn parse(input: &str) -> Option<Self> {
        let name = input.split('@').next().unwrap_or(input).to_lowercase();
        Self::all().iter().copied().find(|c| c.name() == name)
    }
}
