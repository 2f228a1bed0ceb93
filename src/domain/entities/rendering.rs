/// A button that fires a callback instead of sending text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackButton {
    pub name: String,
    pub token: String,
}

impl CallbackButton {
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: token.into(),
        }
    }
}

/// What to present next. Adapters decide the concrete markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendering {
    /// Labels the user picks from; the picked label comes back as text
    SelectableList { labels: Vec<String> },
    /// Inline buttons carrying opaque callback tokens
    CallbackList { buttons: Vec<CallbackButton> },
}

impl Rendering {
    pub fn buttons(&self) -> Option<&[CallbackButton]> {
        match self {
            Rendering::CallbackList { buttons } => Some(buttons),
            Rendering::SelectableList { .. } => None,
        }
    }
}

/// Markup flavour for inline query answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Markdown,
}

impl ParseMode {
    pub fn as_str(&self) -> &str {
        match self {
            ParseMode::Markdown => "Markdown",
        }
    }
}

/// One article offered in reply to an inline query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineArticle {
    pub id: String,
    pub title: String,
    pub message_text: String,
    pub parse_mode: Option<ParseMode>,
}

impl InlineArticle {
    pub fn new(title: impl Into<String>, message_text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            message_text: message_text.into(),
            parse_mode: None,
        }
    }

    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = Some(mode);
        self
    }
}
