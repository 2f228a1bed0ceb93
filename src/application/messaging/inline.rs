//! Inline query answers: the query text restyled three ways

use crate::domain::entities::{InlineArticle, ParseMode};

pub fn articles(query: &str) -> Vec<InlineArticle> {
    let escaped = escape_markdown(query);
    vec![
        InlineArticle::new("Caps", query.to_uppercase()),
        InlineArticle::new("Bold", format!("*{}*", escaped)).with_parse_mode(ParseMode::Markdown),
        InlineArticle::new("Italic", format!("_{}_", escaped)).with_parse_mode(ParseMode::Markdown),
    ]
}

/// Escape the legacy Markdown control characters
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
