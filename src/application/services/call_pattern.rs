use regex_lite::Regex;

use crate::application::errors::ConfigError;
use crate::domain::entities::MenuTree;

/// Exact-match-one-of matcher over every leaf callback token in the menu.
///
/// Built once at startup; rebuild it if the menu changes.
#[derive(Debug, Clone)]
pub struct CallPattern {
    regex: Regex,
}

impl CallPattern {
    pub fn from_menu(menu: &MenuTree) -> Result<Self, ConfigError> {
        let alternatives: Vec<String> = menu.calls().into_iter().map(regex_lite::escape).collect();
        let pattern = format!("^(?:{})$", alternatives.join("|"));
        let regex = Regex::new(&pattern)
            .map_err(|e| ConfigError::InvalidValue(format!("call pattern: {}", e)))?;
        Ok(Self { regex })
    }

    pub fn matches(&self, data: &str) -> bool {
        self.regex.is_match(data)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{MenuEntry, MenuItem};

    fn menu() -> MenuTree {
        MenuTree::new(vec![
            MenuEntry::leaf("A", vec![MenuItem::new("One", "echo"), MenuItem::new("Two", "a.b")]),
            MenuEntry::submenu("B", vec![MenuEntry::leaf("C", vec![MenuItem::new("Three", "caps")])]),
        ])
    }

    #[test]
    fn test_matches_only_whole_tokens() {
        let pattern = CallPattern::from_menu(&menu()).unwrap();
        assert!(pattern.matches("echo"));
        assert!(pattern.matches("caps"));
        assert!(!pattern.matches("echo2"));
        assert!(!pattern.matches("xecho"));
        assert!(!pattern.matches("inftrx_1"));
    }

    #[test]
    fn test_tokens_are_escaped() {
        let pattern = CallPattern::from_menu(&menu()).unwrap();
        assert!(pattern.matches("a.b"));
        assert!(!pattern.matches("aXb"));
        assert_eq!(pattern.as_str(), r"^(?:echo|a\.b|caps)$");
    }
}
