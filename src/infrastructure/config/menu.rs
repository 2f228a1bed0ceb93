//! Menu definition loader.
//!
//! The document is a nested mapping. A mapping value opens a submenu, a
//! sequence of `{name, call}` records makes a leaf:
//!
//! ```yaml
//! "🍎 Fruit":
//!   "🍏 Apple":
//!     - name: Buy
//!       call: buy_apple
//! ```

use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use std::path::Path;

use crate::application::errors::ConfigError;
use crate::domain::entities::{MenuEntry, MenuItem, MenuNode, MenuTree};

/// Read and parse the menu file. Any failure here should stop startup.
pub fn load_menu(path: impl AsRef<Path>) -> Result<MenuTree, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Parse(format!("Failed to read menu {}: {}", path.display(), e)))?;
    parse_menu(&content)
}

pub fn parse_menu(content: &str) -> Result<MenuTree, ConfigError> {
    let value: Value = serde_yaml::from_str(content)
        .map_err(|e| ConfigError::Parse(format!("Failed to parse menu: {}", e)))?;

    let Value::Mapping(root) = value else {
        return Err(ConfigError::InvalidValue("menu root must be a mapping".to_string()));
    };

    let tree = MenuTree::new(parse_entries(&root, "<root>")?);

    let mut seen = HashSet::new();
    for call in tree.calls() {
        if !seen.insert(call) {
            return Err(ConfigError::InvalidValue(format!("duplicate call token: {}", call)));
        }
    }

    Ok(tree)
}

fn parse_entries(mapping: &Mapping, path: &str) -> Result<Vec<MenuEntry>, ConfigError> {
    if mapping.is_empty() {
        return Err(ConfigError::InvalidValue(format!("empty submenu at {}", path)));
    }

    let mut entries = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let Value::String(label) = key else {
            return Err(ConfigError::InvalidValue(format!("non-string label under {}: {:?}", path, key)));
        };
        let node = match value {
            Value::Mapping(children) => MenuNode::Submenu(parse_entries(children, label)?),
            Value::Sequence(records) => MenuNode::Leaf(parse_items(records, label)?),
            other => {
                return Err(ConfigError::InvalidValue(format!(
                    "{} must be a mapping or a list of actions, got {:?}",
                    label, other
                )))
            }
        };
        entries.push(MenuEntry {
            label: label.clone(),
            node,
        });
    }
    Ok(entries)
}

fn parse_items(records: &[Value], label: &str) -> Result<Vec<MenuItem>, ConfigError> {
    if records.is_empty() {
        return Err(ConfigError::InvalidValue(format!("empty action list at {}", label)));
    }

    records
        .iter()
        .map(|record| {
            let name = string_field(record, "name", label)?;
            let call = string_field(record, "call", label)?;
            Ok(MenuItem { name, call })
        })
        .collect()
}

fn string_field(record: &Value, field: &str, label: &str) -> Result<String, ConfigError> {
    match record.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(_) => Err(ConfigError::InvalidValue(format!("{}.{} must be a non-empty string", label, field))),
        None => Err(ConfigError::MissingField(format!("{}.{}", label, field))),
    }
}
