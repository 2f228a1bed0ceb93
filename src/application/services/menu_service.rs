//! Menu resolver: turns a user's selection into the next menu to show.

use std::sync::Arc;

use crate::application::errors::StorageError;
use crate::domain::entities::{CallbackButton, MenuItem, MenuNode, MenuTree, Rendering};
use super::PositionCache;

/// What the user picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Root,
    Back,
    Label(String),
}

impl Selection {
    /// Interpret keyboard text. Empty is the root, the back label goes up.
    pub fn parse(text: &str, back_label: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            Selection::Root
        } else if text == back_label {
            Selection::Back
        } else {
            Selection::Label(text.to_string())
        }
    }
}

pub struct MenuResolver {
    menu: Arc<MenuTree>,
    positions: PositionCache,
    back_label: String,
}

impl MenuResolver {
    pub fn new(menu: Arc<MenuTree>, positions: PositionCache, back_label: impl Into<String>) -> Self {
        Self {
            menu,
            positions,
            back_label: back_label.into(),
        }
    }

    pub fn back_label(&self) -> &str {
        &self.back_label
    }

    pub fn menu(&self) -> &MenuTree {
        &self.menu
    }

    /// Compute the next rendering, persisting the open submenu as a side effect.
    ///
    /// Unknown labels and stale state fall back to the root menu.
    pub async fn resolve(&self, user_id: &str, selection: Selection) -> Result<Rendering, StorageError> {
        let label = match selection {
            Selection::Root => return Ok(self.root()),
            Selection::Back => match self.parent_of_current(user_id).await? {
                Some(parent) => parent,
                None => return Ok(self.root()),
            },
            Selection::Label(label) => label,
        };

        self.resolve_label(user_id, &label).await
    }

    /// Top-level labels, no state change
    pub fn root(&self) -> Rendering {
        Rendering::SelectableList {
            labels: self.menu.top_labels().map(str::to_string).collect(),
        }
    }

    async fn resolve_label(&self, user_id: &str, label: &str) -> Result<Rendering, StorageError> {
        self.warn_if_ambiguous(label);

        match self.menu.find_node(label) {
            Some(MenuNode::Submenu(children)) => {
                let mut labels: Vec<String> = children.iter().map(|c| c.label.clone()).collect();
                labels.push(self.back_label.clone());
                self.positions.set_navigation(user_id, label).await?;
                Ok(Rendering::SelectableList { labels })
            }
            Some(MenuNode::Leaf(items)) => Ok(Rendering::CallbackList {
                buttons: items.iter().map(button_for).collect(),
            }),
            None => {
                tracing::debug!("Unknown menu label '{}' from user {}, showing root", label, user_id);
                Ok(self.root())
            }
        }
    }

    async fn parent_of_current(&self, user_id: &str) -> Result<Option<String>, StorageError> {
        let Some(position) = self.positions.navigation(user_id).await? else {
            tracing::debug!("No navigation state for user {}, back goes to root", user_id);
            return Ok(None);
        };

        self.warn_if_ambiguous(&position.current);
        Ok(self.menu.find_parent(&position.current).map(str::to_string))
    }

    fn warn_if_ambiguous(&self, label: &str) {
        let count = self.menu.occurrences(label);
        if count > 1 {
            tracing::warn!("Menu label '{}' appears {} times, using the first", label, count);
        }
    }
}

fn button_for(item: &MenuItem) -> CallbackButton {
    CallbackButton::new(&item.name, &item.call)
}
