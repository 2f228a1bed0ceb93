//! Menu tree and the depth-first lookups used for navigation.
//!
//! Every lookup walks entries pre-order in definition order and stops at the
//! first match. When a label appears under several parents, the occurrence
//! visited first wins.

/// A leaf action button: visible name plus the callback token it sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub name: String,
    pub call: String,
}

impl MenuItem {
    pub fn new(name: impl Into<String>, call: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            call: call.into(),
        }
    }
}

/// A labelled child of a submenu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    pub node: MenuNode,
}

impl MenuEntry {
    pub fn submenu(label: impl Into<String>, children: Vec<MenuEntry>) -> Self {
        Self {
            label: label.into(),
            node: MenuNode::Submenu(children),
        }
    }

    pub fn leaf(label: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            label: label.into(),
            node: MenuNode::Leaf(items),
        }
    }
}

/// A node is either a further submenu or a list of actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuNode {
    Submenu(Vec<MenuEntry>),
    Leaf(Vec<MenuItem>),
}

/// The whole menu definition. The root itself is an unlabelled submenu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuTree {
    root: Vec<MenuEntry>,
}

impl MenuTree {
    pub fn new(root: Vec<MenuEntry>) -> Self {
        Self { root }
    }

    /// Top-level labels in definition order
    pub fn top_labels(&self) -> impl Iterator<Item = &str> {
        self.root.iter().map(|e| e.label.as_str())
    }

    /// First node keyed by `label` anywhere in the tree
    pub fn find_node(&self, label: &str) -> Option<&MenuNode> {
        find_in(&self.root, label)
    }

    /// Parent label of the first occurrence of `label`.
    ///
    /// Returns `None` both when the label is unknown and when its first
    /// occurrence sits at the top level.
    pub fn find_parent(&self, label: &str) -> Option<&str> {
        parent_in(&self.root, label, None).flatten()
    }

    /// How many times `label` appears as a key in the tree
    pub fn occurrences(&self, label: &str) -> usize {
        count_in(&self.root, label)
    }

    /// Every leaf callback token in traversal order
    pub fn calls(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_calls(&self.root, &mut out);
        out
    }
}

fn find_in<'a>(entries: &'a [MenuEntry], label: &str) -> Option<&'a MenuNode> {
    for entry in entries {
        if entry.label == label {
            return Some(&entry.node);
        }
        if let MenuNode::Submenu(children) = &entry.node {
            if let Some(found) = find_in(children, label) {
                return Some(found);
            }
        }
    }
    None
}

// Outer Option: found or not. Inner Option: parent label, None at top level.
fn parent_in<'a>(
    entries: &'a [MenuEntry],
    label: &str,
    parent: Option<&'a str>,
) -> Option<Option<&'a str>> {
    for entry in entries {
        if entry.label == label {
            return Some(parent);
        }
        if let MenuNode::Submenu(children) = &entry.node {
            if let Some(found) = parent_in(children, label, Some(entry.label.as_str())) {
                return Some(found);
            }
        }
    }
    None
}

fn count_in(entries: &[MenuEntry], label: &str) -> usize {
    entries
        .iter()
        .map(|entry| {
            let here = usize::from(entry.label == label);
            match &entry.node {
                MenuNode::Submenu(children) => here + count_in(children, label),
                MenuNode::Leaf(_) => here,
            }
        })
        .sum()
}

fn collect_calls<'a>(entries: &'a [MenuEntry], out: &mut Vec<&'a str>) {
    for entry in entries {
        match &entry.node {
            MenuNode::Submenu(children) => collect_calls(children, out),
            MenuNode::Leaf(items) => out.extend(items.iter().map(|i| i.call.as_str())),
        }
    }
}
