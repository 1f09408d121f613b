//! Menus, menu links, and the blocks that display them.

use serde::{Deserialize, Serialize};

/// A navigation menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    /// Menu identifier.
    pub id: i64,
    /// Menu title.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: String,
}

/// A link row of a nested-set tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuLink {
    /// Link identifier.
    pub id: i64,
    /// Owning menu.
    pub menu_id: i64,
    /// Parent link, `None` for top-level links.
    #[serde(default)]
    pub parent_id: Option<i64>,
    /// Nested-set left value.
    pub lft: i64,
    /// Nested-set right value.
    pub rght: i64,
    /// Link text.
    pub title: String,
    /// Target URL.
    pub url: String,
}

/// A link with its threaded children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuLinkNode {
    /// The link itself.
    #[serde(flatten)]
    pub link: MenuLink,
    /// Child links ordered by ascending `lft`.
    pub children: Vec<MenuLinkNode>,
}

/// A block placed in a theme region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block identifier.
    pub id: i64,
    /// For menu blocks, the id of the menu to display.
    pub delta: i64,
    /// Theme region the block is rendered in, e.g. `left-sidebar`.
    pub region: String,
    /// Block title.
    #[serde(default)]
    pub title: String,
}
