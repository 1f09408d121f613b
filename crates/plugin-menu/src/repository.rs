//! In-memory menu repository.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use fieldhub_core::result::AppResult;
use fieldhub_core::traits::MenuRepository;
use fieldhub_core::types::{Menu, MenuLink};

/// Fixture file layout: `{ "menus": [...], "links": [...] }`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MenuFixture {
    menus: Vec<Menu>,
    links: Vec<MenuLink>,
}

/// Menus and links held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryMenuRepository {
    menus: BTreeMap<i64, Menu>,
    links: Vec<MenuLink>,
}

impl MemoryMenuRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads menus and links from a JSON fixture file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let raw = fs::read_to_string(path)?;
        let fixture: MenuFixture = serde_json::from_str(&raw)?;

        let mut repository = Self::new();
        for menu in fixture.menus {
            repository.insert_menu(menu);
        }
        for link in fixture.links {
            repository.insert_link(link);
        }

        debug!(
            path = %path.display(),
            menus = repository.menus.len(),
            links = repository.links.len(),
            "Menu fixture loaded"
        );
        Ok(repository)
    }

    /// Adds or replaces a menu.
    pub fn insert_menu(&mut self, menu: Menu) {
        self.menus.insert(menu.id, menu);
    }

    /// Adds or replaces a link.
    pub fn insert_link(&mut self, link: MenuLink) {
        self.links.retain(|existing| existing.id != link.id);
        self.links.push(link);
    }

    /// All menus ordered by id.
    pub fn menus(&self) -> impl Iterator<Item = &Menu> {
        self.menus.values()
    }
}

impl MenuRepository for MemoryMenuRepository {
    fn find_menu(&self, menu_id: i64) -> AppResult<Option<Menu>> {
        Ok(self.menus.get(&menu_id).cloned())
    }

    fn find_links(&self, menu_id: i64) -> AppResult<Vec<MenuLink>> {
        let mut links: Vec<MenuLink> = self
            .links
            .iter()
            .filter(|link| link.menu_id == menu_id)
            .cloned()
            .collect();
        links.sort_by_key(|link| link.lft);
        Ok(links)
    }
}
