//! Menu storage trait.

use crate::result::AppResult;
use crate::types::menu::{Menu, MenuLink};

/// Read access to menus and their nested-set link table.
pub trait MenuRepository: Send + Sync + std::fmt::Debug {
    /// Finds a menu by id.
    fn find_menu(&self, menu_id: i64) -> AppResult<Option<Menu>>;

    /// Returns every link of a menu ordered by ascending `lft`.
    fn find_links(&self, menu_id: i64) -> AppResult<Vec<MenuLink>>;
}
