//! Threading of nested-set menu links into a tree.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use fieldhub_core::types::{MenuLink, MenuLinkNode};

/// Deepest nesting level kept; links below it are dropped.
pub const MAX_DEPTH: usize = 64;

/// Threads links by `parent_id`, siblings ordered by ascending `lft`.
///
/// Links without a parent, or whose parent is not among `links`, become
/// roots. Links caught in a parent cycle are unreachable and dropped, as are
/// links nested deeper than [`MAX_DEPTH`].
pub fn thread_links(mut links: Vec<MenuLink>) -> Vec<MenuLinkNode> {
    links.sort_by_key(|link| (link.lft, link.id));

    let ids: HashSet<i64> = links.iter().map(|link| link.id).collect();
    let mut children: HashMap<i64, Vec<MenuLink>> = HashMap::new();
    let mut roots = Vec::new();

    for link in links {
        match link
            .parent_id
            .filter(|parent| *parent != link.id && ids.contains(parent))
        {
            Some(parent) => children.entry(parent).or_default().push(link),
            None => roots.push(link),
        }
    }

    roots
        .into_iter()
        .map(|link| build_node(link, &mut children, 1))
        .collect()
}

fn build_node(
    link: MenuLink,
    children: &mut HashMap<i64, Vec<MenuLink>>,
    depth: usize,
) -> MenuLinkNode {
    let kids = children.remove(&link.id).unwrap_or_default();
    if depth >= MAX_DEPTH && !kids.is_empty() {
        warn!(link = link.id, depth, "Menu links nested too deep, dropping children");
        return MenuLinkNode {
            children: Vec::new(),
            link,
        };
    }

    MenuLinkNode {
        children: kids
            .into_iter()
            .map(|kid| build_node(kid, children, depth + 1))
            .collect(),
        link,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(id: i64, parent_id: Option<i64>, lft: i64, rght: i64) -> MenuLink {
        MenuLink {
            id,
            menu_id: 1,
            parent_id,
            lft,
            rght,
            title: format!("link {id}"),
            url: format!("/{id}"),
        }
    }

    fn ids(nodes: &[MenuLinkNode]) -> Vec<i64> {
        nodes.iter().map(|n| n.link.id).collect()
    }

    #[test]
    fn test_threads_by_parent_ordered_by_lft() {
        // 1 [2, 3 [4]], 5; stored out of order
        let tree = thread_links(vec![
            link(5, None, 9, 10),
            link(3, Some(1), 4, 7),
            link(1, None, 1, 8),
            link(4, Some(3), 5, 6),
            link(2, Some(1), 2, 3),
        ]);

        assert_eq!(ids(&tree), vec![1, 5]);
        assert_eq!(ids(&tree[0].children), vec![2, 3]);
        assert_eq!(ids(&tree[0].children[1].children), vec![4]);
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn test_orphans_become_roots() {
        let tree = thread_links(vec![link(7, Some(99), 3, 4), link(1, None, 1, 2)]);
        assert_eq!(ids(&tree), vec![1, 7]);
    }

    #[test]
    fn test_cycles_are_dropped() {
        let tree = thread_links(vec![
            link(1, None, 1, 2),
            link(2, Some(3), 3, 4),
            link(3, Some(2), 5, 6),
            link(4, Some(4), 7, 8),
        ]);
        assert_eq!(ids(&tree), vec![1, 4]);
    }

    #[test]
    fn test_empty() {
        assert!(thread_links(Vec::new()).is_empty());
    }

    #[test]
    fn test_deep_chain_is_cut_at_max_depth() {
        let chain: Vec<MenuLink> = (1..=500)
            .map(|id| link(id, (id > 1).then_some(id - 1), id, 1001 - id))
            .collect();

        let roots = thread_links(chain);
        let mut depth = 0;
        let mut level = roots.as_slice();
        while let Some(node) = level.first() {
            depth += 1;
            level = node.children.as_slice();
        }
        assert_eq!(depth, MAX_DEPTH);
    }
}
