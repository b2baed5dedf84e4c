use crate::model::{Link, Node, ROOT_ID};
use crate::store::TreeStore;

/// Links visible in a folder view.
///
/// The root view is the "all bookmarks" view and flattens the entire tree;
/// every other folder lists only its direct-child links. That asymmetry is
/// deliberate and load-bearing for the UI's left-hand "all" entry.
pub fn links_in<'a>(store: &'a TreeStore, folder_id: &str) -> Vec<&'a Link> {
    if folder_id == ROOT_ID {
        let mut links = Vec::new();
        store.visit(&mut |node| {
            if let Node::Link(link) = node {
                links.push(link);
            }
        });
        links
    } else {
        store
            .children_of(folder_id)
            .map(|children| children.iter().filter_map(Node::as_link).collect())
            .unwrap_or_default()
    }
}

/// Case-insensitive substring search over title or url, applied after
/// folder scoping. An empty term matches everything.
pub fn search<'a>(store: &'a TreeStore, term: &str, scope_folder_id: &str) -> Vec<&'a Link> {
    let needle = term.to_lowercase();
    links_in(store, scope_folder_id)
        .into_iter()
        .filter(|link| {
            link.title.to_lowercase().contains(&needle)
                || link.url.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Recursive count of links anywhere under a folder, for folder badges.
/// Folders themselves are not counted. An unknown folder counts zero.
pub fn count_descendant_links(store: &TreeStore, folder_id: &str) -> usize {
    if folder_id == ROOT_ID {
        return store.link_count();
    }
    match store.children_of(folder_id) {
        Some(children) => count_links(children),
        None => 0,
    }
}

fn count_links(nodes: &[Node]) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            Node::Link(_) => 1,
            Node::Folder(folder) => count_links(&folder.children),
        })
        .sum()
}

/// Whether `candidate_id` lies anywhere in the subtree rooted at
/// `ancestor_id`. A node is not its own descendant; every stored node
/// descends from root.
pub fn is_descendant(store: &TreeStore, candidate_id: &str, ancestor_id: &str) -> bool {
    store.subtree_contains(ancestor_id, candidate_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BookmarkManager;

    fn manager() -> (BookmarkManager, String, String) {
        let mut mgr = BookmarkManager::new();
        let work = mgr.create_folder("Work", ROOT_ID).unwrap();
        let inner = mgr.create_folder("Projects", &work.id).unwrap();
        mgr.create_link("Docs", "https://docs.example.com", None, &work.id)
            .unwrap();
        mgr.create_link("Repo", "https://git.example.com", None, &inner.id)
            .unwrap();
        mgr.create_link("News", "https://news.example.com", None, ROOT_ID)
            .unwrap();
        (mgr, work.id, inner.id)
    }

    #[test]
    fn root_view_flattens_all_links() {
        let (mgr, work, _) = manager();
        assert_eq!(links_in(mgr.store(), ROOT_ID).len(), 3);
        // non-root folders are non-recursive
        let titles: Vec<&str> = links_in(mgr.store(), &work)
            .iter()
            .map(|l| l.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Docs"]);
    }

    #[test]
    fn unknown_folder_lists_nothing() {
        let (mgr, _, _) = manager();
        assert!(links_in(mgr.store(), "ghost").is_empty());
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_url() {
        let (mgr, _, _) = manager();
        let store = mgr.store();
        assert_eq!(search(store, "DOCS", ROOT_ID).len(), 1);
        assert_eq!(search(store, "example.com", ROOT_ID).len(), 3);
        assert_eq!(search(store, "git.", ROOT_ID).len(), 1);
        assert!(search(store, "missing", ROOT_ID).is_empty());
    }

    #[test]
    fn empty_term_matches_everything() {
        let (mgr, work, _) = manager();
        assert_eq!(search(mgr.store(), "", ROOT_ID).len(), 3);
        assert_eq!(search(mgr.store(), "", &work).len(), 1);
    }

    #[test]
    fn search_scopes_before_matching() {
        let (mgr, work, _) = manager();
        // Repo is under Projects, not a direct child of Work
        assert!(search(mgr.store(), "Repo", &work).is_empty());
        assert_eq!(search(mgr.store(), "Repo", ROOT_ID).len(), 1);
    }

    #[test]
    fn descendant_link_count_is_recursive_and_links_only() {
        let (mgr, work, inner) = manager();
        assert_eq!(count_descendant_links(mgr.store(), &work), 2);
        assert_eq!(count_descendant_links(mgr.store(), &inner), 1);
        assert_eq!(count_descendant_links(mgr.store(), ROOT_ID), 3);
        assert_eq!(count_descendant_links(mgr.store(), "ghost"), 0);
    }

    #[test]
    fn descendant_checks() {
        let (mgr, work, inner) = manager();
        let store = mgr.store();
        assert!(is_descendant(store, &inner, &work));
        assert!(is_descendant(store, &work, ROOT_ID));
        assert!(!is_descendant(store, &work, &inner));
        assert!(!is_descendant(store, &work, &work));
    }
}
