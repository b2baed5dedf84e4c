use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::codec;
use crate::error::{Error, Result};
use crate::ident::IdGenerator;
use crate::model::{Folder, Icon, Link, Node, NodeKind, ROOT_ID};
use crate::moves;
use crate::query;
use crate::store::TreeStore;

/// Aggregate counters for the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub folders: usize,
    pub links: usize,
}

/// The mutation engine: owns the tree store and the id generator, and
/// exposes the create/delete/move operations as atomic, invariant-preserving
/// units. Queries and the exchange codec are surfaced here too, so a
/// presentation layer needs nothing but this type.
#[derive(Debug, Default)]
pub struct BookmarkManager {
    store: TreeStore,
    ids: IdGenerator,
}

impl BookmarkManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small starter tree, mirroring the classic demo data set.
    pub fn sample() -> Self {
        let mut ids = IdGenerator::new();
        let dev_id = ids.next_id(NodeKind::Folder);
        let social_id = ids.next_id(NodeKind::Folder);
        let top = vec![
            Node::Folder(Folder {
                id: dev_id.clone(),
                name: "Development".to_string(),
                parent_id: ROOT_ID.to_string(),
                expanded: true,
                children: vec![
                    Node::Link(Link {
                        id: ids.next_id(NodeKind::Link),
                        title: "GitHub".to_string(),
                        url: "https://github.com".to_string(),
                        icon: Icon::classify("fab fa-github"),
                        parent_id: dev_id.clone(),
                    }),
                    Node::Link(Link {
                        id: ids.next_id(NodeKind::Link),
                        title: "Stack Overflow".to_string(),
                        url: "https://stackoverflow.com".to_string(),
                        icon: Icon::classify("fab fa-stack-overflow"),
                        parent_id: dev_id,
                    }),
                ],
            }),
            Node::Folder(Folder {
                id: social_id.clone(),
                name: "Social".to_string(),
                parent_id: ROOT_ID.to_string(),
                expanded: false,
                children: vec![Node::Link(Link {
                    id: ids.next_id(NodeKind::Link),
                    title: "Twitter".to_string(),
                    url: "https://twitter.com".to_string(),
                    icon: Icon::classify("fab fa-twitter"),
                    parent_id: social_id,
                })],
            }),
            Node::Link(Link {
                id: ids.next_id(NodeKind::Link),
                title: "Google".to_string(),
                url: "https://google.com".to_string(),
                icon: Icon::classify("fab fa-google"),
                parent_id: ROOT_ID.to_string(),
            }),
        ];
        Self {
            store: TreeStore::from_nodes(top),
            ids,
        }
    }

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    pub fn stats(&self) -> Stats {
        Stats {
            folders: self.store.folder_count(),
            links: self.store.link_count(),
        }
    }

    /// Create a folder under `parent_id`, or under root when the parent does
    /// not resolve to an existing folder.
    pub fn create_folder(&mut self, name: &str, parent_id: &str) -> Result<Folder> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        let parent = self.resolve_parent(parent_id);
        let folder = Folder {
            id: self.ids.next_id(NodeKind::Folder),
            name: name.to_string(),
            parent_id: parent.clone(),
            expanded: false,
            children: Vec::new(),
        };
        self.store.insert(Node::Folder(folder.clone()), &parent, None)?;
        info!(name = %folder.name, parent = %parent, "created folder");
        Ok(folder)
    }

    /// Create a link under `parent_id` (root when unresolvable). The url
    /// must parse as a well-formed absolute URL.
    pub fn create_link(
        &mut self,
        title: &str,
        url: &str,
        icon: Option<&str>,
        parent_id: &str,
    ) -> Result<Link> {
        let title = title.trim();
        let url = url.trim();
        if title.is_empty() {
            return Err(Error::EmptyField("title"));
        }
        if url.is_empty() {
            return Err(Error::EmptyField("url"));
        }
        url::Url::parse(url).map_err(|source| Error::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let parent = self.resolve_parent(parent_id);
        let link = Link {
            id: self.ids.next_id(NodeKind::Link),
            title: title.to_string(),
            url: url.to_string(),
            icon: icon.and_then(Icon::classify),
            parent_id: parent.clone(),
        };
        self.store.insert(Node::Link(link.clone()), &parent, None)?;
        info!(title = %link.title, parent = %parent, "created link");
        Ok(link)
    }

    fn resolve_parent(&self, parent_id: &str) -> String {
        if self.store.folder_exists(parent_id) {
            parent_id.to_string()
        } else {
            debug!(parent = parent_id, "parent does not resolve, falling back to root");
            ROOT_ID.to_string()
        }
    }

    /// Delete the requested items, cascading through folder subtrees.
    ///
    /// Unknown ids are skipped, which makes repeated deletion idempotent.
    /// Returns how many of the requested ids existed and were removed.
    pub fn delete_items(&mut self, ids: &BTreeSet<String>) -> usize {
        let mut removed = 0;
        for id in ids {
            // an earlier cascade may already have taken this id with it
            if !self.store.contains(id) {
                debug!(id = %id, "skipping unknown id on delete");
                continue;
            }
            if self.store.remove(id).is_ok() {
                removed += 1;
            }
        }
        info!(requested = ids.len(), removed, "deleted items");
        removed
    }

    /// Move the requested items into a target folder.
    ///
    /// The whole batch is validated against the current tree first; any
    /// rejection fails the operation with the tree unchanged. Each item is
    /// then detached and appended to the target in turn, its subtree
    /// travelling with it.
    pub fn move_items(&mut self, ids: &BTreeSet<String>, target_folder_id: &str) -> Result<usize> {
        for id in ids {
            if !self.store.contains(id) {
                return Err(Error::NotFound(id.clone()));
            }
        }
        moves::check_move(&self.store, ids, target_folder_id)?;

        let mut moved = 0;
        for id in ids {
            let node = self.store.remove(id)?;
            self.store.insert(node, target_folder_id, None)?;
            moved += 1;
        }
        info!(moved, target = target_folder_id, "moved items");
        Ok(moved)
    }

    /// Rename a folder (its name) or a link (its title).
    pub fn rename(&mut self, id: &str, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::EmptyName);
        }
        match self.store.find_mut(id) {
            Some(Node::Folder(folder)) => folder.name = text.to_string(),
            Some(Node::Link(link)) => link.title = text.to_string(),
            None => return Err(Error::NotFound(id.to_string())),
        }
        Ok(())
    }

    pub fn set_expanded(&mut self, folder_id: &str, expanded: bool) -> Result<()> {
        match self.store.find_mut(folder_id) {
            Some(Node::Folder(folder)) => {
                folder.expanded = expanded;
                Ok(())
            }
            _ => Err(Error::NotFound(folder_id.to_string())),
        }
    }

    /// Flip a folder's expansion flag, returning the new state.
    pub fn toggle_expanded(&mut self, folder_id: &str) -> Result<bool> {
        match self.store.find_mut(folder_id) {
            Some(Node::Folder(folder)) => {
                folder.expanded = !folder.expanded;
                Ok(folder.expanded)
            }
            _ => Err(Error::NotFound(folder_id.to_string())),
        }
    }

    pub fn collapse_all(&mut self) {
        self.store
            .visit_folders_mut(&mut |folder| folder.expanded = false);
    }

    // Query surface, scoped like the folder views.

    pub fn links_in(&self, folder_id: &str) -> Vec<&Link> {
        query::links_in(&self.store, folder_id)
    }

    pub fn search(&self, term: &str, scope_folder_id: &str) -> Vec<&Link> {
        query::search(&self.store, term, scope_folder_id)
    }

    pub fn count_descendant_links(&self, folder_id: &str) -> usize {
        query::count_descendant_links(&self.store, folder_id)
    }

    pub fn is_descendant(&self, candidate_id: &str, ancestor_id: &str) -> bool {
        query::is_descendant(&self.store, candidate_id, ancestor_id)
    }

    /// Replace the entire tree with the contents of a bookmark document.
    ///
    /// On a parse failure the previous tree is left untouched; partial
    /// imports never happen.
    pub fn import(&mut self, html: &str) -> Result<Stats> {
        let nodes = codec::parse(html, &mut self.ids)?;
        self.store = TreeStore::from_nodes(nodes);
        let stats = self.stats();
        info!(folders = stats.folders, links = stats.links, "imported bookmark document");
        Ok(stats)
    }

    /// Serialize the current tree into a bookmark document.
    pub fn export(&self) -> String {
        codec::serialize(self.store.top_level())
    }
}
