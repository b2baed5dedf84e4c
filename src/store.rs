use std::collections::HashMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Folder, Node, NodeKind, ROOT_ID};

/// Owns the canonical bookmark hierarchy.
///
/// The nested tree under `top` is the single source of truth. The two
/// parallel id lookup maps (folder-by-id and link-by-id, each resolving to
/// the parent folder id) are derived caches: they are kept in step inside
/// every mutation and can be rebuilt wholesale from the tree at any time.
#[derive(Debug, Default)]
pub struct TreeStore {
    /// Direct children of the implicit root, in display order.
    top: Vec<Node>,
    folder_parents: HashMap<String, String>,
    link_parents: HashMap<String, String>,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a freshly parsed forest as the entire tree.
    pub fn from_nodes(top: Vec<Node>) -> Self {
        let mut store = Self {
            top,
            folder_parents: HashMap::new(),
            link_parents: HashMap::new(),
        };
        store.rebuild_indexes();
        store
    }

    pub fn top_level(&self) -> &[Node] {
        &self.top
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty()
    }

    pub fn folder_count(&self) -> usize {
        self.folder_parents.len()
    }

    pub fn link_count(&self) -> usize {
        self.link_parents.len()
    }

    /// Whether an id resolves to a stored node. The root sentinel is not a
    /// node and is never contained.
    pub fn contains(&self, id: &str) -> bool {
        self.folder_parents.contains_key(id) || self.link_parents.contains_key(id)
    }

    pub fn kind_of(&self, id: &str) -> Option<NodeKind> {
        if self.folder_parents.contains_key(id) {
            Some(NodeKind::Folder)
        } else if self.link_parents.contains_key(id) {
            Some(NodeKind::Link)
        } else {
            None
        }
    }

    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.folder_parents
            .get(id)
            .or_else(|| self.link_parents.get(id))
            .map(String::as_str)
    }

    /// Whether an id can act as an insertion target: root or a stored folder.
    pub fn folder_exists(&self, id: &str) -> bool {
        id == ROOT_ID || self.folder_parents.contains_key(id)
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        find_in(&self.top, id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        find_in_mut(&mut self.top, id)
    }

    pub fn find_folder(&self, id: &str) -> Option<&Folder> {
        self.find(id).and_then(Node::as_folder)
    }

    /// Ordered children of a folder; root maps to the top-level sequence.
    pub fn children_of(&self, folder_id: &str) -> Option<&[Node]> {
        if folder_id == ROOT_ID {
            return Some(&self.top);
        }
        self.find_folder(folder_id).map(|f| f.children.as_slice())
    }

    fn children_mut(&mut self, folder_id: &str) -> Option<&mut Vec<Node>> {
        if folder_id == ROOT_ID {
            return Some(&mut self.top);
        }
        match self.find_mut(folder_id) {
            Some(Node::Folder(folder)) => Some(&mut folder.children),
            _ => None,
        }
    }

    /// Attach a node (with its whole subtree) under a folder.
    ///
    /// `position` of `None` appends, preserving display order semantics.
    /// Fails with `NotFound` when the parent is neither root nor an existing
    /// folder, leaving the tree untouched.
    pub fn insert(&mut self, mut node: Node, parent_id: &str, position: Option<usize>) -> Result<()> {
        node.set_parent_id(parent_id);
        debug_assert!(!self.contains(node.id()), "duplicate node id {}", node.id());
        let entries = subtree_entries(&node);
        let children = self
            .children_mut(parent_id)
            .ok_or_else(|| Error::NotFound(parent_id.to_string()))?;
        let at = position.unwrap_or(children.len()).min(children.len());
        children.insert(at, node);
        for (id, parent, kind) in entries {
            match kind {
                NodeKind::Folder => self.folder_parents.insert(id, parent),
                NodeKind::Link => self.link_parents.insert(id, parent),
            };
        }
        Ok(())
    }

    /// Detach a node from its parent and return the whole subtree.
    ///
    /// Every id in the subtree is evicted from the lookup maps; the caller
    /// decides whether the subtree is discarded or re-attached.
    pub fn remove(&mut self, id: &str) -> Result<Node> {
        if id == ROOT_ID {
            return Err(Error::NotFound(id.to_string()));
        }
        let parent_id = self
            .parent_of(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?
            .to_string();
        let children = self
            .children_mut(&parent_id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let pos = children
            .iter()
            .position(|n| n.id() == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let node = children.remove(pos);
        for (sub_id, _, kind) in subtree_entries(&node) {
            match kind {
                NodeKind::Folder => self.folder_parents.remove(&sub_id),
                NodeKind::Link => self.link_parents.remove(&sub_id),
            };
        }
        debug!(id, parent = %parent_id, "detached node");
        Ok(node)
    }

    /// Drop and repopulate both lookup maps from the canonical tree.
    pub fn rebuild_indexes(&mut self) {
        self.folder_parents.clear();
        self.link_parents.clear();
        let mut entries = Vec::new();
        for node in &self.top {
            entries.extend(subtree_entries(node));
        }
        for (id, parent, kind) in entries {
            match kind {
                NodeKind::Folder => self.folder_parents.insert(id, parent),
                NodeKind::Link => self.link_parents.insert(id, parent),
            };
        }
    }

    /// Depth-first visit over every node, in display order.
    pub fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Node)) {
        visit_nodes(&self.top, f);
    }

    /// Depth-first visit over every folder, mutably.
    pub fn visit_folders_mut(&mut self, f: &mut dyn FnMut(&mut Folder)) {
        visit_folders_mut(&mut self.top, f);
    }

    /// Whether `candidate_id` appears anywhere strictly below `ancestor_id`.
    pub fn subtree_contains(&self, ancestor_id: &str, candidate_id: &str) -> bool {
        if ancestor_id == ROOT_ID {
            return self.contains(candidate_id);
        }
        match self.find(ancestor_id) {
            Some(Node::Folder(folder)) => find_in(&folder.children, candidate_id).is_some(),
            _ => false,
        }
    }
}

fn find_in<'a>(nodes: &'a [Node], id: &str) -> Option<&'a Node> {
    for node in nodes {
        if node.id() == id {
            return Some(node);
        }
        if let Node::Folder(folder) = node {
            if let Some(found) = find_in(&folder.children, id) {
                return Some(found);
            }
        }
    }
    None
}

fn find_in_mut<'a>(nodes: &'a mut [Node], id: &str) -> Option<&'a mut Node> {
    for node in nodes.iter_mut() {
        if node.id() == id {
            return Some(node);
        }
        if let Node::Folder(folder) = node {
            if let Some(found) = find_in_mut(&mut folder.children, id) {
                return Some(found);
            }
        }
    }
    None
}

fn visit_nodes<'a>(nodes: &'a [Node], f: &mut dyn FnMut(&'a Node)) {
    for node in nodes {
        f(node);
        if let Node::Folder(folder) = node {
            visit_nodes(&folder.children, f);
        }
    }
}

fn visit_folders_mut(nodes: &mut [Node], f: &mut dyn FnMut(&mut Folder)) {
    for node in nodes.iter_mut() {
        if let Node::Folder(folder) = node {
            f(folder);
            visit_folders_mut(&mut folder.children, f);
        }
    }
}

/// Flatten a subtree into (id, parent_id, kind) index entries.
fn subtree_entries(node: &Node) -> Vec<(String, String, NodeKind)> {
    let mut entries = Vec::new();
    collect_entries(node, &mut entries);
    entries
}

fn collect_entries(node: &Node, out: &mut Vec<(String, String, NodeKind)>) {
    out.push((
        node.id().to_string(),
        node.parent_id().to_string(),
        node.kind(),
    ));
    if let Node::Folder(folder) = node {
        for child in &folder.children {
            collect_entries(child, out);
        }
    }
}
