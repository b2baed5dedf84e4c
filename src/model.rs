use serde::{Deserialize, Serialize};

/// Identifier of the implicit top-level container. Never stored as a node;
/// it cannot be deleted, moved or renamed.
pub const ROOT_ID: &str = "root";

/// The two item kinds the tree can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Folder,
    Link,
}

impl NodeKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            NodeKind::Folder => "folder",
            NodeKind::Link => "link",
        }
    }
}

/// Link icon, opaque to the tree logic.
///
/// Only `Inline` survives export; glyph tokens and remote references are
/// presentation hints that the exchange format has no field for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Icon {
    /// Semantic icon token, e.g. `fab fa-github`.
    Glyph(String),
    /// Remote image reference (`http...`).
    Remote(String),
    /// Inline-encoded image (`data:image...`).
    Inline(String),
}

impl Icon {
    /// Classify a raw icon attribute. Blank input means no icon.
    pub fn classify(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            None
        } else if raw.starts_with("data:image") {
            Some(Icon::Inline(raw.to_string()))
        } else if raw.starts_with("http") {
            Some(Icon::Remote(raw.to_string()))
        } else {
            Some(Icon::Glyph(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Icon::Glyph(s) | Icon::Remote(s) | Icon::Inline(s) => s,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub parent_id: String,
    /// Presentation flag, irrelevant to tree invariants.
    pub expanded: bool,
    /// Insertion order defines display and export order.
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub title: String,
    pub url: String,
    pub icon: Option<Icon>,
    pub parent_id: String,
}

/// A tree node: folders aggregate, links do not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Folder(Folder),
    Link(Link),
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::Folder(f) => &f.id,
            Node::Link(l) => &l.id,
        }
    }

    pub fn parent_id(&self) -> &str {
        match self {
            Node::Folder(f) => &f.parent_id,
            Node::Link(l) => &l.parent_id,
        }
    }

    pub(crate) fn set_parent_id(&mut self, parent_id: &str) {
        match self {
            Node::Folder(f) => f.parent_id = parent_id.to_string(),
            Node::Link(l) => l.parent_id = parent_id.to_string(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Folder(_) => NodeKind::Folder,
            Node::Link(_) => NodeKind::Link,
        }
    }

    /// Display text: folder name or link title.
    pub fn label(&self) -> &str {
        match self {
            Node::Folder(f) => &f.name,
            Node::Link(l) => &l.title,
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Node::Folder(f) => Some(f),
            Node::Link(_) => None,
        }
    }

    pub fn as_folder_mut(&mut self) -> Option<&mut Folder> {
        match self {
            Node::Folder(f) => Some(f),
            Node::Link(_) => None,
        }
    }

    pub fn as_link(&self) -> Option<&Link> {
        match self {
            Node::Link(l) => Some(l),
            Node::Folder(_) => None,
        }
    }
}
