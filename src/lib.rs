//! In-memory hierarchical bookmark manager.
//!
//! The core owns a tree of folders and links, guards its identity and
//! parentage invariants through every mutation (create, cascading delete,
//! cycle-safe move), answers folder-scoped queries and substring search,
//! and round-trips the tree through the legacy Netscape bookmark format.
//! Rendering, dialogs and drag gestures are somebody else's problem: a
//! presentation layer drives [`BookmarkManager`] and owns its [`Selection`].

pub mod codec;
pub mod engine;
pub mod error;
pub mod ident;
pub mod model;
pub mod moves;
pub mod query;
pub mod selection;
pub mod store;

pub use engine::{BookmarkManager, Stats};
pub use error::{Error, MoveRejection, Result};
pub use ident::IdGenerator;
pub use model::{Folder, Icon, Link, Node, NodeKind, ROOT_ID};
pub use moves::check_move;
pub use query::{count_descendant_links, is_descendant, links_in, search};
pub use selection::{Selection, SelectionPhase};
pub use store::TreeStore;
