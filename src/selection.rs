use std::collections::BTreeSet;

/// Where a selection-driven interaction currently stands.
///
/// `Idle -> Selecting -> {ReadyToMove, ReadyToDelete} -> Idle`: the ready
/// states are only reachable with a non-empty selection, and any completed
/// mutation or explicit clear returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    Idle,
    Selecting,
    ReadyToMove,
    ReadyToDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingAction {
    Move,
    Delete,
}

/// The set of selected node ids, owned by the presentation layer.
///
/// Selection is an explicit value handed into `delete_items`/`move_items`;
/// it is never stored inside tree nodes, and the tree never mutates it.
/// Changing the selection drops any pending action.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    items: BTreeSet<String>,
    pending: Option<PendingAction>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.items.insert(id.into());
        self.pending = None;
    }

    pub fn deselect(&mut self, id: &str) {
        self.items.remove(id);
        self.pending = None;
    }

    /// Ctrl-click semantics: flip membership.
    pub fn toggle(&mut self, id: &str) {
        if !self.items.remove(id) {
            self.items.insert(id.to_string());
        }
        self.pending = None;
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.pending = None;
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn ids(&self) -> &BTreeSet<String> {
        &self.items
    }

    /// Arm a pending move; ignored while nothing is selected.
    pub fn begin_move(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.pending = Some(PendingAction::Move);
        true
    }

    /// Arm a pending delete; ignored while nothing is selected.
    pub fn begin_delete(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.pending = Some(PendingAction::Delete);
        true
    }

    pub fn phase(&self) -> SelectionPhase {
        if self.items.is_empty() {
            return SelectionPhase::Idle;
        }
        match self.pending {
            None => SelectionPhase::Selecting,
            Some(PendingAction::Move) => SelectionPhase::ReadyToMove,
            Some(PendingAction::Delete) => SelectionPhase::ReadyToDelete,
        }
    }
}
