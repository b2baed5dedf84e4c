use std::collections::BTreeSet;

use crate::error::MoveRejection;
use crate::store::TreeStore;

/// Decide whether relocating a selection into a target folder is legal.
///
/// Checks run against the current (pre-move) tree for every selected id, so
/// the answer is independent of the order the batch would be applied in:
/// - `SelfTarget` when the target is one of the selected ids,
/// - `CyclicMove` when the target sits inside a selected folder's subtree,
/// - `TargetNotFound` when the target is neither root nor an existing folder.
///
/// A rejection fails the whole batch; callers must not apply any part of it.
pub fn check_move(
    store: &TreeStore,
    ids: &BTreeSet<String>,
    target_folder_id: &str,
) -> Result<(), MoveRejection> {
    if !store.folder_exists(target_folder_id) {
        return Err(MoveRejection::TargetNotFound(target_folder_id.to_string()));
    }
    for id in ids {
        if id == target_folder_id {
            return Err(MoveRejection::SelfTarget(id.clone()));
        }
        if store.subtree_contains(id, target_folder_id) {
            return Err(MoveRejection::CyclicMove(id.clone()));
        }
    }
    Ok(())
}
