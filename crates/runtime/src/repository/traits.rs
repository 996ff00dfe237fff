//! Repository contract for saving and loading combat snapshots.

use combat_core::CombatSnapshot;

use super::{RepositoryError, Result};

/// Repository for combat state persistence.
///
/// Snapshots are stored under caller-chosen slot names ("quicksave",
/// "autosave-3", ...). Slot names are restricted to ASCII letters, digits,
/// `-` and `_` so they are safe to use as file names.
pub trait SnapshotRepository: Send + Sync {
    /// Save a snapshot, replacing whatever the slot held
    fn save(&self, slot: &str, snapshot: &CombatSnapshot) -> Result<()>;

    /// Load a snapshot, `None` if the slot is empty
    fn load(&self, slot: &str) -> Result<Option<CombatSnapshot>>;

    /// Check if a slot holds a snapshot
    fn exists(&self, slot: &str) -> bool;

    /// Delete a slot; deleting an empty slot is not an error
    fn delete(&self, slot: &str) -> Result<()>;

    /// List occupied slots in sorted order
    fn list_slots(&self) -> Result<Vec<String>> {
        Ok(vec![])
    }
}

/// Rejects slot names that could escape the save directory.
pub fn validate_slot(slot: &str) -> Result<()> {
    let valid = !slot.is_empty()
        && slot
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if valid {
        Ok(())
    } else {
        Err(RepositoryError::InvalidSlot(slot.to_string()))
    }
}
