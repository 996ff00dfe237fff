//! In-memory SnapshotRepository implementation for tests and local runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use combat_core::CombatSnapshot;

use super::{RepositoryError, Result, SnapshotRepository, validate_slot};

/// In-memory implementation of SnapshotRepository.
pub struct InMemorySnapshotRepository {
    slots: RwLock<BTreeMap<String, CombatSnapshot>>,
}

impl InMemorySnapshotRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for InMemorySnapshotRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotRepository for InMemorySnapshotRepository {
    fn save(&self, slot: &str, snapshot: &CombatSnapshot) -> Result<()> {
        validate_slot(slot)?;
        let mut slots = self
            .slots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        slots.insert(slot.to_string(), snapshot.clone());
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<CombatSnapshot>> {
        validate_slot(slot)?;
        let slots = self
            .slots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slots.get(slot).cloned())
    }

    fn exists(&self, slot: &str) -> bool {
        validate_slot(slot).is_ok()
            && self
                .slots
                .read()
                .map(|slots| slots.contains_key(slot))
                .unwrap_or(false)
    }

    fn delete(&self, slot: &str) -> Result<()> {
        validate_slot(slot)?;
        let mut slots = self
            .slots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        slots.remove(slot);
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<String>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slots.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_delete() {
        let repo = InMemorySnapshotRepository::new();
        let snapshot = CombatSnapshot {
            tick: 12,
            ..CombatSnapshot::default()
        };

        repo.save("quick", &snapshot).unwrap();
        assert!(repo.exists("quick"));
        assert_eq!(repo.load("quick").unwrap(), Some(snapshot));
        assert_eq!(repo.list_slots().unwrap(), vec!["quick".to_string()]);

        repo.delete("quick").unwrap();
        assert_eq!(repo.load("quick").unwrap(), None);
    }

    #[test]
    fn unsafe_slot_names_are_rejected_everywhere() {
        let repo = InMemorySnapshotRepository::new();
        let snapshot = CombatSnapshot::default();

        for slot in ["../x", "", "a/b"] {
            assert!(matches!(
                repo.save(slot, &snapshot),
                Err(RepositoryError::InvalidSlot(_))
            ));
            assert!(matches!(
                repo.load(slot),
                Err(RepositoryError::InvalidSlot(_))
            ));
            assert!(matches!(
                repo.delete(slot),
                Err(RepositoryError::InvalidSlot(_))
            ));
            assert!(!repo.exists(slot));
        }
    }
}
