//! Persistence adapters for combat snapshots.
//!
//! Only the authoritative state described by
//! [`CombatSnapshot`](combat_core::CombatSnapshot) is stored; vision is
//! recomputed when a snapshot is restored.
mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::{FileSnapshotRepository, SnapshotFormat};
pub use memory::InMemorySnapshotRepository;
pub use traits::{SnapshotRepository, validate_slot};
