//! File-based SnapshotRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use combat_core::CombatSnapshot;
use serde::{Deserialize, Serialize};

use super::{RepositoryError, Result, SnapshotRepository, validate_slot};

/// On-disk encoding of snapshot files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotFormat {
    /// Compact binary, the default for save slots.
    #[default]
    Bincode,
    /// Human-readable, for debugging and bug reports.
    Json,
}

impl SnapshotFormat {
    fn extension(self) -> &'static str {
        match self {
            SnapshotFormat::Bincode => "bin",
            SnapshotFormat::Json => "json",
        }
    }

    fn encode(self, snapshot: &CombatSnapshot) -> Result<Vec<u8>> {
        match self {
            SnapshotFormat::Bincode => bincode::serialize(snapshot)
                .map_err(|e| RepositoryError::Serialization(e.to_string())),
            SnapshotFormat::Json => serde_json::to_vec_pretty(snapshot)
                .map_err(|e| RepositoryError::Json(e.to_string())),
        }
    }

    fn decode(self, bytes: &[u8]) -> Result<CombatSnapshot> {
        match self {
            SnapshotFormat::Bincode => bincode::deserialize(bytes)
                .map_err(|e| RepositoryError::Serialization(e.to_string())),
            SnapshotFormat::Json => {
                serde_json::from_slice(bytes).map_err(|e| RepositoryError::Json(e.to_string()))
            }
        }
    }
}

/// File-based implementation of SnapshotRepository.
///
/// Stores each slot as `{slot}.bin` (or `.json`) in the base directory.
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-save never leaves a truncated slot behind.
pub struct FileSnapshotRepository {
    base_dir: PathBuf,
    format: SnapshotFormat,
}

impl FileSnapshotRepository {
    /// Create a new file-based snapshot repository using bincode.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        Self::with_format(base_dir, SnapshotFormat::Bincode)
    }

    pub fn with_format(base_dir: impl AsRef<Path>, format: SnapshotFormat) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir, format })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to a slot file.
    fn slot_path(&self, slot: &str) -> PathBuf {
        self.base_dir
            .join(format!("{}.{}", slot, self.format.extension()))
    }
}

impl SnapshotRepository for FileSnapshotRepository {
    fn save(&self, slot: &str, snapshot: &CombatSnapshot) -> Result<()> {
        validate_slot(slot)?;
        let path = self.slot_path(slot);
        let temp_path = path.with_extension(format!("{}.tmp", self.format.extension()));

        let bytes = self.format.encode(snapshot)?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved snapshot[{}] to {}", slot, path.display());
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<CombatSnapshot>> {
        validate_slot(slot)?;
        let path = self.slot_path(slot);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let snapshot = self.format.decode(&bytes)?;

        tracing::debug!("Loaded snapshot[{}] from {}", slot, path.display());
        Ok(Some(snapshot))
    }

    fn exists(&self, slot: &str) -> bool {
        validate_slot(slot).is_ok() && self.slot_path(slot).exists()
    }

    fn delete(&self, slot: &str) -> Result<()> {
        validate_slot(slot)?;
        let path = self.slot_path(slot);

        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("Deleted snapshot[{}]", slot);
        }

        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<String>> {
        let suffix = format!(".{}", self.format.extension());
        let mut slots = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(slot) = filename.strip_suffix(suffix.as_str())
                && validate_slot(slot).is_ok()
            {
                slots.push(slot.to_string());
            }
        }

        slots.sort_unstable();
        Ok(slots)
    }
}
