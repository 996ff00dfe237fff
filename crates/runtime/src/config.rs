//! Runtime configuration structures and loaders.
//!
//! Configuration is read from RON text (usually a `combat.ron` next to the
//! binary) and can be overridden per process through environment variables:
//!
//! - `COMBAT_TICK_MS` - fixed tick length (default: 100)
//! - `COMBAT_CELL_MS` - time to cross one cell (default: 200)
//! - `COMBAT_VISION_RADIUS` - vision radius in cells (default: 8, at most 256)
//! - `COMBAT_EVENT_BUFFER` - per-topic event buffer (default: 256)
//! - `COMBAT_SAVE_DIR` - directory for save slots (default: platform data dir)

use std::env;
use std::path::{Path, PathBuf};

use combat_core::{CoreConfig, MAX_VISION_RADIUS};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RuntimeError};
use crate::repository::SnapshotFormat;

/// Configuration for a [`CombatSession`](crate::CombatSession).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub core: CoreConfig,
    pub vision_radius: u32,
    pub event_buffer_size: usize,
    pub save_dir: Option<PathBuf>,
    pub save_format: SnapshotFormat,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            core: CoreConfig::default(),
            vision_radius: 8,
            event_buffer_size: 256,
            save_dir: None,
            save_format: SnapshotFormat::default(),
        }
    }
}

impl RuntimeConfig {
    /// Parses RON text. Missing fields take their defaults.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RuntimeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&text)?;
        tracing::info!("Loaded runtime config from {}", path.display());
        Ok(config)
    }

    /// Applies `COMBAT_*` environment overrides on top of this config.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(tick_ms) = parse_var(&lookup, "COMBAT_TICK_MS")? {
            self.core.tick_ms = tick_ms;
        }
        if let Some(cell_ms) = parse_var(&lookup, "COMBAT_CELL_MS")? {
            self.core.cell_duration_ms = cell_ms;
        }
        if let Some(radius) = parse_var(&lookup, "COMBAT_VISION_RADIUS")? {
            self.vision_radius = radius;
        }
        if let Some(buffer) = parse_var(&lookup, "COMBAT_EVENT_BUFFER")? {
            self.event_buffer_size = buffer;
        }
        if let Some(dir) = lookup("COMBAT_SAVE_DIR") {
            self.save_dir = Some(PathBuf::from(dir));
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        self.core.validate()?;
        if self.vision_radius > MAX_VISION_RADIUS {
            return Err(RuntimeError::InvalidSetting {
                key: "vision_radius",
                value: self.vision_radius.to_string(),
            });
        }
        if self.event_buffer_size == 0 {
            return Err(RuntimeError::InvalidSetting {
                key: "event_buffer_size",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Save directory: the configured one, else the platform data directory.
    pub fn resolved_save_dir(&self) -> Option<PathBuf> {
        self.save_dir.clone().or_else(|| {
            directories::ProjectDirs::from("", "", "gridcombat")
                .map(|dirs| dirs.data_dir().join("saves"))
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<T>>
where
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| RuntimeError::InvalidSetting { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_ron_keeps_defaults() {
        let config = RuntimeConfig::from_ron_str("(vision_radius: 3, core: (tick_ms: 50))").unwrap();
        assert_eq!(config.vision_radius, 3);
        assert_eq!(config.core.tick_ms, 50);
        assert_eq!(
            config.core.cell_duration_ms,
            CoreConfig::DEFAULT_CELL_DURATION_MS
        );
        assert_eq!(config.event_buffer_size, 256);
    }

    #[test]
    fn empty_ron_is_default() {
        assert_eq!(
            RuntimeConfig::from_ron_str("()").unwrap(),
            RuntimeConfig::default()
        );
    }

    #[test]
    fn invalid_core_values_are_rejected() {
        let result = RuntimeConfig::from_ron_str("(core: (cell_duration_ms: 0))");
        assert!(matches!(result, Err(RuntimeError::Config(_))));
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        let result = RuntimeConfig::from_ron_str("(vision_radius: \"far\")");
        assert!(matches!(result, Err(RuntimeError::ConfigParse(_))));
    }

    #[test]
    fn env_overrides_apply() {
        let lookup = |key: &str| match key {
            "COMBAT_CELL_MS" => Some("150".to_string()),
            "COMBAT_SAVE_DIR" => Some("/tmp/saves".to_string()),
            _ => None,
        };
        let config = RuntimeConfig::default().with_overrides(lookup).unwrap();
        assert_eq!(config.core.cell_duration_ms, 150);
        assert_eq!(config.save_dir, Some(PathBuf::from("/tmp/saves")));
        assert_eq!(config.resolved_save_dir(), Some(PathBuf::from("/tmp/saves")));
    }

    #[test]
    fn unparsable_override_is_reported() {
        let lookup = |key: &str| (key == "COMBAT_TICK_MS").then(|| "fast".to_string());
        let result = RuntimeConfig::default().with_overrides(lookup);
        assert!(matches!(
            result,
            Err(RuntimeError::InvalidSetting {
                key: "COMBAT_TICK_MS",
                ..
            })
        ));
    }

    #[test]
    fn oversized_vision_radius_is_rejected() {
        let result = RuntimeConfig::from_ron_str("(vision_radius: 3000000000)");
        assert!(matches!(
            result,
            Err(RuntimeError::InvalidSetting {
                key: "vision_radius",
                ..
            })
        ));

        let lookup = |key: &str| (key == "COMBAT_VISION_RADIUS").then(|| "100000".to_string());
        let result = RuntimeConfig::default().with_overrides(lookup);
        assert!(matches!(
            result,
            Err(RuntimeError::InvalidSetting {
                key: "vision_radius",
                ..
            })
        ));

        let lookup = |key: &str| (key == "COMBAT_VISION_RADIUS").then(|| "256".to_string());
        let config = RuntimeConfig::default().with_overrides(lookup).unwrap();
        assert_eq!(config.vision_radius, MAX_VISION_RADIUS);
    }
}
