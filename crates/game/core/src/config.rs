use crate::error::{ErrorSeverity, GameError};
use crate::time::TimeUnit;

/// Timing parameters for the fixed-step simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CoreConfig {
    /// Length of one simulation tick in milliseconds.
    pub tick_ms: u32,
    /// Time an actor spends crossing a single grid cell.
    pub cell_duration_ms: u32,
}

/// Rejected configuration values.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be between 1 and {max} ms, got {value}", max = TimeUnit::MAX_MS)]
    DurationOutOfRange { field: &'static str, value: u32 },
}

impl GameError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "CONFIG_DURATION_OUT_OF_RANGE"
    }
}

impl CoreConfig {
    pub const DEFAULT_TICK_MS: u32 = 100;
    pub const DEFAULT_CELL_DURATION_MS: u32 = 200;

    pub fn new() -> Self {
        Self {
            tick_ms: Self::DEFAULT_TICK_MS,
            cell_duration_ms: Self::DEFAULT_CELL_DURATION_MS,
        }
    }

    pub fn with_cell_duration(cell_duration_ms: u32) -> Self {
        Self {
            cell_duration_ms,
            ..Self::new()
        }
    }

    /// Both durations must be positive time units.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_duration("tick_ms", self.tick_ms)?;
        check_duration("cell_duration_ms", self.cell_duration_ms)
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn check_duration(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value == 0 || i64::from(value) > TimeUnit::MAX_MS {
        return Err(ConfigError::DurationOutOfRange { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(CoreConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_tick_is_rejected() {
        let config = CoreConfig {
            tick_ms: 0,
            ..CoreConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::DurationOutOfRange {
                field: "tick_ms",
                value: 0
            })
        );
    }

    #[test]
    fn cell_duration_above_time_unit_range_is_rejected() {
        let config = CoreConfig::with_cell_duration(10_001);
        assert!(config.validate().is_err());
    }
}
