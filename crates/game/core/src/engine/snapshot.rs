use crate::config::ConfigError;
use crate::movement::{MovementError, MovementSnapshot};
use crate::state::{ActorId, Position};
use crate::time::TimeUnit;
use crate::turn::SchedulerSnapshot;

/// Everything a save file needs to resume combat exactly.
///
/// Visible tiles are not stored: they are a function of position and are
/// recomputed on restore. Presentation-only state never appears here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatSnapshot {
    /// Authoritative positions in ascending actor order.
    pub actors: Vec<(ActorId, Position)>,
    /// Movements in flight.
    pub movements: Vec<MovementSnapshot>,
    pub schedule: SchedulerSnapshot,
    /// NextTurn of the most recently resolved turn.
    pub combat_clock: TimeUnit,
    /// Fixed ticks processed so far.
    pub tick: u64,
    /// Time received but not yet spent on a full tick.
    pub accumulated_ms: u64,
}

/// Why a snapshot could not be turned back into a running simulation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RestoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid movement in snapshot")]
    Movement(#[from] MovementError),

    #[error("snapshot carries {accumulated_ms}ms of banked time, more than one {tick_ms}ms tick")]
    BankedTimeOutOfRange { accumulated_ms: u64, tick_ms: u32 },
}
