//! Fixed-step orchestration of movement and turn resolution.
//!
//! [`GameTimeService`] is the single entry point a host drives. It owns the
//! [`MovementProgressionService`](crate::movement::MovementProgressionService)
//! and the [`TurnResolver`](crate::turn::TurnResolver), so one `&mut` borrow
//! covers a whole tick.

mod clock;
mod snapshot;

pub use clock::{AdvanceReport, GameTimeService};
pub use snapshot::{CombatSnapshot, RestoreError};
