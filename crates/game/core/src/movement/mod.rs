//! Incremental movement along grid paths.
//!
//! - [`MovementProgression`] tracks one actor's walk
//! - [`MovementProgressionService`] owns all walks and the authoritative
//!   position + vision of every actor
mod error;
mod progression;
mod service;

pub use error::MovementError;
pub use progression::{MovementProgression, MovementSnapshot};
pub use service::{ActorView, MovementProgressionService};
