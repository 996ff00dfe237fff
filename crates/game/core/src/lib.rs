//! Deterministic timing core for grid-based tactical combat.
//!
//! `combat-core` orders actors for action on an integer timeline, walks them
//! across the grid one cell per fixed duration, and keeps every actor's
//! position, vision and outbound notifications in lockstep. Everything is
//! synchronous and integer-only so identical inputs replay identically.
//!
//! All time flows through [`engine::GameTimeService`]; the supporting
//! modules are usable on their own:
//! - [`time`]: validated [`TimeUnit`] and action cost arithmetic
//! - [`turn`]: the [`Scheduler`] queue and turn resolution
//! - [`movement`]: per-actor progressions and the movement service
//! - [`env`]: vision calculators and the grid oracle they consult
//! - [`events`]: notifications published to an [`EventSink`]
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod movement;
pub mod state;
pub mod time;
pub mod turn;

pub use config::{ConfigError, CoreConfig};
pub use engine::{AdvanceReport, CombatSnapshot, GameTimeService, RestoreError};
pub use env::{
    GridOracle, LineOfSightVision, MAX_VISION_RADIUS, MapDimensions, RadiusVision, StaticGrid,
    VisibleTiles, VisionCalculator,
};
pub use error::{ErrorSeverity, GameError};
pub use events::{CallbackSink, CoreEvent, EventSink, NullSink};
pub use movement::{
    ActorView, MovementError, MovementProgression, MovementProgressionService, MovementSnapshot,
};
pub use state::{ActorId, Position};
pub use time::{ActorModifiers, TimeCostError, TimeUnit, TimeUnitError, action_time};
pub use turn::{
    ScheduledTurn, Scheduler, SchedulerSnapshot, TurnHandler, TurnOutcome, TurnResolution,
    TurnResolver,
};
