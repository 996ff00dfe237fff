//! Headless combat simulator.
//!
//! Plays a scripted skirmish through a [`CombatSession`](combat_runtime::CombatSession)
//! so the whole stack (fixed ticks, cell-by-cell movement, vision, turn
//! order, event fan-out and saves) can be exercised without a renderer.
//!
//! - [`scenario`] holds the arena, the roster and the turn-taking AI
//! - [`logging`] sets up the tracing subscriber
pub mod logging;
pub mod scenario;

pub use scenario::{SkirmishAi, SkirmishSummary};
