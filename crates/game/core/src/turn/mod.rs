//! Turn ordering: the scheduler queue and the step that resolves it.
mod resolver;
mod scheduler;

pub use resolver::{TurnHandler, TurnOutcome, TurnResolution, TurnResolver};
pub use scheduler::{ScheduledTurn, Scheduler, SchedulerSnapshot};
