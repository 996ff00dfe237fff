//! Integer time: the validated [`TimeUnit`] and action cost arithmetic.
pub mod cost;
mod unit;

pub use cost::{ActorModifiers, TimeCostError, action_time};
pub use unit::{TimeUnit, TimeUnitError};
