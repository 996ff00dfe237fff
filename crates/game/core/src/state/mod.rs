//! Identity and grid value types shared by every subsystem.
mod common;

pub use common::{ActorId, Position};
