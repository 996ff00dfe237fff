//! Topic-based event bus for simulation events.
//!
//! The core publishes to a plain [`EventSink`](combat_core::EventSink);
//! [`BusSink`] forwards those events onto broadcast channels so any number
//! of consumers (presentation, logging, replay capture) can listen.

mod bus;

pub use bus::{BusSink, EventBus, Topic};
