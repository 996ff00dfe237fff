//! Host-side runtime for the combat simulation.
//!
//! `combat-runtime` wraps the synchronous [`combat_core`] engine with the
//! pieces a game host needs around it: configuration loading, a topic-based
//! event bus and snapshot persistence. Consumers embed a [`CombatSession`]
//! and call [`CombatSession::advance`] once per frame.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the session and its builder
//! - [`config`] loads [`RuntimeConfig`] from RON and the environment
//! - [`events`] fans core events out to broadcast subscribers
//! - [`repository`] saves and loads [`CombatSnapshot`](combat_core::CombatSnapshot)s
pub mod config;
pub mod error;
pub mod events;
pub mod repository;
pub mod session;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use events::{BusSink, EventBus, Topic};
pub use repository::{
    FileSnapshotRepository, InMemorySnapshotRepository, RepositoryError, SnapshotFormat,
    SnapshotRepository,
};
pub use session::{CombatSession, CombatSessionBuilder};
