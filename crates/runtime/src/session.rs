//! Combat session orchestration.
//!
//! [`CombatSession`] owns the core [`GameTimeService`] together with the
//! event bus it publishes to. Hosts drive it from a single place (one
//! `advance` per frame plus player/AI commands in between); every call
//! borrows the session mutably, so a tick is always processed as a whole.

use combat_core::{
    ActorId, ActorModifiers, AdvanceReport, CombatSnapshot, GameError, GameTimeService,
    MovementProgression, Position, RadiusVision, ScheduledTurn, TimeUnit, TurnHandler,
    VisibleTiles, VisionCalculator,
};
use tokio::sync::broadcast;

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::events::{BusSink, EventBus, Topic};
use crate::repository::SnapshotRepository;

/// Running combat encounter: simulation state plus its event bus.
pub struct CombatSession<V> {
    config: RuntimeConfig,
    bus: EventBus,
    time: GameTimeService<V, BusSink>,
}

impl CombatSession<RadiusVision> {
    /// Session with unobstructed square vision of `config.vision_radius`.
    pub fn with_radius_vision(config: RuntimeConfig) -> Result<Self> {
        let vision = RadiusVision::new(config.vision_radius);
        CombatSessionBuilder::new().config(config).build(vision)
    }
}

impl<V: VisionCalculator> CombatSession<V> {
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Subscribe to simulation events on one topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<combat_core::CoreEvent> {
        self.bus.subscribe(topic)
    }

    /// Read-only access to the underlying simulation.
    pub fn state(&self) -> &GameTimeService<V, BusSink> {
        &self.time
    }

    pub fn spawn(&mut self, actor: ActorId, position: Position) -> Result<()> {
        self.time.spawn_actor(actor, position)?;
        tracing::info!(%actor, %position, "actor joined combat");
        Ok(())
    }

    /// Removes a dead or fleeing actor from the grid and the turn queue.
    pub fn remove(&mut self, actor: ActorId) -> Option<Position> {
        let position = self.time.remove_actor(actor);
        tracing::debug!(%actor, ?position, "remove command");
        position
    }

    /// Issues a move order along a pre-computed path.
    pub fn command_move(&mut self, actor: ActorId, path: Vec<Position>) -> Result<()> {
        let cells = path.len();
        self.time.start_movement(actor, path).map_err(|error| {
            tracing::warn!(
                %actor,
                cells,
                code = error.error_code(),
                severity = error.severity().as_str(),
                %error,
                "move order rejected"
            );
            RuntimeError::from(error)
        })
    }

    /// Interrupts a move order. Returns the abandoned progression, if any.
    pub fn cancel_move(&mut self, actor: ActorId) -> Option<MovementProgression> {
        let cancelled = self.time.cancel_movement(actor);
        tracing::debug!(
            %actor,
            cancelled = cancelled.is_some(),
            "cancel move command"
        );
        cancelled
    }

    pub fn schedule(&mut self, actor: ActorId, next_turn: TimeUnit) -> ScheduledTurn {
        let turn = self.time.schedule(actor, next_turn);
        tracing::debug!(%actor, %next_turn, sequence = turn.sequence, "schedule command");
        turn
    }

    /// Schedules `actor` after an action of `base_cost`, adjusted by its modifiers.
    pub fn schedule_action(
        &mut self,
        actor: ActorId,
        base_cost: TimeUnit,
        modifiers: ActorModifiers,
    ) -> Result<ScheduledTurn> {
        let turn = self
            .time
            .schedule_action(actor, base_cost, modifiers)
            .map_err(|error| {
                tracing::warn!(
                    %actor,
                    %base_cost,
                    code = error.error_code(),
                    severity = error.severity().as_str(),
                    %error,
                    "action could not be scheduled"
                );
                RuntimeError::from(error)
            })?;
        tracing::debug!(%actor, next_turn = %turn.next_turn, "schedule action command");
        Ok(turn)
    }

    /// Feeds one external frame's worth of time into the simulation.
    pub fn advance<H>(&mut self, delta_ms: u32, handler: &mut H) -> AdvanceReport
    where
        H: TurnHandler + ?Sized,
    {
        self.time.advance(delta_ms, handler)
    }

    pub fn position(&self, actor: ActorId) -> Option<Position> {
        self.time.current_position(actor)
    }

    pub fn visible_tiles(&self, actor: ActorId) -> Option<&VisibleTiles> {
        self.time.movement().visible_tiles(actor)
    }

    pub fn snapshot(&self) -> CombatSnapshot {
        self.time.snapshot()
    }

    /// Persists the current state under `slot`.
    pub fn save(&self, repository: &dyn SnapshotRepository, slot: &str) -> Result<()> {
        let snapshot = self.time.snapshot();
        repository.save(slot, &snapshot)?;
        tracing::info!(
            slot,
            tick = snapshot.tick,
            actors = snapshot.actors.len(),
            "saved combat"
        );
        Ok(())
    }

    /// Rebuilds a session from the snapshot stored under `slot`.
    pub fn load(
        config: RuntimeConfig,
        vision: V,
        repository: &dyn SnapshotRepository,
        slot: &str,
    ) -> Result<Self> {
        let snapshot = repository
            .load(slot)?
            .ok_or_else(|| RuntimeError::SnapshotNotFound {
                slot: slot.to_string(),
            })?;
        CombatSessionBuilder::new()
            .config(config)
            .snapshot(snapshot)
            .build(vision)
    }
}

/// Builder for [`CombatSession`] with flexible configuration.
#[derive(Default)]
pub struct CombatSessionBuilder {
    config: RuntimeConfig,
    snapshot: Option<CombatSnapshot>,
    bus: Option<EventBus>,
}

impl CombatSessionBuilder {
    /// Create a new session builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Resume from a saved snapshot instead of an empty grid
    pub fn snapshot(mut self, snapshot: CombatSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Publish to an existing bus (subscribers created before build keep working)
    pub fn bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Build the session with the given vision calculator
    pub fn build<V: VisionCalculator>(self, vision: V) -> Result<CombatSession<V>> {
        self.config.validate()?;

        let bus = self
            .bus
            .unwrap_or_else(|| EventBus::with_capacity(self.config.event_buffer_size));
        let sink = BusSink::new(bus.clone());

        let time = match self.snapshot {
            Some(snapshot) => {
                GameTimeService::restore(&self.config.core, vision, sink, snapshot)?
            }
            None => GameTimeService::new(&self.config.core, vision, sink)?,
        };

        tracing::debug!(
            tick_ms = self.config.core.tick_ms,
            cell_ms = self.config.core.cell_duration_ms,
            "combat session ready"
        );

        Ok(CombatSession {
            config: self.config,
            bus,
            time,
        })
    }
}
