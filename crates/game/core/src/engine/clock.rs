//! Fixed-step driver.
//!
//! The host calls [`GameTimeService::advance`] once per external update with
//! however much wall time passed. The service banks it and runs as many fixed
//! ticks as the bank pays for. Each tick, in order:
//!
//! 1. movement progressions advance by one tick
//! 2. at most one scheduled turn is resolved
//! 3. [`CoreEvent::TickElapsed`] is published
//!
//! Whatever irregular frame times the host produces, the simulation only
//! ever sees identical fixed steps.

use super::{CombatSnapshot, RestoreError};
use crate::config::{ConfigError, CoreConfig};
use crate::env::VisionCalculator;
use crate::events::{CoreEvent, EventSink};
use crate::movement::{MovementError, MovementProgression, MovementProgressionService};
use crate::state::{ActorId, Position};
use crate::time::{ActorModifiers, TimeCostError, TimeUnit};
use crate::turn::{ScheduledTurn, Scheduler, TurnHandler, TurnResolution, TurnResolver};

/// Summary of one [`GameTimeService::advance`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    pub ticks: u32,
    pub cells_advanced: usize,
    pub turns_resolved: usize,
}

/// Owns the movement service and the turn resolver and steps them together.
pub struct GameTimeService<V, S> {
    tick_ms: u32,
    accumulated_ms: u64,
    tick: u64,
    movement: MovementProgressionService<V, S>,
    turns: TurnResolver,
}

impl<V, S> GameTimeService<V, S>
where
    V: VisionCalculator,
    S: EventSink,
{
    pub fn new(config: &CoreConfig, vision: V, sink: S) -> Result<Self, ConfigError> {
        Ok(Self {
            tick_ms: config.tick_ms,
            accumulated_ms: 0,
            tick: 0,
            movement: MovementProgressionService::new(config, vision, sink)?,
            turns: TurnResolver::new(),
        })
    }

    /// Banks `delta_ms` and runs every fixed tick it completes.
    ///
    /// Never blocks; a long pause simply runs several ticks back to back.
    pub fn advance<H>(&mut self, delta_ms: u32, handler: &mut H) -> AdvanceReport
    where
        H: TurnHandler + ?Sized,
    {
        self.accumulated_ms += u64::from(delta_ms);

        let tick_ms = u64::from(self.tick_ms);
        let mut report = AdvanceReport::default();
        while self.accumulated_ms >= tick_ms {
            self.accumulated_ms -= tick_ms;
            self.run_tick(handler, &mut report);
        }

        if report.ticks > 0 {
            tracing::trace!(
                delta_ms,
                ticks = report.ticks,
                cells = report.cells_advanced,
                turns = report.turns_resolved,
                carried_ms = self.accumulated_ms,
                "advanced game time"
            );
        }
        report
    }

    fn run_tick<H>(&mut self, handler: &mut H, report: &mut AdvanceReport)
    where
        H: TurnHandler + ?Sized,
    {
        report.cells_advanced += self.movement.advance_game_time(self.tick_ms);

        let resolution = self
            .turns
            .resolve_next(handler, self.movement.sink_mut());
        if let TurnResolution::Resolved { turn, outcome } = resolution {
            tracing::debug!(
                actor = %turn.actor,
                at = %turn.next_turn,
                ?outcome,
                "turn resolved"
            );
            report.turns_resolved += 1;
        }

        self.tick += 1;
        report.ticks += 1;
        self.movement
            .sink_mut()
            .publish(CoreEvent::TickElapsed { tick: self.tick });
    }

    /// Queues a turn for `actor`. Duplicates are allowed.
    pub fn schedule(&mut self, actor: ActorId, next_turn: TimeUnit) -> ScheduledTurn {
        self.turns.scheduler_mut().schedule(actor, next_turn)
    }

    /// Schedules `actor` to act again once an action of `base_cost` is done,
    /// counting from the current combat clock.
    pub fn schedule_action(
        &mut self,
        actor: ActorId,
        base_cost: TimeUnit,
        modifiers: ActorModifiers,
    ) -> Result<ScheduledTurn, TimeCostError> {
        let duration = modifiers.action_time(base_cost)?;
        let next_turn = self
            .turns
            .clock()
            .checked_add(duration)
            .map_err(TimeCostError::Overflow)?;
        Ok(self.schedule(actor, next_turn))
    }

    pub fn spawn_actor(&mut self, actor: ActorId, position: Position) -> Result<(), MovementError> {
        self.movement.spawn_actor(actor, position)
    }

    /// Takes an actor out of combat: its turns, its movement and its cell.
    pub fn remove_actor(&mut self, actor: ActorId) -> Option<Position> {
        let turns = self.turns.scheduler_mut().remove(actor);
        let position = self.movement.despawn_actor(actor);
        if position.is_some() || turns > 0 {
            tracing::info!(%actor, turns, "actor left combat");
        }
        position
    }

    pub fn start_movement<I>(&mut self, actor: ActorId, path: I) -> Result<(), MovementError>
    where
        I: IntoIterator<Item = Position>,
    {
        self.movement.start_movement(actor, path)
    }

    pub fn cancel_movement(&mut self, actor: ActorId) -> Option<MovementProgression> {
        self.movement.cancel_movement(actor)
    }

    pub fn current_position(&self, actor: ActorId) -> Option<Position> {
        self.movement.current_position(actor)
    }

    pub fn movement(&self) -> &MovementProgressionService<V, S> {
        &self.movement
    }

    pub fn movement_mut(&mut self) -> &mut MovementProgressionService<V, S> {
        &mut self.movement
    }

    pub fn scheduler(&self) -> &Scheduler {
        self.turns.scheduler()
    }

    /// NextTurn of the most recently resolved turn.
    pub fn combat_clock(&self) -> TimeUnit {
        self.turns.clock()
    }

    /// Number of fixed ticks processed.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn tick_ms(&self) -> u32 {
        self.tick_ms
    }

    /// Banked time that has not yet formed a full tick.
    pub fn accumulated_ms(&self) -> u64 {
        self.accumulated_ms
    }

    pub fn sink(&self) -> &S {
        self.movement.sink()
    }

    pub fn sink_mut(&mut self) -> &mut S {
        self.movement.sink_mut()
    }

    pub fn snapshot(&self) -> CombatSnapshot {
        CombatSnapshot {
            actors: self
                .movement
                .actors()
                .map(|(actor, view)| (actor, view.position))
                .collect(),
            movements: self.movement.movement_snapshots(),
            schedule: self.turns.scheduler().snapshot(),
            combat_clock: self.turns.clock(),
            tick: self.tick,
            accumulated_ms: self.accumulated_ms,
        }
    }

    /// Rebuilds a running simulation from a snapshot.
    ///
    /// Actors are re-placed (recomputing their vision and re-announcing
    /// their positions to `sink`) before their movements are reinstated.
    pub fn restore(
        config: &CoreConfig,
        vision: V,
        sink: S,
        snapshot: CombatSnapshot,
    ) -> Result<Self, RestoreError> {
        let mut service = Self::new(config, vision, sink)?;
        // A live service never banks a full tick between calls to `advance`.
        if snapshot.accumulated_ms >= u64::from(service.tick_ms) {
            return Err(RestoreError::BankedTimeOutOfRange {
                accumulated_ms: snapshot.accumulated_ms,
                tick_ms: service.tick_ms,
            });
        }

        for (actor, position) in snapshot.actors {
            service.movement.spawn_actor(actor, position)?;
        }
        for movement in snapshot.movements {
            service.movement.restore_movement(movement)?;
        }

        service.turns =
            TurnResolver::from_parts(Scheduler::restore(snapshot.schedule), snapshot.combat_clock);
        service.tick = snapshot.tick;
        service.accumulated_ms = snapshot.accumulated_ms;

        tracing::info!(
            tick = service.tick,
            actors = service.movement.actors().count(),
            movements = service.movement.active_movements(),
            scheduled = service.turns.scheduler().len(),
            "restored combat state"
        );
        Ok(service)
    }
}
