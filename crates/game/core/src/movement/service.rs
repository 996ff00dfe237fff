//! Cell-by-cell movement driver.
//!
//! Every cell an actor enters goes through [`commit_position`], which
//! recomputes vision for the new cell, replaces the actor's position and
//! visible set in a single assignment, and only then publishes
//! [`CoreEvent::PositionChanged`]. Callers hold `&mut self` for the whole
//! tick, so nothing outside can observe a position paired with the vision of
//! another cell.

use std::collections::{BTreeMap, VecDeque};

use super::{MovementError, MovementProgression, MovementSnapshot};
use crate::config::{ConfigError, CoreConfig};
use crate::env::{VisibleTiles, VisionCalculator};
use crate::events::{CoreEvent, EventSink};
use crate::state::{ActorId, Position};

/// Authoritative spatial state of one actor: where it stands and what it sees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActorView {
    pub position: Position,
    pub visible: VisibleTiles,
}

/// Owns every actor's authoritative position and all in-flight movements.
///
/// Progressions are kept in a `BTreeMap`, so a tick always processes actors
/// in ascending id order and identical inputs yield identical event streams.
pub struct MovementProgressionService<V, S> {
    cell_duration_ms: u32,
    vision: V,
    sink: S,
    actors: BTreeMap<ActorId, ActorView>,
    progressions: BTreeMap<ActorId, MovementProgression>,
}

impl<V, S> MovementProgressionService<V, S>
where
    V: VisionCalculator,
    S: EventSink,
{
    pub fn new(config: &CoreConfig, vision: V, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            cell_duration_ms: config.cell_duration_ms,
            vision,
            sink,
            actors: BTreeMap::new(),
            progressions: BTreeMap::new(),
        })
    }

    pub fn cell_duration_ms(&self) -> u32 {
        self.cell_duration_ms
    }

    /// Places a new actor on the grid and computes its initial vision.
    pub fn spawn_actor(&mut self, actor: ActorId, position: Position) -> Result<(), MovementError> {
        if self.actors.contains_key(&actor) {
            return Err(MovementError::ActorAlreadyPresent { actor });
        }
        commit_position(
            &mut self.actors,
            &self.vision,
            &mut self.sink,
            actor,
            position,
        );
        tracing::debug!(%actor, %position, "actor spawned");
        Ok(())
    }

    /// Removes an actor and any movement it had in flight.
    ///
    /// Returns the last authoritative position, or `None` if the actor was
    /// not on the grid.
    pub fn despawn_actor(&mut self, actor: ActorId) -> Option<Position> {
        self.progressions.remove(&actor);
        let view = self.actors.remove(&actor)?;
        tracing::debug!(%actor, position = %view.position, "actor despawned");
        Some(view.position)
    }

    /// Starts walking `path`, replacing any movement already in flight.
    ///
    /// The path must be a contiguous 8-directional walk starting next to the
    /// actor's current cell. A leading cell equal to the current cell is
    /// ignored. Replacing a movement has no side effects: the actor is
    /// already wherever the old progression left it.
    pub fn start_movement<I>(&mut self, actor: ActorId, path: I) -> Result<(), MovementError>
    where
        I: IntoIterator<Item = Position>,
    {
        let current = self
            .actors
            .get(&actor)
            .map(|view| view.position)
            .ok_or(MovementError::UnknownActor { actor })?;

        let remaining = validate_path(actor, current, path)?;
        let cells = remaining.len();

        let progression = MovementProgression::new(actor, current, remaining);
        if self.progressions.insert(actor, progression).is_some() {
            tracing::debug!(%actor, "replaced in-flight movement");
        }

        tracing::debug!(%actor, from = %current, cells, "movement started");
        self.sink.publish(CoreEvent::MovementStarted { actor, cells });
        Ok(())
    }

    /// Stops the actor's movement, leaving it on its current cell.
    ///
    /// Returns the discarded progression, or `None` if the actor was not
    /// moving. Calling it again is a no-op.
    pub fn cancel_movement(&mut self, actor: ActorId) -> Option<MovementProgression> {
        let progression = self.progressions.remove(&actor)?;
        let position = progression.position();

        tracing::debug!(
            %actor,
            %position,
            abandoned = progression.remaining_len(),
            "movement cancelled"
        );
        self.sink
            .publish(CoreEvent::MovementCancelled { actor, position });
        Some(progression)
    }

    /// Feeds `delta_ms` to every active movement and performs all cell
    /// advances it pays for. Returns the number of cells entered.
    ///
    /// A large delta advances several cells in one call; leftover time stays
    /// on the progression for the next call.
    pub fn advance_game_time(&mut self, delta_ms: u32) -> usize {
        let mut advanced = 0;
        let mut completed = Vec::new();

        for (&actor, progression) in self.progressions.iter_mut() {
            progression.accumulate(delta_ms);

            while let Some(next) = progression.step(self.cell_duration_ms) {
                commit_position(&mut self.actors, &self.vision, &mut self.sink, actor, next);
                advanced += 1;
            }

            if progression.is_complete() {
                completed.push(actor);
            }
        }

        for actor in completed {
            if let Some(progression) = self.progressions.remove(&actor) {
                let position = progression.position();
                tracing::debug!(%actor, %position, "movement completed");
                self.sink
                    .publish(CoreEvent::MovementCompleted { actor, position });
            }
        }

        advanced
    }

    /// Authoritative position of a registered actor, moving or not.
    pub fn current_position(&self, actor: ActorId) -> Option<Position> {
        self.actors.get(&actor).map(|view| view.position)
    }

    pub fn visible_tiles(&self, actor: ActorId) -> Option<&VisibleTiles> {
        self.actors.get(&actor).map(|view| &view.visible)
    }

    /// Position and vision of an actor, read together.
    pub fn observe(&self, actor: ActorId) -> Option<&ActorView> {
        self.actors.get(&actor)
    }

    pub fn progression(&self, actor: ActorId) -> Option<&MovementProgression> {
        self.progressions.get(&actor)
    }

    pub fn is_moving(&self, actor: ActorId) -> bool {
        self.progressions.contains_key(&actor)
    }

    pub fn active_movements(&self) -> usize {
        self.progressions.len()
    }

    /// Registered actors in ascending id order.
    pub fn actors(&self) -> impl Iterator<Item = (ActorId, &ActorView)> {
        self.actors.iter().map(|(&id, view)| (id, view))
    }

    pub fn vision(&self) -> &V {
        &self.vision
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Movements in flight, in ascending actor order.
    pub fn movement_snapshots(&self) -> Vec<MovementSnapshot> {
        self.progressions
            .values()
            .map(MovementProgression::snapshot)
            .collect()
    }

    /// Reinstates a saved movement for an actor already placed on the grid.
    ///
    /// The remaining path is validated exactly like a fresh command, so a
    /// corrupted save is rejected instead of teleporting the actor later.
    pub fn restore_movement(&mut self, snapshot: MovementSnapshot) -> Result<(), MovementError> {
        let actor = snapshot.actor;
        let current = self
            .current_position(actor)
            .ok_or(MovementError::UnknownActor { actor })?;
        let remaining = validate_path(actor, current, snapshot.remaining)?;

        let progression =
            MovementProgression::new(actor, current, remaining).with_elapsed(snapshot.elapsed_ms);
        self.progressions.insert(actor, progression);
        Ok(())
    }
}

fn validate_path<I>(
    actor: ActorId,
    current: Position,
    path: I,
) -> Result<VecDeque<Position>, MovementError>
where
    I: IntoIterator<Item = Position>,
{
    let mut cells: VecDeque<Position> = path.into_iter().collect();
    if cells.front() == Some(&current) {
        cells.pop_front();
    }
    if cells.is_empty() {
        return Err(MovementError::EmptyPath { actor });
    }

    let mut previous = current;
    for (index, &cell) in cells.iter().enumerate() {
        if !previous.is_adjacent(cell) {
            return Err(MovementError::DisconnectedPath {
                actor,
                index,
                from: previous,
                to: cell,
            });
        }
        previous = cell;
    }

    Ok(cells)
}

/// Moves `actor` to `position`: vision, state and notification as one step.
fn commit_position<V, S>(
    actors: &mut BTreeMap<ActorId, ActorView>,
    vision: &V,
    sink: &mut S,
    actor: ActorId,
    position: Position,
) where
    V: VisionCalculator,
    S: EventSink,
{
    let visible = vision.compute(position);
    actors.insert(actor, ActorView { position, visible });
    tracing::trace!(%actor, %position, "position committed");
    sink.publish(CoreEvent::PositionChanged { actor, position });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::RadiusVision;

    type TestService = MovementProgressionService<RadiusVision, Vec<CoreEvent>>;

    const HERO: ActorId = ActorId(1);

    fn new_service() -> TestService {
        MovementProgressionService::new(
            &CoreConfig::with_cell_duration(200),
            RadiusVision::new(2),
            Vec::new(),
        )
        .unwrap()
    }

    fn cells(coords: &[(i32, i32)]) -> Vec<Position> {
        coords.iter().copied().map(Position::from).collect()
    }

    fn position_changes(events: &[CoreEvent]) -> Vec<(ActorId, Position)> {
        events
            .iter()
            .filter_map(|event| match event {
                CoreEvent::PositionChanged { actor, position } => Some((*actor, *position)),
                _ => None,
            })
            .collect()
    }

    fn spawned_hero() -> TestService {
        let mut service = new_service();
        service.spawn_actor(HERO, Position::ORIGIN).unwrap();
        service.sink_mut().clear();
        service
    }

    #[test]
    fn walks_the_example_path() {
        let mut service = spawned_hero();
        service
            .start_movement(HERO, cells(&[(1, 0), (2, 0), (3, 0)]))
            .unwrap();

        assert_eq!(service.advance_game_time(250), 1);
        assert_eq!(service.current_position(HERO), Some(Position::new(1, 0)));
        assert_eq!(service.progression(HERO).unwrap().elapsed_ms(), 50);
        assert_eq!(position_changes(service.sink()).len(), 1);

        service.sink_mut().clear();
        assert_eq!(service.advance_game_time(450), 2);
        assert_eq!(service.current_position(HERO), Some(Position::new(3, 0)));
        assert_eq!(
            position_changes(service.sink()),
            vec![(HERO, Position::new(2, 0)), (HERO, Position::new(3, 0))]
        );
        assert!(!service.is_moving(HERO));
        assert_eq!(
            service.sink().last(),
            Some(&CoreEvent::MovementCompleted {
                actor: HERO,
                position: Position::new(3, 0)
            })
        );
    }

    #[test]
    fn one_large_delta_equals_many_small_ones() {
        let path = cells(&[(1, 0), (2, 0), (3, 0), (4, 0)]);

        let mut batched = spawned_hero();
        batched.start_movement(HERO, path.clone()).unwrap();
        batched.advance_game_time(500);

        let mut stepped = spawned_hero();
        stepped.start_movement(HERO, path).unwrap();
        for _ in 0..5 {
            stepped.advance_game_time(100);
        }

        assert_eq!(batched.current_position(HERO), Some(Position::new(2, 0)));
        assert_eq!(batched.progression(HERO), stepped.progression(HERO));
        assert_eq!(batched.progression(HERO).unwrap().elapsed_ms(), 100);
        assert_eq!(
            position_changes(batched.sink()),
            position_changes(stepped.sink())
        );
    }

    #[test]
    fn cancel_is_idempotent_and_keeps_position() {
        let mut service = spawned_hero();
        service
            .start_movement(HERO, cells(&[(1, 0), (2, 0), (3, 0)]))
            .unwrap();
        service.advance_game_time(200);

        let cancelled = service.cancel_movement(HERO);
        assert_eq!(cancelled.map(|p| p.remaining_len()), Some(2));
        assert_eq!(service.current_position(HERO), Some(Position::new(1, 0)));

        assert!(service.cancel_movement(HERO).is_none());
        assert_eq!(service.current_position(HERO), Some(Position::new(1, 0)));

        service.advance_game_time(1000);
        assert_eq!(service.current_position(HERO), Some(Position::new(1, 0)));

        let cancels = service
            .sink()
            .iter()
            .filter(|event| matches!(event, CoreEvent::MovementCancelled { .. }))
            .count();
        assert_eq!(cancels, 1);
    }

    #[test]
    fn cancel_without_movement_is_a_no_op() {
        let mut service = spawned_hero();
        assert!(service.cancel_movement(HERO).is_none());
        assert!(service.cancel_movement(ActorId(99)).is_none());
        assert!(service.sink().is_empty());
    }

    #[test]
    fn new_command_replaces_old_from_current_cell() {
        let mut service = spawned_hero();
        service
            .start_movement(HERO, cells(&[(1, 0), (2, 0), (3, 0)]))
            .unwrap();
        service.advance_game_time(300);

        service
            .start_movement(HERO, cells(&[(1, 1), (1, 2)]))
            .unwrap();
        let progression = service.progression(HERO).unwrap();
        assert_eq!(progression.elapsed_ms(), 0);
        assert_eq!(progression.position(), Position::new(1, 0));

        service.advance_game_time(400);
        assert_eq!(service.current_position(HERO), Some(Position::new(1, 2)));
    }

    #[test]
    fn leading_origin_cell_is_skipped() {
        let mut service = spawned_hero();
        service
            .start_movement(HERO, cells(&[(0, 0), (1, 1)]))
            .unwrap();
        assert_eq!(service.progression(HERO).unwrap().remaining_len(), 1);
    }

    #[test]
    fn rejects_invalid_paths() {
        let mut service = spawned_hero();

        assert_eq!(
            service.start_movement(HERO, Vec::new()),
            Err(MovementError::EmptyPath { actor: HERO })
        );
        assert_eq!(
            service.start_movement(HERO, cells(&[(0, 0)])),
            Err(MovementError::EmptyPath { actor: HERO })
        );
        assert_eq!(
            service.start_movement(HERO, cells(&[(1, 0), (3, 0)])),
            Err(MovementError::DisconnectedPath {
                actor: HERO,
                index: 1,
                from: Position::new(1, 0),
                to: Position::new(3, 0),
            })
        );
        assert_eq!(
            service.start_movement(ActorId(5), cells(&[(1, 0)])),
            Err(MovementError::UnknownActor { actor: ActorId(5) })
        );
        assert!(!service.is_moving(HERO));
    }

    #[test]
    fn failed_command_keeps_previous_movement() {
        let mut service = spawned_hero();
        service.start_movement(HERO, cells(&[(1, 0)])).unwrap();

        assert!(service.start_movement(HERO, cells(&[(5, 5)])).is_err());
        assert!(service.is_moving(HERO));
    }

    #[test]
    fn vision_always_matches_position() {
        let mut service = spawned_hero();
        service.spawn_actor(ActorId(2), Position::new(5, 5)).unwrap();
        service
            .start_movement(HERO, cells(&[(1, 0), (2, 1), (3, 2)]))
            .unwrap();
        service
            .start_movement(ActorId(2), cells(&[(4, 5), (3, 5)]))
            .unwrap();

        for _ in 0..8 {
            service.advance_game_time(70);
            for (_, view) in service.actors() {
                assert_eq!(view.visible, service.vision().compute(view.position));
            }
        }
    }

    #[test]
    fn actors_advance_in_ascending_id_order() {
        let mut service = new_service();
        service.spawn_actor(ActorId(9), Position::new(10, 0)).unwrap();
        service.spawn_actor(ActorId(2), Position::new(0, 0)).unwrap();
        service
            .start_movement(ActorId(9), cells(&[(11, 0)]))
            .unwrap();
        service.start_movement(ActorId(2), cells(&[(1, 0)])).unwrap();
        service.sink_mut().clear();

        service.advance_game_time(200);
        let order: Vec<_> = position_changes(service.sink())
            .into_iter()
            .map(|(actor, _)| actor)
            .collect();
        assert_eq!(order, vec![ActorId(2), ActorId(9)]);
    }

    #[test]
    fn spawn_publishes_initial_position_and_rejects_duplicates() {
        let mut service = new_service();
        service.spawn_actor(HERO, Position::new(2, 3)).unwrap();

        assert_eq!(
            position_changes(service.sink()),
            vec![(HERO, Position::new(2, 3))]
        );
        assert!(service.visible_tiles(HERO).unwrap().contains(&Position::new(2, 3)));
        assert_eq!(
            service.spawn_actor(HERO, Position::ORIGIN),
            Err(MovementError::ActorAlreadyPresent { actor: HERO })
        );
    }

    #[test]
    fn actor_at_the_edge_of_coordinate_space_walks_and_sees() {
        let mut service = new_service();
        let edge = Position::new(i32::MAX, 0);
        service.spawn_actor(HERO, edge).unwrap();
        assert_eq!(service.visible_tiles(HERO).unwrap().len(), 15);

        service
            .start_movement(HERO, cells(&[(i32::MAX - 1, 1)]))
            .unwrap();
        service.advance_game_time(200);
        assert_eq!(
            service.current_position(HERO),
            Some(Position::new(i32::MAX - 1, 1))
        );
        assert!(service.visible_tiles(HERO).unwrap().contains(&edge));
    }

    #[test]
    fn despawn_drops_movement() {
        let mut service = spawned_hero();
        service.start_movement(HERO, cells(&[(1, 0)])).unwrap();

        assert_eq!(service.despawn_actor(HERO), Some(Position::ORIGIN));
        assert!(!service.is_moving(HERO));
        assert_eq!(service.current_position(HERO), None);
        assert_eq!(service.despawn_actor(HERO), None);
    }

    #[test]
    fn snapshot_restores_movement() {
        let mut service = spawned_hero();
        service
            .start_movement(HERO, cells(&[(1, 0), (2, 0), (3, 0)]))
            .unwrap();
        service.advance_game_time(260);
        let saved = service.movement_snapshots();

        let mut restored = new_service();
        restored.spawn_actor(HERO, Position::new(1, 0)).unwrap();
        for snapshot in saved {
            restored.restore_movement(snapshot).unwrap();
        }

        assert_eq!(restored.progression(HERO), service.progression(HERO));
        service.advance_game_time(340);
        restored.advance_game_time(340);
        assert_eq!(
            restored.current_position(HERO),
            service.current_position(HERO)
        );
    }

    #[test]
    fn zero_cell_duration_is_rejected() {
        let result = MovementProgressionService::new(
            &CoreConfig::with_cell_duration(0),
            RadiusVision::new(1),
            Vec::<CoreEvent>::new(),
        );
        assert!(result.is_err());
    }
}
