//! Scripted skirmish.
//!
//! Three combatants in a walled arena. Everyone starts walking and is put
//! on the turn queue; partway through, the player "presses escape",
//! abandons its route and retreats south instead.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use combat_core::{
    ActorId, ActorModifiers, AdvanceReport, CoreEvent, LineOfSightVision, Position, StaticGrid,
    TimeCostError, TimeUnit, TurnHandler, TurnOutcome, VisionCalculator,
};
use combat_runtime::CombatSession;

pub const ARENA: &[&str] = &[
    "############",
    "#..........#",
    "#...##.....#",
    "#...##.....#",
    "#..........#",
    "############",
];

pub const GOBLIN: ActorId = ActorId(1);
pub const ARCHER: ActorId = ActorId(2);

/// Base cost of a generic action.
pub const ACTION_COST_MS: i64 = 1000;

/// Tick at which the player abandons its route.
pub const ESCAPE_TICK: u64 = 4;

/// Last row the player retreats to.
const RETREAT_ROW: i32 = 4;

/// Frame times a real host might produce: uneven but repeatable.
const FRAME_JITTER_MS: [u32; 6] = [16, 17, 33, 16, 50, 8];

pub struct Combatant {
    pub id: ActorId,
    pub name: &'static str,
    pub start: Position,
    pub modifiers: ActorModifiers,
    pub route: Vec<Position>,
}

/// The fixed line-up of the skirmish.
pub fn roster() -> Vec<Combatant> {
    vec![
        Combatant {
            id: ActorId::PLAYER,
            name: "player",
            start: Position::new(1, 1),
            modifiers: ActorModifiers::new(70, 2),
            route: (2..=10).map(|x| Position::new(x, 1)).collect(),
        },
        Combatant {
            id: GOBLIN,
            name: "goblin",
            start: Position::new(10, 4),
            modifiers: ActorModifiers::new(50, 0),
            route: vec![
                Position::new(9, 4),
                Position::new(8, 3),
                Position::new(7, 2),
                Position::new(6, 1),
            ],
        },
        Combatant {
            id: ARCHER,
            name: "archer",
            start: Position::new(10, 1),
            modifiers: ActorModifiers::new(40, 8),
            route: Vec::new(),
        },
    ]
}

pub fn arena_vision(radius: u32) -> LineOfSightVision<StaticGrid> {
    LineOfSightVision::new(StaticGrid::from_rows(ARENA), radius)
}

/// Cells straight south of `from` down to the retreat row.
pub fn retreat_path(from: Position) -> Vec<Position> {
    (from.y + 1..=RETREAT_ROW)
        .map(|y| Position::new(from.x, y))
        .collect()
}

/// Repeating jitter pattern, `frames` entries long.
pub fn frame_deltas(frames: usize) -> impl Iterator<Item = u32> {
    FRAME_JITTER_MS.into_iter().cycle().take(frames)
}

/// AI for every combatant: act, then wait out the action's cost.
///
/// Each actor retires after `turn_limit` turns so the encounter ends.
pub struct SkirmishAi {
    modifiers: BTreeMap<ActorId, ActorModifiers>,
    taken: BTreeMap<ActorId, u32>,
    base_cost: TimeUnit,
    turn_limit: u32,
}

impl SkirmishAi {
    pub fn new(base_cost: TimeUnit, turn_limit: u32) -> Self {
        Self {
            modifiers: BTreeMap::new(),
            taken: BTreeMap::new(),
            base_cost,
            turn_limit,
        }
    }

    pub fn register(&mut self, actor: ActorId, modifiers: ActorModifiers) {
        self.modifiers.insert(actor, modifiers);
    }

    pub fn turns_taken(&self, actor: ActorId) -> u32 {
        self.taken.get(&actor).copied().unwrap_or(0)
    }

    fn next_turn(&self, actor: ActorId, at: TimeUnit) -> Result<TimeUnit, TimeCostError> {
        let modifiers = self
            .modifiers
            .get(&actor)
            .copied()
            .unwrap_or(ActorModifiers::NEUTRAL);
        let duration = modifiers.action_time(self.base_cost)?;
        at.checked_add(duration).map_err(TimeCostError::Overflow)
    }
}

impl TurnHandler for SkirmishAi {
    fn take_turn(&mut self, actor: ActorId, at: TimeUnit) -> TurnOutcome {
        let taken = self.taken.entry(actor).or_default();
        *taken += 1;
        if *taken >= self.turn_limit {
            return TurnOutcome::Retire;
        }

        match self.next_turn(actor, at) {
            Ok(next) => TurnOutcome::Reschedule(next),
            Err(error) => {
                // Out of combat time; nothing left to schedule.
                tracing::warn!(%actor, %at, %error, "cannot schedule next turn");
                TurnOutcome::Retire
            }
        }
    }
}

/// Totals over a whole run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkirmishSummary {
    pub frames: usize,
    pub ticks: u64,
    pub cells_advanced: usize,
    pub turns_resolved: usize,
    pub escaped_at: Option<Position>,
    pub positions: Vec<(ActorId, Position)>,
}

impl SkirmishSummary {
    fn absorb(&mut self, report: AdvanceReport) {
        self.frames += 1;
        self.ticks += u64::from(report.ticks);
        self.cells_advanced += report.cells_advanced;
        self.turns_resolved += report.turns_resolved;
    }
}

/// Places the roster, sends everyone on their way and queues first turns.
pub fn setup<V: VisionCalculator>(
    session: &mut CombatSession<V>,
    turn_limit: u32,
) -> Result<SkirmishAi> {
    let base_cost = TimeUnit::new(ACTION_COST_MS).context("invalid base action cost")?;
    let mut ai = SkirmishAi::new(base_cost, turn_limit);

    for combatant in roster() {
        session
            .spawn(combatant.id, combatant.start)
            .with_context(|| format!("failed to spawn {}", combatant.name))?;
        if !combatant.route.is_empty() {
            session
                .command_move(combatant.id, combatant.route)
                .with_context(|| format!("{} cannot start moving", combatant.name))?;
        }
        session
            .schedule_action(combatant.id, base_cost, combatant.modifiers)
            .with_context(|| format!("failed to schedule {}", combatant.name))?;
        ai.register(combatant.id, combatant.modifiers);
    }

    Ok(ai)
}

/// Drives the session through `deltas`, one host frame each.
///
/// `on_frame` runs after every frame, typically to drain event receivers.
pub fn run<V, I, F>(
    session: &mut CombatSession<V>,
    ai: &mut SkirmishAi,
    deltas: I,
    mut on_frame: F,
) -> Result<SkirmishSummary>
where
    V: VisionCalculator,
    I: IntoIterator<Item = u32>,
    F: FnMut(&CombatSession<V>),
{
    let mut summary = SkirmishSummary::default();

    for delta in deltas {
        if summary.escaped_at.is_none() && session.state().tick() >= ESCAPE_TICK {
            summary.escaped_at = Some(escape(session)?);
        }

        summary.absorb(session.advance(delta, ai));
        on_frame(session);
    }

    summary.positions = session.snapshot().actors;
    Ok(summary)
}

/// Player cancels its route and heads south from wherever it stands.
fn escape<V: VisionCalculator>(session: &mut CombatSession<V>) -> Result<Position> {
    let player = ActorId::PLAYER;
    session.cancel_move(player);

    let here = session
        .position(player)
        .context("player is not on the grid")?;
    let path = retreat_path(here);
    tracing::info!(%here, cells = path.len(), "player retreats");
    if !path.is_empty() {
        session.command_move(player, path)?;
    }
    Ok(here)
}

/// One transcript line for an event.
pub fn describe(event: &CoreEvent) -> String {
    match event {
        CoreEvent::PositionChanged { actor, position } => format!("{actor} at {position}"),
        CoreEvent::MovementStarted { actor, cells } => format!("{actor} sets off ({cells} cells)"),
        CoreEvent::MovementCompleted { actor, position } => {
            format!("{actor} arrives at {position}")
        }
        CoreEvent::MovementCancelled { actor, position } => format!("{actor} stops at {position}"),
        CoreEvent::TurnStarted { actor, at } => format!("{actor} acts at {at}"),
        CoreEvent::TickElapsed { tick } => format!("tick {tick}"),
    }
}
