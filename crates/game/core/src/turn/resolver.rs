use super::{ScheduledTurn, Scheduler};
use crate::events::{CoreEvent, EventSink};
use crate::state::ActorId;
use crate::time::TimeUnit;

/// Decision returned by a [`TurnHandler`] for the actor at the front of the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Not ready to commit (waiting on input, still walking). The entry stays put.
    Waiting,
    /// Turn taken; act again at the given absolute time.
    Reschedule(TimeUnit),
    /// Turn taken; do not schedule the actor again.
    Retire,
}

/// Decides what happens when an actor's turn comes up.
///
/// The scheduler only decides *when* an actor acts; choosing *what* it does
/// belongs to the handler (player input, AI).
pub trait TurnHandler {
    fn take_turn(&mut self, actor: ActorId, at: TimeUnit) -> TurnOutcome;
}

impl<F> TurnHandler for F
where
    F: FnMut(ActorId, TimeUnit) -> TurnOutcome,
{
    fn take_turn(&mut self, actor: ActorId, at: TimeUnit) -> TurnOutcome {
        self(actor, at)
    }
}

/// Result of one resolution step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnResolution {
    /// No actor is scheduled.
    Idle,
    /// The front actor has not committed yet.
    Waiting(ActorId),
    /// The front actor took its turn.
    Resolved {
        turn: ScheduledTurn,
        outcome: TurnOutcome,
    },
}

/// Scheduler plus the combat clock it advances.
///
/// The clock is the `next_turn` of the most recently resolved entry; it
/// never moves backwards even if an entry was scheduled in the past.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnResolver {
    scheduler: Scheduler,
    clock: TimeUnit,
}

impl TurnResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(scheduler: Scheduler, clock: TimeUnit) -> Self {
        Self { scheduler, clock }
    }

    pub fn clock(&self) -> TimeUnit {
        self.clock
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    /// Resolves at most one turn.
    pub fn resolve_next<H, S>(&mut self, handler: &mut H, sink: &mut S) -> TurnResolution
    where
        H: TurnHandler + ?Sized,
        S: EventSink + ?Sized,
    {
        let Some(&front) = self.scheduler.peek() else {
            return TurnResolution::Idle;
        };

        let outcome = handler.take_turn(front.actor, front.next_turn);
        if outcome == TurnOutcome::Waiting {
            return TurnResolution::Waiting(front.actor);
        }

        let turn = self.scheduler.pop_next();
        debug_assert_eq!(turn, Some(front), "handler must not reorder the queue");

        self.clock = self.clock.max(front.next_turn);
        sink.publish(CoreEvent::TurnStarted {
            actor: front.actor,
            at: front.next_turn,
        });

        match outcome {
            TurnOutcome::Reschedule(next) => {
                self.scheduler.schedule(front.actor, next);
            }
            TurnOutcome::Retire => {
                tracing::debug!(actor = %front.actor, "actor retired from schedule");
            }
            TurnOutcome::Waiting => unreachable!("handled above"),
        }

        TurnResolution::Resolved {
            turn: front,
            outcome,
        }
    }
}
