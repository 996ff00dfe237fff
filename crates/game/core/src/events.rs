//! Outbound notifications.
//!
//! The core publishes [`CoreEvent`]s synchronously to an [`EventSink`] handed
//! to it at construction. The sink is write-only from the core's point of
//! view; presentation layers drive visual state from it and never feed back.

use crate::state::{ActorId, Position};
use crate::time::TimeUnit;

/// Notification emitted by the simulation.
#[derive(Clone, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CoreEvent {
    /// An actor's authoritative position changed and its vision was recomputed.
    PositionChanged { actor: ActorId, position: Position },
    /// A movement command was accepted.
    MovementStarted { actor: ActorId, cells: usize },
    /// The last cell of a path was reached.
    MovementCompleted { actor: ActorId, position: Position },
    /// A movement was interrupted; the actor stays where it is.
    MovementCancelled { actor: ActorId, position: Position },
    /// A scheduled actor committed its turn.
    TurnStarted { actor: ActorId, at: TimeUnit },
    /// A fixed tick finished processing.
    TickElapsed { tick: u64 },
}

impl CoreEvent {
    /// Stable snake_case label, used as a log field.
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    /// Actor the event concerns, if any.
    pub fn actor(&self) -> Option<ActorId> {
        match self {
            Self::PositionChanged { actor, .. }
            | Self::MovementStarted { actor, .. }
            | Self::MovementCompleted { actor, .. }
            | Self::MovementCancelled { actor, .. }
            | Self::TurnStarted { actor, .. } => Some(*actor),
            Self::TickElapsed { .. } => None,
        }
    }
}

/// Receiver of core notifications.
pub trait EventSink {
    fn publish(&mut self, event: CoreEvent);
}

/// Records every event in order. Handy for tests and replays.
impl EventSink for Vec<CoreEvent> {
    fn publish(&mut self, event: CoreEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn publish(&mut self, event: CoreEvent) {
        (**self).publish(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn publish(&mut self, event: CoreEvent) {
        (**self).publish(event);
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _event: CoreEvent) {}
}

/// Forwards events to a closure.
pub struct CallbackSink<F>(pub F);

impl<F: FnMut(CoreEvent)> EventSink for CallbackSink<F> {
    fn publish(&mut self, event: CoreEvent) {
        (self.0)(event);
    }
}
