//! Time-ordered turn queue.

use crate::state::ActorId;
use crate::time::TimeUnit;

/// An actor waiting for its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduledTurn {
    pub actor: ActorId,
    pub next_turn: TimeUnit,
    /// Insertion order, used to break ties between equal `next_turn` values.
    pub sequence: u64,
}

impl ScheduledTurn {
    fn order_key(&self) -> (TimeUnit, u64) {
        (self.next_turn, self.sequence)
    }
}

/// Persisted form of a [`Scheduler`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchedulerSnapshot {
    pub entries: Vec<ScheduledTurn>,
    pub next_sequence: u64,
}

/// Queue of pending turns, earliest `next_turn` first.
///
/// Entries with equal `next_turn` act in the order they were scheduled.
/// The same actor may hold several entries: de-duplication is the caller's
/// decision, so rescheduling mid-resolution never merges or drops a turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scheduler {
    entries: Vec<ScheduledTurn>,
    next_sequence: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a turn for `actor` at `next_turn`, after every entry that
    /// sorts before or equal to it.
    pub fn schedule(&mut self, actor: ActorId, next_turn: TimeUnit) -> ScheduledTurn {
        let entry = ScheduledTurn {
            actor,
            next_turn,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;

        let index = self
            .entries
            .partition_point(|existing| existing.order_key() <= entry.order_key());
        self.entries.insert(index, entry);

        tracing::trace!(%actor, %next_turn, sequence = entry.sequence, "scheduled turn");
        entry
    }

    /// Removes and returns the earliest entry, or `None` when nothing is pending.
    pub fn pop_next(&mut self) -> Option<ScheduledTurn> {
        if self.entries.is_empty() {
            return None;
        }
        Some(self.entries.remove(0))
    }

    /// Earliest entry without removing it.
    pub fn peek(&self) -> Option<&ScheduledTurn> {
        self.entries.first()
    }

    /// Removes every entry belonging to `actor`. Returns how many were removed.
    pub fn remove(&mut self, actor: ActorId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.actor != actor);
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!(%actor, removed, "removed actor from schedule");
        }
        removed
    }

    pub fn contains(&self, actor: ActorId) -> bool {
        self.entries.iter().any(|entry| entry.actor == actor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pending entries in the order they will be popped.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduledTurn> {
        self.entries.iter()
    }

    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            entries: self.entries.clone(),
            next_sequence: self.next_sequence,
        }
    }

    /// Rebuilds a scheduler from a snapshot.
    ///
    /// Entries are re-sorted so a hand-edited save cannot break ordering, and
    /// the sequence counter is moved past every restored entry.
    pub fn restore(snapshot: SchedulerSnapshot) -> Self {
        let mut entries = snapshot.entries;
        entries.sort_by_key(ScheduledTurn::order_key);
        let next_sequence = entries
            .iter()
            .map(|entry| entry.sequence + 1)
            .max()
            .unwrap_or(0)
            .max(snapshot.next_sequence);

        Self {
            entries,
            next_sequence,
        }
    }
}
