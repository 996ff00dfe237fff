use std::collections::VecDeque;

use crate::state::{ActorId, Position};

/// In-flight traversal of a path by one actor.
///
/// Holds only the cell the actor currently occupies, the cells still ahead
/// and the time already spent in the current cell. There is deliberately no
/// destination: game rules only ever look at the current cell, and stopping
/// a movement means dropping this value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovementProgression {
    actor: ActorId,
    position: Position,
    remaining: VecDeque<Position>,
    elapsed_ms: u32,
}

/// Persisted form of a [`MovementProgression`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementSnapshot {
    pub actor: ActorId,
    pub remaining: Vec<Position>,
    pub elapsed_ms: u32,
}

impl MovementProgression {
    /// `remaining` must already be validated as a contiguous walk from `position`.
    pub(crate) fn new(actor: ActorId, position: Position, remaining: VecDeque<Position>) -> Self {
        Self {
            actor,
            position,
            remaining,
            elapsed_ms: 0,
        }
    }

    pub(crate) fn with_elapsed(mut self, elapsed_ms: u32) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// Cell the actor currently occupies.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Cells still to traverse, nearest first.
    pub fn remaining(&self) -> impl ExactSizeIterator<Item = &Position> {
        self.remaining.iter()
    }

    pub fn remaining_len(&self) -> usize {
        self.remaining.len()
    }

    /// Milliseconds accumulated towards the next cell.
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty()
    }

    pub(crate) fn accumulate(&mut self, delta_ms: u32) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
    }

    /// Consumes one cell if enough time has accumulated.
    pub(crate) fn step(&mut self, cell_duration_ms: u32) -> Option<Position> {
        if self.elapsed_ms < cell_duration_ms {
            return None;
        }
        let next = self.remaining.pop_front()?;
        debug_assert!(
            self.position.is_adjacent(next),
            "progression for {} stepped from {} to non-adjacent {}",
            self.actor,
            self.position,
            next
        );

        self.elapsed_ms -= cell_duration_ms;
        self.position = next;
        Some(next)
    }

    pub fn snapshot(&self) -> MovementSnapshot {
        MovementSnapshot {
            actor: self.actor,
            remaining: self.remaining.iter().copied().collect(),
            elapsed_ms: self.elapsed_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(cells: &[(i32, i32)]) -> VecDeque<Position> {
        cells.iter().copied().map(Position::from).collect()
    }

    #[test]
    fn steps_only_after_full_cell_duration() {
        let mut progression =
            MovementProgression::new(ActorId(1), Position::ORIGIN, walk(&[(1, 0), (2, 0)]));

        progression.accumulate(150);
        assert_eq!(progression.step(200), None);

        progression.accumulate(100);
        assert_eq!(progression.step(200), Some(Position::new(1, 0)));
        assert_eq!(progression.elapsed_ms(), 50);
        assert_eq!(progression.position(), Position::new(1, 0));
        assert_eq!(progression.remaining_len(), 1);
    }

    #[test]
    fn keeps_elapsed_when_path_is_exhausted() {
        let mut progression =
            MovementProgression::new(ActorId(1), Position::ORIGIN, walk(&[(1, 1)]));
        progression.accumulate(500);

        assert_eq!(progression.step(200), Some(Position::new(1, 1)));
        assert_eq!(progression.step(200), None);
        assert!(progression.is_complete());
        assert_eq!(progression.elapsed_ms(), 300);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "non-adjacent")]
    fn non_adjacent_step_panics_in_debug() {
        let mut progression =
            MovementProgression::new(ActorId(1), Position::ORIGIN, walk(&[(3, 0)]));
        progression.accumulate(200);
        progression.step(200);
    }
}
