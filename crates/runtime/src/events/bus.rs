//! Topic-based event bus implementation.

use std::sync::Arc;

use combat_core::{CoreEvent, EventSink};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Position changes and movement lifecycle
    Movement,
    /// Turn resolution
    Turn,
    /// Fixed tick boundaries
    Clock,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Movement, Topic::Turn, Topic::Clock];

    /// Topic an event is routed to.
    pub fn of(event: &CoreEvent) -> Self {
        match event {
            CoreEvent::PositionChanged { .. }
            | CoreEvent::MovementStarted { .. }
            | CoreEvent::MovementCompleted { .. }
            | CoreEvent::MovementCancelled { .. } => Topic::Movement,
            CoreEvent::TurnStarted { .. } => Topic::Turn,
            CoreEvent::TickElapsed { .. } => Topic::Clock,
        }
    }
}

struct Channels {
    movement: broadcast::Sender<CoreEvent>,
    turn: broadcast::Sender<CoreEvent>,
    clock: broadcast::Sender<CoreEvent>,
}

impl Channels {
    fn sender(&self, topic: Topic) -> &broadcast::Sender<CoreEvent> {
        match topic {
            Topic::Movement => &self.movement,
            Topic::Turn => &self.turn,
            Topic::Clock => &self.clock,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing is synchronous and never waits on
/// subscribers, so the simulation can publish from inside a tick.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                movement: broadcast::channel(capacity).0,
                turn: broadcast::channel(capacity).0,
                clock: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: CoreEvent) {
        let topic = Topic::of(&event);
        if self.channels.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<CoreEvent> {
        self.channels.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> Vec<(Topic, broadcast::Receiver<CoreEvent>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapts an [`EventBus`] to the core's [`EventSink`].
#[derive(Clone, Default)]
pub struct BusSink {
    bus: EventBus,
    published: u64,
}

impl BusSink {
    pub fn new(bus: EventBus) -> Self {
        Self { bus, published: 0 }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Events forwarded so far, subscribed to or not.
    pub fn published(&self) -> u64 {
        self.published
    }
}

impl EventSink for BusSink {
    fn publish(&mut self, event: CoreEvent) {
        self.published += 1;
        self.bus.publish(event);
    }
}
