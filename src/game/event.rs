//! Tick-scoped event queues.
//!
//! Systems push notifications here instead of calling each other directly;
//! the owning state drains or clears them once per tick. These queues carry
//! outcomes (a respawn happened, the level was won); collision signals
//! travel as transient components through the registry instead.

use glam::Vec2;

use super::entity::Entity;

/// FIFO queue for one event type.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A non-player entity was destroyed by the death stage.
#[derive(Debug, Clone, Copy)]
pub struct DeathEvent {
    pub entity: Entity,
}

/// The player was reset to its respawn point.
#[derive(Debug, Clone, Copy)]
pub struct RespawnEvent {
    pub player: Entity,
    pub position: Vec2,
}

/// A checkpoint was activated for the first time.
#[derive(Debug, Clone, Copy)]
pub struct CheckpointEvent {
    pub checkpoint: Entity,
    pub position: Vec2,
}

/// The final checkpoint was reached.
#[derive(Debug, Clone, Copy)]
pub struct WinEvent {
    pub checkpoint: Entity,
}

/// All event queues, cleared at the start of every tick.
#[derive(Default)]
pub struct Events {
    pub death: EventQueue<DeathEvent>,
    pub respawn: EventQueue<RespawnEvent>,
    pub checkpoint: EventQueue<CheckpointEvent>,
    pub win: EventQueue<WinEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_all(&mut self) {
        self.death.clear();
        self.respawn.clear();
        self.checkpoint.clear();
        self.win.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_and_drain() {
        let mut queue: EventQueue<u32> = EventQueue::new();
        queue.send(1);
        queue.send(2);
        assert_eq!(queue.len(), 2);

        let drained: Vec<u32> = queue.drain().collect();
        assert_eq!(drained, vec![1, 2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn clear_all_empties_every_queue() {
        let mut events = Events::new();
        events.death.send(DeathEvent {
            entity: Entity::NULL,
        });
        events.win.send(WinEvent {
            checkpoint: Entity::NULL,
        });

        events.clear_all();
        assert!(events.death.is_empty());
        assert!(events.win.is_empty());
    }
}
