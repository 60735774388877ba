//! The HUD event feed and the scheduled-respawn queue.

use bevy::prelude::*;
use std::collections::VecDeque;

/// Most recent messages kept for display.
pub const FEED_CAPACITY: usize = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct FeedMessage {
    pub text: String,
    /// Seconds since the message was posted (renderer fades on this).
    pub age: f32,
}

/// Rolling kill-feed style message list, newest first.
#[derive(Resource, Default)]
pub struct EventFeed {
    messages: VecDeque<FeedMessage>,
}

impl EventFeed {
    pub fn push(&mut self, text: impl Into<String>) {
        self.messages.push_front(FeedMessage {
            text: text.into(),
            age: 0.0,
        });
        self.messages.truncate(FEED_CAPACITY);
    }

    pub fn tick(&mut self, dt: f32) {
        for message in &mut self.messages {
            message.age += dt;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PendingRespawn {
    entity: Entity,
    due_at: f32,
}

/// Dead NPCs waiting out their respawn delay. Drained synchronously at a
/// fixed point in the tick; there are no out-of-band timers.
#[derive(Resource, Default)]
pub struct RespawnQueue {
    pending: Vec<PendingRespawn>,
}

impl RespawnQueue {
    pub fn schedule(&mut self, entity: Entity, due_at: f32) {
        self.pending.push(PendingRespawn { entity, due_at });
    }

    /// Remove and return every entry due at or before `now`.
    pub fn drain_due(&mut self, now: f32) -> Vec<Entity> {
        let mut due = Vec::new();
        self.pending.retain(|entry| {
            if entry.due_at <= now {
                due.push(entry.entity);
                false
            } else {
                true
            }
        });
        due
    }

    /// Drop a scheduled entry (its entity was despawned early).
    pub fn cancel(&mut self, entity: Entity) {
        self.pending.retain(|entry| entry.entity != entity);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
