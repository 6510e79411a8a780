//! One-shot actions scheduled against a deadline and polled each frame.

use bevy::prelude::*;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeferredAction {
    /// Leave the menu and begin the first round.
    EnterGame,
    /// Rebuild the snake for a new round.
    ResetSnake,
    /// End the post-spawn self-collision debounce.
    EnableCollisions,
}

#[derive(Clone, Copy, Debug)]
struct Scheduled {
    due: f32,
    seq: u64,
    action: DeferredAction,
}

#[derive(Resource, Default, Debug)]
pub struct DeferredQueue {
    pending: Vec<Scheduled>,
    next_seq: u64,
}

impl DeferredQueue {
    /// Queues `action` to fire `delay_secs` after `now`.
    pub fn schedule(&mut self, now: f32, delay_secs: f32, action: DeferredAction) {
        self.pending.push(Scheduled {
            due: now + delay_secs.max(0.0),
            seq: self.next_seq,
            action,
        });
        self.next_seq += 1;
    }

    /// Removes and returns every action due at `now`, earliest first.
    /// Actions sharing a deadline come out in scheduling order.
    pub fn drain_due(&mut self, now: f32) -> Vec<DeferredAction> {
        let mut due: Vec<Scheduled> = Vec::new();
        self.pending.retain(|s| {
            if s.due <= now {
                due.push(*s);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|s| s.action).collect()
    }

    pub fn is_pending(&self, action: DeferredAction) -> bool {
        self.pending.iter().any(|s| s.action == action)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
