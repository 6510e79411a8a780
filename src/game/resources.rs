//! Game resources (session state injected into systems).

use bevy::prelude::*;

use super::Direction;

/// Game phase enum to track which state the game is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Menu,
    /// Round requested, waiting for the snake to be rebuilt.
    Starting,
    Playing,
    GameOver,
}

/// Main game state resource. Segment 0 is the head.
#[derive(Resource, Default)]
pub struct GameState {
    pub snake_segments: Vec<Entity>,
    pub phase: GamePhase,
}

impl GameState {
    pub fn head(&self) -> Option<Entity> {
        self.snake_segments.first().copied()
    }
}

/// Holds the last accepted turn until the next tick applies it.
#[derive(Resource, Default, Debug)]
pub struct DirectionLatch {
    pending: Option<Direction>,
}

impl DirectionLatch {
    /// Latches `intent` if it turns off the `current` travel axis.
    /// Reversals and same-axis presses are ignored.
    pub fn offer(&mut self, current: Direction, intent: Direction) -> bool {
        if current.is_perpendicular_to(intent) {
            self.pending = Some(intent);
            true
        } else {
            false
        }
    }

    pub fn take(&mut self) -> Option<Direction> {
        self.pending.take()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

/// Gates snake ticks on a monotonically advancing deadline.
#[derive(Resource, Default, Debug)]
pub struct TickClock {
    next_tick: f64,
}

impl TickClock {
    /// Returns true when a tick is due at `now`, and schedules the next one
    /// `interval` seconds later.
    pub fn try_tick(&mut self, now: f64, interval: f64) -> bool {
        if now < self.next_tick {
            return false;
        }
        self.next_tick = now + interval;
        true
    }

    /// Makes the next tick eligible at `now`.
    pub fn reset(&mut self, now: f64) {
        self.next_tick = now;
    }
}

/// Self-collision is ignored while disarmed, right after a respawn.
#[derive(Resource, Debug)]
pub struct CollisionGuard {
    pub armed: bool,
}

impl Default for CollisionGuard {
    fn default() -> Self {
        CollisionGuard { armed: true }
    }
}

/// Current and best score.
#[derive(Resource, Default, Debug, Clone, PartialEq, Eq)]
pub struct Scoreboard {
    score: u32,
    high_score: u32,
}

impl Scoreboard {
    pub fn with_high_score(high_score: u32) -> Self {
        Scoreboard {
            score: 0,
            high_score,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Adds `points`. Returns true when this set a new high score.
    pub fn add_score(&mut self, points: u32) -> bool {
        self.score = self.score.saturating_add(points);
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }

    pub fn reset_score(&mut self) {
        self.score = 0;
    }
}

/// Whether the Options view of the main menu is open.
#[derive(Resource, Default, Debug)]
pub struct MenuState {
    pub options_open: bool,
}

/// Resource for camera shake effect.
#[derive(Resource)]
pub struct CameraShake {
    pub timer: Timer,
    pub intensity: f32,
}

impl Default for CameraShake {
    fn default() -> Self {
        CameraShake {
            timer: Timer::from_seconds(0.0, TimerMode::Once),
            intensity: 0.0,
        }
    }
}
