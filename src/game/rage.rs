//! Rage mode: a bar filled by eating, which triggers a timed speed buff.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::GrowthSource;
use super::constants::{
    RAGE_DURATION_SECS, RAGE_HEAD_SCALE, RAGE_INCREMENT, RAGE_SPEED_MULTIPLIER, RAGE_THRESHOLD,
};

/// Slack for accumulated float error, so five 0.2 steps always reach 1.0.
const THRESHOLD_EPSILON: f32 = 1e-4;

/// Tuning for rage mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RageConfig {
    pub threshold: f32,
    /// Bar fill per food eaten while rage is inactive.
    pub increment: f32,
    pub duration_secs: f32,
    pub speed_multiplier: f32,
    pub head_scale: f32,
}

impl Default for RageConfig {
    fn default() -> Self {
        RageConfig {
            threshold: RAGE_THRESHOLD,
            increment: RAGE_INCREMENT,
            duration_secs: RAGE_DURATION_SECS,
            speed_multiplier: RAGE_SPEED_MULTIPLIER,
            head_scale: RAGE_HEAD_SCALE,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RageTransition {
    Activated,
    Deactivated,
}

/// Rage bar and buff state.
///
/// `progress` only grows while inactive and `remaining` only counts down
/// while active.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct RageState {
    progress: f32,
    active: bool,
    remaining: f32,
    increment: f32,
}

impl RageState {
    pub fn new(config: &RageConfig) -> Self {
        RageState {
            progress: 0.0,
            active: false,
            remaining: 0.0,
            increment: config.increment,
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Current bar fill per food; zero while the buff runs.
    pub fn increment(&self) -> f32 {
        self.increment
    }

    /// Body collisions are ignored while the buff runs.
    pub fn is_immune(&self) -> bool {
        self.active
    }

    pub fn speed_multiplier(&self, config: &RageConfig) -> f32 {
        if self.active { config.speed_multiplier } else { 1.0 }
    }

    pub fn head_scale(&self, config: &RageConfig) -> f32 {
        if self.active { config.head_scale } else { 1.0 }
    }

    /// Fraction shown on the rage bar: fill progress, or time left while active.
    pub fn bar_fraction(&self, config: &RageConfig) -> f32 {
        if self.active {
            if config.duration_secs > 0.0 {
                (self.remaining / config.duration_secs).clamp(0.0, 1.0)
            } else {
                0.0
            }
        } else {
            (self.progress / config.threshold.max(f32::EPSILON)).clamp(0.0, 1.0)
        }
    }

    /// Feeds one growth into the bar.
    pub fn on_growth(&mut self, source: GrowthSource, config: &RageConfig) -> Option<RageTransition> {
        if source == GrowthSource::Spawn {
            return None;
        }

        self.progress += self.increment;
        if !self.active && self.progress + THRESHOLD_EPSILON >= config.threshold {
            self.activate(config);
            return Some(RageTransition::Activated);
        }
        None
    }

    /// Counts the buff down by `delta_secs`.
    pub fn tick(&mut self, delta_secs: f32, config: &RageConfig) -> Option<RageTransition> {
        if !self.active {
            return None;
        }

        self.remaining -= delta_secs;
        if self.remaining <= 0.0 {
            self.deactivate(config);
            return Some(RageTransition::Deactivated);
        }
        None
    }

    fn activate(&mut self, config: &RageConfig) {
        self.active = true;
        self.progress = 0.0;
        self.remaining = config.duration_secs;
        self.increment = 0.0;
    }

    fn deactivate(&mut self, config: &RageConfig) {
        self.active = false;
        self.progress = 0.0;
        self.remaining = 0.0;
        self.increment = config.increment;
    }
}

impl Default for RageState {
    fn default() -> Self {
        RageState::new(&RageConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RageConfig {
        RageConfig {
            threshold: 1.0,
            increment: 0.2,
            duration_secs: 10.0,
            speed_multiplier: 2.0,
            head_scale: 1.5,
        }
    }

    #[test]
    fn test_five_pickups_activate_rage() {
        let cfg = config();
        let mut rage = RageState::new(&cfg);

        for i in 1..=4 {
            assert_eq!(rage.on_growth(GrowthSource::Food, &cfg), None);
            assert!((rage.progress() - 0.2 * i as f32).abs() < 1e-5);
            assert!(!rage.is_active());
        }

        assert_eq!(rage.on_growth(GrowthSource::Food, &cfg), Some(RageTransition::Activated));
        assert!(rage.is_active());
        assert_eq!(rage.progress(), 0.0);
        assert_eq!(rage.remaining(), 10.0);
        assert_eq!(rage.speed_multiplier(&cfg), 2.0);
        assert_eq!(rage.head_scale(&cfg), 1.5);
        assert!(rage.is_immune());
    }

    #[test]
    fn test_no_accrual_while_active() {
        let cfg = config();
        let mut rage = RageState::new(&cfg);
        for _ in 0..5 {
            rage.on_growth(GrowthSource::Food, &cfg);
        }
        assert!(rage.is_active());
        assert_eq!(rage.increment(), 0.0);

        rage.tick(3.0, &cfg);
        assert_eq!(rage.on_growth(GrowthSource::Food, &cfg), None);
        assert_eq!(rage.progress(), 0.0);
        // Remaining time is not refreshed by the sixth pickup.
        assert!((rage.remaining() - 7.0).abs() < 1e-5);
    }

    #[test]
    fn test_spawn_growth_never_accrues() {
        let cfg = config();
        let mut rage = RageState::new(&cfg);
        for _ in 0..10 {
            assert_eq!(rage.on_growth(GrowthSource::Spawn, &cfg), None);
        }
        assert_eq!(rage.progress(), 0.0);
        assert!(!rage.is_active());
    }

    #[test]
    fn test_countdown_reverts_buff() {
        let cfg = config();
        let mut rage = RageState::new(&cfg);
        for _ in 0..5 {
            rage.on_growth(GrowthSource::Food, &cfg);
        }

        assert_eq!(rage.tick(9.5, &cfg), None);
        assert!(rage.is_active());
        assert!((rage.bar_fraction(&cfg) - 0.05).abs() < 1e-4);

        assert_eq!(rage.tick(0.5, &cfg), Some(RageTransition::Deactivated));
        assert!(!rage.is_active());
        assert_eq!(rage.increment(), 0.2);
        assert_eq!(rage.speed_multiplier(&cfg), 1.0);
        assert_eq!(rage.head_scale(&cfg), 1.0);
        assert_eq!(rage.bar_fraction(&cfg), 0.0);

        // Inactive ticks do nothing.
        assert_eq!(rage.tick(1.0, &cfg), None);
        assert_eq!(rage.remaining(), 0.0);
    }

    #[test]
    fn test_bar_refills_after_buff_ends() {
        let cfg = config();
        let mut rage = RageState::new(&cfg);
        for _ in 0..5 {
            rage.on_growth(GrowthSource::Food, &cfg);
        }
        rage.tick(10.0, &cfg);

        rage.on_growth(GrowthSource::Food, &cfg);
        assert!((rage.progress() - 0.2).abs() < 1e-5);
        assert!((rage.bar_fraction(&cfg) - 0.2).abs() < 1e-5);
    }
}
