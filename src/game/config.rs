//! Game configuration, loaded from an optional JSON file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::*;
use super::{GridBounds, Position, RageConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables for a play session. Missing fields fall back to the defaults
/// in `constants.rs`.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub arena: GridBounds,
    /// Grid cells per second before multipliers.
    pub speed: f32,
    pub initial_size: usize,
    pub spawn: Position,
    /// Wrap to the opposite side instead of dying on walls.
    pub move_through_walls: bool,
    pub obstacles: Vec<Position>,
    pub points_per_food: u32,
    pub rage: RageConfig,
    pub restart_delay_secs: f32,
    pub collision_debounce_secs: f32,
    pub click_transition_delay_secs: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            arena: GridBounds {
                half_width: ARENA_HALF_WIDTH,
                half_height: ARENA_HALF_HEIGHT,
            },
            speed: SNAKE_SPEED,
            initial_size: INITIAL_SNAKE_SIZE,
            spawn: INITIAL_SNAKE_POSITION,
            move_through_walls: false,
            obstacles: vec![
                Position::new(-6, 4),
                Position::new(-6, 5),
                Position::new(-5, 5),
                Position::new(6, -4),
                Position::new(6, -5),
                Position::new(5, -5),
            ],
            points_per_food: POINTS_PER_FOOD,
            rage: RageConfig::default(),
            restart_delay_secs: RESTART_DELAY_SECS,
            collision_debounce_secs: COLLISION_DEBOUNCE_SECS,
            click_transition_delay_secs: CLICK_TRANSITION_DELAY_SECS,
        }
    }
}

impl GameConfig {
    /// Reads and validates a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let extents = 2..=MAX_ARENA_HALF_EXTENT;
        if !extents.contains(&self.arena.half_width) || !extents.contains(&self.arena.half_height) {
            return Err(ConfigError::Invalid(format!(
                "arena half extents must be within 2..={MAX_ARENA_HALF_EXTENT}, got {}x{}",
                self.arena.half_width, self.arena.half_height
            )));
        }
        if self.speed.is_nan() || self.speed <= 0.0 {
            return Err(ConfigError::Invalid(format!("speed must be positive, got {}", self.speed)));
        }
        if self.initial_size == 0 {
            return Err(ConfigError::Invalid("initial_size must be at least 1".into()));
        }
        if !self.arena.contains(self.spawn) {
            return Err(ConfigError::Invalid(format!(
                "spawn ({}, {}) is outside the arena",
                self.spawn.x, self.spawn.y
            )));
        }
        if self.obstacles.contains(&self.spawn) {
            return Err(ConfigError::Invalid("spawn cell holds an obstacle".into()));
        }
        let rage = &self.rage;
        if rage.threshold.is_nan()
            || rage.threshold <= 0.0
            || rage.speed_multiplier.is_nan()
            || rage.speed_multiplier <= 0.0
        {
            return Err(ConfigError::Invalid(
                "rage threshold and speed multiplier must be positive".into(),
            ));
        }
        if rage.increment.is_nan()
            || rage.increment <= 0.0
            || rage.duration_secs.is_nan()
            || rage.duration_secs <= 0.0
        {
            return Err(ConfigError::Invalid(
                "rage increment and duration must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Seconds between two ticks at the given speed multiplier.
    pub fn tick_interval(&self, multiplier: f32) -> f64 {
        1.0 / (f64::from(self.speed) * f64::from(multiplier))
    }
}
