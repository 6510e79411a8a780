//! Game constants for arena size, colors, timing, and rendering layers.

use bevy::prelude::*;

use super::Position;

// Arena dimensions (walls sit on the half extents, the interior is inside them)
pub const ARENA_HALF_WIDTH: i32 = 12;
pub const ARENA_HALF_HEIGHT: i32 = 10;
pub const MAX_ARENA_HALF_EXTENT: i32 = 256;

// Visual settings
pub const CELL_SIZE: f32 = 25.0;
pub const CORNER_RADIUS: f32 = 4.0;
pub const HUD_HEIGHT: f32 = 60.0;

// Timing
pub const FIXED_UPDATE_HZ: f64 = 100.0;
pub const SNAKE_SPEED: f32 = 10.0;
pub const RESTART_DELAY_SECS: f32 = 0.1;
pub const COLLISION_DEBOUNCE_SECS: f32 = 0.1;
pub const CLICK_TRANSITION_DELAY_SECS: f32 = 0.25;

// Snake
pub const INITIAL_SNAKE_SIZE: usize = 4;
pub const INITIAL_SNAKE_POSITION: Position = Position { x: 0, y: 0 };
pub const POINTS_PER_FOOD: u32 = 10;

// Rage mode
pub const RAGE_THRESHOLD: f32 = 1.0;
pub const RAGE_INCREMENT: f32 = 0.2;
pub const RAGE_DURATION_SECS: f32 = 10.0;
pub const RAGE_SPEED_MULTIPLIER: f32 = 2.0;
pub const RAGE_HEAD_SCALE: f32 = 1.5;

// Persistence
pub const CONFIG_PATH: &str = "snake_config.json";
pub const PREFERENCES_PATH: &str = "snake_prefs.json";
pub const HIGH_SCORE_KEY: &str = "HighScore";

// Colors
pub const SNAKE_HEAD_COLOR: Color = Color::srgba(0.9, 0.9, 0.9, 1.0);
pub const SNAKE_HEAD_GLOW_COLOR: Color = Color::srgba(0.4, 1.0, 0.4, 0.35);
pub const SNAKE_SEGMENT_COLOR: Color = Color::srgba(0.5, 0.5, 0.5, 1.0);
pub const FOOD_COLOR: Color = Color::srgba(1.0, 0.0, 0.0, 1.0);
pub const WALL_COLOR: Color = Color::srgba(0.25, 0.35, 0.6, 1.0);
pub const OBSTACLE_COLOR: Color = Color::srgba(0.55, 0.4, 0.2, 1.0);
pub const ARENA_COLOR: Color = Color::srgba(0.1, 0.1, 0.1, 1.0);
pub const BACKGROUND_COLOR: Color = Color::srgba(0.04, 0.04, 0.04, 1.0);
pub const RAGE_BAR_COLOR: Color = Color::WHITE;
pub const RAGE_BAR_ACTIVE_COLOR: Color = Color::srgba(1.0, 0.15, 0.15, 1.0);

// Z-index constants for rendering layers
pub const Z_ARENA: f32 = 0.0;
pub const Z_WALL: f32 = 0.5;
pub const Z_FOOD: f32 = 1.0;
pub const Z_SNAKE_SEGMENT: f32 = 1.5;
pub const Z_SNAKE_HEAD: f32 = 2.0;
