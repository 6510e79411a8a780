//! ECS components for the snake game.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Grid position component for entities on the arena.
#[derive(Component, Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Check if this position collides with another position.
    pub fn collides_with(&self, other: &Position) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// Returns the neighbouring cell one unit away in `direction`.
    pub fn step(self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Direction enum for snake movement.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Unit grid offset for one step in this direction.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
        }
    }

    /// True when `other` turns onto the other axis.
    pub fn is_perpendicular_to(&self, other: Direction) -> bool {
        other != *self && other != self.opposite()
    }

    /// Reads the directional key pressed this frame, if any.
    pub fn from_input(keyboard_input: &ButtonInput<KeyCode>) -> Option<Direction> {
        if keyboard_input.just_pressed(KeyCode::ArrowLeft) || keyboard_input.just_pressed(KeyCode::KeyA)
        {
            Some(Direction::Left)
        } else if keyboard_input.just_pressed(KeyCode::ArrowRight)
            || keyboard_input.just_pressed(KeyCode::KeyD)
        {
            Some(Direction::Right)
        } else if keyboard_input.just_pressed(KeyCode::ArrowUp)
            || keyboard_input.just_pressed(KeyCode::KeyW)
        {
            Some(Direction::Up)
        } else if keyboard_input.just_pressed(KeyCode::ArrowDown)
            || keyboard_input.just_pressed(KeyCode::KeyS)
        {
            Some(Direction::Down)
        } else {
            None
        }
    }
}

/// Category carried by everything the snake head can run into.
#[derive(Component, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ColliderKind {
    Food,
    Obstacle,
    Wall,
    SnakeBody,
}

/// Component to mark the snake's head.
#[derive(Component)]
pub struct SnakeHead {
    pub direction: Direction,
}

/// Component to mark snake head eyes (children of head).
#[derive(Component)]
pub struct SnakeEye;

/// Component to mark the glow drawn behind the head.
#[derive(Component)]
pub struct HeadGlow;

/// Component to mark snake body segments.
#[derive(Component)]
pub struct SnakeSegment;

/// Component to mark food entities.
#[derive(Component)]
pub struct Food;

/// Component for food pulsing animation.
#[derive(Component)]
pub struct FoodPulse {
    pub timer: Timer,
}

/// Component to mark wall cells.
#[derive(Component)]
pub struct Wall;

/// Component to mark obstacle cells.
#[derive(Component)]
pub struct Obstacle;

/// Component for animating newly grown segments.
#[derive(Component)]
pub struct GrowingSegment {
    pub timer: Timer,
}

/// Component to mark the score display UI element.
#[derive(Component)]
pub struct ScoreText;

/// Component to mark the high score display UI element.
#[derive(Component)]
pub struct HighScoreText;

/// Component to mark the rage bar fill node.
#[derive(Component)]
pub struct RageBarFill;

/// Component to mark the rage bar handle node.
#[derive(Component)]
pub struct RageBarHandle;

/// Component to mark the game over overlay UI.
#[derive(Component)]
pub struct GameOverUI;

/// Component to mark the start menu UI.
#[derive(Component)]
pub struct MenuUI;

/// Component to mark the controls help shown under Options.
#[derive(Component)]
pub struct OptionsPanel;

/// What a UI button does when pressed.
#[derive(Component, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ButtonAction {
    Start,
    Options,
    Back,
    Quit,
    Restart,
}
