//! Game events (messages).

use bevy::prelude::*;

use super::{ColliderKind, Position};

/// Why the snake grew. Only food pickups feed the rage bar.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GrowthSource {
    /// Initial body built when a round starts.
    Spawn,
    /// Food eaten during the round.
    Food,
}

/// Message triggered when snake should grow by one segment.
#[derive(Message, Clone, Copy, Debug)]
pub struct GrowthEvent {
    pub source: GrowthSource,
}

/// Message triggered when food is eaten.
#[derive(Message)]
pub struct FoodEatenEvent {
    pub food: Entity,
    pub position: Position,
}

/// Message triggered when the head enters a cell holding a collider.
#[derive(Message, Clone, Copy, Debug)]
pub struct TriggerEnter {
    pub entity: Entity,
    pub kind: ColliderKind,
    pub position: Position,
}

/// What ended the round.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameOverCause {
    Obstacle,
    Wall,
    SelfCollision,
    BoardFull,
}

/// Message triggered when the round ends.
#[derive(Message, Clone, Copy, Debug)]
pub struct GameOverEvent {
    pub cause: GameOverCause,
}

/// Message requesting the snake be rebuilt for a new round.
#[derive(Message, Default)]
pub struct ResetSnakeEvent;
