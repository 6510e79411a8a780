//! Food plugin - handles food placement, re-placement after pickup, and its pulse animation.

use bevy::prelude::*;
use bevy_vector_shapes::prelude::*;
use rand::Rng;

use crate::game::{
    CELL_SIZE, ColliderKind, FOOD_COLOR, Food, FoodEatenEvent, FoodPulse, GameConfig,
    GameOverCause, GameOverEvent, GamePhase, GameState, GridBounds, PlacementError, Position,
    SnakeHead, SnakeSegment, Z_FOOD, occupies, place_food,
};
use crate::snake::{advance_snake, apply_growth, resolve_collisions};

/// Plugin for food-related systems.
pub struct FoodPlugin;

impl Plugin for FoodPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            relocate_food
                .after(resolve_collisions)
                .after(apply_growth)
                .after(advance_snake),
        )
        .add_systems(Update, food_pulse_animation);
    }
}

// Type alias for querying all snake parts
type SnakePartsQuery<'w, 's> =
    Query<'w, 's, &'static Position, (Or<(With<SnakeHead>, With<SnakeSegment>)>, Without<Food>)>;

/// Spawns food on a free cell of the arena.
pub fn spawn_food<R, F>(
    commands: &mut Commands,
    rng: &mut R,
    bounds: &GridBounds,
    is_blocked: F,
) -> Result<Entity, PlacementError>
where
    R: Rng,
    F: Fn(Position) -> bool,
{
    let position = place_food(rng, bounds, is_blocked)?;

    Ok(commands
        .spawn((
            ShapeBundle::circle(
                &ShapeConfig {
                    color: FOOD_COLOR,
                    transform: Transform::from_xyz(
                        position.x as f32 * CELL_SIZE,
                        position.y as f32 * CELL_SIZE,
                        Z_FOOD,
                    ),
                    ..ShapeConfig::default_2d()
                },
                CELL_SIZE * 0.4,
            ),
            Food,
            ColliderKind::Food,
            position,
            FoodPulse {
                timer: Timer::from_seconds(0.8, TimerMode::Repeating),
            },
        ))
        .id())
}

/// System to move eaten food to a fresh free cell. Runs after the snake
/// has moved, so placement sees the body's current cells.
fn relocate_food(
    mut food_eaten_reader: MessageReader<FoodEatenEvent>,
    config: Res<GameConfig>,
    mut game_state: ResMut<GameState>,
    mut game_over_writer: MessageWriter<GameOverEvent>,
    snake_parts: SnakePartsQuery,
    mut foods: Query<&mut Position, With<Food>>,
) {
    for event in food_eaten_reader.read() {
        let Ok(mut food_pos) = foods.get_mut(event.food) else {
            continue;
        };

        let snake: Vec<Position> = snake_parts.iter().copied().collect();
        let placed = place_food(&mut rand::rng(), &config.arena, |p| {
            occupies(&snake, p.x, p.y) || config.obstacles.contains(&p)
        });

        match placed {
            Ok(position) => *food_pos = position,
            Err(err) => {
                info!("{err}; ending round");
                if game_state.phase == GamePhase::Playing {
                    game_state.phase = GamePhase::GameOver;
                    game_over_writer.write(GameOverEvent {
                        cause: GameOverCause::BoardFull,
                    });
                }
            }
        }
    }
}

/// System to animate food with a pulsing effect.
fn food_pulse_animation(
    time: Res<Time>,
    mut foods: Query<(&mut Transform, &mut FoodPulse), With<Food>>,
) {
    for (mut transform, mut pulse) in foods.iter_mut() {
        pulse.timer.tick(time.delta());

        // Use sine wave for smooth pulsing
        let progress = pulse.timer.fraction();
        let scale = 1.0 + (progress * std::f32::consts::PI * 2.0).sin() * 0.15;

        transform.scale = Vec3::splat(scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY: GridBounds = GridBounds {
        half_width: 3,
        half_height: 2,
    };

    fn relocation_app() -> App {
        let mut app = App::new();
        app.add_message::<FoodEatenEvent>()
            .add_message::<GameOverEvent>()
            .insert_resource(GameConfig {
                arena: TINY,
                obstacles: Vec::new(),
                ..Default::default()
            })
            .insert_resource(GameState {
                snake_segments: Vec::new(),
                phase: GamePhase::Playing,
            })
            .add_systems(Update, relocate_food);
        app
    }

    /// Covers every interior cell except `free` with snake, head first.
    fn fill_with_snake(app: &mut App, free: Option<Position>) {
        let cells: Vec<Position> = (TINY.min_y()..=TINY.max_y())
            .flat_map(|y| (TINY.min_x()..=TINY.max_x()).map(move |x| Position::new(x, y)))
            .filter(|p| Some(*p) != free)
            .collect();
        for (i, cell) in cells.into_iter().enumerate() {
            let entity = if i == 0 {
                app.world_mut()
                    .spawn((SnakeHead { direction: crate::game::Direction::Right }, cell))
                    .id()
            } else {
                app.world_mut().spawn((SnakeSegment, cell)).id()
            };
            app.world_mut().resource_mut::<GameState>().snake_segments.push(entity);
        }
    }

    fn eat(app: &mut App, food: Entity) {
        let position = *app.world().get::<Position>(food).unwrap();
        app.world_mut().write_message(FoodEatenEvent { food, position });
        app.update();
    }

    #[test]
    fn test_eaten_food_moves_off_the_body() {
        let mut app = relocation_app();
        let free = Position::new(2, 1);
        fill_with_snake(&mut app, Some(free));
        let food = app.world_mut().spawn((Food, Position::new(-2, -1))).id();

        eat(&mut app, food);

        assert_eq!(app.world().get::<Position>(food).copied(), Some(free));
        assert_eq!(app.world().resource::<GameState>().phase, GamePhase::Playing);
    }

    #[test]
    fn test_full_board_ends_round() {
        let mut app = relocation_app();
        fill_with_snake(&mut app, None);
        let food = app.world_mut().spawn((Food, Position::new(0, 0))).id();

        #[derive(Resource, Default)]
        struct Causes(Vec<GameOverCause>);
        app.init_resource::<Causes>().add_systems(
            Update,
            (|mut reader: MessageReader<GameOverEvent>, mut causes: ResMut<Causes>| {
                causes.0.extend(reader.read().map(|e| e.cause));
            })
            .after(relocate_food),
        );

        eat(&mut app, food);

        assert_eq!(app.world().resource::<GameState>().phase, GamePhase::GameOver);
        assert_eq!(app.world().resource::<Causes>().0, vec![GameOverCause::BoardFull]);
        assert_eq!(app.world().get::<Position>(food).copied(), Some(Position::new(0, 0)));
    }

    #[test]
    fn test_relocation_sees_moved_snake() {
        use crate::audio::PlaySound;
        use crate::game::{
            CollisionGuard, DeferredQueue, Direction, DirectionLatch, GrowthEvent, RageState,
            ResetSnakeEvent, Scoreboard, TickClock, TriggerEnter,
        };
        use crate::snake::SnakePlugin;

        let mut app = App::new();
        app.add_plugins((SnakePlugin, FoodPlugin))
            .add_message::<FoodEatenEvent>()
            .add_message::<GameOverEvent>()
            .add_message::<GrowthEvent>()
            .add_message::<TriggerEnter>()
            .add_message::<ResetSnakeEvent>()
            .add_message::<PlaySound>()
            .init_resource::<Time>()
            .init_resource::<Time<Virtual>>()
            .insert_resource(GameConfig {
                arena: TINY,
                obstacles: Vec::new(),
                ..Default::default()
            })
            .insert_resource(GameState {
                snake_segments: Vec::new(),
                phase: GamePhase::Playing,
            })
            .init_resource::<Scoreboard>()
            .init_resource::<RageState>()
            .init_resource::<DirectionLatch>()
            .init_resource::<TickClock>()
            .init_resource::<CollisionGuard>()
            .init_resource::<DeferredQueue>();

        // Snake winds through every cell but (2, 1); the head is about to step onto it.
        let path = [
            (1, 1), (0, 1), (-1, 1), (-2, 1), (-2, 0), (-1, 0), (0, 0),
            (1, 0), (2, 0), (2, -1), (1, -1), (0, -1), (-1, -1), (-2, -1),
        ];
        for (i, &(x, y)) in path.iter().enumerate() {
            let cell = Position::new(x, y);
            let entity = if i == 0 {
                app.world_mut().spawn((SnakeHead { direction: Direction::Right }, cell)).id()
            } else {
                app.world_mut().spawn((SnakeSegment, cell)).id()
            };
            app.world_mut().resource_mut::<GameState>().snake_segments.push(entity);
        }
        let food = app.world_mut().spawn((Food, Position::new(2, 1))).id();

        app.world_mut().write_message(FoodEatenEvent {
            food,
            position: Position::new(2, 1),
        });
        app.world_mut().run_schedule(FixedUpdate);

        let head = app.world().resource::<GameState>().head().unwrap();
        assert_eq!(app.world().get::<Position>(head).copied(), Some(Position::new(2, 1)));
        // Only the cell the tail just left is free after the move.
        assert_eq!(app.world().get::<Position>(food).copied(), Some(Position::new(-2, -1)));
    }
}
