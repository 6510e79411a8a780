//! Snake plugin - handles input latching, grid ticks, collision resolution, growth, and respawn.

use bevy::prelude::*;
use bevy_vector_shapes::prelude::*;

use crate::audio::{PlaySound, Sound};
use crate::food::spawn_food;
use crate::game::{
    CELL_SIZE, CORNER_RADIUS, CollisionGuard, ColliderKind, DeferredAction, DeferredQueue,
    Direction, DirectionLatch, Food, FoodEatenEvent, GameConfig, GameOverCause, GameOverEvent,
    GamePhase, GameState, GrowingSegment, GrowthEvent, GrowthSource, HeadGlow, Position,
    RageState, RageTransition, ResetSnakeEvent, SNAKE_HEAD_COLOR, SNAKE_HEAD_GLOW_COLOR,
    SNAKE_SEGMENT_COLOR, Scoreboard, SnakeEye, SnakeHead, SnakeSegment, TickClock, TriggerEnter,
    Z_SNAKE_HEAD, Z_SNAKE_SEGMENT,
};

/// Plugin for snake-related systems.
pub struct SnakePlugin;

impl Plugin for SnakePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (latch_direction_input, countdown_rage).chain())
            .add_systems(
                FixedUpdate,
                (
                    reset_snake,
                    detect_head_collisions,
                    resolve_collisions,
                    apply_growth,
                    advance_snake,
                )
                    .chain(),
            );
    }
}

// Type alias for querying snake entities
type SnakeEntityQuery<'w, 's> = Query<'w, 's, Entity, Or<(With<SnakeSegment>, With<SnakeHead>)>>;
type MovedHeadQuery<'w, 's> =
    Query<'w, 's, (Entity, &'static Position), (With<SnakeHead>, Changed<Position>)>;

/// Moves the body one tick: every segment takes its predecessor's old
/// cell (walking from the tail), then the head steps in `direction`.
pub fn step_segments(segments: &mut [Position], direction: Direction) {
    if segments.is_empty() {
        return;
    }
    for i in (1..segments.len()).rev() {
        segments[i] = segments[i - 1];
    }
    segments[0] = segments[0].step(direction);
}

/// Cell the head reappears on after passing through `wall`.
pub fn traverse(head: Position, wall: Position, direction: Direction) -> Position {
    let (dx, dy) = direction.delta();
    if dx != 0 {
        Position::new(-wall.x + dx, head.y)
    } else {
        Position::new(head.x, -wall.y + dy)
    }
}

/// Spawns the snake head entity with eyes.
pub fn spawn_snake_head(commands: &mut Commands, position: Position) -> Entity {
    let size = CELL_SIZE * 0.9;
    // Normalize corner radius relative to the shape size (0.0 to 1.0 range)
    let corner_radius_normalized = CORNER_RADIUS / (size / 2.0);

    commands
        .spawn((
            ShapeBundle::rect(
                &ShapeConfig {
                    color: SNAKE_HEAD_COLOR,
                    corner_radii: Vec4::splat(corner_radius_normalized),
                    transform: Transform::from_xyz(
                        position.x as f32 * CELL_SIZE,
                        position.y as f32 * CELL_SIZE,
                        Z_SNAKE_HEAD,
                    ),
                    ..ShapeConfig::default_2d()
                },
                Vec2::splat(size),
            ),
            SnakeHead {
                direction: Direction::Right,
            },
            position,
        ))
        .with_children(|parent| {
            // Glow effect behind the head; swells in rage mode
            parent.spawn((
                ShapeBundle::circle(
                    &ShapeConfig {
                        color: SNAKE_HEAD_GLOW_COLOR,
                        alpha_mode: ShapeAlphaMode::Add,
                        transform: Transform::from_xyz(0.0, 0.0, -0.1),
                        ..ShapeConfig::default_2d()
                    },
                    CELL_SIZE * 0.8,
                ),
                HeadGlow,
            ));

            let eye_radius = CELL_SIZE * 0.08;
            for side in [1.0, -1.0] {
                parent.spawn((
                    ShapeBundle::circle(
                        &ShapeConfig {
                            color: Color::srgba(0.0, 0.0, 0.0, 1.0),
                            transform: Transform::from_xyz(
                                CELL_SIZE * 0.15,
                                side * CELL_SIZE * 0.15,
                                0.1,
                            ),
                            ..ShapeConfig::default_2d()
                        },
                        eye_radius,
                    ),
                    SnakeEye,
                ));
            }
        })
        .id()
}

/// Spawns a snake body segment at the given position.
pub fn spawn_snake_segment(commands: &mut Commands, position: Position) -> Entity {
    let size = CELL_SIZE;
    let corner_radius_normalized = CORNER_RADIUS / (size / 2.0);

    commands
        .spawn((
            ShapeBundle::rect(
                &ShapeConfig {
                    color: SNAKE_SEGMENT_COLOR,
                    corner_radii: Vec4::splat(corner_radius_normalized),
                    transform: Transform::from_xyz(
                        position.x as f32 * CELL_SIZE,
                        position.y as f32 * CELL_SIZE,
                        Z_SNAKE_SEGMENT,
                    ),
                    ..ShapeConfig::default_2d()
                },
                Vec2::splat(size),
            ),
            SnakeSegment,
            ColliderKind::SnakeBody,
            position,
        ))
        .id()
}

/// System to read keyboard input and latch a perpendicular turn.
fn latch_direction_input(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut latch: ResMut<DirectionLatch>,
    heads: Query<&SnakeHead>,
    game_state: Res<GameState>,
) {
    if game_state.phase != GamePhase::Playing {
        return;
    }

    if let Some(head) = heads.iter().next()
        && let Some(intent) = Direction::from_input(&keyboard_input)
    {
        latch.offer(head.direction, intent);
    }
}

/// System to count rage mode down with frame time.
fn countdown_rage(time: Res<Time>, config: Res<GameConfig>, mut rage: ResMut<RageState>) {
    if !rage.is_active() {
        return;
    }

    if rage.tick(time.delta_secs(), &config.rage) == Some(RageTransition::Deactivated) {
        info!("Rage mode over");
    }
}

/// System to rebuild the snake when a new round starts.
#[allow(clippy::too_many_arguments)]
fn reset_snake(
    mut commands: Commands,
    mut resets: MessageReader<ResetSnakeEvent>,
    time: Res<Time>,
    virtual_time: Res<Time<Virtual>>,
    config: Res<GameConfig>,
    mut game_state: ResMut<GameState>,
    mut scoreboard: ResMut<Scoreboard>,
    mut rage: ResMut<RageState>,
    mut latch: ResMut<DirectionLatch>,
    mut clock: ResMut<TickClock>,
    mut guard: ResMut<CollisionGuard>,
    mut deferred: ResMut<DeferredQueue>,
    mut growth_writer: MessageWriter<GrowthEvent>,
    snake_parts: SnakeEntityQuery,
    food: Query<Entity, With<Food>>,
) {
    if resets.is_empty() {
        return;
    }
    resets.clear();

    for entity in snake_parts.iter().chain(food.iter()) {
        commands.entity(entity).despawn();
    }

    game_state.snake_segments.clear();
    let head_entity = spawn_snake_head(&mut commands, config.spawn);
    game_state.snake_segments.push(head_entity);

    // The initial body collapses onto the spawn cell and unfolds as the head moves.
    for _ in 1..config.initial_size {
        growth_writer.write(GrowthEvent {
            source: GrowthSource::Spawn,
        });
    }

    scoreboard.reset_score();
    *rage = RageState::new(&config.rage);
    latch.clear();
    clock.reset(time.elapsed_secs_f64());

    // The head overlaps its collapsed body on the spawn frame.
    guard.armed = false;
    deferred.schedule(
        virtual_time.elapsed_secs(),
        config.collision_debounce_secs,
        DeferredAction::EnableCollisions,
    );

    let mut blocked = config.obstacles.clone();
    blocked.push(config.spawn);
    if let Err(err) = spawn_food(&mut commands, &mut rand::rng(), &config.arena, |p| {
        blocked.contains(&p)
    }) {
        warn!("No room for food: {err}");
    }

    game_state.phase = GamePhase::Playing;
    info!("Round started with {} segments", config.initial_size);
}

/// System to report every collider the head just moved onto.
fn detect_head_collisions(
    game_state: Res<GameState>,
    guard: Res<CollisionGuard>,
    heads: MovedHeadQuery,
    colliders: Query<(Entity, &Position, &ColliderKind)>,
    mut triggers: MessageWriter<TriggerEnter>,
) {
    if game_state.phase != GamePhase::Playing {
        return;
    }

    for (head_entity, head_pos) in heads.iter() {
        for (entity, pos, kind) in colliders.iter() {
            if entity == head_entity || !head_pos.collides_with(pos) {
                continue;
            }
            if *kind == ColliderKind::SnakeBody && !guard.armed {
                continue;
            }
            triggers.write(TriggerEnter {
                entity,
                kind: *kind,
                position: *pos,
            });
        }
    }
}

/// System to apply the outcome of each head collision.
#[allow(clippy::too_many_arguments)]
pub fn resolve_collisions(
    mut triggers: MessageReader<TriggerEnter>,
    config: Res<GameConfig>,
    rage: Res<RageState>,
    mut game_state: ResMut<GameState>,
    mut heads: Query<(Entity, &SnakeHead, &mut Position)>,
    mut growth_writer: MessageWriter<GrowthEvent>,
    mut food_eaten_writer: MessageWriter<FoodEatenEvent>,
    mut game_over_writer: MessageWriter<GameOverEvent>,
    mut sounds: MessageWriter<PlaySound>,
) {
    for trigger in triggers.read() {
        if game_state.phase != GamePhase::Playing {
            break;
        }
        let Ok((head_entity, head, mut head_pos)) = heads.single_mut() else {
            break;
        };

        let cause = match trigger.kind {
            ColliderKind::Food => {
                food_eaten_writer.write(FoodEatenEvent {
                    food: trigger.entity,
                    position: trigger.position,
                });
                growth_writer.write(GrowthEvent {
                    source: GrowthSource::Food,
                });
                sounds.write(PlaySound(Sound::Eat));
                None
            }
            ColliderKind::Obstacle => Some(GameOverCause::Obstacle),
            ColliderKind::Wall => {
                if config.move_through_walls {
                    *head_pos = traverse(*head_pos, trigger.position, head.direction);
                    None
                } else {
                    Some(GameOverCause::Wall)
                }
            }
            ColliderKind::SnakeBody => {
                if rage.is_immune() || trigger.entity == head_entity {
                    None
                } else {
                    Some(GameOverCause::SelfCollision)
                }
            }
        };

        if let Some(cause) = cause {
            game_state.phase = GamePhase::GameOver;
            game_over_writer.write(GameOverEvent { cause });
        }
    }
}

/// System to append tail segments for each GrowthEvent.
pub fn apply_growth(
    mut commands: Commands,
    mut growth_reader: MessageReader<GrowthEvent>,
    config: Res<GameConfig>,
    mut game_state: ResMut<GameState>,
    mut rage: ResMut<RageState>,
    positions: Query<&Position>,
) {
    let Some(tail_pos) = game_state
        .snake_segments
        .last()
        .and_then(|&tail| positions.get(tail).ok())
        .copied()
    else {
        growth_reader.clear();
        return;
    };

    for growth in growth_reader.read() {
        // New segments share the tail cell and separate on the next tick.
        let new_segment = spawn_snake_segment(&mut commands, tail_pos);
        if growth.source == GrowthSource::Food {
            commands.entity(new_segment).insert(GrowingSegment {
                timer: Timer::from_seconds(0.2, TimerMode::Once),
            });
        }
        game_state.snake_segments.push(new_segment);

        if rage.on_growth(growth.source, &config.rage) == Some(RageTransition::Activated) {
            info!("Rage mode! {}s at x{}", config.rage.duration_secs, config.rage.speed_multiplier);
        }
    }
}

/// System to move the snake one cell when the tick clock allows it.
#[allow(clippy::too_many_arguments)]
pub fn advance_snake(
    time: Res<Time>,
    config: Res<GameConfig>,
    rage: Res<RageState>,
    game_state: Res<GameState>,
    mut clock: ResMut<TickClock>,
    mut latch: ResMut<DirectionLatch>,
    mut heads: Query<&mut SnakeHead>,
    mut positions: Query<&mut Position>,
) {
    if game_state.phase != GamePhase::Playing {
        return;
    }

    let interval = config.tick_interval(rage.speed_multiplier(&config.rage));
    if !clock.try_tick(time.elapsed_secs_f64(), interval) {
        return;
    }

    let Some(head_entity) = game_state.head() else {
        return;
    };
    let Ok(mut head) = heads.get_mut(head_entity) else {
        return;
    };
    if let Some(turn) = latch.take() {
        head.direction = turn;
    }

    let mut cells: Vec<Position> = game_state
        .snake_segments
        .iter()
        .filter_map(|&entity| positions.get(entity).ok().copied())
        .collect();
    if cells.len() != game_state.snake_segments.len() {
        return;
    }
    step_segments(&mut cells, head.direction);

    for (&entity, cell) in game_state.snake_segments.iter().zip(cells) {
        if let Ok(mut pos) = positions.get_mut(entity)
            && *pos != cell
        {
            *pos = cell;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(len: i32) -> Vec<Position> {
        (0..len).map(|i| Position::new(-i, 0)).collect()
    }

    #[test]
    fn test_segments_follow_predecessor() {
        let mut snake = line(5);
        let before = snake.clone();
        step_segments(&mut snake, Direction::Up);

        assert_eq!(snake[0], Position::new(0, 1));
        for i in 1..snake.len() {
            assert_eq!(snake[i], before[i - 1]);
        }
    }

    #[test]
    fn test_collapsed_body_unfolds() {
        let mut snake = vec![Position::new(0, 0); 4];
        step_segments(&mut snake, Direction::Right);
        assert_eq!(
            snake,
            vec![Position::new(1, 0), Position::new(0, 0), Position::new(0, 0), Position::new(0, 0)]
        );
        step_segments(&mut snake, Direction::Right);
        step_segments(&mut snake, Direction::Right);
        assert_eq!(
            snake,
            vec![Position::new(3, 0), Position::new(2, 0), Position::new(1, 0), Position::new(0, 0)]
        );
    }

    #[test]
    fn test_latched_turn_applies_on_next_tick() {
        // Length 4 moving right, "down" pressed: the next tick goes down.
        let mut latch = DirectionLatch::default();
        let mut direction = Direction::Right;
        let mut snake = line(4);

        assert!(latch.offer(direction, Direction::Down));
        if let Some(turn) = latch.take() {
            direction = turn;
        }
        step_segments(&mut snake, direction);

        assert_eq!(direction, Direction::Down);
        assert_eq!(snake[0], Position::new(0, -1));
        assert_eq!(snake[1], Position::new(0, 0));
    }

    #[test]
    fn test_wall_traversal_wraps() {
        let max = 12;
        let head = Position::new(max, 3);
        let wall = Position::new(max, 3);
        assert_eq!(traverse(head, wall, Direction::Right), Position::new(-max + 1, 3));

        let wall = Position::new(-max, -2);
        assert_eq!(traverse(wall, wall, Direction::Left), Position::new(max - 1, -2));

        let wall = Position::new(4, 10);
        assert_eq!(traverse(wall, wall, Direction::Up), Position::new(4, -9));
    }

    fn growth_app(initial: Position) -> (App, Entity) {
        let mut app = App::new();
        app.add_message::<GrowthEvent>()
            .insert_resource(GameConfig::default())
            .init_resource::<RageState>()
            .init_resource::<GameState>()
            .add_systems(Update, apply_growth);

        let head = app
            .world_mut()
            .spawn((SnakeHead { direction: Direction::Right }, initial))
            .id();
        app.world_mut().resource_mut::<GameState>().snake_segments.push(head);
        (app, head)
    }

    #[test]
    fn test_growth_appends_at_tail() {
        let (mut app, head) = growth_app(Position::new(2, 2));

        app.world_mut().write_message(GrowthEvent {
            source: GrowthSource::Food,
        });
        app.update();

        let segments = app.world().resource::<GameState>().snake_segments.clone();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], head);
        let tail = app.world().get::<Position>(segments[1]).copied();
        assert_eq!(tail, Some(Position::new(2, 2)));
        assert!(app.world().get::<SnakeSegment>(segments[1]).is_some());

        let rage = app.world().resource::<RageState>();
        assert!((rage.progress() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_spawn_growth_skips_rage() {
        let (mut app, _) = growth_app(Position::new(0, 0));

        for _ in 0..3 {
            app.world_mut().write_message(GrowthEvent {
                source: GrowthSource::Spawn,
            });
        }
        app.update();

        assert_eq!(app.world().resource::<GameState>().snake_segments.len(), 4);
        assert_eq!(app.world().resource::<RageState>().progress(), 0.0);
    }

    #[derive(Resource, Default)]
    struct EndedBy(Vec<GameOverCause>);

    fn record_game_over(mut reader: MessageReader<GameOverEvent>, mut ended: ResMut<EndedBy>) {
        ended.0.extend(reader.read().map(|event| event.cause));
    }

    fn collision_app(
        config: GameConfig,
        head_at: Position,
        direction: Direction,
    ) -> (App, Entity) {
        let mut app = App::new();
        app.add_message::<TriggerEnter>()
            .add_message::<GrowthEvent>()
            .add_message::<FoodEatenEvent>()
            .add_message::<GameOverEvent>()
            .add_message::<PlaySound>()
            .insert_resource(config)
            .init_resource::<RageState>()
            .init_resource::<EndedBy>()
            .insert_resource(GameState {
                snake_segments: Vec::new(),
                phase: GamePhase::Playing,
            })
            .add_systems(Update, (resolve_collisions, record_game_over).chain());

        let head = app.world_mut().spawn((SnakeHead { direction }, head_at)).id();
        app.world_mut().resource_mut::<GameState>().snake_segments.push(head);
        (app, head)
    }

    fn hit(app: &mut App, entity: Entity, kind: ColliderKind, position: Position) {
        app.world_mut().write_message(TriggerEnter {
            entity,
            kind,
            position,
        });
        app.update();
    }

    fn phase(app: &App) -> GamePhase {
        app.world().resource::<GameState>().phase
    }

    #[test]
    fn test_obstacle_ends_round() {
        let (mut app, _) = collision_app(GameConfig::default(), Position::new(3, 3), Direction::Up);
        let rock = app.world_mut().spawn(Position::new(3, 3)).id();

        hit(&mut app, rock, ColliderKind::Obstacle, Position::new(3, 3));

        assert_eq!(phase(&app), GamePhase::GameOver);
        assert_eq!(app.world().resource::<EndedBy>().0, vec![GameOverCause::Obstacle]);
    }

    #[test]
    fn test_solid_wall_ends_round() {
        let config = GameConfig::default();
        let edge = Position::new(config.arena.half_width, 2);
        let (mut app, head) = collision_app(config, edge, Direction::Right);
        let wall = app.world_mut().spawn(edge).id();

        hit(&mut app, wall, ColliderKind::Wall, edge);

        assert_eq!(phase(&app), GamePhase::GameOver);
        assert_eq!(app.world().resource::<EndedBy>().0, vec![GameOverCause::Wall]);
        assert_eq!(app.world().get::<Position>(head).copied(), Some(edge));
    }

    #[test]
    fn test_open_wall_wraps_head() {
        let config = GameConfig {
            move_through_walls: true,
            ..Default::default()
        };
        let max = config.arena.half_width;
        let edge = Position::new(max, 2);
        let (mut app, head) = collision_app(config, edge, Direction::Right);
        let wall = app.world_mut().spawn(edge).id();

        hit(&mut app, wall, ColliderKind::Wall, edge);

        assert_eq!(phase(&app), GamePhase::Playing);
        assert!(app.world().resource::<EndedBy>().0.is_empty());
        assert_eq!(
            app.world().get::<Position>(head).copied(),
            Some(Position::new(-max + 1, 2))
        );
    }

    #[test]
    fn test_biting_body_ends_round() {
        let (mut app, _) = collision_app(GameConfig::default(), Position::new(0, 0), Direction::Left);
        let segment = app.world_mut().spawn((SnakeSegment, Position::new(0, 0))).id();

        hit(&mut app, segment, ColliderKind::SnakeBody, Position::new(0, 0));

        assert_eq!(phase(&app), GamePhase::GameOver);
        assert_eq!(app.world().resource::<EndedBy>().0, vec![GameOverCause::SelfCollision]);
    }

    #[test]
    fn test_rage_ignores_body() {
        let config = GameConfig::default();
        let rage_config = config.rage.clone();
        let (mut app, _) = collision_app(config, Position::new(0, 0), Direction::Left);
        {
            let mut rage = app.world_mut().resource_mut::<RageState>();
            for _ in 0..5 {
                rage.on_growth(GrowthSource::Food, &rage_config);
            }
            assert!(rage.is_immune());
        }
        let segment = app.world_mut().spawn((SnakeSegment, Position::new(0, 0))).id();

        hit(&mut app, segment, ColliderKind::SnakeBody, Position::new(0, 0));

        assert_eq!(phase(&app), GamePhase::Playing);
        assert!(app.world().resource::<EndedBy>().0.is_empty());
    }

    #[test]
    fn test_head_never_bites_itself() {
        let (mut app, head) = collision_app(GameConfig::default(), Position::new(1, 1), Direction::Up);

        hit(&mut app, head, ColliderKind::SnakeBody, Position::new(1, 1));

        assert_eq!(phase(&app), GamePhase::Playing);
        assert!(app.world().resource::<EndedBy>().0.is_empty());
    }

    #[test]
    fn test_food_pickup_grows_without_ending_round() {
        let (mut app, _) = collision_app(GameConfig::default(), Position::new(4, 0), Direction::Right);
        let apple = app.world_mut().spawn((Food, Position::new(4, 0))).id();

        #[derive(Resource, Default)]
        struct Grew(usize);
        app.init_resource::<Grew>().add_systems(
            Update,
            (|mut reader: MessageReader<GrowthEvent>, mut grew: ResMut<Grew>| {
                grew.0 += reader.read().filter(|g| g.source == GrowthSource::Food).count();
            })
            .after(resolve_collisions),
        );

        hit(&mut app, apple, ColliderKind::Food, Position::new(4, 0));

        assert_eq!(phase(&app), GamePhase::Playing);
        assert_eq!(app.world().resource::<Grew>().0, 1);
    }

    #[test]
    fn test_triggers_after_game_over_are_ignored() {
        let (mut app, _) = collision_app(GameConfig::default(), Position::new(3, 3), Direction::Up);
        let rock = app.world_mut().spawn(Position::new(3, 3)).id();

        app.world_mut().write_message(TriggerEnter {
            entity: rock,
            kind: ColliderKind::Obstacle,
            position: Position::new(3, 3),
        });
        hit(&mut app, rock, ColliderKind::Wall, Position::new(3, 3));

        assert_eq!(app.world().resource::<EndedBy>().0, vec![GameOverCause::Obstacle]);
    }
}
