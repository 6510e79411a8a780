//! Arena plugin - spawns the playfield background, the wall ring, and obstacles.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_vector_shapes::prelude::*;

use crate::game::{
    ARENA_COLOR, CELL_SIZE, CORNER_RADIUS, ColliderKind, GameConfig, GridBounds, HUD_HEIGHT,
    OBSTACLE_COLOR, Obstacle, Position, WALL_COLOR, Wall, Z_ARENA, Z_WALL,
};

/// Plugin for the static playfield.
pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (fit_window, spawn_arena));
    }
}

const WINDOW_MARGIN: f32 = 20.0;

/// Logical window size that shows the whole arena, walls included, plus the HUD strip.
pub fn window_size(bounds: &GridBounds) -> Vec2 {
    let columns = bounds.width() as f32 + 2.0;
    let rows = bounds.height() as f32 + 2.0;
    Vec2::new(
        columns * CELL_SIZE + WINDOW_MARGIN,
        rows * CELL_SIZE + WINDOW_MARGIN + HUD_HEIGHT,
    )
}

/// Resizes the primary window to the configured arena.
fn fit_window(config: Res<GameConfig>, mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    let size = window_size(&config.arena);
    for mut window in windows.iter_mut() {
        if window.resolution.width() != size.x || window.resolution.height() != size.y {
            window.resolution.set(size.x, size.y);
        }
    }
}

fn spawn_block<'a>(
    commands: &'a mut Commands,
    position: Position,
    color: Color,
) -> EntityCommands<'a> {
    let size = CELL_SIZE * 0.95;
    let corner_radius_normalized = CORNER_RADIUS / (size / 2.0);

    commands.spawn((
        ShapeBundle::rect(
            &ShapeConfig {
                color,
                corner_radii: Vec4::splat(corner_radius_normalized),
                transform: Transform::from_xyz(
                    position.x as f32 * CELL_SIZE,
                    position.y as f32 * CELL_SIZE,
                    Z_WALL,
                ),
                ..ShapeConfig::default_2d()
            },
            Vec2::splat(size),
        ),
        position,
    ))
}

/// Startup system - background, walls on the bounds, and configured obstacles.
fn spawn_arena(mut commands: Commands, config: Res<GameConfig>) {
    let bounds = config.arena;

    commands.spawn((
        Sprite {
            color: ARENA_COLOR,
            custom_size: Some(Vec2::new(
                bounds.width() as f32 * CELL_SIZE,
                bounds.height() as f32 * CELL_SIZE,
            )),
            ..default()
        },
        Transform::from_translation(Vec3::new(0.0, 0.0, Z_ARENA)),
    ));

    for cell in bounds.wall_cells() {
        spawn_block(&mut commands, cell, WALL_COLOR).insert((Wall, ColliderKind::Wall));
    }

    for &cell in &config.obstacles {
        if !bounds.contains(cell) {
            warn!("Obstacle at ({}, {}) lies outside the arena, skipping", cell.x, cell.y);
            continue;
        }
        spawn_block(&mut commands, cell, OBSTACLE_COLOR).insert((Obstacle, ColliderKind::Obstacle));
    }

    info!(
        "Arena {}x{} with {} obstacles, wall traversal {}",
        bounds.width(),
        bounds.height(),
        config.obstacles.len(),
        if config.move_through_walls { "on" } else { "off" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_fits_configured_arena() {
        let default = window_size(&GameConfig::default().arena);
        assert_eq!(
            default,
            Vec2::new(25.0 * CELL_SIZE + 20.0, 21.0 * CELL_SIZE + 20.0 + HUD_HEIGHT)
        );

        let large = GridBounds {
            half_width: 20,
            half_height: 15,
        };
        assert_eq!(
            window_size(&large),
            Vec2::new(41.0 * CELL_SIZE + 20.0, 31.0 * CELL_SIZE + 20.0 + HUD_HEIGHT)
        );
    }

    #[test]
    fn test_window_resized_for_config() {
        let mut app = App::new();
        app.insert_resource(GameConfig {
            arena: GridBounds {
                half_width: 20,
                half_height: 15,
            },
            ..Default::default()
        })
        .add_systems(Update, fit_window);

        let window = app.world_mut().spawn((Window::default(), PrimaryWindow)).id();
        app.update();

        let resolution = &app.world().get::<Window>(window).unwrap().resolution;
        assert_eq!(resolution.width(), 41.0 * CELL_SIZE + 20.0);
        assert_eq!(resolution.height(), 31.0 * CELL_SIZE + 20.0 + HUD_HEIGHT);
    }
}
