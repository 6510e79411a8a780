//! Rendering plugin - maps grid positions to the screen and drives head, growth, and camera effects.

use bevy::prelude::*;
use rand::prelude::*;

use crate::game::{
    CELL_SIZE, CameraShake, Direction, Food, GameConfig, GrowingSegment, HeadGlow, Obstacle,
    Position, RageState, SnakeHead, SnakeSegment, Wall, Z_ARENA, Z_FOOD, Z_SNAKE_HEAD,
    Z_SNAKE_SEGMENT, Z_WALL,
};

/// Plugin for rendering and visual effects.
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                position_translation,
                update_head_visuals,
                growing_segment_animation,
                camera_shake_system,
            )
                .chain(),
        );
    }
}

const RAGE_GLOW_SCALE: f32 = 1.6;

// Type alias for transform sync query
type GridTransformQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static Position,
        &'static mut Transform,
        Option<&'static SnakeHead>,
        Option<&'static SnakeSegment>,
        Option<&'static Food>,
        Has<Wall>,
        Has<Obstacle>,
    ),
    Changed<Position>,
>;

/// World-space translation of a grid cell; the arena is centred on the origin.
pub fn grid_to_world(pos: Position, z: f32) -> Vec3 {
    Vec3::new(pos.x as f32 * CELL_SIZE, pos.y as f32 * CELL_SIZE, z)
}

fn head_rotation(direction: Direction) -> f32 {
    match direction {
        Direction::Right => 0.0,
        Direction::Up => std::f32::consts::FRAC_PI_2,
        Direction::Left => std::f32::consts::PI,
        Direction::Down => -std::f32::consts::FRAC_PI_2,
    }
}

/// System to snap moved entities onto their grid cell.
fn position_translation(mut transforms: GridTransformQuery) {
    for (pos, mut transform, head, segment, food, wall, obstacle) in transforms.iter_mut() {
        // Set z-index based on entity type to ensure proper layering
        let z = if head.is_some() {
            Z_SNAKE_HEAD
        } else if segment.is_some() {
            Z_SNAKE_SEGMENT
        } else if food.is_some() {
            Z_FOOD
        } else if wall || obstacle {
            Z_WALL
        } else {
            Z_ARENA
        };

        transform.translation = grid_to_world(*pos, z);
    }
}

/// System to turn the head toward its direction and enlarge it in rage mode.
fn update_head_visuals(
    rage: Res<RageState>,
    config: Res<GameConfig>,
    mut heads: Query<(&SnakeHead, &mut Transform), Without<HeadGlow>>,
    mut glows: Query<&mut Transform, (With<HeadGlow>, Without<SnakeHead>)>,
) {
    let scale = rage.head_scale(&config.rage);

    for (head, mut transform) in heads.iter_mut() {
        transform.rotation = Quat::from_rotation_z(head_rotation(head.direction));
        transform.scale = Vec3::new(scale, scale, 1.0);
    }

    if rage.is_changed() {
        let glow = if rage.is_active() { RAGE_GLOW_SCALE } else { 1.0 };
        for mut transform in glows.iter_mut() {
            transform.scale = Vec3::splat(glow);
        }
    }
}

/// System to animate growing segments.
fn growing_segment_animation(
    mut commands: Commands,
    time: Res<Time>,
    mut growing: Query<(Entity, &mut Transform, &mut GrowingSegment)>,
) {
    for (entity, mut transform, mut growing_segment) in growing.iter_mut() {
        growing_segment.timer.tick(time.delta());

        if growing_segment.timer.is_finished() {
            transform.scale = Vec3::splat(1.0);
            commands.entity(entity).remove::<GrowingSegment>();
        } else {
            let progress = growing_segment.timer.fraction();
            // Use ease-out for a bouncy effect
            let scale = progress * (2.0 - progress);
            transform.scale = Vec3::splat(scale);
        }
    }
}

/// System to apply camera shake effect. Runs on real time so it plays
/// while the round is frozen.
fn camera_shake_system(
    time: Res<Time<Real>>,
    mut camera_shake: ResMut<CameraShake>,
    mut camera_query: Query<&mut Transform, With<Camera2d>>,
) {
    if camera_shake.timer.is_finished() {
        return;
    }
    camera_shake.timer.tick(time.delta());

    if let Ok(mut camera_transform) = camera_query.single_mut() {
        if camera_shake.timer.is_finished() {
            // Reset camera position when shake is done
            camera_transform.translation.x = 0.0;
            camera_transform.translation.y = 0.0;
        } else {
            // Apply random shake based on intensity
            let decay = 1.0 - camera_shake.timer.fraction();

            let mut rng = rand::rng();
            let shake_x = (rng.random::<f32>() - 0.5) * camera_shake.intensity * decay;
            let shake_y = (rng.random::<f32>() - 0.5) * camera_shake.intensity * decay;

            camera_transform.translation.x = shake_x;
            camera_transform.translation.y = shake_y;
        }
    }
}
