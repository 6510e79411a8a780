use bevy::{prelude::*, window::WindowResolution};
use bevy_vector_shapes::prelude::*;

mod arena;
mod audio;
mod food;
mod game;
mod rendering;
mod session;
mod snake;
mod ui;

use arena::{ArenaPlugin, window_size};
use audio::SoundPlugin;
use food::FoodPlugin;
use game::*;
use rendering::RenderingPlugin;
use session::SessionPlugin;
use snake::SnakePlugin;
use ui::UiPlugin;

fn main() {
    // Resized at startup once the arena config is loaded.
    let window = window_size(&GameConfig::default().arena);

    App::new()
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    resolution: WindowResolution::new(window.x as u32, window.y as u32),
                    title: "Rage Snake".to_string(),
                    ..Default::default()
                }),
                ..default()
            }),
            Shape2dPlugin::default(),
        ))
        .insert_resource(ClearColor(BACKGROUND_COLOR))
        .insert_resource(Time::<Fixed>::from_hz(FIXED_UPDATE_HZ))
        .init_resource::<GameState>()
        .init_resource::<DirectionLatch>()
        .init_resource::<TickClock>()
        .init_resource::<CollisionGuard>()
        .init_resource::<RageState>()
        .init_resource::<DeferredQueue>()
        .init_resource::<MenuState>()
        .init_resource::<CameraShake>()
        .add_message::<GrowthEvent>()
        .add_message::<FoodEatenEvent>()
        .add_message::<TriggerEnter>()
        .add_message::<GameOverEvent>()
        .add_message::<ResetSnakeEvent>()
        .add_plugins((
            SessionPlugin,
            SoundPlugin,
            ArenaPlugin,
            SnakePlugin,
            FoodPlugin,
            UiPlugin,
            RenderingPlugin,
        ))
        .run();
}
