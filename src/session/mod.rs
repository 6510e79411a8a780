//! Session plugin - score keeping, high score persistence, round lifecycle, and deferred actions.

use std::path::Path;

use bevy::prelude::*;

use crate::audio::{MusicCommand, PlaySound, Sound};
use crate::game::{
    CONFIG_PATH, CameraShake, CollisionGuard, DeferredAction, DeferredQueue, FoodEatenEvent,
    GameConfig, GameOverEvent, GameOverUI, GamePhase, GameState, HIGH_SCORE_KEY, MenuState,
    MenuUI, PREFERENCES_PATH, Preferences, ResetSnakeEvent, Scoreboard,
};
use crate::snake::resolve_collisions;

/// Plugin for score and round lifecycle systems.
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<StartRequested>()
            .add_message::<RestartRequested>()
            .add_systems(PreStartup, load_settings)
            .add_systems(FixedUpdate, award_points.after(resolve_collisions))
            .add_systems(
                Update,
                (
                    keyboard_shortcuts,
                    start_game,
                    restart_game,
                    run_deferred_actions,
                    handle_game_over,
                )
                    .chain(),
            );
    }
}

/// Message asking to leave the menu and play.
#[derive(Message, Default)]
pub struct StartRequested;

/// Message asking to play again after a game over.
#[derive(Message, Default)]
pub struct RestartRequested;

/// Loads config and preferences; falls back to defaults when either is unusable.
fn load_settings(mut commands: Commands) {
    let config = GameConfig::load_or_default(Path::new(CONFIG_PATH)).unwrap_or_else(|err| {
        warn!("{err}; using default settings");
        GameConfig::default()
    });

    let prefs = Preferences::open(PREFERENCES_PATH).unwrap_or_else(|err| {
        warn!("{err}; high score will not be saved");
        Preferences::in_memory()
    });

    let high_score = prefs.get_int(HIGH_SCORE_KEY, 0).clamp(0, u32::MAX as i64) as u32;
    match prefs.path() {
        Some(path) => info!("Loaded high score {high_score} from {}", path.display()),
        None => info!("Loaded high score {high_score}"),
    }

    commands.insert_resource(Scoreboard::with_high_score(high_score));
    commands.insert_resource(prefs);
    commands.insert_resource(config);
}

/// Adds the food reward to the score and persists any new high score.
pub fn record_points(scoreboard: &mut Scoreboard, prefs: &mut Preferences, points: u32) {
    if scoreboard.add_score(points)
        && let Err(err) = prefs.set_int(HIGH_SCORE_KEY, scoreboard.high_score() as i64)
    {
        warn!("Could not save high score: {err}");
    }
}

/// System to award points for every food eaten.
fn award_points(
    mut food_eaten_reader: MessageReader<FoodEatenEvent>,
    config: Res<GameConfig>,
    mut scoreboard: ResMut<Scoreboard>,
    mut prefs: ResMut<Preferences>,
) {
    for _ in food_eaten_reader.read() {
        record_points(&mut scoreboard, &mut prefs, config.points_per_food);
    }
}

/// System mapping SPACE to start or restart.
fn keyboard_shortcuts(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    game_state: Res<GameState>,
    mut start: MessageWriter<StartRequested>,
    mut restart: MessageWriter<RestartRequested>,
) {
    if !keyboard_input.just_pressed(KeyCode::Space) {
        return;
    }
    match game_state.phase {
        GamePhase::Menu => {
            start.write(StartRequested);
        }
        GamePhase::GameOver => {
            restart.write(RestartRequested);
        }
        GamePhase::Starting | GamePhase::Playing => {}
    }
}

/// System to leave the menu once the click sound had time to play.
fn start_game(
    mut requests: MessageReader<StartRequested>,
    time: Res<Time<Virtual>>,
    config: Res<GameConfig>,
    game_state: Res<GameState>,
    mut deferred: ResMut<DeferredQueue>,
    mut sounds: MessageWriter<PlaySound>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();

    if game_state.phase != GamePhase::Menu || deferred.is_pending(DeferredAction::EnterGame) {
        return;
    }

    sounds.write(PlaySound(Sound::Click));
    deferred.schedule(
        time.elapsed_secs(),
        config.click_transition_delay_secs,
        DeferredAction::EnterGame,
    );
}

/// System to resume play after a game over.
#[allow(clippy::too_many_arguments)]
fn restart_game(
    mut commands: Commands,
    mut requests: MessageReader<RestartRequested>,
    mut time: ResMut<Time<Virtual>>,
    config: Res<GameConfig>,
    mut game_state: ResMut<GameState>,
    mut scoreboard: ResMut<Scoreboard>,
    mut deferred: ResMut<DeferredQueue>,
    mut music: MessageWriter<MusicCommand>,
    game_over_ui: Query<Entity, With<GameOverUI>>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();

    if game_state.phase != GamePhase::GameOver {
        return;
    }

    time.unpause();
    for entity in game_over_ui.iter() {
        commands.entity(entity).despawn();
    }

    scoreboard.reset_score();
    game_state.phase = GamePhase::Starting;
    music.write(MusicCommand::Start);

    // Let the scene settle before the snake is rebuilt.
    deferred.schedule(
        time.elapsed_secs(),
        config.restart_delay_secs,
        DeferredAction::ResetSnake,
    );
}

/// System to fire deferred actions whose deadline has passed.
#[allow(clippy::too_many_arguments)]
fn run_deferred_actions(
    mut commands: Commands,
    time: Res<Time<Virtual>>,
    mut deferred: ResMut<DeferredQueue>,
    mut game_state: ResMut<GameState>,
    mut guard: ResMut<CollisionGuard>,
    mut menu_state: ResMut<MenuState>,
    mut resets: MessageWriter<ResetSnakeEvent>,
    mut music: MessageWriter<MusicCommand>,
    menu_ui: Query<Entity, With<MenuUI>>,
) {
    for action in deferred.drain_due(time.elapsed_secs()) {
        match action {
            DeferredAction::EnterGame => {
                for entity in menu_ui.iter() {
                    commands.entity(entity).despawn();
                }
                menu_state.options_open = false;
                game_state.phase = GamePhase::Starting;
                music.write(MusicCommand::Start);
                resets.write(ResetSnakeEvent);
            }
            DeferredAction::ResetSnake => {
                resets.write(ResetSnakeEvent);
            }
            DeferredAction::EnableCollisions => {
                guard.armed = true;
            }
        }
    }
}

/// System to freeze the round once it ends.
fn handle_game_over(
    mut game_over_reader: MessageReader<GameOverEvent>,
    mut time: ResMut<Time<Virtual>>,
    scoreboard: Res<Scoreboard>,
    mut camera_shake: ResMut<CameraShake>,
    mut deferred: ResMut<DeferredQueue>,
    mut sounds: MessageWriter<PlaySound>,
    mut music: MessageWriter<MusicCommand>,
) {
    let Some(event) = game_over_reader.read().last().copied() else {
        return;
    };

    info!(
        "Game over ({:?}). Score {} / high score {}",
        event.cause,
        scoreboard.score(),
        scoreboard.high_score()
    );

    time.pause();
    deferred.clear();
    sounds.write(PlaySound(Sound::GameOver));
    music.write(MusicCommand::Stop);

    camera_shake.timer = Timer::from_seconds(0.5, TimerMode::Once);
    camera_shake.intensity = 8.0;
}
