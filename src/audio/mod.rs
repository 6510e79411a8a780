//! Sound plugin - fire-and-forget effects and the looping gameplay track.

use bevy::prelude::*;

/// Plugin for sound playback.
pub struct SoundPlugin;

impl Plugin for SoundPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PlaySound>()
            .add_message::<MusicCommand>()
            .add_systems(Startup, load_sounds)
            .add_systems(Update, (play_sounds, control_music));
    }
}

/// One-shot sound effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Eat,
    GameOver,
    Click,
}

impl Sound {
    fn asset_path(&self) -> &'static str {
        match self {
            Sound::Eat => "sounds/eat.ogg",
            Sound::GameOver => "sounds/game_over.ogg",
            Sound::Click => "sounds/click.ogg",
        }
    }
}

/// Message requesting a one-shot sound.
#[derive(Message, Debug, Clone, Copy)]
pub struct PlaySound(pub Sound);

/// Message starting or stopping the gameplay track.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicCommand {
    Start,
    Stop,
}

/// Marker for the looping gameplay track entity.
#[derive(Component)]
pub struct GameplayMusic;

/// Handles for every clip the game plays.
#[derive(Resource)]
pub struct SoundAssets {
    eat: Handle<AudioSource>,
    game_over: Handle<AudioSource>,
    click: Handle<AudioSource>,
    music: Handle<AudioSource>,
}

impl SoundAssets {
    fn clip(&self, sound: Sound) -> Handle<AudioSource> {
        match sound {
            Sound::Eat => self.eat.clone(),
            Sound::GameOver => self.game_over.clone(),
            Sound::Click => self.click.clone(),
        }
    }
}

fn load_sounds(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(SoundAssets {
        eat: asset_server.load(Sound::Eat.asset_path()),
        game_over: asset_server.load(Sound::GameOver.asset_path()),
        click: asset_server.load(Sound::Click.asset_path()),
        music: asset_server.load("sounds/gameplay_loop.ogg"),
    });
}

/// System to spawn a self-despawning player per requested sound.
fn play_sounds(
    mut commands: Commands,
    mut requests: MessageReader<PlaySound>,
    sounds: Option<Res<SoundAssets>>,
) {
    let Some(sounds) = sounds else {
        requests.clear();
        return;
    };

    for PlaySound(sound) in requests.read() {
        commands.spawn((AudioPlayer::new(sounds.clip(*sound)), PlaybackSettings::DESPAWN));
    }
}

/// System to start or stop the single gameplay loop.
fn control_music(
    mut commands: Commands,
    mut requests: MessageReader<MusicCommand>,
    sounds: Option<Res<SoundAssets>>,
    playing: Query<Entity, With<GameplayMusic>>,
) {
    let Some(last) = requests.read().last().copied() else {
        return;
    };

    for entity in playing.iter() {
        commands.entity(entity).despawn();
    }

    if last == MusicCommand::Start
        && let Some(sounds) = sounds
    {
        commands.spawn((
            AudioPlayer::new(sounds.music.clone()),
            PlaybackSettings::LOOP,
            GameplayMusic,
        ));
    }
}
