//! UI plugin - handles the main menu, HUD (score, high score, rage bar), and game over screen.

use bevy::post_process::bloom::Bloom;
use bevy::prelude::*;
use bevy::render::view::Hdr;

use crate::audio::{PlaySound, Sound};
use crate::game::{
    ButtonAction, GameConfig, GameOverEvent, GameOverUI, GamePhase, GameState, HighScoreText,
    MenuState, MenuUI, OptionsPanel, RAGE_BAR_ACTIVE_COLOR, RAGE_BAR_COLOR, RageBarFill,
    RageBarHandle, RageState, ScoreText, Scoreboard,
};
use crate::session::{RestartRequested, StartRequested};

/// Plugin for UI systems.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_system).add_systems(
            Update,
            (
                handle_buttons,
                show_game_over_screen,
                button_highlight,
                apply_menu_visibility,
                update_score_text,
                update_rage_bar,
            )
                .chain(),
        );
    }
}

const FONT_PATH: &str = "fonts/FiraSans-Bold.ttf";
const BUTTON_COLOR: Color = Color::srgba(0.15, 0.15, 0.15, 1.0);
const BUTTON_HOVER_COLOR: Color = Color::srgba(0.25, 0.25, 0.25, 1.0);
const BUTTON_PRESSED_COLOR: Color = Color::srgba(0.3, 0.6, 0.3, 1.0);
const RAGE_BAR_WIDTH: f32 = 160.0;

// Type aliases for text queries
type ScoreTextQuery<'w, 's> = Query<'w, 's, &'static mut Text, (With<ScoreText>, Without<HighScoreText>)>;
type HighScoreTextQuery<'w, 's> =
    Query<'w, 's, &'static mut Text, (With<HighScoreText>, Without<ScoreText>)>;
type RageFillQuery<'w, 's> = Query<
    'w,
    's,
    (&'static mut Node, &'static mut BackgroundColor),
    (With<RageBarFill>, Without<RageBarHandle>),
>;
type RageHandleQuery<'w, 's> = Query<
    'w,
    's,
    (&'static mut Node, &'static mut Visibility),
    (With<RageBarHandle>, Without<RageBarFill>),
>;

/// Whether a menu button shows with the Options view open or closed.
pub fn menu_button_visible(action: ButtonAction, options_open: bool) -> bool {
    match action {
        ButtonAction::Start | ButtonAction::Options | ButtonAction::Quit => !options_open,
        ButtonAction::Back => options_open,
        ButtonAction::Restart => true,
    }
}

fn visibility(visible: bool) -> Visibility {
    if visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}

fn text_font(asset_server: &AssetServer, font_size: f32) -> TextFont {
    TextFont {
        font: asset_server.load(FONT_PATH),
        font_size,
        ..default()
    }
}

fn button_node(action: ButtonAction, visible: bool) -> impl Bundle {
    (
        Button,
        Node {
            width: Val::Px(200.0),
            height: Val::Px(48.0),
            margin: UiRect::all(Val::Px(6.0)),
            align_items: AlignItems::Center,
            justify_content: JustifyContent::Center,
            ..default()
        },
        BackgroundColor(BUTTON_COLOR),
        action,
        visibility(visible),
    )
}

/// Initial setup system - camera, HUD, and the start menu.
fn setup_system(
    mut commands: Commands,
    game_state: Res<GameState>,
    menu_state: Res<MenuState>,
    asset_server: Res<AssetServer>,
) {
    // Setup camera with HDR and bloom for glowing effects
    commands.spawn((
        Camera2d,
        Hdr,
        Bloom {
            intensity: 0.3,
            low_frequency_boost: 0.6,
            low_frequency_boost_curvature: 0.5,
            high_pass_frequency: 0.8,
            ..default()
        },
    ));

    // Score and high score (top left)
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            flex_direction: FlexDirection::Column,
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::from("Score: 0"),
                text_font(&asset_server, 20.0),
                TextColor(Color::WHITE),
                ScoreText,
            ));
            parent.spawn((
                Text::from("High Score: 0"),
                text_font(&asset_server, 16.0),
                TextColor(Color::srgba(0.8, 0.8, 0.8, 1.0)),
                HighScoreText,
            ));
        });

    // Rage bar (top right)
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            top: Val::Px(14.0),
            right: Val::Px(14.0),
            align_items: AlignItems::Center,
            column_gap: Val::Px(8.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::from("RAGE"),
                text_font(&asset_server, 16.0),
                TextColor(RAGE_BAR_ACTIVE_COLOR),
            ));
            parent
                .spawn((
                    Node {
                        width: Val::Px(RAGE_BAR_WIDTH),
                        height: Val::Px(12.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.2, 0.2, 0.2, 1.0)),
                ))
                .with_children(|bar| {
                    bar.spawn((
                        Node {
                            width: Val::Percent(0.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(RAGE_BAR_COLOR),
                        RageBarFill,
                    ));
                    bar.spawn((
                        Node {
                            position_type: PositionType::Absolute,
                            left: Val::Percent(0.0),
                            top: Val::Px(-4.0),
                            width: Val::Px(6.0),
                            height: Val::Px(20.0),
                            margin: UiRect::left(Val::Px(-3.0)),
                            ..default()
                        },
                        BackgroundColor(Color::srgba(0.85, 0.85, 0.85, 1.0)),
                        Visibility::Inherited,
                        RageBarHandle,
                    ));
                });
        });

    if game_state.phase == GamePhase::Menu {
        spawn_start_menu(&mut commands, &asset_server, menu_state.options_open);
    }
}

/// Spawns the start menu UI.
fn spawn_start_menu(commands: &mut Commands, asset_server: &AssetServer, options_open: bool) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.85)),
            MenuUI,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::from("RAGE SNAKE"),
                text_font(asset_server, 64.0),
                TextColor(Color::srgba(0.3, 1.0, 0.3, 1.0)),
                Node {
                    margin: UiRect::bottom(Val::Px(30.0)),
                    ..default()
                },
            ));

            // Controls help, shown under Options
            parent
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        margin: UiRect::bottom(Val::Px(20.0)),
                        ..default()
                    },
                    visibility(options_open),
                    OptionsPanel,
                ))
                .with_children(|panel| {
                    for line in [
                        "Arrow Keys or WASD to turn",
                        "Eat the red apples to grow and fill the rage bar",
                        "A full bar means rage: double speed, no self-collision",
                        "Walls and rocks end the run",
                    ] {
                        panel.spawn((
                            Text::from(line),
                            text_font(asset_server, 18.0),
                            TextColor(Color::srgba(0.8, 0.8, 0.8, 1.0)),
                            Node {
                                margin: UiRect::bottom(Val::Px(8.0)),
                                ..default()
                            },
                        ));
                    }
                });

            for (action, label) in [
                (ButtonAction::Start, "Start"),
                (ButtonAction::Options, "Options"),
                (ButtonAction::Quit, "Quit"),
                (ButtonAction::Back, "Back"),
            ] {
                parent
                    .spawn(button_node(action, menu_button_visible(action, options_open)))
                    .with_children(|button| {
                        button.spawn((
                            Text::from(label),
                            text_font(asset_server, 24.0),
                            TextColor(Color::WHITE),
                        ));
                    });
            }

            parent.spawn((
                Text::from("or press SPACE to start"),
                text_font(asset_server, 16.0),
                TextColor(Color::srgba(1.0, 1.0, 0.3, 1.0)),
                Node {
                    margin: UiRect::top(Val::Px(16.0)),
                    ..default()
                },
            ));
        });
}

/// Spawns the game over screen UI.
fn spawn_game_over_screen(
    commands: &mut Commands,
    asset_server: &AssetServer,
    score: u32,
    high_score: u32,
) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
            GameOverUI,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::from("GAME OVER"),
                text_font(asset_server, 60.0),
                TextColor(Color::srgba(1.0, 0.3, 0.3, 1.0)),
                Node {
                    margin: UiRect::bottom(Val::Px(20.0)),
                    ..default()
                },
            ));

            parent.spawn((
                Text::from(format!("Final Score: {score}\nHigh Score: {high_score}")),
                text_font(asset_server, 30.0),
                TextColor(Color::WHITE),
                Node {
                    margin: UiRect::bottom(Val::Px(30.0)),
                    ..default()
                },
            ));

            parent
                .spawn(button_node(ButtonAction::Restart, true))
                .with_children(|button| {
                    button.spawn((
                        Text::from("Restart"),
                        text_font(asset_server, 24.0),
                        TextColor(Color::WHITE),
                    ));
                });

            parent.spawn((
                Text::from("or press SPACE"),
                text_font(asset_server, 16.0),
                TextColor(Color::srgba(0.8, 0.8, 0.8, 1.0)),
                Node {
                    margin: UiRect::top(Val::Px(10.0)),
                    ..default()
                },
            ));
        });
}

/// System to show the final score when the round ends.
fn show_game_over_screen(
    mut commands: Commands,
    mut game_over_reader: MessageReader<GameOverEvent>,
    scoreboard: Res<Scoreboard>,
    asset_server: Res<AssetServer>,
    game_over_ui: Query<Entity, With<GameOverUI>>,
) {
    if game_over_reader.is_empty() {
        return;
    }
    game_over_reader.clear();

    if game_over_ui.is_empty() {
        spawn_game_over_screen(
            &mut commands,
            &asset_server,
            scoreboard.score(),
            scoreboard.high_score(),
        );
    }
}

/// System to dispatch button presses.
fn handle_buttons(
    interactions: Query<(&Interaction, &ButtonAction), (Changed<Interaction>, With<Button>)>,
    mut menu_state: ResMut<MenuState>,
    mut sounds: MessageWriter<PlaySound>,
    mut start: MessageWriter<StartRequested>,
    mut restart: MessageWriter<RestartRequested>,
    mut exit: MessageWriter<AppExit>,
) {
    for (interaction, action) in interactions.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }

        match action {
            // Start plays its own click once the transition is accepted
            ButtonAction::Start => {
                start.write(StartRequested);
            }
            ButtonAction::Options => {
                sounds.write(PlaySound(Sound::Click));
                menu_state.options_open = true;
                debug!("Options opened");
            }
            ButtonAction::Back => {
                sounds.write(PlaySound(Sound::Click));
                menu_state.options_open = false;
            }
            ButtonAction::Quit => {
                sounds.write(PlaySound(Sound::Click));
                info!("Quit requested");
                exit.write(AppExit::Success);
            }
            ButtonAction::Restart => {
                sounds.write(PlaySound(Sound::Click));
                restart.write(RestartRequested);
            }
        }
    }
}

/// System to tint buttons by interaction state.
fn button_highlight(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
) {
    for (interaction, mut color) in buttons.iter_mut() {
        *color = BackgroundColor(match interaction {
            Interaction::Pressed => BUTTON_PRESSED_COLOR,
            Interaction::Hovered => BUTTON_HOVER_COLOR,
            Interaction::None => BUTTON_COLOR,
        });
    }
}

/// System to show the buttons matching the current menu view.
fn apply_menu_visibility(
    menu_state: Res<MenuState>,
    mut buttons: Query<(&ButtonAction, &mut Visibility), Without<OptionsPanel>>,
    mut panels: Query<&mut Visibility, (With<OptionsPanel>, Without<ButtonAction>)>,
) {
    if !menu_state.is_changed() {
        return;
    }

    for (action, mut vis) in buttons.iter_mut() {
        *vis = visibility(menu_button_visible(*action, menu_state.options_open));
    }
    for mut vis in panels.iter_mut() {
        *vis = visibility(menu_state.options_open);
    }
}

/// System to update the score displays.
fn update_score_text(
    scoreboard: Res<Scoreboard>,
    mut score_text: ScoreTextQuery,
    mut high_score_text: HighScoreTextQuery,
) {
    if !scoreboard.is_changed() {
        return;
    }

    if let Ok(mut text) = score_text.single_mut() {
        *text = Text::from(format!("Score: {}", scoreboard.score()));
    }
    if let Ok(mut text) = high_score_text.single_mut() {
        *text = Text::from(format!("High Score: {}", scoreboard.high_score()));
    }
}

/// System to mirror rage state onto the bar: fill, color, and handle.
fn update_rage_bar(
    rage: Res<RageState>,
    config: Res<GameConfig>,
    mut fill: RageFillQuery,
    mut handle: RageHandleQuery,
) {
    if !rage.is_changed() {
        return;
    }

    let fraction = rage.bar_fraction(&config.rage);
    let color = if rage.is_active() {
        RAGE_BAR_ACTIVE_COLOR
    } else {
        RAGE_BAR_COLOR
    };

    if let Ok((mut node, mut background)) = fill.single_mut() {
        node.width = Val::Percent(fraction * 100.0);
        *background = BackgroundColor(color);
    }
    if let Ok((mut node, mut vis)) = handle.single_mut() {
        node.left = Val::Percent(fraction * 100.0);
        *vis = visibility(!rage.is_active());
    }
}
