use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};
use topdown_controller::controller::{ControllerError, PlayerController};
use topdown_controller::plugin::{ControllerDebugPlugin, ControllerPlugin};
use topdown_controller::settings::loader as settings_loader;

mod app;
use app::{setup, update_player_fill_light, StartingController};

#[derive(Component)]
struct PlayerFillLight;

fn main() -> Result<(), ControllerError> {
    let settings = settings_loader::load_settings_from_dir(settings_loader::SETTINGS_DIR);
    let controller = PlayerController::new(settings.controller_config()?)?;
    let settings_watcher = settings_loader::setup_settings_watcher(settings_loader::SETTINGS_DIR)
        .unwrap_or_else(|_| settings_loader::SettingsWatcher::stub());

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "topdown controller".to_string(),
                position: WindowPosition::Centered(MonitorSelection::Primary),
                present_mode: PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_plugins((ControllerPlugin, ControllerDebugPlugin));

    app.insert_resource(settings);
    app.insert_resource(settings_watcher);
    app.insert_resource(StartingController(controller));

    app.add_systems(Startup, setup);
    app.add_systems(Update, settings_loader::check_settings_changes);
    app.add_systems(Update, update_player_fill_light);

    app.run();
    Ok(())
}
