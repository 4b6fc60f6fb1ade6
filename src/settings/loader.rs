//! Settings loading and hot-reloading.
//!
//! Settings are loaded from RON files in the `data/settings` directory. If
//! multiple RON files are present, the first successfully parsed `Settings`
//! is used. If no RON files are found or none parses, defaults are used.
//!
//! Only the key bindings are applied on hot-reload. The controller was
//! validated against the startup configuration and keeps it.
use bevy::log::{info, warn};
use bevy::prelude::{Res, ResMut, Resource};

use crate::ron::{load_ron_files, setup_ron_watcher, RonWatcher};
use crate::settings::Settings;

pub const SETTINGS_DIR: &str = "data/settings";

#[derive(Resource)]
pub struct SettingsWatcher(pub RonWatcher);

impl SettingsWatcher {
    #[must_use]
    pub fn stub() -> Self {
        SettingsWatcher(RonWatcher::stub())
    }
}

/// Load settings from the RON files in `path`, or defaults.
///
/// # Example
/// ```no_run
/// use topdown_controller::settings::loader::load_settings_from_dir;
///
/// let settings = load_settings_from_dir("data/settings");
/// ```
#[must_use]
pub fn load_settings_from_dir(path: &str) -> Settings {
    let items: Vec<Settings> = load_ron_files(path);
    if let Some(first) = items.into_iter().next() {
        info!("loaded settings from {path}");
        first
    } else {
        warn!("no usable settings in {path}, using defaults");
        Settings::defaults()
    }
}

/// Create a watcher for the settings directory (hot-reload).
///
/// # Errors
/// Propagates the `notify::Error` from [`setup_ron_watcher`].
pub fn setup_settings_watcher(path: &str) -> Result<SettingsWatcher, notify::Error> {
    setup_ron_watcher(path).map(SettingsWatcher)
}

/// Re-read the settings directory when it changes and apply new key bindings.
#[allow(clippy::needless_pass_by_value)]
pub fn check_settings_changes(watcher: Res<SettingsWatcher>, mut settings: ResMut<Settings>) {
    if !watcher.0.take_changed() {
        return;
    }
    let reloaded = load_settings_from_dir(SETTINGS_DIR);
    if reloaded.controls != settings.controls {
        info!("key bindings reloaded");
        settings.controls = reloaded.controls;
    }
}
