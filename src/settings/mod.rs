//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/`. Key bindings are
//! hot-reloadable using the RON watcher utilities (see
//! `ron::setup_ron_watcher`); the controller configuration is built once at
//! startup through [`Settings::controller_config`].
use bevy::prelude::{KeyCode, Resource, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::controller::{ControllerConfig, ControllerError};
use crate::interaction::LayerMask;
use crate::player::body::{GRAVITY, MAX_FALL_SPEED};

/// Layer index the demo props live on.
pub const INTERACTABLE_LAYER: u8 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementSettings {
    #[serde(default = "MovementSettings::default_move_speed")]
    pub move_speed: f32, // Base walking speed in units per second.
    #[serde(default = "MovementSettings::default_gravity")]
    pub gravity: f32, // Vertical acceleration, negative is down.
    #[serde(default = "MovementSettings::default_max_fall_speed")]
    pub max_fall_speed: f32, // Terminal falling speed.
    #[serde(default = "MovementSettings::default_ground_snap")]
    pub ground_snap: f32, // How far below the feet the body looks for ground to stick to.
}

impl MovementSettings {
    fn default_move_speed() -> f32 { 6.0 }
    fn default_gravity() -> f32 { GRAVITY }
    fn default_max_fall_speed() -> f32 { MAX_FALL_SPEED }
    fn default_ground_snap() -> f32 { 0.3 }
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            move_speed: Self::default_move_speed(),
            gravity: Self::default_gravity(),
            max_fall_speed: Self::default_max_fall_speed(),
            ground_snap: Self::default_ground_snap(),
        }
    }
}

/// Interaction probe shape, relative to the character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionSettings {
    #[serde(default = "InteractionSettings::default_probe_radius")]
    pub probe_radius: f32, // Radius of the swept probe sphere.
    #[serde(default = "InteractionSettings::default_probe_length")]
    pub probe_length: f32, // How far the probe reaches.
    #[serde(default = "InteractionSettings::default_probe_origin")]
    pub probe_origin: [f32; 3], // Probe start, in the character's local frame.
    #[serde(default = "InteractionSettings::default_probe_direction")]
    pub probe_direction: [f32; 3], // Probe direction, in the character's local frame.
    #[serde(default = "InteractionSettings::default_layers")]
    pub layers: Vec<u8>, // Layer indices the probe may interact with.
}

impl InteractionSettings {
    fn default_probe_radius() -> f32 { 0.4 }
    fn default_probe_length() -> f32 { 1.6 }
    fn default_probe_origin() -> [f32; 3] { [0.0, 0.0, 0.3] }
    fn default_probe_direction() -> [f32; 3] { [0.0, 0.0, 1.0] }
    fn default_layers() -> Vec<u8> { vec![INTERACTABLE_LAYER] }
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            probe_radius: Self::default_probe_radius(),
            probe_length: Self::default_probe_length(),
            probe_origin: Self::default_probe_origin(),
            probe_direction: Self::default_probe_direction(),
            layers: Self::default_layers(),
        }
    }
}

/// Controls / input settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlsSettings {
    #[serde(default = "ControlsSettings::default_keybinds")]
    pub keybinds: HashMap<String, String>, // Map of action names to key identifiers (editable by user)
}

impl ControlsSettings {
    fn default_keybinds() -> HashMap<String, String> {
        [
            ("forward", "W"),
            ("back", "S"),
            ("left", "A"),
            ("right", "D"),
            ("interact", "E"),
            ("orbit_left", "Q"),
            ("orbit_right", "R"),
            ("toggle_debug", "F1"),
        ]
        .into_iter()
        .map(|(action, key)| (action.to_string(), key.to_string()))
        .collect()
    }

    /// Key bound to `action`, falling back to the default binding when the
    /// action is missing from the file. `None` if the name does not parse.
    #[must_use]
    pub fn key(&self, action: &str) -> Option<KeyCode> {
        match self.keybinds.get(action) {
            Some(name) => Settings::keycode_from_str(name),
            None => Self::default_keybinds().get(action).and_then(|n| Settings::keycode_from_str(n)),
        }
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { keybinds: Self::default_keybinds() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugSettings {
    #[serde(default)]
    pub draw_probe: bool, // Draw the interaction probe, ground normal and move direction.
    #[serde(default)]
    pub overlay: bool, // Show the text overlay at startup (F1 toggles it).
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub movement: MovementSettings,
    #[serde(default)]
    pub interaction: InteractionSettings,
    #[serde(default)]
    pub controls: ControlsSettings,
    #[serde(default)]
    pub debug: DebugSettings,
}

impl Settings {
    #[must_use]
    pub fn defaults() -> Self { Settings::default() }

    /// Build and validate the controller configuration.
    ///
    /// # Errors
    /// Any [`ControllerError`] raised by [`ControllerConfig::validate`].
    pub fn controller_config(&self) -> Result<ControllerConfig, ControllerError> {
        let config = ControllerConfig {
            move_speed: self.movement.move_speed,
            probe_radius: self.interaction.probe_radius,
            probe_length: self.interaction.probe_length,
            probe_origin: Vec3::from_array(self.interaction.probe_origin),
            probe_direction: Vec3::from_array(self.interaction.probe_direction),
            layers: LayerMask::from_layers(&self.interaction.layers),
            debug_draw: self.debug.draw_probe,
        };
        config.validate()?;
        Ok(config)
    }

    /// Convert a string key identifier (e.g. from `controls.keybinds`) into a
    /// `KeyCode`. Letters, digits, function keys, arrows and the common
    /// control keys are recognised.
    #[must_use]
    pub fn keycode_from_str(name: &str) -> Option<KeyCode> {
        let s = name.to_ascii_uppercase();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            const LETTERS: [KeyCode; 26] = [
                KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE,
                KeyCode::KeyF, KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ,
                KeyCode::KeyK, KeyCode::KeyL, KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO,
                KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR, KeyCode::KeyS, KeyCode::KeyT,
                KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX, KeyCode::KeyY,
                KeyCode::KeyZ,
            ];
            const DIGITS: [KeyCode; 10] = [
                KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
                KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
            ];
            if c.is_ascii_uppercase() {
                return Some(LETTERS[(c as u8 - b'A') as usize]);
            }
            if c.is_ascii_digit() {
                return Some(DIGITS[(c as u8 - b'0') as usize]);
            }
        }

        Some(match s.as_str() {
            // Function keys
            "F1" => KeyCode::F1,
            "F2" => KeyCode::F2,
            "F3" => KeyCode::F3,
            "F4" => KeyCode::F4,
            "F5" => KeyCode::F5,
            "F6" => KeyCode::F6,
            "F7" => KeyCode::F7,
            "F8" => KeyCode::F8,
            "F9" => KeyCode::F9,
            "F10" => KeyCode::F10,
            "F11" => KeyCode::F11,
            "F12" => KeyCode::F12,

            // Arrows
            "LEFT" | "ARROWLEFT" => KeyCode::ArrowLeft,
            "RIGHT" | "ARROWRIGHT" => KeyCode::ArrowRight,
            "UP" | "ARROWUP" => KeyCode::ArrowUp,
            "DOWN" | "ARROWDOWN" => KeyCode::ArrowDown,

            // Whitespace / control
            "ESC" | "ESCAPE" => KeyCode::Escape,
            "SPACE" => KeyCode::Space,
            "TAB" => KeyCode::Tab,
            "ENTER" | "RETURN" => KeyCode::Enter,

            // Modifiers
            "LSHIFT" | "SHIFT" => KeyCode::ShiftLeft,
            "RSHIFT" => KeyCode::ShiftRight,
            "LCTRL" | "CTRL" | "CONTROL" => KeyCode::ControlLeft,
            "RCTRL" => KeyCode::ControlRight,
            "LALT" | "ALT" => KeyCode::AltLeft,
            "RALT" => KeyCode::AltRight,

            _ => return None,
        })
    }
}

pub mod loader;
