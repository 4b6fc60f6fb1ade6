//! Per-tick input snapshot.
//!
//! The controller never reads devices directly. Once per frame
//! [`sample_input`] folds the keyboard and the cursor into an
//! [`InputSnapshot`] resource using the key bindings from the settings, and
//! both controller ticks read that snapshot.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::settings::Settings;
use crate::space::viewport_to_screen;

/// State of the interact button this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractButton {
    /// A press completed this tick.
    pub pressed: bool,
    /// The button is down.
    pub held: bool,
    /// The button went up this tick.
    pub released: bool,
}

impl InteractButton {
    pub const IDLE: Self = Self { pressed: false, held: false, released: false };
    /// Went down this tick and is still down.
    pub const DOWN: Self = Self { pressed: true, held: true, released: false };
    /// Down since an earlier tick.
    pub const HELD: Self = Self { pressed: false, held: true, released: false };
    /// Went up this tick.
    pub const RELEASED: Self = Self { pressed: false, held: false, released: true };
    /// Pressed and released within the same tick.
    pub const TAP: Self = Self { pressed: true, held: false, released: true };

    #[must_use]
    pub fn from_button<T>(input: &ButtonInput<T>, button: T) -> Self
    where
        T: Copy + Eq + std::hash::Hash + Send + Sync + 'static,
    {
        Self {
            pressed: input.just_pressed(button),
            held: input.pressed(button),
            released: input.just_released(button),
        }
    }
}

/// Everything the controller reads from the player in one tick.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// Screen-relative move axis: `+y` away from the camera, `+x` to its right.
    pub move_axis: Vec2,
    /// Pointer position in y-up screen pixels, if the cursor is in the window.
    pub pointer: Option<Vec2>,
    pub interact: InteractButton,
}

impl InputSnapshot {
    #[must_use]
    pub fn with_move(mut self, axis: Vec2) -> Self {
        self.move_axis = axis;
        self
    }

    #[must_use]
    pub fn with_pointer(mut self, pointer: Vec2) -> Self {
        self.pointer = Some(pointer);
        self
    }

    #[must_use]
    pub fn with_interact(mut self, interact: InteractButton) -> Self {
        self.interact = interact;
        self
    }
}

/// Combine four directional flags into a move axis no longer than 1.
#[must_use]
pub fn move_axis(forward: bool, back: bool, left: bool, right: bool) -> Vec2 {
    let mut axis = Vec2::ZERO;
    if forward {
        axis.y += 1.0;
    }
    if back {
        axis.y -= 1.0;
    }
    if right {
        axis.x += 1.0;
    }
    if left {
        axis.x -= 1.0;
    }
    if axis.length_squared() > 1.0 {
        axis = axis.normalize();
    }
    axis
}

/// Sample keyboard and cursor into the [`InputSnapshot`] resource.
#[allow(clippy::needless_pass_by_value)]
pub fn sample_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut snapshot: ResMut<InputSnapshot>,
) {
    let controls = &settings.controls;
    let down = |name: &str| controls.key(name).is_some_and(|k| keyboard.pressed(k));

    snapshot.move_axis = move_axis(down("forward"), down("back"), down("left"), down("right"));
    snapshot.interact = controls
        .key("interact")
        .map_or(InteractButton::IDLE, |k| InteractButton::from_button(&keyboard, k));
    snapshot.pointer = windows
        .get_single()
        .ok()
        .and_then(|w| w.cursor_position().map(|p| viewport_to_screen(p, w.height())));
}
