//! Camera collaborator and the top-down follow camera.
//!
//! [`CameraView`] is all the controller knows about the camera: its yaw and a
//! world-to-screen projection. [`ProjectedCamera`] implements it over a Bevy
//! camera. [`FollowCamera`] keeps the camera above and behind the player at a
//! fixed pitch and lets the user orbit it around the vertical axis.

use bevy::prelude::*;

use crate::player::Player;
use crate::space::{to_world, viewport_to_screen, world_rotation, yaw_of_world_forward};

const CAMERA_MIN_PITCH_DEG: f32 = 20.0;
const CAMERA_MAX_PITCH_DEG: f32 = 89.0;

/// Camera as seen by the controller.
pub trait CameraView {
    /// Camera yaw in degrees, controller space.
    fn yaw_degrees(&self) -> f32;

    /// Project a controller-space point to y-up screen pixels.
    ///
    /// `None` when the point is behind the camera or outside its viewport.
    fn world_to_screen(&self, point: Vec3) -> Option<Vec2>;
}

/// [`CameraView`] over a Bevy camera and its global transform.
pub struct ProjectedCamera<'a> {
    pub camera: &'a Camera,
    pub transform: &'a GlobalTransform,
}

impl CameraView for ProjectedCamera<'_> {
    fn yaw_degrees(&self) -> f32 {
        yaw_of_world_forward(self.transform.forward().as_vec3())
    }

    fn world_to_screen(&self, point: Vec3) -> Option<Vec2> {
        let viewport = self.camera.world_to_viewport(self.transform, to_world(point))?;
        let height = self.camera.logical_viewport_size()?.y;
        Some(viewport_to_screen(viewport, height))
    }
}

/// Orbit parameters of the top-down camera.
///
/// - `yaw`: orbit angle in degrees, controller space (0 = looking forward).
/// - `pitch`: downward tilt in degrees, clamped to a top-down range.
#[derive(Component, Debug, Clone)]
pub struct FollowCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    /// Orbit speed in degrees per second.
    pub turn_speed: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self { yaw: 0.0, pitch: 55.0, distance: 14.0, turn_speed: 90.0 }
    }
}

impl FollowCamera {
    /// Orbit by `direction` (-1, 0 or 1) for `dt` seconds and clamp the pitch.
    pub fn apply_turn(&mut self, direction: f32, dt: f32) {
        self.yaw = (self.yaw + direction * self.turn_speed * dt).rem_euclid(360.0);
        self.pitch = self.pitch.clamp(CAMERA_MIN_PITCH_DEG, CAMERA_MAX_PITCH_DEG);
    }

    /// Camera transform looking at `target` (Bevy world space).
    #[must_use]
    pub fn transform_for(&self, target: Vec3) -> Transform {
        let back = world_rotation(self.yaw) * Vec3::Z;
        let pitch = self.pitch.to_radians();
        let offset = back * pitch.cos() * self.distance + Vec3::Y * pitch.sin() * self.distance;
        Transform::from_translation(target + offset).looking_at(target, Vec3::Y)
    }
}

/// Keep every follow camera framed on the player and apply orbit input.
#[allow(clippy::needless_pass_by_value)]
pub fn follow_player(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<crate::settings::Settings>,
    player_query: Query<&Transform, (With<Player>, Without<FollowCamera>)>,
    mut camera_query: Query<(&mut Transform, &mut FollowCamera)>,
) {
    let Ok(player) = player_query.get_single() else { return };

    let controls = &settings.controls;
    let mut turn = 0.0;
    if controls.key("orbit_left").is_some_and(|k| keyboard.pressed(k)) {
        turn -= 1.0;
    }
    if controls.key("orbit_right").is_some_and(|k| keyboard.pressed(k)) {
        turn += 1.0;
    }

    for (mut transform, mut follow) in &mut camera_query {
        follow.apply_turn(turn, time.delta_seconds());
        *transform = follow.transform_for(player.translation);
    }
}
