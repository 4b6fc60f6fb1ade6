//! Controller space and conversions to and from Bevy world space.
//!
//! The controller math works in a Y-up frame where `+Z` is forward and `+X`
//! is right, with yaw measured in degrees clockwise when seen from above
//! (`0` = forward, `90` = right). Bevy is right-handed with `-Z` forward, so
//! the two frames differ by a mirror on the Z axis. Everything that crosses
//! the engine boundary goes through the helpers here.
//!
//! Screen-space vectors handed to the controller are y-up. Bevy viewport and
//! cursor coordinates are y-down and are flipped by [`viewport_to_screen`].

use bevy::math::{Quat, Vec2, Vec3};

/// Forward axis in controller space.
pub const FORWARD: Vec3 = Vec3::Z;
/// Right axis in controller space.
pub const RIGHT: Vec3 = Vec3::X;
/// Vertical axis, shared by both frames.
pub const UP: Vec3 = Vec3::Y;

/// Rotation by `degrees` of clockwise yaw around the vertical axis.
#[inline]
#[must_use]
pub fn yaw_rotation(degrees: f32) -> Quat {
    Quat::from_rotation_y(degrees.to_radians())
}

/// Map a controller-space vector or point into Bevy world space.
#[inline]
#[must_use]
pub fn to_world(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, -v.z)
}

/// Map a Bevy world-space vector or point into controller space.
#[inline]
#[must_use]
pub fn from_world(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, -v.z)
}

/// Bevy rotation facing the controller-space yaw `degrees`.
#[inline]
#[must_use]
pub fn world_rotation(degrees: f32) -> Quat {
    Quat::from_rotation_y(-degrees.to_radians())
}

/// Clockwise yaw, in degrees, of a Bevy world-space forward vector.
///
/// Only the horizontal part is used; a vertical vector yields `0`.
#[must_use]
pub fn yaw_of_world_forward(forward: Vec3) -> f32 {
    let f = from_world(forward);
    if f.x == 0.0 && f.z == 0.0 {
        return 0.0;
    }
    f.x.atan2(f.z).to_degrees()
}

/// Convert a y-down viewport position into the y-up screen convention.
#[inline]
#[must_use]
pub fn viewport_to_screen(viewport: Vec2, viewport_height: f32) -> Vec2 {
    Vec2::new(viewport.x, viewport_height - viewport.y)
}

/// Wrap an angle in degrees into `[0, 360)`.
#[inline]
#[must_use]
pub fn wrap_degrees(degrees: f32) -> f32 {
    degrees.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn quarter_turn_maps_forward_to_right() {
        assert!(close(yaw_rotation(90.0) * FORWARD, RIGHT));
        assert!(close(yaw_rotation(-90.0) * FORWARD, -RIGHT));
        assert!(close(yaw_rotation(180.0) * FORWARD, -FORWARD));
    }

    #[test]
    fn controller_forward_is_bevy_forward() {
        assert!(close(to_world(FORWARD), Vec3::NEG_Z));
        assert!(close(to_world(RIGHT), Vec3::X));
        assert!(close(from_world(to_world(Vec3::new(1.0, 2.0, 3.0))), Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn world_rotation_agrees_with_yaw_rotation() {
        for deg in [0.0_f32, 30.0, 90.0, 135.0, -60.0, 270.0] {
            let via_controller = to_world(yaw_rotation(deg) * FORWARD);
            let via_world = world_rotation(deg) * Vec3::NEG_Z;
            assert!(close(via_controller, via_world), "{deg}");
        }
    }

    #[test]
    fn yaw_of_rotated_forward_round_trips() {
        for deg in [0.0_f32, 45.0, 90.0, 170.0, -120.0] {
            let fwd = world_rotation(deg) * Vec3::NEG_Z;
            let back = yaw_of_world_forward(fwd);
            let diff = wrap_degrees(back - deg);
            assert!(diff < 1e-3 || diff > 360.0 - 1e-3, "{deg} -> {back}");
        }
        // straight down has no heading
        assert_eq!(yaw_of_world_forward(Vec3::NEG_Y), 0.0);
    }

    #[test]
    fn viewport_flip() {
        assert_eq!(viewport_to_screen(Vec2::new(10.0, 0.0), 600.0), Vec2::new(10.0, 600.0));
        assert_eq!(viewport_to_screen(Vec2::new(10.0, 600.0), 600.0), Vec2::new(10.0, 0.0));
    }
}
