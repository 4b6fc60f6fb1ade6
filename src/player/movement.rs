//! Camera-relative movement direction.
//!
//! Turns the raw 2D move axis into a controller-space direction. Input is
//! screen relative: `+y` means "away from the camera" and `+x` means "to the
//! camera's right", whatever way the camera is currently yawed. When the
//! character stands on ground the direction is bent onto the ground plane so
//! walking up or down a ramp follows its slope.

use bevy::math::{Vec2, Vec3};

use crate::player::body::GroundProbe;
use crate::space::{yaw_rotation, FORWARD, RIGHT};

/// Heading in degrees for a screen-relative 2D vector, offset by the camera yaw.
///
/// `atan2` takes `(x, y)`, not `(y, x)`: `+y` maps onto the camera forward
/// axis and `+x` onto the camera right axis, with angles growing clockwise.
#[inline]
#[must_use]
pub fn heading_degrees(input: Vec2, camera_yaw: f32) -> f32 {
    input.x.atan2(input.y).to_degrees() + camera_yaw
}

/// Resolve the intended movement direction for this tick.
///
/// # Arguments
/// * `input` - raw move axis from the input snapshot
/// * `camera_yaw` - current camera yaw in degrees (controller space)
/// * `ground` - fresh result of the character's ground probe
///
/// # Returns
/// `Vec3::ZERO` when `input` is exactly zero. Airborne, the forward axis
/// rotated to the heading. Grounded, `right × normal` where `right` is the
/// right axis rotated to the heading, which lies in the ground plane.
#[must_use]
pub fn resolve_move_direction(input: Vec2, camera_yaw: f32, ground: &GroundProbe) -> Vec3 {
    if input == Vec2::ZERO {
        return Vec3::ZERO;
    }

    let rotation = yaw_rotation(heading_degrees(input, camera_yaw));

    match ground {
        GroundProbe::Grounded(contact) => {
            let right = rotation * RIGHT;
            right.cross(contact.normal)
        }
        GroundProbe::Airborne => rotation * FORWARD,
    }
}
