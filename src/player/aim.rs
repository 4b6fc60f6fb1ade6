//! Pointer aim: which way the character should face.
//!
//! The facing yaw comes from the screen, not the world: the vector from the
//! character's projected screen position to the pointer is run through the
//! same heading formula as movement input.

use bevy::math::Vec2;

use crate::player::movement::heading_degrees;

/// Facing yaw (degrees) for a pointer position relative to the character.
///
/// Both points are screen positions with y pointing up.
///
/// Returns `None` when the pointer sits exactly on the character, where the
/// aim vector has no direction. Callers keep their previous facing then.
#[must_use]
pub fn aim_yaw(character_screen: Vec2, pointer_screen: Vec2, camera_yaw: f32) -> Option<f32> {
    let aim = (pointer_screen - character_screen).try_normalize()?;
    Some(heading_degrees(aim, camera_yaw))
}
