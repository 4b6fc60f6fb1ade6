//! Player components and the movement half of the controller.
//!
//! - `movement`: camera-relative move direction with slope projection
//! - `aim`: facing yaw from the pointer position
//! - `body`: the motion collaborator contract and a kinematic body
//! - `camera`: the camera collaborator contract and the follow camera
//!
//! # Example:
//!
//! ```ignore
//! commands.spawn((
//!     PbrBundle::default(),
//!     Player,
//!     KinematicBody::default(),
//!     PlayerController::new(settings.controller_config())?,
//! ));
//! ```
pub mod aim;
pub mod body;
pub mod camera;
pub mod movement;

use bevy::prelude::*;

pub use aim::*;
pub use body::*;
pub use camera::*;
pub use movement::*;

/// Marker for the player-controlled character.
#[derive(Component, Debug, Default)]
pub struct Player;
