//! Motion collaborator: gravity, ground detection and translation.
//!
//! [`MoveComponent`] is the contract the controller drives each fixed tick.
//! [`BodyMotion`] is the implementation used by the demo: a kinematic body
//! that falls under gravity, probes a set of [`GroundPatch`]es beneath its
//! feet and snaps onto them. It works on a Bevy `Transform` but does all of
//! its math in controller space.

use bevy::math::{Vec2, Vec3};
use bevy::prelude::{Component, Transform};

use crate::space::{from_world, to_world, world_rotation, UP};

pub const GRAVITY: f32 = -32.0;
pub const MAX_FALL_SPEED: f32 = 50.0;

/// Contact reported by a successful ground probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContact {
    /// Contact point in controller space.
    pub point: Vec3,
    /// Unit surface normal at the contact.
    pub normal: Vec3,
}

/// Result of a ground probe.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GroundProbe {
    #[default]
    Airborne,
    Grounded(GroundContact),
}

impl GroundProbe {
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        matches!(self, GroundProbe::Grounded(_))
    }

    #[must_use]
    pub fn contact(&self) -> Option<&GroundContact> {
        match self {
            GroundProbe::Grounded(contact) => Some(contact),
            GroundProbe::Airborne => None,
        }
    }
}

/// What the controller needs from the physics body it drives.
///
/// All vectors and points are controller space, angles are degrees.
pub trait MoveComponent {
    /// Current body position.
    fn position(&self) -> Vec3;

    /// Turn the body to face `facing` degrees of yaw.
    fn rotate(&mut self, facing: f32);

    /// Integrate gravity over `dt` seconds.
    fn apply_gravity(&mut self, dt: f32);

    /// Move along `direction` at `speed` units per second for `dt` seconds.
    fn translate(&mut self, speed: f32, direction: Vec3, grounded: bool, dt: f32);

    /// Probe for ground right now.
    fn ground_contact(&self) -> GroundProbe;

    fn is_grounded(&self) -> bool {
        self.ground_contact().is_grounded()
    }
}

/// A walkable surface: a plane clipped to an axis-aligned XZ rectangle.
///
/// Stored in controller space.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct GroundPatch {
    /// A point on the plane, also the centre of the footprint.
    pub center: Vec3,
    /// Half size of the footprint along X and Z.
    pub half_extents: Vec2,
    /// Unit plane normal. Must point upwards (`normal.y > 0`).
    pub normal: Vec3,
}

impl GroundPatch {
    #[must_use]
    pub fn flat(center: Vec3, half_extents: Vec2) -> Self {
        Self { center, half_extents, normal: UP }
    }

    /// A ramp whose surface rises by `rise` over its full Z length.
    #[must_use]
    pub fn ramp(center: Vec3, half_extents: Vec2, rise: f32) -> Self {
        let run = half_extents.y * 2.0;
        let normal = Vec3::new(0.0, run, -rise).normalize();
        Self { center, half_extents, normal }
    }

    /// Surface height at `(x, z)`, or `None` outside the footprint.
    #[must_use]
    pub fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        let dx = x - self.center.x;
        let dz = z - self.center.z;
        if dx.abs() > self.half_extents.x || dz.abs() > self.half_extents.y || self.normal.y <= 0.0 {
            return None;
        }
        Some(self.center.y - (self.normal.x * dx + self.normal.z * dz) / self.normal.y)
    }
}

/// Short downward probe from `feet`.
///
/// Hits the highest patch surface between `skin` above the feet and
/// `max_distance` below them.
#[must_use]
pub fn probe_ground(patches: &[GroundPatch], feet: Vec3, skin: f32, max_distance: f32) -> GroundProbe {
    let mut best: Option<(f32, &GroundPatch)> = None;
    for patch in patches {
        let Some(h) = patch.height_at(feet.x, feet.z) else { continue };
        let gap = feet.y - h;
        if gap < -skin || gap > max_distance {
            continue;
        }
        if best.is_none_or(|(bh, _)| h > bh) {
            best = Some((h, patch));
        }
    }

    match best {
        Some((h, patch)) => GroundProbe::Grounded(GroundContact {
            point: Vec3::new(feet.x, h, feet.z),
            normal: patch.normal,
        }),
        None => GroundProbe::Airborne,
    }
}

/// Vertical state of a kinematic character body.
#[derive(Component, Debug, Clone)]
pub struct KinematicBody {
    /// Vertical speed in units per second (positive is up).
    pub vertical_velocity: f32,
    /// Distance from the transform origin down to the feet.
    pub half_height: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    /// How far below the feet the ground probe reaches.
    pub ground_snap: f32,
}

impl Default for KinematicBody {
    fn default() -> Self {
        Self {
            vertical_velocity: 0.0,
            half_height: 0.9,
            gravity: GRAVITY,
            max_fall_speed: MAX_FALL_SPEED,
            ground_snap: 0.3,
        }
    }
}

const SKIN: f32 = 0.05;

/// [`MoveComponent`] over one body's transform and the current ground set.
pub struct BodyMotion<'a> {
    pub transform: &'a mut Transform,
    pub body: &'a mut KinematicBody,
    pub ground: &'a [GroundPatch],
}

impl BodyMotion<'_> {
    fn feet(&self) -> Vec3 {
        self.position() - UP * self.body.half_height
    }

    fn set_position(&mut self, p: Vec3) {
        self.transform.translation = to_world(p);
    }

    /// Put the feet on the ground if the probe finds it within reach.
    fn settle(&mut self) -> bool {
        if self.body.vertical_velocity > 0.0 {
            return false;
        }
        let probe = probe_ground(self.ground, self.feet(), SKIN.max(-self.body.vertical_velocity), self.body.ground_snap);
        let Some(contact) = probe.contact() else { return false };
        let mut p = self.position();
        p.y = contact.point.y + self.body.half_height;
        self.set_position(p);
        self.body.vertical_velocity = 0.0;
        true
    }
}

impl MoveComponent for BodyMotion<'_> {
    fn position(&self) -> Vec3 {
        from_world(self.transform.translation)
    }

    fn rotate(&mut self, facing: f32) {
        self.transform.rotation = world_rotation(facing);
    }

    fn apply_gravity(&mut self, dt: f32) {
        if self.is_grounded() && self.body.vertical_velocity <= 0.0 {
            self.body.vertical_velocity = 0.0;
            return;
        }

        self.body.vertical_velocity += self.body.gravity * dt;
        if self.body.vertical_velocity < -self.body.max_fall_speed {
            self.body.vertical_velocity = -self.body.max_fall_speed;
        }

        let mut p = self.position();
        p.y += self.body.vertical_velocity * dt;
        self.set_position(p);
        self.settle();
    }

    fn translate(&mut self, speed: f32, direction: Vec3, grounded: bool, dt: f32) {
        if direction == Vec3::ZERO {
            return;
        }
        let p = self.position() + direction * speed * dt;
        self.set_position(p);
        if grounded {
            // keep contact when walking down a slope or off a small step
            self.settle();
        }
    }

    fn ground_contact(&self) -> GroundProbe {
        probe_ground(self.ground, self.feet(), SKIN, SKIN)
    }
}
