//! Sphere-cast world probe over simple sphere colliders.
//!
//! Every entity that should block or answer the interaction probe carries a
//! [`ProbeCollider`]. Each tick the colliders are gathered into a
//! [`ProbeScene`], which answers [`WorldProbe`] casts in controller space.
//! The cast reports the nearest collider on *any* layer; filtering by layer
//! is the tracker's job, so a wall in front of a lever hides the lever.
//!
//! # Example
//!
//! ```
//! use bevy::math::Vec3;
//! use topdown_controller::interaction::{ProbeBody, ProbeRay, ProbeScene, WorldProbe};
//!
//! let scene = ProbeScene::new(vec![ProbeBody { id: 7u32, center: Vec3::new(0.0, 1.0, 3.0), radius: 0.5, layer: 2 }]);
//! let ray = ProbeRay { origin: Vec3::new(0.0, 1.0, 0.0), direction: Vec3::Z, radius: 0.25, length: 5.0 };
//! let hit = scene.cast(&ray).expect("should hit");
//! assert_eq!(hit.target, 7);
//! assert!((hit.distance - 2.25).abs() < 1e-5);
//! ```

use bevy::prelude::*;

use crate::interaction::{ProbeHit, ProbeRay, WorldProbe};
use crate::space::from_world;

/// Sphere collider seen by the interaction probe.
#[derive(Component, Debug, Clone, Copy)]
pub struct ProbeCollider {
    pub radius: f32,
    /// Collision layer index, `0..32`.
    pub layer: u8,
}

/// One collider, resolved to controller space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeBody<Id> {
    pub id: Id,
    pub center: Vec3,
    pub radius: f32,
    pub layer: u8,
}

/// Point-in-time snapshot of every probe collider.
#[derive(Debug, Clone, Default)]
pub struct ProbeScene<Id> {
    bodies: Vec<ProbeBody<Id>>,
}

impl<Id> ProbeScene<Id> {
    #[must_use]
    pub fn new(bodies: Vec<ProbeBody<Id>>) -> Self {
        Self { bodies }
    }
}

impl ProbeScene<Entity> {
    /// Gather colliders from the ECS, skipping `exclude` (the caster itself).
    #[must_use]
    pub fn from_query(
        query: &Query<(Entity, &GlobalTransform, &ProbeCollider)>,
        exclude: Option<Entity>,
    ) -> Self {
        let bodies = query
            .iter()
            .filter(|(entity, _, _)| Some(*entity) != exclude)
            .map(|(entity, transform, collider)| ProbeBody {
                id: entity,
                center: from_world(transform.translation()),
                radius: collider.radius,
                layer: collider.layer,
            })
            .collect();
        Self { bodies }
    }
}

/// Distance along `ray` at which its sphere first touches a sphere of
/// `radius` at `center`, or `None` if it never does within `ray.length`.
///
/// A probe that starts overlapping the sphere hits at distance `0`.
#[must_use]
pub fn sweep_sphere(ray: &ProbeRay, center: Vec3, radius: f32) -> Option<f32> {
    let reach = ray.radius + radius;
    let to_origin = ray.origin - center;
    let c = to_origin.length_squared() - reach * reach;
    if c <= 0.0 {
        return Some(0.0);
    }

    let b = to_origin.dot(ray.direction);
    if b > 0.0 {
        // moving away
        return None;
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t <= ray.length).then_some(t)
}

impl<Id: Copy> WorldProbe<Id> for ProbeScene<Id> {
    fn cast(&self, ray: &ProbeRay) -> Option<ProbeHit<Id>> {
        let mut nearest: Option<(f32, &ProbeBody<Id>)> = None;
        for body in &self.bodies {
            let Some(t) = sweep_sphere(ray, body.center, body.radius) else { continue };
            if nearest.is_none_or(|(best, _)| t < best) {
                nearest = Some((t, body));
            }
        }

        let (distance, body) = nearest?;
        let swept = ray.origin + ray.direction * distance;
        let normal = (swept - body.center).try_normalize().unwrap_or(-ray.direction);
        Some(ProbeHit {
            target: body.id,
            layer: body.layer,
            point: body.center + normal * body.radius,
            normal,
            distance,
        })
    }
}
