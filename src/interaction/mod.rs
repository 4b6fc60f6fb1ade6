//! Interaction probing and the focus state machine.
//!
//! A forward sphere-cast from the character finds at most one interactable
//! each tick. [`InteractionTracker`] remembers which one has focus and turns
//! the interact button into hold-progress or one-shot use calls on it.
//!
//! The tracker only talks to the world through the traits in this module:
//!
//! - [`WorldProbe`] answers the sphere-cast,
//! - [`InteractableLookup`] resolves a hit id to something [`Interactable`],
//! - [`TooltipDisplay`] shows or clears the prompt text.
//!
//! Focus is held as an id, never a reference, and is re-resolved through the
//! lookup every tick, so an entity despawned by the world simply drops focus.

pub mod probe;
pub mod props;
pub mod tracker;

use bevy::math::Vec3;

pub use probe::*;
pub use props::*;
pub use tracker::*;

/// Set of collision layers, one bit per layer index `0..32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    /// Mask containing `layers`. Indices of 32 and above are ignored.
    #[must_use]
    pub fn from_layers(layers: &[u8]) -> Self {
        Self(layers.iter().filter(|&&l| l < 32).fold(0, |m, &l| m | (1 << l)))
    }

    #[must_use]
    pub fn contains(self, layer: u8) -> bool {
        layer < 32 && self.0 & (1 << layer) != 0
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// A thick ray: sphere of `radius` swept `length` units along `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeRay {
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
    pub radius: f32,
    pub length: f32,
}

impl ProbeRay {
    #[must_use]
    pub fn end(&self) -> Vec3 {
        self.origin + self.direction * self.length
    }
}

/// Nearest thing a probe touched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit<Id> {
    pub target: Id,
    pub layer: u8,
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
}

/// World query answering sphere-casts. Controller space.
pub trait WorldProbe<Id> {
    fn cast(&self, ray: &ProbeRay) -> Option<ProbeHit<Id>>;
}

/// Who is interacting, passed along with every interaction call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionActor {
    pub position: Vec3,
    /// Facing yaw in degrees.
    pub facing: f32,
    /// Length of the tick issuing the call, in seconds.
    pub delta_seconds: f32,
}

/// Something the player can use, by holding or by tapping.
pub trait Interactable {
    /// `true` for hold-type interactions, `false` for tap-type.
    fn should_hold(&self) -> bool;

    /// Another tick of the button being held.
    fn add_progress(&mut self, actor: &InteractionActor);

    /// One completed tap.
    fn use_interaction(&mut self, actor: &InteractionActor);

    /// Prompt the actor with this object's tooltip.
    fn show_tooltip(&self, actor: &InteractionActor, display: &mut dyn TooltipDisplay);

    /// Drop accumulated progress and return to the idle presentation.
    fn reset(&mut self);
}

/// Resolves ids to live interactables.
///
/// Returns `None` both for ids that exist but cannot be interacted with and
/// for ids that no longer exist.
pub trait InteractableLookup<Id> {
    fn get_mut(&mut self, id: Id) -> Option<&mut dyn Interactable>;
}

/// The on-screen prompt line.
pub trait TooltipDisplay {
    fn show(&mut self, text: &str);
    fn clear(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_mask_membership() {
        let mask = LayerMask::from_layers(&[0, 3, 31, 40]);
        assert!(mask.contains(0));
        assert!(mask.contains(3));
        assert!(mask.contains(31));
        assert!(!mask.contains(1));
        assert!(!mask.contains(40));
        assert_eq!(mask.0, 1 | (1 << 3) | (1 << 31));
        assert!(LayerMask::from_layers(&[]).is_empty());
        assert!(LayerMask::ALL.contains(17));
    }
}
