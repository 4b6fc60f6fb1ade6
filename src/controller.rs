//! The player controller: configuration plus the two per-tick entry points.
//!
//! [`PlayerController::tick_fixed`] runs on the fixed physics step and turns
//! input into facing and movement on the motion collaborator.
//! [`PlayerController::tick_variable`] runs once per frame and drives the
//! interaction probe and focus tracker. Neither reads devices or engine
//! state directly; all collaborators are passed in.

use bevy::prelude::{Component, Entity, Vec3};
use thiserror::Error;

use crate::input::InputSnapshot;
use crate::interaction::{
    InteractableLookup, InteractionActor, InteractionOutcome, InteractionTracker, LayerMask, ProbeRay,
    TooltipDisplay, WorldProbe,
};
use crate::player::{aim_yaw, resolve_move_direction, CameraView, GroundProbe, MoveComponent};
use crate::space::yaw_rotation;

/// Rejected controller configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControllerError {
    #[error("move speed must be positive and finite, got {0}")]
    InvalidMoveSpeed(f32),
    #[error("probe radius must be positive and finite, got {0}")]
    InvalidProbeRadius(f32),
    #[error("probe length must be positive and finite, got {0}")]
    InvalidProbeLength(f32),
    #[error("probe direction must be a non-zero finite vector, got {0}")]
    InvalidProbeDirection(Vec3),
    #[error("probe origin must be finite, got {0}")]
    InvalidProbeOrigin(Vec3),
    #[error("interaction layer mask is empty")]
    EmptyLayerMask,
}

/// Controller tuning, fixed after construction.
///
/// The probe origin and direction are in the character's local frame
/// (controller space, before the facing rotation).
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    pub move_speed: f32,
    pub probe_radius: f32,
    pub probe_length: f32,
    pub probe_origin: Vec3,
    pub probe_direction: Vec3,
    pub layers: LayerMask,
    pub debug_draw: bool,
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

impl ControllerConfig {
    /// # Errors
    /// The first field found out of range, as a [`ControllerError`].
    pub fn validate(&self) -> Result<(), ControllerError> {
        if !positive(self.move_speed) {
            return Err(ControllerError::InvalidMoveSpeed(self.move_speed));
        }
        if !positive(self.probe_radius) {
            return Err(ControllerError::InvalidProbeRadius(self.probe_radius));
        }
        if !positive(self.probe_length) {
            return Err(ControllerError::InvalidProbeLength(self.probe_length));
        }
        if !self.probe_origin.is_finite() {
            return Err(ControllerError::InvalidProbeOrigin(self.probe_origin));
        }
        if !self.probe_direction.is_finite() || self.probe_direction.length_squared() == 0.0 {
            return Err(ControllerError::InvalidProbeDirection(self.probe_direction));
        }
        if self.layers.is_empty() {
            return Err(ControllerError::EmptyLayerMask);
        }
        Ok(())
    }
}

/// What one fixed tick did to the body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Locomotion {
    /// Movement direction handed to the body, controller space.
    pub direction: Vec3,
    /// Facing yaw in degrees.
    pub facing: f32,
    pub ground: GroundProbe,
}

/// Top-down character controller.
#[derive(Component, Debug, Clone)]
pub struct PlayerController {
    config: ControllerConfig,
    tracker: InteractionTracker<Entity>,
    facing: f32,
    last_locomotion: Locomotion,
}

impl PlayerController {
    /// # Errors
    /// [`ControllerError`] if `config` does not validate.
    pub fn new(config: ControllerConfig) -> Result<Self, ControllerError> {
        config.validate()?;
        Ok(Self {
            config,
            tracker: InteractionTracker::new(),
            facing: 0.0,
            last_locomotion: Locomotion::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[must_use]
    pub fn tracker(&self) -> &InteractionTracker<Entity> {
        &self.tracker
    }

    /// Facing yaw in degrees.
    #[must_use]
    pub fn facing(&self) -> f32 {
        self.facing
    }

    #[must_use]
    pub fn last_locomotion(&self) -> &Locomotion {
        &self.last_locomotion
    }

    /// Fixed-step movement: aim, rotate, gravity, move.
    ///
    /// The facing follows the pointer. With no pointer, or the pointer right
    /// on the character, the previous facing is kept.
    pub fn tick_fixed(
        &mut self,
        input: &InputSnapshot,
        dt: f32,
        body: &mut dyn MoveComponent,
        camera: &dyn CameraView,
    ) -> Locomotion {
        let camera_yaw = camera.yaw_degrees();

        if let Some(pointer) = input.pointer
            && let Some(character) = camera.world_to_screen(body.position())
            && let Some(yaw) = aim_yaw(character, pointer, camera_yaw)
        {
            self.facing = yaw;
        }
        body.rotate(self.facing);

        body.apply_gravity(dt);
        let ground = body.ground_contact();
        let direction = resolve_move_direction(input.move_axis, camera_yaw, &ground);
        body.translate(self.config.move_speed, direction, ground.is_grounded(), dt);

        self.last_locomotion = Locomotion { direction, facing: self.facing, ground };
        self.last_locomotion
    }

    /// The interaction probe for a character at `position`, turned to the
    /// current facing.
    #[must_use]
    pub fn probe_ray(&self, position: Vec3) -> ProbeRay {
        let turn = yaw_rotation(self.facing);
        ProbeRay {
            origin: position + turn * self.config.probe_origin,
            direction: (turn * self.config.probe_direction).normalize_or_zero(),
            radius: self.config.probe_radius,
            length: self.config.probe_length,
        }
    }

    /// Per-frame interaction: probe, update focus, dispatch the button.
    pub fn tick_variable(
        &mut self,
        input: &InputSnapshot,
        dt: f32,
        position: Vec3,
        probe: &dyn WorldProbe<Entity>,
        lookup: &mut dyn InteractableLookup<Entity>,
        display: &mut dyn TooltipDisplay,
    ) -> InteractionOutcome<Entity> {
        let hit = probe.cast(&self.probe_ray(position));
        let actor = InteractionActor { position, facing: self.facing, delta_seconds: dt };
        self.tracker.tick(hit, self.config.layers, input.interact, &actor, lookup, display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InteractButton;
    use crate::interaction::{Interactable, ProbeHit};
    use crate::player::GroundContact;
    use bevy::math::Vec2;
    use std::cell::RefCell;

    fn config() -> ControllerConfig {
        ControllerConfig {
            move_speed: 5.0,
            probe_radius: 0.4,
            probe_length: 2.0,
            probe_origin: Vec3::new(0.0, 0.0, 0.5),
            probe_direction: Vec3::Z,
            layers: LayerMask::from_layers(&[3]),
            debug_draw: false,
        }
    }

    #[derive(Default)]
    struct Body {
        position: Vec3,
        ground: GroundProbe,
        calls: Vec<&'static str>,
        facing: Option<f32>,
        moved: Option<(f32, Vec3, bool)>,
    }

    impl MoveComponent for Body {
        fn position(&self) -> Vec3 {
            self.position
        }
        fn rotate(&mut self, facing: f32) {
            self.calls.push("rotate");
            self.facing = Some(facing);
        }
        fn apply_gravity(&mut self, _dt: f32) {
            self.calls.push("gravity");
        }
        fn translate(&mut self, speed: f32, direction: Vec3, grounded: bool, _dt: f32) {
            self.calls.push("translate");
            self.moved = Some((speed, direction, grounded));
        }
        fn ground_contact(&self) -> GroundProbe {
            self.ground
        }
    }

    /// Straight-down camera: controller (x, z) maps to screen (x, y) scaled by 10.
    struct Camera {
        yaw: f32,
    }

    impl CameraView for Camera {
        fn yaw_degrees(&self) -> f32 {
            self.yaw
        }
        fn world_to_screen(&self, point: Vec3) -> Option<Vec2> {
            Some(Vec2::new(point.x, point.z) * 10.0 + Vec2::splat(500.0))
        }
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn each_invalid_field_is_rejected() {
        let cases: Vec<(fn(&mut ControllerConfig), fn(&ControllerError) -> bool)> = vec![
            (|c| c.move_speed = 0.0, |e| matches!(e, ControllerError::InvalidMoveSpeed(_))),
            (|c| c.move_speed = f32::NAN, |e| matches!(e, ControllerError::InvalidMoveSpeed(_))),
            (|c| c.probe_radius = -1.0, |e| matches!(e, ControllerError::InvalidProbeRadius(_))),
            (|c| c.probe_length = f32::INFINITY, |e| matches!(e, ControllerError::InvalidProbeLength(_))),
            (|c| c.probe_origin = Vec3::splat(f32::NAN), |e| matches!(e, ControllerError::InvalidProbeOrigin(_))),
            (|c| c.probe_direction = Vec3::ZERO, |e| matches!(e, ControllerError::InvalidProbeDirection(_))),
            (|c| c.layers = LayerMask::NONE, |e| *e == ControllerError::EmptyLayerMask),
        ];
        for (break_it, expected) in cases {
            let mut c = config();
            break_it(&mut c);
            let err = PlayerController::new(c).unwrap_err();
            assert!(expected(&err), "unexpected {err}");
        }
        assert!(PlayerController::new(config()).is_ok());
    }

    #[test]
    fn fixed_tick_runs_body_in_order() {
        let mut controller = PlayerController::new(config()).unwrap();
        let mut body = Body::default();
        let input = InputSnapshot::default().with_move(Vec2::Y);
        controller.tick_fixed(&input, 1.0 / 60.0, &mut body, &Camera { yaw: 0.0 });
        assert_eq!(body.calls, ["rotate", "gravity", "translate"]);
    }

    #[test]
    fn airborne_forward_follows_camera_yaw() {
        let mut controller = PlayerController::new(config()).unwrap();
        let mut body = Body::default();
        let input = InputSnapshot::default().with_move(Vec2::Y);
        let motion = controller.tick_fixed(&input, 0.1, &mut body, &Camera { yaw: 90.0 });
        assert!(close(motion.direction, Vec3::X));
        let (speed, direction, grounded) = body.moved.unwrap();
        assert_eq!(speed, 5.0);
        assert!(close(direction, Vec3::X));
        assert!(!grounded);
    }

    #[test]
    fn grounded_flag_reaches_translate() {
        let mut controller = PlayerController::new(config()).unwrap();
        let mut body = Body {
            ground: GroundProbe::Grounded(GroundContact { point: Vec3::ZERO, normal: Vec3::Y }),
            ..Default::default()
        };
        let input = InputSnapshot::default().with_move(Vec2::X);
        let motion = controller.tick_fixed(&input, 0.1, &mut body, &Camera { yaw: 0.0 });
        assert!(motion.ground.is_grounded());
        assert!(close(motion.direction, Vec3::X));
        assert!(body.moved.unwrap().2);
    }

    #[test]
    fn pointer_sets_facing_and_degenerate_aim_keeps_it() {
        let mut controller = PlayerController::new(config()).unwrap();
        let mut body = Body { position: Vec3::new(2.0, 0.0, 3.0), ..Default::default() };
        let camera = Camera { yaw: 0.0 };
        let at_character = camera.world_to_screen(body.position).unwrap();

        let right = InputSnapshot::default().with_pointer(at_character + Vec2::new(50.0, 0.0));
        controller.tick_fixed(&right, 0.1, &mut body, &camera);
        assert!((controller.facing() - 90.0).abs() < 1e-4);

        let on_top = InputSnapshot::default().with_pointer(at_character);
        controller.tick_fixed(&on_top, 0.1, &mut body, &camera);
        assert!((controller.facing() - 90.0).abs() < 1e-4);
        assert!((body.facing.unwrap() - 90.0).abs() < 1e-4);

        controller.tick_fixed(&InputSnapshot::default(), 0.1, &mut body, &camera);
        assert!((controller.facing() - 90.0).abs() < 1e-4);
    }

    #[test]
    fn zero_input_does_not_move() {
        let mut controller = PlayerController::new(config()).unwrap();
        let mut body = Body::default();
        let motion = controller.tick_fixed(&InputSnapshot::default(), 0.1, &mut body, &Camera { yaw: 33.0 });
        assert_eq!(motion.direction, Vec3::ZERO);
    }

    struct RecordingProbe {
        last: RefCell<Option<ProbeRay>>,
        hit: Option<ProbeHit<Entity>>,
    }

    impl WorldProbe<Entity> for RecordingProbe {
        fn cast(&self, ray: &ProbeRay) -> Option<ProbeHit<Entity>> {
            *self.last.borrow_mut() = Some(*ray);
            self.hit
        }
    }

    struct Lever {
        id: Entity,
        uses: u32,
    }

    impl Interactable for Lever {
        fn should_hold(&self) -> bool {
            false
        }
        fn add_progress(&mut self, _: &InteractionActor) {}
        fn use_interaction(&mut self, _: &InteractionActor) {
            self.uses += 1;
        }
        fn show_tooltip(&self, _: &InteractionActor, display: &mut dyn TooltipDisplay) {
            display.show("lever");
        }
        fn reset(&mut self) {}
    }

    impl InteractableLookup<Entity> for Lever {
        fn get_mut(&mut self, id: Entity) -> Option<&mut dyn Interactable> {
            (id == self.id).then_some(self as &mut dyn Interactable)
        }
    }

    #[derive(Default)]
    struct Line(Option<String>);

    impl TooltipDisplay for Line {
        fn show(&mut self, text: &str) {
            self.0 = Some(text.to_owned());
        }
        fn clear(&mut self) {
            self.0 = None;
        }
    }

    #[test]
    fn probe_turns_with_facing() {
        let mut controller = PlayerController::new(config()).unwrap();
        let mut body = Body::default();
        let camera = Camera { yaw: 0.0 };
        let at = camera.world_to_screen(Vec3::ZERO).unwrap();
        controller.tick_fixed(&InputSnapshot::default().with_pointer(at + Vec2::X), 0.1, &mut body, &camera);

        let ray = controller.probe_ray(Vec3::new(1.0, 1.0, 1.0));
        assert!(close(ray.direction, Vec3::X));
        assert!(close(ray.origin, Vec3::new(1.5, 1.0, 1.0)));
        assert_eq!(ray.radius, 0.4);
        assert_eq!(ray.length, 2.0);
    }

    #[test]
    fn variable_tick_probes_and_dispatches() {
        let id = Entity::from_raw(4);
        let mut controller = PlayerController::new(config()).unwrap();
        let mut lever = Lever { id, uses: 0 };
        let mut line = Line::default();
        let probe = RecordingProbe {
            last: RefCell::new(None),
            hit: Some(ProbeHit { target: id, layer: 3, point: Vec3::Z, normal: -Vec3::Z, distance: 0.5 }),
        };
        let position = Vec3::new(0.0, 1.0, 0.0);

        let idle = InputSnapshot::default();
        let outcome = controller.tick_variable(&idle, 0.016, position, &probe, &mut lever, &mut line);
        assert_eq!(outcome, InteractionOutcome::Tooltip(id));
        assert_eq!(line.0.as_deref(), Some("lever"));
        assert!(close(probe.last.borrow().unwrap().origin, Vec3::new(0.0, 1.0, 0.5)));

        let tap = InputSnapshot::default().with_interact(InteractButton::TAP);
        let outcome = controller.tick_variable(&tap, 0.016, position, &probe, &mut lever, &mut line);
        assert_eq!(outcome, InteractionOutcome::Used(id));
        assert_eq!(lever.uses, 1);
        assert_eq!(controller.tracker().focus(), Some(id));
    }
}
