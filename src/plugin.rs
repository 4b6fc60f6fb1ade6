//! Bevy wiring for the controller.
//!
//! [`ControllerPlugin`] samples input each frame, runs the interaction tick
//! in `Update` and the movement tick in `FixedUpdate` at 60 Hz.
//! [`ControllerDebugPlugin`] adds the HUD, the debug overlay and the gizmos
//! and needs a windowed app.

use bevy::prelude::*;
use bevy::transform::TransformSystem;

use crate::controller::PlayerController;
use crate::input::{sample_input, InputSnapshot};
use crate::interaction::{animate_props, Prop, PropLookup, ProbeCollider, ProbeScene};
use crate::player::{follow_player, BodyMotion, FollowCamera, GroundPatch, KinematicBody, Player, ProjectedCamera};
use crate::settings::Settings;
use crate::space::from_world;
use crate::ui::{
    draw_controller_gizmos, setup_debug_overlay, spawn_hud, sync_tooltip, toggle_debug_overlay,
    update_debug_overlay, Tooltip,
};

pub const FIXED_TICK_HZ: f64 = 60.0;

pub struct ControllerPlugin;

impl Plugin for ControllerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Settings>()
            .init_resource::<InputSnapshot>()
            .init_resource::<Tooltip>()
            .insert_resource(Time::<Fixed>::from_hz(FIXED_TICK_HZ))
            .add_systems(FixedUpdate, run_movement)
            .add_systems(Update, (sample_input, run_interaction, (sync_tooltip, animate_props)).chain())
            .add_systems(PostUpdate, follow_player.before(TransformSystem::TransformPropagate));
    }
}

pub struct ControllerDebugPlugin;

impl Plugin for ControllerDebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_debug_overlay, spawn_hud))
            .add_systems(Update, (toggle_debug_overlay, update_debug_overlay).chain())
            .add_systems(Update, draw_controller_gizmos.after(run_interaction));
    }
}

/// Fixed-step movement for every player controller.
#[allow(clippy::needless_pass_by_value)]
pub fn run_movement(
    time: Res<Time>,
    input: Res<InputSnapshot>,
    ground: Query<&GroundPatch>,
    cameras: Query<(&Camera, &GlobalTransform), With<FollowCamera>>,
    mut players: Query<(&mut Transform, &mut KinematicBody, &mut PlayerController), With<Player>>,
) {
    let Ok((camera, camera_transform)) = cameras.get_single() else { return };
    let view = ProjectedCamera { camera, transform: camera_transform };
    let patches: Vec<GroundPatch> = ground.iter().copied().collect();
    let dt = time.delta_seconds();

    for (mut transform, mut body, mut controller) in &mut players {
        let mut motion = BodyMotion { transform: &mut transform, body: &mut body, ground: &patches };
        let locomotion = controller.tick_fixed(&input, dt, &mut motion, &view);
        trace!("locomotion: {locomotion:?}");
    }
}

/// Per-frame interaction probe and focus update for every player controller.
#[allow(clippy::needless_pass_by_value)]
pub fn run_interaction(
    time: Res<Time>,
    input: Res<InputSnapshot>,
    colliders: Query<(Entity, &GlobalTransform, &ProbeCollider)>,
    mut props: Query<&mut Prop>,
    mut tooltip: ResMut<Tooltip>,
    mut players: Query<(Entity, &Transform, &mut PlayerController), With<Player>>,
) {
    let dt = time.delta_seconds();
    let shown = tooltip.text.clone();
    let display = tooltip.bypass_change_detection();
    for (entity, transform, mut controller) in &mut players {
        let scene = ProbeScene::from_query(&colliders, Some(entity));
        let mut lookup = PropLookup { props: &mut props };
        let position = from_world(transform.translation);
        let outcome = controller.tick_variable(&input, dt, position, &scene, &mut lookup, display);
        trace!("interaction: {outcome:?}");
    }
    if tooltip.text != shown {
        tooltip.set_changed();
    }
}
