//! Demo scene: a floor with a ramp, a gate, two levers, a crate and a wall.
//!
//! Every position below is written in controller space and converted with
//! `to_world` when spawned, so "+Z" reads as "away from the starting camera".
use bevy::prelude::*;
use topdown_controller::controller::PlayerController;
use topdown_controller::interaction::{Prop, PropRest, ProbeCollider};
use topdown_controller::player::{FollowCamera, GroundPatch, KinematicBody, Player};
use topdown_controller::settings::{Settings, INTERACTABLE_LAYER};
use topdown_controller::space::to_world;

/// Layer for scenery that blocks the interaction probe.
const SCENERY_LAYER: u8 = 0;

/// Controller built from the startup settings, cloned onto the player.
#[derive(Resource, Clone)]
pub struct StartingController(pub PlayerController);

fn cuboid(
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    size: Vec3,
    color: Color,
    transform: Transform,
) -> PbrBundle {
    PbrBundle {
        mesh: meshes.add(Cuboid::new(size.x, size.y, size.z)),
        material: materials.add(StandardMaterial { base_color: color, perceptual_roughness: 0.9, ..default() }),
        transform,
        ..default()
    }
}

/// Spawn lights, ground, props, the player and the follow camera.
#[allow(clippy::needless_pass_by_value)]
pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    starting: Res<StartingController>,
    settings: Res<Settings>,
) {
    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight { shadows_enabled: true, illuminance: 8000.0, ..default() },
        transform: Transform::from_xyz(4.0, 10.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });
    commands.spawn((
        PointLightBundle {
            point_light: PointLight { intensity: 200_000.0, range: 12.0, ..default() },
            ..default()
        },
        crate::PlayerFillLight,
    ));

    // floor
    let floor = GroundPatch::flat(Vec3::ZERO, Vec2::splat(20.0));
    commands.spawn((
        cuboid(&mut meshes, &mut materials, Vec3::new(40.0, 0.2, 40.0), Color::srgb(0.35, 0.4, 0.32),
            Transform::from_xyz(0.0, -0.1, 0.0)),
        floor,
    ));

    // ramp climbing 2 units over 8 along +Z, starting at z = 4
    let ramp = GroundPatch::ramp(Vec3::new(8.0, 1.0, 8.0), Vec2::new(2.0, 4.0), 2.0);
    let tilt = (2.0_f32 / 8.0).atan();
    let ramp_length = (8.0_f32 * 8.0 + 2.0 * 2.0).sqrt();
    commands.spawn((
        cuboid(&mut meshes, &mut materials, Vec3::new(4.0, 0.2, ramp_length), Color::srgb(0.55, 0.5, 0.42),
            Transform::from_translation(to_world(ramp.center) - Vec3::Y * 0.1).with_rotation(Quat::from_rotation_x(tilt))),
        ramp,
    ));

    // gate: hold to open
    let gate_at = Transform::from_translation(to_world(Vec3::new(0.0, 1.25, 6.0)));
    commands.spawn((
        cuboid(&mut meshes, &mut materials, Vec3::new(2.4, 2.5, 0.3), Color::srgb(0.45, 0.28, 0.15), gate_at),
        Prop::door("the gate"),
        PropRest(gate_at),
        ProbeCollider { radius: 1.0, layer: INTERACTABLE_LAYER },
        Name::new("Gate"),
    ));

    // levers: tap to toggle
    for (x, name) in [(-4.0, "the left lamp"), (4.0, "the right lamp")] {
        let at = Transform::from_translation(to_world(Vec3::new(x, 0.6, 3.0)));
        commands.spawn((
            cuboid(&mut meshes, &mut materials, Vec3::new(0.2, 1.2, 0.2), Color::srgb(0.8, 0.75, 0.2), at),
            Prop::lever(name),
            PropRest(at),
            ProbeCollider { radius: 0.4, layer: INTERACTABLE_LAYER },
            Name::new("Lever"),
        ));
    }

    // crate on the interaction layer that cannot be used
    commands.spawn((
        cuboid(&mut meshes, &mut materials, Vec3::ONE, Color::srgb(0.6, 0.45, 0.25),
            Transform::from_translation(to_world(Vec3::new(-3.0, 0.5, -3.0)))),
        ProbeCollider { radius: 0.6, layer: INTERACTABLE_LAYER },
        Name::new("Crate"),
    ));

    // wall on the scenery layer, in front of a lever the probe cannot reach through
    commands.spawn((
        cuboid(&mut meshes, &mut materials, Vec3::new(3.0, 2.0, 0.4), Color::srgb(0.5, 0.5, 0.55),
            Transform::from_translation(to_world(Vec3::new(4.0, 1.0, -3.0)))),
        ProbeCollider { radius: 0.9, layer: SCENERY_LAYER },
        Name::new("Wall"),
    ));
    let hidden_at = Transform::from_translation(to_world(Vec3::new(4.0, 0.6, -4.2)));
    commands.spawn((
        cuboid(&mut meshes, &mut materials, Vec3::new(0.2, 1.2, 0.2), Color::srgb(0.8, 0.75, 0.2), hidden_at),
        Prop::lever("the hidden lamp"),
        PropRest(hidden_at),
        ProbeCollider { radius: 0.4, layer: INTERACTABLE_LAYER },
        Name::new("Hidden lever"),
    ));

    // player
    let body = KinematicBody {
        gravity: settings.movement.gravity,
        max_fall_speed: settings.movement.max_fall_speed,
        ground_snap: settings.movement.ground_snap,
        ..default()
    };
    let spawn = to_world(Vec3::new(0.0, 2.0, 0.0));
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Capsule3d::new(0.4, 1.0)),
            material: materials.add(Color::srgb(0.2, 0.45, 0.85)),
            transform: Transform::from_translation(spawn),
            ..default()
        },
        Player,
        body,
        starting.0.clone(),
        Name::new("Player"),
    ));

    let follow = FollowCamera::default();
    commands.spawn((
        Camera3dBundle { transform: follow.transform_for(spawn), ..default() },
        follow,
    ));

    info!("demo scene ready");
}
