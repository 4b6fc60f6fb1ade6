//! User interface: tooltip line, debug overlay and debug gizmos.
//!
//! The [`Tooltip`] resource is the controller's display collaborator; a
//! text node at the bottom of the screen mirrors it. The debug overlay
//! periodically shows FPS and the controller state and is toggled by the
//! `toggle_debug` key binding (F1 by default).

use crate::controller::PlayerController;
use crate::interaction::TooltipDisplay;
use crate::player::Player;
use crate::settings::Settings;
use crate::space::{from_world, to_world, wrap_degrees};
use bevy::diagnostic::{Diagnostic, DiagnosticsStore};
use bevy::prelude::*;

/// Prompt text currently shown to the player.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub text: Option<String>,
}

impl TooltipDisplay for Tooltip {
    fn show(&mut self, text: &str) {
        if self.text.as_deref() != Some(text) {
            self.text = Some(text.to_owned());
        }
    }

    fn clear(&mut self) {
        self.text = None;
    }
}

#[derive(Component)]
pub struct TooltipText;

/// State for the debug overlay visibility.
#[derive(Resource, Default)]
pub struct DebugOverlayState {
    /// Whether the overlay is currently visible.
    pub visible: bool,
}

#[derive(Resource, Default)]
pub struct DebugOverlayTimer(pub Timer);

#[derive(Component)]
pub struct DebugOverlayText;

/// Insert debug overlay resources, visible at start if configured.
#[allow(clippy::needless_pass_by_value)]
pub fn setup_debug_overlay(mut commands: Commands, settings: Res<Settings>) {
    commands.insert_resource(DebugOverlayTimer(Timer::from_seconds(0.25, TimerMode::Repeating)));
    commands.insert_resource(DebugOverlayState { visible: settings.debug.overlay });
}

/// Spawn the tooltip line and the debug overlay text.
pub fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        TextBundle::from_section(
            "",
            TextStyle { font_size: 24.0, color: Color::WHITE, ..default() },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            bottom: Val::Px(40.0),
            left: Val::Percent(40.0),
            ..default()
        }),
        TooltipText,
    ));

    commands.spawn((
        TextBundle::from_section(
            "",
            TextStyle { font_size: 18.0, color: Color::srgb(1.0, 1.0, 0.0), ..default() },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            ..default()
        }),
        DebugOverlayText,
    ));
}

/// Copy the [`Tooltip`] resource into its text node when it changes.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_tooltip(tooltip: Res<Tooltip>, mut query: Query<&mut Text, With<TooltipText>>) {
    if !tooltip.is_changed() {
        return;
    }
    for mut text in &mut query {
        text.sections[0].value = tooltip.text.clone().unwrap_or_default();
    }
}

/// Toggle the debug overlay on the `toggle_debug` binding.
#[allow(clippy::needless_pass_by_value)]
pub fn toggle_debug_overlay(
    mut state: ResMut<DebugOverlayState>,
    settings: Res<Settings>,
    input: Res<ButtonInput<KeyCode>>,
) {
    if settings.controls.key("toggle_debug").is_some_and(|k| input.just_pressed(k)) {
        state.visible = !state.visible;
    }
}

/// Eight-point compass label for a controller yaw, 0 = north.
#[must_use]
pub fn compass(yaw: f32) -> &'static str {
    const POINTS: [&str; 8] = ["N ↑", "NE ↗", "E →", "SE ↘", "S ↓", "SW ↙", "W ←", "NW ↖"];
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let sector = ((wrap_degrees(yaw) + 22.5) / 45.0) as usize % 8;
    POINTS[sector]
}

#[derive(bevy::ecs::system::SystemParam)]
pub struct DebugOverlayCtx<'w, 's> {
    pub diagnostics: Option<Res<'w, DiagnosticsStore>>,
    pub state: Res<'w, DebugOverlayState>,
    pub time: Res<'w, Time>,
    pub timer: ResMut<'w, DebugOverlayTimer>,
    pub query: Query<'w, 's, &'static mut Text, With<DebugOverlayText>>,
    pub player_query: Query<'w, 's, (&'static Transform, &'static PlayerController), With<Player>>,
}

/// Refresh the debug overlay text on a timer.
pub fn update_debug_overlay(mut ctx: DebugOverlayCtx<'_, '_>) {
    if !ctx.timer.0.tick(ctx.time.delta()).just_finished() {
        return;
    }

    let Ok(mut text) = ctx.query.get_single_mut() else { return };

    if !ctx.state.visible {
        text.sections[0].value = String::new();
        return;
    }

    let fps = ctx
        .diagnostics
        .as_ref()
        .and_then(|d| d.get(&bevy::diagnostic::FrameTimeDiagnosticsPlugin::FPS))
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);

    let body = if let Ok((transform, controller)) = ctx.player_query.get_single() {
        let pos = from_world(transform.translation);
        let motion = controller.last_locomotion();
        let focus = controller
            .tracker()
            .focus()
            .map_or_else(|| "none".to_string(), |e| format!("{e:?}"));
        format!(
            "Pos: ({:.1}, {:.1}, {:.1})\nFacing: {:.0} {}\nGrounded: {}\nMove: ({:.2}, {:.2}, {:.2})\nFocus: {}",
            pos.x,
            pos.y,
            pos.z,
            wrap_degrees(controller.facing()),
            compass(controller.facing()),
            motion.ground.is_grounded(),
            motion.direction.x,
            motion.direction.y,
            motion.direction.z,
            focus,
        )
    } else {
        "Player: N/A".to_string()
    };

    text.sections[0].value = format!("FPS: {fps:.1}\n{body}");
}

/// Draw the interaction probe, ground normal and movement direction for
/// controllers with debug drawing enabled.
///
/// The probe is green while something has focus and red otherwise.
#[allow(clippy::needless_pass_by_value)]
pub fn draw_controller_gizmos(mut gizmos: Gizmos, query: Query<(&Transform, &PlayerController)>) {
    for (transform, controller) in &query {
        if !controller.config().debug_draw {
            continue;
        }

        let position = from_world(transform.translation);
        let ray = controller.probe_ray(position);
        let color = if controller.tracker().focus().is_some() {
            Color::srgb(0.1, 1.0, 0.2)
        } else {
            Color::srgb(1.0, 0.2, 0.1)
        };
        gizmos.sphere(to_world(ray.origin), Quat::IDENTITY, ray.radius, color);
        gizmos.sphere(to_world(ray.end()), Quat::IDENTITY, ray.radius, color);
        gizmos.line(to_world(ray.origin), to_world(ray.end()), color);

        let motion = controller.last_locomotion();
        if let Some(contact) = motion.ground.contact() {
            gizmos.arrow(to_world(contact.point), to_world(contact.point + contact.normal), Color::srgb(0.2, 0.4, 1.0));
        }
        if motion.direction != Vec3::ZERO {
            gizmos.arrow(
                transform.translation,
                to_world(position + motion.direction * 1.5),
                Color::srgb(1.0, 1.0, 0.0),
            );
        }
    }
}
