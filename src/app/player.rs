//! Player-related small systems.
use bevy::prelude::*;
use topdown_controller::player::Player;

/// Keep the fill light hovering above the player character.
///
/// Silently no-ops while there is no player.
#[allow(clippy::needless_pass_by_value)]
pub fn update_player_fill_light(
    player_query: Query<&GlobalTransform, With<Player>>,
    mut lights: Query<&mut Transform, With<crate::PlayerFillLight>>,
) {
    if let Ok(player) = player_query.get_single() {
        let pos = player.translation() + Vec3::Y * 3.0;
        for mut t in &mut lights {
            t.translation = pos;
        }
    }
}
