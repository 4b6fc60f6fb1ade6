//! Interactable props for the demo scene: hold-to-open doors and levers.

use bevy::prelude::*;

use crate::interaction::{Interactable, InteractableLookup, InteractionActor, TooltipDisplay};

/// Seconds of holding it takes to open a door by default.
pub const DOOR_HOLD_SECONDS: f32 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub enum PropKind {
    /// Opens after the button is held for `hold_seconds` in one go.
    Door { hold_seconds: f32, progress: f32, open: bool },
    /// Flips on every tap.
    Lever { on: bool, pulls: u32 },
}

/// An interactable object.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Prop {
    pub name: String,
    pub kind: PropKind,
}

impl Prop {
    #[must_use]
    pub fn door(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PropKind::Door { hold_seconds: DOOR_HOLD_SECONDS, progress: 0.0, open: false },
        }
    }

    #[must_use]
    pub fn lever(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: PropKind::Lever { on: false, pulls: 0 } }
    }

    /// How far along the prop is, `0.0..=1.0`. Doors report hold progress,
    /// levers report `1.0` while on.
    #[must_use]
    pub fn openness(&self) -> f32 {
        match self.kind {
            PropKind::Door { open: true, .. } => 1.0,
            PropKind::Door { hold_seconds, progress, .. } => (progress / hold_seconds).clamp(0.0, 1.0),
            PropKind::Lever { on, .. } => f32::from(u8::from(on)),
        }
    }

    /// Prompt line for the current state.
    #[must_use]
    pub fn tooltip(&self) -> String {
        match self.kind {
            PropKind::Door { open: true, .. } => format!("{} is open", self.name),
            PropKind::Door { progress, .. } if progress > 0.0 => {
                format!("Opening {}... {:.0}%", self.name, self.openness() * 100.0)
            }
            PropKind::Door { .. } => format!("Hold to open {}", self.name),
            PropKind::Lever { on: true, .. } => format!("Press to switch off {}", self.name),
            PropKind::Lever { on: false, .. } => format!("Press to switch on {}", self.name),
        }
    }
}

impl Interactable for Prop {
    fn should_hold(&self) -> bool {
        matches!(self.kind, PropKind::Door { .. })
    }

    fn add_progress(&mut self, actor: &InteractionActor) {
        let PropKind::Door { hold_seconds, progress, open } = &mut self.kind else { return };
        if *open {
            return;
        }
        *progress += actor.delta_seconds;
        if *progress >= *hold_seconds {
            *open = true;
            *progress = *hold_seconds;
            info!("{} opened", self.name);
        }
    }

    fn use_interaction(&mut self, _actor: &InteractionActor) {
        let PropKind::Lever { on, pulls } = &mut self.kind else { return };
        *on = !*on;
        *pulls += 1;
        info!("{} switched {}", self.name, if *on { "on" } else { "off" });
    }

    fn show_tooltip(&self, _actor: &InteractionActor, display: &mut dyn TooltipDisplay) {
        display.show(&self.tooltip());
    }

    fn reset(&mut self) {
        if let PropKind::Door { progress, open: false, .. } = &mut self.kind {
            *progress = 0.0;
        }
    }
}

/// [`InteractableLookup`] over every [`Prop`] in the world.
pub struct PropLookup<'q, 'w, 's, 'p> {
    pub props: &'q mut Query<'w, 's, &'p mut Prop>,
}

impl InteractableLookup<Entity> for PropLookup<'_, '_, '_, '_> {
    fn get_mut(&mut self, id: Entity) -> Option<&mut dyn Interactable> {
        let prop = self.props.get_mut(id).ok()?;
        Some(prop.into_inner() as &mut dyn Interactable)
    }
}

/// Where a prop's mesh sits when closed or off.
#[derive(Component, Debug, Clone, Copy)]
pub struct PropRest(pub Transform);

/// Raise doors by their openness and tilt levers that are on.
pub fn animate_props(mut query: Query<(&Prop, &PropRest, &mut Transform)>) {
    for (prop, rest, mut transform) in &mut query {
        let t = prop.openness();
        *transform = match prop.kind {
            PropKind::Door { .. } => rest.0.with_translation(rest.0.translation + Vec3::Y * 2.0 * t),
            PropKind::Lever { .. } => rest.0.with_rotation(rest.0.rotation * Quat::from_rotation_x(-0.8 * t)),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTOR: InteractionActor = InteractionActor { position: Vec3::ZERO, facing: 0.0, delta_seconds: 0.25 };

    #[derive(Default)]
    struct Shown(Option<String>);

    impl TooltipDisplay for Shown {
        fn show(&mut self, text: &str) {
            self.0 = Some(text.to_owned());
        }
        fn clear(&mut self) {
            self.0 = None;
        }
    }

    #[test]
    fn door_opens_after_hold_time() {
        let mut door = Prop::door("Gate");
        assert!(door.should_hold());
        for _ in 0..5 {
            door.add_progress(&ACTOR);
        }
        assert_eq!(door.openness(), 1.0 * 1.25 / DOOR_HOLD_SECONDS);
        door.add_progress(&ACTOR);
        assert!(matches!(door.kind, PropKind::Door { open: true, .. }));
        assert_eq!(door.tooltip(), "Gate is open");
    }

    #[test]
    fn reset_drops_partial_progress_but_not_an_open_door() {
        let mut door = Prop::door("Gate");
        door.add_progress(&ACTOR);
        door.reset();
        assert_eq!(door.openness(), 0.0);

        for _ in 0..6 {
            door.add_progress(&ACTOR);
        }
        door.reset();
        assert_eq!(door.openness(), 1.0);
    }

    #[test]
    fn lever_toggles_per_use() {
        let mut lever = Prop::lever("Lamp");
        assert!(!lever.should_hold());
        lever.use_interaction(&ACTOR);
        lever.use_interaction(&ACTOR);
        lever.use_interaction(&ACTOR);
        assert_eq!(lever.kind, PropKind::Lever { on: true, pulls: 3 });
        // progress is meaningless for a lever
        lever.add_progress(&ACTOR);
        lever.reset();
        assert_eq!(lever.kind, PropKind::Lever { on: true, pulls: 3 });
    }

    #[test]
    fn tooltip_reaches_display() {
        let door = Prop::door("Gate");
        let mut shown = Shown::default();
        door.show_tooltip(&ACTOR, &mut shown);
        assert_eq!(shown.0.as_deref(), Some("Hold to open Gate"));

        let mut half = Prop::door("Gate");
        for _ in 0..3 {
            half.add_progress(&ACTOR);
        }
        assert_eq!(half.tooltip(), "Opening Gate... 50%");
    }
}
