//! Focus state machine for the interaction probe.
//!
//! | probe this tick                          | effect                                   |
//! |------------------------------------------|------------------------------------------|
//! | nothing, masked-out layer, not usable    | lose focus (if any)                      |
//! | usable, different from the focus         | lose the old focus, focus the new target |
//! | usable, same as the focus                | keep it                                  |
//!
//! Losing focus always resets the entity and clears the tooltip, once per
//! transition. With focus settled, the button is dispatched: hold-type
//! targets get progress while held and drop focus on release, tap-type
//! targets get one use per completed press, and an idle button shows the
//! target's tooltip.

use std::fmt::Debug;

use bevy::log::debug;

use crate::input::InteractButton;
use crate::interaction::{
    InteractableLookup, InteractionActor, LayerMask, ProbeHit, TooltipDisplay,
};

/// Which interactable, if any, currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusState<Id> {
    NoFocus,
    Focus(Id),
}

impl<Id> Default for FocusState<Id> {
    fn default() -> Self {
        FocusState::NoFocus
    }
}

/// What a tracker tick ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome<Id> {
    /// Nothing focused and nothing happened.
    Idle,
    /// Focus on `Id` was lost without a new target to dispatch to.
    Lost(Id),
    /// A hold-type target received progress.
    Progressed(Id),
    /// A held interaction ended by releasing the button.
    Released(Id),
    /// A tap-type target was used.
    Used(Id),
    /// The focused target showed its tooltip.
    Tooltip(Id),
}

/// Tracks interaction focus across ticks.
#[derive(Debug, Clone)]
pub struct InteractionTracker<Id> {
    state: FocusState<Id>,
}

impl<Id> Default for InteractionTracker<Id> {
    fn default() -> Self {
        Self { state: FocusState::NoFocus }
    }
}

impl<Id: Copy + Eq + Debug> InteractionTracker<Id> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> FocusState<Id> {
        self.state
    }

    #[must_use]
    pub fn focus(&self) -> Option<Id> {
        match self.state {
            FocusState::Focus(id) => Some(id),
            FocusState::NoFocus => None,
        }
    }

    /// Advance one tick with this tick's probe result and button state.
    pub fn tick<L>(
        &mut self,
        hit: Option<ProbeHit<Id>>,
        mask: LayerMask,
        button: InteractButton,
        actor: &InteractionActor,
        lookup: &mut L,
        display: &mut dyn TooltipDisplay,
    ) -> InteractionOutcome<Id>
    where
        L: InteractableLookup<Id> + ?Sized,
    {
        let Some(target) = hit.filter(|h| mask.contains(h.layer)).map(|h| h.target) else {
            return self.clear_focus(lookup, display).map_or(InteractionOutcome::Idle, InteractionOutcome::Lost);
        };

        let switched_from = if self.focus() == Some(target) {
            None
        } else {
            self.clear_focus(lookup, display)
        };

        let Some(entity) = lookup.get_mut(target) else {
            // on an allowed layer but not usable, or the focused entity is gone
            if self.focus() == Some(target) {
                self.state = FocusState::NoFocus;
                display.clear();
                debug!("interaction focus lost: {target:?} no longer interactable");
                return InteractionOutcome::Lost(target);
            }
            return switched_from.map_or(InteractionOutcome::Idle, InteractionOutcome::Lost);
        };

        if self.state != FocusState::Focus(target) {
            self.state = FocusState::Focus(target);
            debug!("interaction focus gained: {target:?}");
        }

        if entity.should_hold() {
            if button.held {
                entity.add_progress(actor);
                InteractionOutcome::Progressed(target)
            } else if button.released {
                self.clear_focus(lookup, display);
                InteractionOutcome::Released(target)
            } else {
                entity.show_tooltip(actor, display);
                InteractionOutcome::Tooltip(target)
            }
        } else if button.pressed {
            entity.use_interaction(actor);
            InteractionOutcome::Used(target)
        } else {
            entity.show_tooltip(actor, display);
            InteractionOutcome::Tooltip(target)
        }
    }

    /// Drop the focus, resetting the entity and clearing the tooltip.
    ///
    /// Returns the id that had focus. Does nothing when unfocused.
    pub fn clear_focus<L, D>(&mut self, lookup: &mut L, display: &mut D) -> Option<Id>
    where
        L: InteractableLookup<Id> + ?Sized,
        D: TooltipDisplay + ?Sized,
    {
        let FocusState::Focus(id) = std::mem::take(&mut self.state) else {
            return None;
        };
        if let Some(entity) = lookup.get_mut(id) {
            entity.reset();
        }
        display.clear();
        debug!("interaction focus lost: {id:?}");
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::Interactable;
    use bevy::math::Vec3;
    use std::collections::HashMap;

    const USABLE: u8 = 3;
    const OTHER: u8 = 1;

    #[derive(Default)]
    struct Prop {
        hold: bool,
        progress: u32,
        uses: u32,
        resets: u32,
        tooltips: u32,
    }

    impl Interactable for Prop {
        fn should_hold(&self) -> bool {
            self.hold
        }
        fn add_progress(&mut self, _: &InteractionActor) {
            self.progress += 1;
        }
        fn use_interaction(&mut self, _: &InteractionActor) {
            self.uses += 1;
        }
        fn show_tooltip(&self, _: &InteractionActor, display: &mut dyn TooltipDisplay) {
            display.show("prop");
        }
        fn reset(&mut self) {
            self.resets += 1;
        }
    }

    #[derive(Default)]
    struct Props(HashMap<u32, Prop>);

    impl InteractableLookup<u32> for Props {
        fn get_mut(&mut self, id: u32) -> Option<&mut dyn Interactable> {
            self.0.get_mut(&id).map(|p| p as &mut dyn Interactable)
        }
    }

    #[derive(Default)]
    struct Display {
        text: Option<String>,
        shows: u32,
        clears: u32,
    }

    impl TooltipDisplay for Display {
        fn show(&mut self, text: &str) {
            self.text = Some(text.to_string());
            self.shows += 1;
        }
        fn clear(&mut self) {
            self.text = None;
            self.clears += 1;
        }
    }

    struct Rig {
        tracker: InteractionTracker<u32>,
        props: Props,
        display: Display,
        mask: LayerMask,
    }

    impl Rig {
        fn new() -> Self {
            let mut props = Props::default();
            props.0.insert(1, Prop { hold: true, ..Default::default() });
            props.0.insert(2, Prop { hold: false, ..Default::default() });
            props.0.insert(3, Prop { hold: false, ..Default::default() });
            Self {
                tracker: InteractionTracker::new(),
                props,
                display: Display::default(),
                mask: LayerMask::from_layers(&[USABLE]),
            }
        }

        fn tick(&mut self, hit: Option<ProbeHit<u32>>, button: InteractButton) -> InteractionOutcome<u32> {
            let actor = InteractionActor { position: Vec3::ZERO, facing: 0.0, delta_seconds: 1.0 / 60.0 };
            self.tracker.tick(hit, self.mask, button, &actor, &mut self.props, &mut self.display)
        }

        fn prop(&self, id: u32) -> &Prop {
            &self.props.0[&id]
        }
    }

    fn hit(target: u32, layer: u8) -> Option<ProbeHit<u32>> {
        Some(ProbeHit { target, layer, point: Vec3::ZERO, normal: Vec3::Y, distance: 1.0 })
    }

    #[test]
    fn same_target_never_resets() {
        let mut rig = Rig::new();
        for _ in 0..20 {
            assert_eq!(rig.tick(hit(2, USABLE), InteractButton::IDLE), InteractionOutcome::Tooltip(2));
        }
        assert_eq!(rig.prop(2).resets, 0);
        assert_eq!(rig.display.clears, 0);
        assert_eq!(rig.display.shows, 20);
        assert_eq!(rig.tracker.focus(), Some(2));
    }

    #[test]
    fn losing_the_hit_resets_once() {
        for lose in [None, hit(2, OTHER), hit(99, USABLE)] {
            let mut rig = Rig::new();
            rig.tick(hit(2, USABLE), InteractButton::IDLE);
            assert_eq!(rig.tick(lose, InteractButton::IDLE), InteractionOutcome::Lost(2));
            for _ in 0..10 {
                assert_eq!(rig.tick(lose, InteractButton::IDLE), InteractionOutcome::Idle);
            }
            assert_eq!(rig.prop(2).resets, 1);
            assert_eq!(rig.display.clears, 1);
            assert_eq!(rig.display.text, None);
            assert_eq!(rig.tracker.state(), FocusState::NoFocus);
        }
    }

    #[test]
    fn unfocused_misses_touch_nothing() {
        let mut rig = Rig::new();
        for _ in 0..5 {
            assert_eq!(rig.tick(None, InteractButton::DOWN), InteractionOutcome::Idle);
            assert_eq!(rig.tick(hit(99, USABLE), InteractButton::IDLE), InteractionOutcome::Idle);
        }
        assert_eq!(rig.display.clears, 0);
        assert_eq!(rig.display.shows, 0);
    }

    #[test]
    fn switching_targets_resets_the_old_one() {
        let mut rig = Rig::new();
        rig.tick(hit(2, USABLE), InteractButton::IDLE);
        assert_eq!(rig.tick(hit(3, USABLE), InteractButton::IDLE), InteractionOutcome::Tooltip(3));
        assert_eq!(rig.prop(2).resets, 1);
        assert_eq!(rig.prop(3).resets, 0);
        assert_eq!(rig.display.clears, 1);
        assert_eq!(rig.display.text.as_deref(), Some("prop"));
        assert_eq!(rig.tracker.focus(), Some(3));
    }

    #[test]
    fn hold_counts_progress_per_tick() {
        let mut rig = Rig::new();
        rig.tick(hit(1, USABLE), InteractButton::IDLE);
        assert_eq!(rig.tick(hit(1, USABLE), InteractButton::DOWN), InteractionOutcome::Progressed(1));
        for _ in 0..9 {
            assert_eq!(rig.tick(hit(1, USABLE), InteractButton::HELD), InteractionOutcome::Progressed(1));
        }
        assert_eq!(rig.prop(1).progress, 10);
        assert_eq!(rig.prop(1).uses, 0);

        assert_eq!(rig.tick(hit(1, USABLE), InteractButton::RELEASED), InteractionOutcome::Released(1));
        assert_eq!(rig.prop(1).resets, 1);
        assert_eq!(rig.tracker.focus(), None);

        // refocus on the next tick, but no more progress without holding
        assert_eq!(rig.tick(hit(1, USABLE), InteractButton::IDLE), InteractionOutcome::Tooltip(1));
        assert_eq!(rig.prop(1).progress, 10);
        assert_eq!(rig.prop(1).resets, 1);
    }

    #[test]
    fn switching_while_held_resets_the_door_and_skips_the_tap() {
        let mut rig = Rig::new();
        rig.tick(hit(1, USABLE), InteractButton::DOWN);
        rig.tick(hit(1, USABLE), InteractButton::HELD);
        assert_eq!(rig.prop(1).progress, 2);

        // the button stayed down, so reaching the lever is not a press
        assert_eq!(rig.tick(hit(2, USABLE), InteractButton::HELD), InteractionOutcome::Tooltip(2));
        assert_eq!(rig.prop(1).resets, 1);
        assert_eq!(rig.prop(1).progress, 2);
        assert_eq!(rig.prop(2).uses, 0);
        assert_eq!(rig.tracker.focus(), Some(2));
    }

    #[test]
    fn hold_on_first_contact_progresses_immediately() {
        let mut rig = Rig::new();
        assert_eq!(rig.tick(hit(1, USABLE), InteractButton::HELD), InteractionOutcome::Progressed(1));
        assert_eq!(rig.prop(1).progress, 1);
    }

    #[test]
    fn tap_uses_once_per_press() {
        let mut rig = Rig::new();
        assert_eq!(rig.tick(hit(2, USABLE), InteractButton::TAP), InteractionOutcome::Used(2));
        assert_eq!(rig.prop(2).uses, 1);

        assert_eq!(rig.tick(hit(2, USABLE), InteractButton::DOWN), InteractionOutcome::Used(2));
        for _ in 0..30 {
            assert_eq!(rig.tick(hit(2, USABLE), InteractButton::HELD), InteractionOutcome::Tooltip(2));
        }
        rig.tick(hit(2, USABLE), InteractButton::RELEASED);
        assert_eq!(rig.prop(2).uses, 2);
        assert_eq!(rig.prop(2).progress, 0);
        assert_eq!(rig.tracker.focus(), Some(2), "releasing a tap target keeps focus");
    }

    #[test]
    fn non_interactable_on_allowed_layer_matches_a_miss() {
        let mut via_miss = Rig::new();
        let mut via_plain = Rig::new();
        via_miss.tick(hit(1, USABLE), InteractButton::HELD);
        via_plain.tick(hit(1, USABLE), InteractButton::HELD);

        let a = via_miss.tick(None, InteractButton::HELD);
        let b = via_plain.tick(hit(77, USABLE), InteractButton::HELD);
        assert_eq!(a, b);
        assert_eq!(via_miss.prop(1).resets, via_plain.prop(1).resets);
        assert_eq!(via_miss.display.clears, via_plain.display.clears);
    }

    #[test]
    fn despawned_focus_drops_without_reset() {
        let mut rig = Rig::new();
        rig.tick(hit(2, USABLE), InteractButton::IDLE);
        rig.props.0.remove(&2);

        // the probe still reports the stale id this tick
        assert_eq!(rig.tick(hit(2, USABLE), InteractButton::IDLE), InteractionOutcome::Lost(2));
        assert_eq!(rig.tracker.focus(), None);
        assert_eq!(rig.display.clears, 1);
        assert_eq!(rig.tick(None, InteractButton::IDLE), InteractionOutcome::Idle);
        assert_eq!(rig.display.clears, 1);
    }
}
