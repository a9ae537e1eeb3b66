#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Translates frozen input intents into player commands.
//!
//! Continuous intents (steering, holding fire) produce a command every tick.
//! Discrete intents (missiles, nuke, weapon slots, pause) only fire on the
//! tick where they first appear, so a held key never repeats the action.

use glam::Vec2;
use starfall_core::{Command, InputIntents, WeaponKind};

/// Pure system that turns input intents into commands.
#[derive(Debug, Default)]
pub struct Controls {
    previous: InputIntents,
}

impl Controls {
    /// Creates a controls system with no intents held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits the commands for one tick's intents.
    ///
    /// While `paused` only the pause toggle is honoured.
    pub fn handle(&mut self, intents: &InputIntents, paused: bool, out: &mut Vec<Command>) {
        let previous = std::mem::replace(&mut self.previous, *intents);

        if intents.toggle_pause && !previous.toggle_pause {
            out.push(Command::SetPaused { paused: !paused });
            return;
        }
        if paused {
            return;
        }

        let axis = if intents.steer.is_finite() {
            intents.steer.clamp(Vec2::splat(-1.0), Vec2::ONE)
        } else {
            Vec2::ZERO
        };
        out.push(Command::SteerPlayer { axis });

        if let Some(slot) = intents.weapon_slot {
            if previous.weapon_slot != Some(slot) {
                if let Some(weapon) = WeaponKind::from_slot(slot) {
                    out.push(Command::SelectWeapon { weapon });
                }
            }
        }
        if intents.fire {
            out.push(Command::FireWeapon);
        }
        if intents.launch_missiles && !previous.launch_missiles {
            out.push(Command::LaunchMissiles);
        }
        if intents.activate_nuke && !previous.activate_nuke {
            out.push(Command::ActivateNuke);
        }
    }

    /// Forgets held intents so the next snapshot is treated as fresh input.
    pub fn release_all(&mut self) {
        self.previous = InputIntents::default();
    }
}
