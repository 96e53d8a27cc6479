//! Fixed timestep simulation tick
//!
//! One step: grapple commit, kinematics or grapple pull, world scroll,
//! collision resolution. A tick never fails and is applied as a whole.

use super::collision;
use super::grapple::{self, GrappleStep};
use super::kinematics::{self, MoveIntent};
use super::state::GameState;
use crate::settings::Settings;

/// Input flags for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    /// Edge: latch onto the active anchor, if any
    pub grapple: bool,
}

impl TickInput {
    pub fn intent(&self) -> MoveIntent {
        MoveIntent {
            left: self.move_left,
            right: self.move_right,
            jump: self.jump,
        }
    }
}

/// Advance the game state by one step
pub fn tick(state: &mut GameState, input: &TickInput, settings: &Settings) {
    state.events.clear();
    state.time_ticks += 1;

    if input.grapple && !state.actor.is_grappling() {
        if let Some(anchor) = state.world.active_anchor(state.actor.center()) {
            grapple::attach(&mut state.actor, anchor);
        }
    }

    let pinned_x = state.actor.pos.x;
    match grapple::step(&mut state.actor, settings.grapple.speed) {
        GrappleStep::Pulling => {}
        GrappleStep::Idle | GrappleStep::Arrived => {
            kinematics::integrate(&mut state.actor, &input.intent(), &settings.physics);
        }
    }

    // Camera follows the player: horizontal displacement scrolls the world
    let scroll_delta = state.actor.pos.x - pinned_x;
    state.actor.pos.x = pinned_x;
    state.world.advance(scroll_delta);
    grapple::track(&mut state.actor, state.world.anchors());

    let outcome = collision::resolve(&mut state.actor, &mut state.world, settings.landing);
    if outcome.collected.is_some() {
        state.stars_collected += 1;
    }
    if outcome.level_complete {
        state.level_complete = true;
    }
    state.events.extend(outcome.events());
}
