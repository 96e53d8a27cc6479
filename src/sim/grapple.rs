//! Grapple anchors and the homing pull
//!
//! While a target is locked the pull replaces normal kinematics: velocity is
//! a fixed-magnitude vector from the actor's center toward the anchor. The
//! grapple ends once the remaining distance is shorter than one tick of
//! travel, so the actor never overshoots or oscillates around the anchor.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::kinematics::Actor;

/// A fixed point the player can latch onto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrappleAnchor {
    pub id: u32,
    pub pos: Vec2,
    /// Base activation radius
    pub radius: f32,
}

impl GrappleAnchor {
    /// Distance within which this anchor can become active
    #[inline]
    pub fn lock_on_radius(&self, multiplier: f32) -> f32 {
        self.radius * multiplier
    }
}

/// The anchor an actor is committed to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrappleTarget {
    pub anchor_id: u32,
    pub point: Vec2,
}

/// Outcome of one grapple step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrappleStep {
    /// No grapple locked; kinematics drives the actor
    Idle,
    /// Pulled toward the anchor this tick
    Pulling,
    /// Reached the anchor; grapple cleared, kinematics takes over
    Arrived,
}

/// Nearest anchor whose lock-on radius contains `center`
///
/// Recomputed from scratch every tick; ties go to the earlier anchor.
pub fn active_anchor(
    center: Vec2,
    anchors: &[GrappleAnchor],
    lock_on_multiplier: f32,
) -> Option<&GrappleAnchor> {
    anchors
        .iter()
        .filter(|a| a.pos.distance(center) <= a.lock_on_radius(lock_on_multiplier))
        .min_by(|a, b| {
            a.pos
                .distance_squared(center)
                .total_cmp(&b.pos.distance_squared(center))
        })
}

/// Commit the actor to an anchor
pub fn attach(actor: &mut Actor, anchor: &GrappleAnchor) {
    actor.grapple = Some(GrappleTarget {
        anchor_id: anchor.id,
        point: anchor.pos,
    });
    actor.grounded = false;
    log::debug!("grapple attached to anchor {} at {:?}", anchor.id, anchor.pos);
}

/// Drive the actor toward its locked anchor for one tick
pub fn step(actor: &mut Actor, speed: f32) -> GrappleStep {
    let Some(target) = actor.grapple else {
        return GrappleStep::Idle;
    };

    let to_target = target.point - actor.center();
    let distance = to_target.length();
    if distance < speed {
        actor.grapple = None;
        actor.vel = Vec2::ZERO;
        log::debug!("grapple arrived at anchor {}", target.anchor_id);
        return GrappleStep::Arrived;
    }

    actor.vel = to_target / distance * speed;
    actor.pos += actor.vel;
    GrappleStep::Pulling
}

/// Keep a locked target on its anchor as the world scrolls
///
/// Releases the grapple if the anchor no longer exists.
pub fn track(actor: &mut Actor, anchors: &[GrappleAnchor]) {
    let Some(target) = actor.grapple.as_mut() else {
        return;
    };
    match anchors.iter().find(|a| a.id == target.anchor_id) {
        Some(anchor) => target.point = anchor.pos,
        None => {
            log::debug!("anchor {} vanished, releasing grapple", target.anchor_id);
            actor.grapple = None;
        }
    }
}
