//! Player state and per-tick integration
//!
//! Explicit Euler: velocity is updated first, then `position += velocity`
//! with the new velocity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::grapple::GrappleTarget;
use crate::settings::Physics;

/// Movement intents for one tick
///
/// `left` and `right` are expected to be exclusive. When both are set,
/// `right` wins because it is evaluated last.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// The player: an axis-aligned square of constant size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    size: f32,
    /// Resting on the ground line or a platform top
    pub grounded: bool,
    /// Locked grapple anchor, if any
    pub grapple: Option<GrappleTarget>,
}

impl Actor {
    pub fn new(pos: Vec2, size: f32) -> Self {
        assert!(
            size.is_finite() && size > 0.0,
            "actor size must be positive, got {size}"
        );
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            grounded: false,
            grapple: None,
        }
    }

    /// Edge length, fixed for the actor's lifetime
    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size * 0.5)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin(self.pos, self.size, self.size)
    }

    pub fn is_grappling(&self) -> bool {
        self.grapple.is_some()
    }

    /// Snap the bottom edge onto a surface and stop vertical motion
    pub fn land_on(&mut self, surface_y: f32) {
        self.pos.y = surface_y - self.size;
        self.vel.y = 0.0;
        self.grounded = true;
    }
}

/// Update velocity from intents, gravity and jump
pub fn apply_intent(actor: &mut Actor, intent: &MoveIntent, physics: &Physics) {
    // Horizontal: held direction or stop
    actor.vel.x = 0.0;
    if intent.left {
        actor.vel.x = -physics.move_speed;
    }
    if intent.right {
        actor.vel.x = physics.move_speed;
    }

    // Vertical: jump impulse replaces gravity for this tick
    if intent.jump && actor.grounded {
        actor.vel.y = -physics.jump_impulse;
        actor.grounded = false;
    } else {
        actor.vel.y = (actor.vel.y + physics.gravity).min(physics.max_fall_speed);
    }
}

/// Advance one tick: velocity, then position
pub fn integrate(actor: &mut Actor, intent: &MoveIntent, physics: &Physics) {
    apply_intent(actor, intent, physics);
    actor.pos += actor.vel;
}
