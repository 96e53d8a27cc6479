//! Player-vs-world collision resolution
//!
//! Runs once per tick in a fixed order: platforms, ground, collectibles,
//! exit. Landing checks mutate the player; pickups and the exit mutate the
//! world. Every step is a normal, infallible check; missing geometry simply
//! means no contact.

use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::consts::EPSILON;
use super::kinematics::Actor;
use super::state::GameEvent;
use super::world::World;

/// Which platform contacts count as a landing
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum LandingRule {
    /// Horizontal overlap, box intersection and falling
    #[default]
    Overlap,
    /// As `Overlap`, and the bottom edge was at most `tolerance` below the
    /// platform top before this tick's move (no snapping up through the side)
    FromAbove { tolerance: f32 },
}

/// What the player is standing on after resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    /// Index into the world's platform list
    Platform(usize),
    Ground,
}

/// Result of one resolver pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionOutcome {
    pub support: Option<Support>,
    /// Id of the star picked up this tick
    pub collected: Option<u32>,
    /// The exit fired this tick
    pub level_complete: bool,
}

impl CollisionOutcome {
    /// Events for external scoring and progression
    pub fn events(&self) -> impl Iterator<Item = GameEvent> + '_ {
        let picked = self
            .collected
            .map(|id| GameEvent::CollectiblePicked { id });
        let complete = self.level_complete.then_some(GameEvent::LevelComplete);
        picked.into_iter().chain(complete)
    }
}

/// Resolve all contacts between the player and the world for one tick
pub fn resolve(actor: &mut Actor, world: &mut World, rule: LandingRule) -> CollisionOutcome {
    let support = land_on_platform(actor, world.platforms(), rule)
        .map(Support::Platform)
        .or_else(|| land_on_ground(actor, world.ground_line()).then_some(Support::Ground));

    actor.grounded = support.is_some();
    if actor.grounded && actor.grapple.take().is_some() {
        log::debug!("landing released grapple");
    }

    CollisionOutcome {
        support,
        collected: pick_up(actor, world),
        level_complete: touch_exit(actor, world),
    }
}

/// Bottom edge lies on `surface_y` within tolerance
fn touches(bottom: f32, surface_y: f32) -> bool {
    (bottom - surface_y).abs() <= EPSILON
}

/// Snap onto the first platform the falling (or resting) player meets
///
/// A rising player passes through platforms, even at the instant its bottom
/// edge lines up with a top.
fn land_on_platform(actor: &mut Actor, platforms: &[Rect], rule: LandingRule) -> Option<usize> {
    if actor.vel.y < 0.0 {
        return None;
    }
    let bounds = actor.bounds();
    let falling = actor.vel.y > 0.0;
    let index = platforms.iter().position(|platform| {
        let contact = bounds.overlaps_horizontally(platform)
            && ((falling && bounds.intersects(platform)) || touches(bounds.bottom, platform.top));
        contact
            && match rule {
                LandingRule::Overlap => true,
                LandingRule::FromAbove { tolerance } => {
                    bounds.bottom - actor.vel.y <= platform.top + tolerance
                }
            }
    })?;
    actor.land_on(platforms[index].top);
    Some(index)
}

/// Snap onto the ground line if the player sank below or rests on it
fn land_on_ground(actor: &mut Actor, ground_line: f32) -> bool {
    let bottom = actor.bottom();
    if bottom > ground_line || (actor.vel.y >= 0.0 && touches(bottom, ground_line)) {
        actor.land_on(ground_line);
        true
    } else {
        false
    }
}

/// Consume the first star within reach of the player's center
fn pick_up(actor: &Actor, world: &mut World) -> Option<u32> {
    let center = actor.center();
    let reach = actor.size() * 0.5;
    let index = world
        .collectibles()
        .iter()
        .position(|star| star.pos.distance(center) <= star.radius + reach)?;
    let star = world.take_collectible(index);
    log::debug!("collected star {} at {:?}", star.id, star.pos);
    Some(star.id)
}

/// Fire the exit on first contact
fn touch_exit(actor: &Actor, world: &mut World) -> bool {
    let bounds = actor.bounds();
    match world.exit_mut() {
        Some(exit) if !exit.fired && exit.rect.intersects(&bounds) => {
            exit.fired = true;
            log::info!("level complete");
            true
        }
        _ => false,
    }
}
