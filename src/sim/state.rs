//! Game state and simulation events
//!
//! Everything the loop mutates per tick lives here; a renderer reads it
//! through `Frame`, collaborators react to `GameEvent`s.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grapple::GrappleAnchor;
use super::kinematics::Actor;
use super::world::World;
use crate::error::ConfigError;
use crate::level::LevelDef;
use crate::settings::Settings;

/// Notifications for scoring and level progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A star was removed from the world
    CollectiblePicked { id: u32 },
    /// The exit trigger fired; emitted once per level
    LevelComplete,
}

/// Complete simulation state for one level
#[derive(Debug, Clone)]
pub struct GameState {
    pub actor: Actor,
    pub world: World,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events produced by the most recent tick
    pub events: Vec<GameEvent>,
    /// Stars picked up this level
    pub stars_collected: u32,
    /// The exit has fired
    pub level_complete: bool,
}

impl GameState {
    pub fn new(world: World, actor: Actor) -> Self {
        Self {
            actor,
            world,
            time_ticks: 0,
            events: Vec::new(),
            stars_collected: 0,
            level_complete: false,
        }
    }

    /// Build the world for a level and stand the player on the ground
    pub fn from_level(level: &LevelDef, settings: &Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let world = World::new(level.world.clone())?;

        let size = settings.physics.player_size;
        let mut actor = Actor::new(Vec2::new(level.spawn_x, world.ground_line() - size), size);
        actor.grounded = true;

        log::info!(
            "loaded level {}-{} \"{}\" ({} platforms)",
            level.act,
            level.number,
            level.title,
            world.platforms().len()
        );
        Ok(Self::new(world, actor))
    }

    /// Anchor the player could latch onto right now
    pub fn active_anchor(&self) -> Option<&GrappleAnchor> {
        self.world.active_anchor(self.actor.center())
    }
}
