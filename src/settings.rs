//! Simulation tuning
//!
//! Loaded from JSON by the host (or left at defaults). Every section is
//! `#[serde(default)]`, so a file only needs the values it overrides.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::LandingRule;

/// Player kinematics parameters, all per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    /// Horizontal speed while a move flag is held
    pub move_speed: f32,
    /// Added to dy every airborne tick
    pub gravity: f32,
    /// dy never exceeds this
    pub max_fall_speed: f32,
    /// Magnitude of the upward velocity set by a jump
    pub jump_impulse: f32,
    /// Edge length of the player square
    pub player_size: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            gravity: GRAVITY,
            max_fall_speed: MAX_FALL_SPEED,
            jump_impulse: JUMP_IMPULSE,
            player_size: PLAYER_SIZE,
        }
    }
}

/// Grapple parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrappleTuning {
    /// Pull speed toward the locked anchor (pixels/tick)
    pub speed: f32,
}

impl Default for GrappleTuning {
    fn default() -> Self {
        Self {
            speed: GRAPPLE_SPEED,
        }
    }
}

/// Complete simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: Physics,
    pub grapple: GrappleTuning,
    /// Which platform contacts count as a landing
    pub landing: LandingRule,
    /// Sleep between loop iterations
    pub tick_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            physics: Physics::default(),
            grapple: GrappleTuning::default(),
            landing: LandingRule::default(),
            tick_interval_ms: TICK_INTERVAL_MS,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        ConfigError::positive("move speed", p.move_speed)?;
        ConfigError::positive("gravity", p.gravity)?;
        ConfigError::positive("max fall speed", p.max_fall_speed)?;
        ConfigError::positive("jump impulse", p.jump_impulse)?;
        ConfigError::positive("player size", p.player_size)?;
        ConfigError::positive("grapple speed", self.grapple.speed)?;
        if let LandingRule::FromAbove { tolerance } = self.landing {
            ConfigError::non_negative("landing tolerance", tolerance)?;
        }
        Ok(())
    }

    /// Loop sleep as a `Duration`
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
