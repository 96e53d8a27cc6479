//! Chalk Runner - simulation core of a side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, grapple, world, collisions)
//! - `game_loop`: Background fixed-cadence loop driving the simulation
//! - `render`: Seam for the external rendering consumer
//! - `level`: Level geometry definitions and progression
//! - `settings`: Data-driven physics tuning

pub mod error;
pub mod game_loop;
pub mod level;
pub mod render;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, LoopError};
pub use game_loop::{GameLoop, InputFlags, LoopState};
pub use level::{LevelDef, LevelSet, Progression};
pub use render::{Frame, FrameSink, Headless, SurfaceError};
pub use settings::Settings;

/// Default tuning constants
pub mod consts {
    /// Pause between loop iterations (~60 Hz, not a locked frame clock)
    pub const TICK_INTERVAL_MS: u64 = 16;

    /// Player square edge length (pixels)
    pub const PLAYER_SIZE: f32 = 100.0;
    /// Horizontal speed while a move flag is held (pixels/tick)
    pub const MOVE_SPEED: f32 = 10.0;
    /// Downward acceleration (pixels/tick²)
    pub const GRAVITY: f32 = 0.5;
    /// Terminal fall speed (pixels/tick)
    pub const MAX_FALL_SPEED: f32 = 10.0;
    /// Upward speed applied on jump (pixels/tick)
    pub const JUMP_IMPULSE: f32 = 15.0;

    /// Speed of the grapple pull (pixels/tick)
    pub const GRAPPLE_SPEED: f32 = 20.0;
    /// Base activation radius of a grapple anchor
    pub const ANCHOR_RADIUS: f32 = 20.0;
    /// Lock-on radius as a multiple of the anchor radius
    pub const LOCK_ON_MULTIPLIER: f32 = 10.0;

    /// Pickup radius of a star
    pub const STAR_RADIUS: f32 = 25.0;

    /// Height of the ground strip at the bottom of the viewport
    pub const GROUND_HEIGHT: f32 = 300.0;

    /// Tolerance used when comparing resting positions
    pub const EPSILON: f32 = 1e-3;
}
