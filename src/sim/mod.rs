//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (first match wins)
//! - No rendering, threading or I/O

pub mod collision;
pub mod geom;
pub mod grapple;
pub mod kinematics;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{CollisionOutcome, LandingRule, Support, resolve};
pub use geom::Rect;
pub use grapple::{GrappleAnchor, GrappleStep, GrappleTarget, active_anchor};
pub use kinematics::{Actor, MoveIntent, integrate};
pub use state::{GameEvent, GameState};
pub use tick::{TickInput, tick};
pub use world::{
    AnchorConfig, BackdropConfig, Collectible, CollectibleConfig, ExitConfig, ExitTrigger,
    GroundConfig, PlatformPolicy, ScrollLayer, Span, StreamConfig, Viewport, World, WorldConfig,
};
