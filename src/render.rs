//! Rendering consumer seam
//!
//! The loop hands each updated state to a `FrameSink` while still holding
//! the update/draw lock, so a sink always sees a complete tick. Drawing
//! itself happens outside this crate.

use std::time::Duration;

use thiserror::Error;

use crate::sim::{Actor, Collectible, ExitTrigger, GameState, GrappleAnchor, Rect, World};

/// Why a frame could not be drawn
///
/// Always transient from the loop's point of view: the draw is skipped and
/// the next iteration tries again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("drawing surface unavailable")]
    Unavailable,
    #[error("drawing surface lost")]
    Lost,
}

/// Read-only view of one tick's result
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub tick: u64,
    /// Wall-clock time since the previous loop iteration
    pub dt: Duration,
    state: &'a GameState,
}

impl<'a> Frame<'a> {
    pub fn new(state: &'a GameState, dt: Duration) -> Self {
        Self {
            tick: state.time_ticks,
            dt,
            state,
        }
    }

    pub fn actor(&self) -> &'a Actor {
        &self.state.actor
    }

    pub fn world(&self) -> &'a World {
        &self.state.world
    }

    pub fn ground_offset(&self) -> f32 {
        self.state.world.ground().offset
    }

    pub fn platforms(&self) -> &'a [Rect] {
        self.state.world.platforms()
    }

    pub fn collectibles(&self) -> &'a [Collectible] {
        self.state.world.collectibles()
    }

    pub fn anchors(&self) -> &'a [GrappleAnchor] {
        self.state.world.anchors()
    }

    /// The anchor a grapple tap would latch onto
    pub fn active_anchor(&self) -> Option<&'a GrappleAnchor> {
        self.state.active_anchor()
    }

    pub fn exit(&self) -> Option<&'a ExitTrigger> {
        self.state.world.exit()
    }
}

/// Receives every frame from the game loop thread
pub trait FrameSink: Send + 'static {
    fn present(&mut self, frame: &Frame<'_>) -> Result<(), SurfaceError>;
}

/// Sink that draws nothing (headless runs, servers, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

impl FrameSink for Headless {
    fn present(&mut self, _frame: &Frame<'_>) -> Result<(), SurfaceError> {
        Ok(())
    }
}
