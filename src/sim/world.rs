//! Scrolling level geometry
//!
//! The world owns everything the player can touch. Each tick it is shifted
//! left by the scroll delta (the player's horizontal displacement), platforms
//! are recycled by the configured policy, the tiled layers wrap, and the exit
//! trigger opens once the player has travelled far enough.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::grapple::{self, GrappleAnchor};
use crate::consts::*;
use crate::error::ConfigError;

/// Visible screen area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Ground strip anchored to the bottom of the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundConfig {
    pub height: f32,
    pub tile_width: f32,
}

/// Far background tiled behind the level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackdropConfig {
    pub tile_width: f32,
    /// Scroll speed relative to the ground
    pub factor: f32,
}

/// Inclusive value range for random placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn validate(&self, what: &'static str) -> Result<(), ConfigError> {
        // The width must be finite too or sampling overflows
        if (self.max - self.min).is_finite() && self.min <= self.max {
            Ok(())
        } else {
            Err(ConfigError::EmptyRange {
                what,
                min: self.min,
                max: self.max,
            })
        }
    }

    fn sample(&self, rng: &mut Pcg32) -> f32 {
        rng.random_range(self.min..=self.max)
    }
}

/// Placement rules for procedurally streamed platforms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamConfig {
    pub width: Span,
    /// Range for the platform's top edge
    pub top: Span,
    pub height: f32,
    /// Minimum horizontal space after the rightmost platform
    #[serde(default)]
    pub gap: f32,
}

/// What happens to platforms that scroll off screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlatformPolicy {
    /// The fixed set re-enters at the opposite edge (infinite loop level)
    WrapAround,
    /// Platforms past the left edge are replaced by new random ones on the right
    ///
    /// Forward only: scrolling back never streams platforms in on the left.
    Streaming(StreamConfig),
}

/// Star placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectibleConfig {
    pub points: Vec<Vec2>,
    pub radius: f32,
}

impl Default for CollectibleConfig {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            radius: STAR_RADIUS,
        }
    }
}

/// Grapple anchor placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorConfig {
    pub points: Vec<Vec2>,
    pub radius: f32,
    pub lock_on_multiplier: f32,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            radius: ANCHOR_RADIUS,
            lock_on_multiplier: LOCK_ON_MULTIPLIER,
        }
    }
}

/// Level exit placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExitConfig {
    /// Scrolled distance after which the exit appears
    pub threshold: f32,
    /// Screen position of the exit when it appears
    pub rect: Rect,
}

/// Level geometry supplied by the loader at construction time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub viewport: Viewport,
    pub ground: GroundConfig,
    #[serde(default)]
    pub backdrop: Option<BackdropConfig>,
    pub platforms: Vec<Rect>,
    pub policy: PlatformPolicy,
    #[serde(default)]
    pub collectibles: CollectibleConfig,
    #[serde(default)]
    pub anchors: AnchorConfig,
    pub exit: ExitConfig,
    /// Seed for streamed platform placement
    #[serde(default)]
    pub seed: u64,
}

impl WorldConfig {
    /// Reject geometry that would violate world invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::positive("viewport width", self.viewport.width)?;
        ConfigError::positive("viewport height", self.viewport.height)?;
        ConfigError::positive("ground height", self.ground.height)?;
        ConfigError::positive("ground tile width", self.ground.tile_width)?;
        if let Some(backdrop) = &self.backdrop {
            ConfigError::positive("backdrop tile width", backdrop.tile_width)?;
            ConfigError::finite("backdrop factor", backdrop.factor)?;
        }

        if self.platforms.is_empty() {
            return Err(ConfigError::NoPlatforms);
        }
        if let Some((index, rect)) = self
            .platforms
            .iter()
            .enumerate()
            .find(|(_, r)| !r.is_valid())
        {
            return Err(ConfigError::DegeneratePlatform { index, rect: *rect });
        }

        if let PlatformPolicy::Streaming(stream) = &self.policy {
            stream.width.validate("streamed platform width")?;
            stream.top.validate("streamed platform top")?;
            ConfigError::positive("streamed platform width", stream.width.min)?;
            ConfigError::positive("streamed platform height", stream.height)?;
            ConfigError::non_negative("streamed platform gap", stream.gap)?;
        }

        ConfigError::positive("collectible radius", self.collectibles.radius)?;
        ConfigError::positive("anchor radius", self.anchors.radius)?;
        ConfigError::positive("lock-on multiplier", self.anchors.lock_on_multiplier)?;
        ConfigError::positive("exit threshold", self.exit.threshold)?;
        if !self.exit.rect.is_valid() {
            return Err(ConfigError::DegenerateExit {
                rect: self.exit.rect,
            });
        }
        Ok(())
    }
}

/// A horizontally tiled layer whose offset wraps within one tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollLayer {
    pub offset: f32,
    pub tile_width: f32,
    pub factor: f32,
}

impl ScrollLayer {
    pub fn new(tile_width: f32, factor: f32) -> Self {
        Self {
            offset: 0.0,
            tile_width,
            factor,
        }
    }

    /// Move opposite to the scroll delta, keeping offset in (-tile, tile)
    pub fn scroll(&mut self, delta: f32) {
        // Remainder keeps the sign, so this is "add a tile when past the left
        // edge, subtract one when past the right" for any delta size
        self.offset = (self.offset - delta * self.factor) % self.tile_width;
    }
}

/// A consumable star
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
}

/// One-shot level exit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExitTrigger {
    pub rect: Rect,
    /// Set once touched; a fired exit is inert
    pub fired: bool,
}

/// All scrollable level geometry
#[derive(Debug, Clone)]
pub struct World {
    viewport: Viewport,
    ground_height: f32,
    ground: ScrollLayer,
    backdrop: Option<ScrollLayer>,
    platforms: Vec<Rect>,
    policy: PlatformPolicy,
    collectibles: Vec<Collectible>,
    anchors: Vec<GrappleAnchor>,
    lock_on_multiplier: f32,
    exit: Option<ExitTrigger>,
    exit_config: ExitConfig,
    /// Sum of all scroll deltas (signed)
    progress: f32,
    rng: Pcg32,
}

impl World {
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let collectibles = config
            .collectibles
            .points
            .iter()
            .zip(1..)
            .map(|(&pos, id)| Collectible {
                id,
                pos,
                radius: config.collectibles.radius,
            })
            .collect();
        let anchors = config
            .anchors
            .points
            .iter()
            .zip(1..)
            .map(|(&pos, id)| GrappleAnchor {
                id,
                pos,
                radius: config.anchors.radius,
            })
            .collect();

        Ok(Self {
            viewport: config.viewport,
            ground_height: config.ground.height,
            ground: ScrollLayer::new(config.ground.tile_width, 1.0),
            backdrop: config
                .backdrop
                .map(|b| ScrollLayer::new(b.tile_width, b.factor)),
            platforms: config.platforms,
            policy: config.policy,
            collectibles,
            anchors,
            lock_on_multiplier: config.anchors.lock_on_multiplier,
            exit: None,
            exit_config: config.exit,
            progress: 0.0,
            rng: Pcg32::seed_from_u64(config.seed),
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// y coordinate of the top of the ground strip
    pub fn ground_line(&self) -> f32 {
        self.viewport.height - self.ground_height
    }

    pub fn ground(&self) -> &ScrollLayer {
        &self.ground
    }

    pub fn backdrop(&self) -> Option<&ScrollLayer> {
        self.backdrop.as_ref()
    }

    pub fn platforms(&self) -> &[Rect] {
        &self.platforms
    }

    pub fn policy(&self) -> &PlatformPolicy {
        &self.policy
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    pub fn anchors(&self) -> &[GrappleAnchor] {
        &self.anchors
    }

    pub fn lock_on_multiplier(&self) -> f32 {
        self.lock_on_multiplier
    }

    /// The anchor the player could latch onto from `center` this tick
    pub fn active_anchor(&self, center: Vec2) -> Option<&GrappleAnchor> {
        grapple::active_anchor(center, &self.anchors, self.lock_on_multiplier)
    }

    pub fn exit(&self) -> Option<&ExitTrigger> {
        self.exit.as_ref()
    }

    pub(crate) fn exit_mut(&mut self) -> Option<&mut ExitTrigger> {
        self.exit.as_mut()
    }

    /// Total horizontal distance scrolled so far
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Remove and return the collectible at `index`
    pub(crate) fn take_collectible(&mut self, index: usize) -> Collectible {
        self.collectibles.remove(index)
    }

    /// Shift the world left by `scroll_delta` and apply per-tick upkeep
    pub fn advance(&mut self, scroll_delta: f32) {
        for platform in &mut self.platforms {
            platform.offset(-scroll_delta, 0.0);
        }
        for star in &mut self.collectibles {
            star.pos.x -= scroll_delta;
        }
        for anchor in &mut self.anchors {
            anchor.pos.x -= scroll_delta;
        }
        if let Some(exit) = &mut self.exit {
            exit.rect.offset(-scroll_delta, 0.0);
        }

        self.recycle_platforms(scroll_delta);

        self.ground.scroll(scroll_delta);
        if let Some(backdrop) = &mut self.backdrop {
            backdrop.scroll(scroll_delta);
        }

        self.progress += scroll_delta;
        self.open_exit();
    }

    fn recycle_platforms(&mut self, scroll_delta: f32) {
        let screen_width = self.viewport.width;
        match &self.policy {
            PlatformPolicy::WrapAround => {
                // Only a platform crossing an edge this tick wraps; one that
                // is already off screen on the far side waits to be reached
                for platform in &mut self.platforms {
                    let span = screen_width + platform.width();
                    let left_exit = platform.right < 0.0 && platform.right + scroll_delta >= 0.0;
                    let right_exit =
                        platform.left > screen_width && platform.left + scroll_delta <= screen_width;
                    if scroll_delta > 0.0 && left_exit {
                        platform.offset(span, 0.0);
                    } else if scroll_delta < 0.0 && right_exit {
                        platform.offset(-span, 0.0);
                    }
                }
            }
            PlatformPolicy::Streaming(stream) => {
                let before = self.platforms.len();
                self.platforms.retain(|p| p.right >= 0.0);
                let removed = before - self.platforms.len();
                for _ in 0..removed {
                    let platform =
                        spawn_streamed(stream, &mut self.rng, &self.platforms, screen_width);
                    log::debug!("streamed platform {:?}", platform);
                    self.platforms.push(platform);
                }
            }
        }
    }

    /// Create the exit once the threshold is crossed; at most once per level
    fn open_exit(&mut self) {
        if self.exit.is_none() && self.progress > self.exit_config.threshold {
            log::info!(
                "exit opened after {:.0}px at {:?}",
                self.progress,
                self.exit_config.rect
            );
            self.exit = Some(ExitTrigger {
                rect: self.exit_config.rect,
                fired: false,
            });
        }
    }
}

/// New platform just beyond the right edge (or past the rightmost platform)
fn spawn_streamed(
    stream: &StreamConfig,
    rng: &mut Pcg32,
    existing: &[Rect],
    screen_width: f32,
) -> Rect {
    let width = stream.width.sample(rng);
    let top = stream.top.sample(rng);
    let rightmost = existing
        .iter()
        .map(|p| p.right)
        .fold(f32::NEG_INFINITY, f32::max);
    let left = screen_width.max(rightmost + stream.gap);
    Rect::new(left, top, left + width, top + stream.height)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    pub(crate) fn flat_config(platforms: Vec<Rect>) -> WorldConfig {
        WorldConfig {
            viewport: Viewport {
                width: 1080.0,
                height: 1920.0,
            },
            ground: GroundConfig {
                height: 300.0,
                tile_width: 1080.0,
            },
            backdrop: None,
            platforms,
            policy: PlatformPolicy::WrapAround,
            collectibles: CollectibleConfig::default(),
            anchors: AnchorConfig::default(),
            exit: ExitConfig {
                threshold: 1000.0,
                rect: Rect::new(800.0, 1420.0, 950.0, 1620.0),
            },
            seed: 7,
        }
    }

    fn streaming_config() -> WorldConfig {
        WorldConfig {
            policy: PlatformPolicy::Streaming(StreamConfig {
                width: Span::new(150.0, 400.0),
                top: Span::new(900.0, 1400.0),
                height: 50.0,
                gap: 120.0,
            }),
            ..flat_config(vec![
                Rect::new(200.0, 1100.0, 600.0, 1150.0),
                Rect::new(800.0, 1200.0, 1000.0, 1250.0),
            ])
        }
    }

    #[test]
    fn test_rejects_empty_platforms() {
        let err = World::new(flat_config(Vec::new())).unwrap_err();
        assert!(matches!(err, ConfigError::NoPlatforms));
    }

    #[test]
    fn test_rejects_degenerate_platform() {
        let config = flat_config(vec![
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(50.0, 0.0, 50.0, 10.0),
        ]);
        let err = World::new(config).unwrap_err();
        assert!(matches!(err, ConfigError::DegeneratePlatform { index: 1, .. }));
    }

    #[test]
    fn test_rejects_bad_stream_range() {
        let mut config = streaming_config();
        if let PlatformPolicy::Streaming(stream) = &mut config.policy {
            stream.top = Span::new(1400.0, 900.0);
        }
        assert!(matches!(
            World::new(config),
            Err(ConfigError::EmptyRange { .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_ground() {
        let mut config = flat_config(vec![Rect::new(0.0, 0.0, 10.0, 10.0)]);
        config.ground.tile_width = 0.0;
        assert!(matches!(
            World::new(config),
            Err(ConfigError::NonPositive {
                what: "ground tile width",
                ..
            })
        ));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "viewport": { "width": 1080, "height": 1920 },
            "ground": { "height": 300, "tile_width": 540 },
            "platforms": [ { "left": 200, "top": 500, "right": 600, "bottom": 550 } ],
            "policy": { "kind": "streaming", "width": { "min": 100, "max": 200 },
                        "top": { "min": 400, "max": 900 }, "height": 50 },
            "collectibles": { "points": [[300, 400]], "radius": 25 },
            "exit": { "threshold": 5000,
                      "rect": { "left": 800, "top": 1420, "right": 950, "bottom": 1620 } }
        }"#;
        let config: WorldConfig = serde_json::from_str(json).unwrap();
        assert!(matches!(config.policy, PlatformPolicy::Streaming(_)));
        assert_eq!(config.anchors.lock_on_multiplier, LOCK_ON_MULTIPLIER);

        let world = World::new(config).unwrap();
        assert_eq!(world.collectibles()[0].pos, Vec2::new(300.0, 400.0));
        assert_eq!(world.ground_line(), 1620.0);
    }

    #[test]
    fn test_advance_shifts_everything() {
        let mut config = flat_config(vec![Rect::new(200.0, 500.0, 600.0, 550.0)]);
        config.collectibles.points = vec![Vec2::new(400.0, 300.0)];
        config.anchors.points = vec![Vec2::new(700.0, 200.0)];
        let mut world = World::new(config).unwrap();

        world.advance(10.0);
        assert_eq!(world.platforms()[0], Rect::new(190.0, 500.0, 590.0, 550.0));
        assert_eq!(world.collectibles()[0].pos, Vec2::new(390.0, 300.0));
        assert_eq!(world.anchors()[0].pos, Vec2::new(690.0, 200.0));
        assert_eq!(world.ground().offset, -10.0);
        assert_eq!(world.progress(), 10.0);
    }

    #[test]
    fn test_wrap_around_reenters_right() {
        let mut world = World::new(flat_config(vec![Rect::new(0.0, 500.0, 200.0, 550.0)])).unwrap();
        // 21 ticks of 10px puts right at -10
        for _ in 0..21 {
            world.advance(10.0);
        }
        let p = world.platforms()[0];
        assert_eq!(p.right, -10.0 + 1080.0 + 200.0);
        assert_eq!(p.width(), 200.0);
    }

    #[test]
    fn test_wrap_around_reenters_left_when_moving_left() {
        let mut world =
            World::new(flat_config(vec![Rect::new(900.0, 500.0, 1000.0, 550.0)])).unwrap();
        for _ in 0..19 {
            world.advance(-10.0);
        }
        // left went 900 -> 1090, past the 1080 edge, then wrapped
        let p = world.platforms()[0];
        assert_eq!(p.left, 1090.0 - 1180.0);
    }

    #[test]
    fn test_wrap_around_leaves_unreached_platforms_alone() {
        let mut world =
            World::new(flat_config(vec![Rect::new(1600.0, 500.0, 1800.0, 550.0)])).unwrap();
        world.advance(10.0);
        assert_eq!(world.platforms()[0].left, 1590.0);
    }

    #[test]
    fn test_wrap_around_keeps_far_platform_off_screen_when_moving_left() {
        // Already past the right edge: moving left carries it further away
        let mut world =
            World::new(flat_config(vec![Rect::new(1600.0, 500.0, 1800.0, 550.0)])).unwrap();
        world.advance(-10.0);
        assert_eq!(world.platforms()[0], Rect::new(1610.0, 500.0, 1810.0, 550.0));

        // Coming back, it scrolls in from the right as laid out
        for _ in 0..53 {
            world.advance(10.0);
        }
        assert_eq!(world.platforms()[0].left, 1080.0);
    }

    #[test]
    fn test_wrap_around_keeps_far_platform_off_screen_when_moving_right() {
        let mut world =
            World::new(flat_config(vec![Rect::new(-900.0, 500.0, -700.0, 550.0)])).unwrap();
        world.advance(10.0);
        assert_eq!(world.platforms()[0].left, -910.0);
    }

    #[test]
    fn test_streaming_only_moves_forward() {
        let mut world = World::new(streaming_config()).unwrap();
        let before = world.platforms().to_vec();
        for _ in 0..100 {
            world.advance(-10.0);
        }
        // Pushed past the right edge, nothing removed or spawned
        assert_eq!(world.platforms().len(), before.len());
        for (p, b) in world.platforms().iter().zip(&before) {
            assert_eq!(p.left, b.left + 1000.0);
        }
    }

    #[test]
    fn test_rejects_unbounded_stream_range() {
        let mut config = streaming_config();
        if let PlatformPolicy::Streaming(stream) = &mut config.policy {
            stream.top = Span::new(-f32::MAX, f32::MAX);
        }
        assert!(matches!(
            World::new(config),
            Err(ConfigError::EmptyRange {
                what: "streamed platform top",
                ..
            })
        ));
    }

    #[test]
    fn test_config_errors_name_the_right_problem() {
        let mut config = flat_config(vec![Rect::new(0.0, 0.0, 10.0, 10.0)]);
        config.backdrop = Some(BackdropConfig {
            tile_width: 1000.0,
            factor: -0.5,
        });
        assert!(World::new(config.clone()).is_ok());

        config.backdrop = Some(BackdropConfig {
            tile_width: 1000.0,
            factor: f32::INFINITY,
        });
        assert!(matches!(
            World::new(config),
            Err(ConfigError::NonFinite { what: "backdrop factor", .. })
        ));

        let mut config = streaming_config();
        if let PlatformPolicy::Streaming(stream) = &mut config.policy {
            stream.gap = 0.0;
        }
        assert!(World::new(config.clone()).is_ok());
        if let PlatformPolicy::Streaming(stream) = &mut config.policy {
            stream.gap = -5.0;
        }
        assert!(matches!(
            World::new(config),
            Err(ConfigError::Negative { what: "streamed platform gap", .. })
        ));

        let mut config = flat_config(vec![Rect::new(0.0, 0.0, 10.0, 10.0)]);
        config.exit.rect = Rect::new(800.0, 1420.0, 800.0, 1620.0);
        assert!(matches!(
            World::new(config),
            Err(ConfigError::DegenerateExit { .. })
        ));
    }

    #[test]
    fn test_streaming_replaces_offscreen_platform() {
        let mut world = World::new(streaming_config()).unwrap();
        // First platform right edge 600: gone after 61 ticks of 10px
        for _ in 0..61 {
            world.advance(10.0);
        }
        let platforms = world.platforms();
        assert_eq!(platforms.len(), 2);
        assert!(platforms.iter().all(|p| p.right >= 0.0));

        let spawned = platforms[1];
        // Survivor ends at 390, so the edge wins over survivor + gap
        assert!(spawned.left >= 1080.0);
        assert!((150.0..=400.0).contains(&spawned.width()));
        assert!((900.0..=1400.0).contains(&spawned.top));
        assert_eq!(spawned.height(), 50.0);
    }

    #[test]
    fn test_streaming_is_deterministic_per_seed() {
        let mut a = World::new(streaming_config()).unwrap();
        let mut b = World::new(streaming_config()).unwrap();
        for _ in 0..500 {
            a.advance(12.0);
            b.advance(12.0);
        }
        assert_eq!(a.platforms(), b.platforms());
    }

    #[test]
    fn test_ground_wraps_both_directions() {
        let mut layer = ScrollLayer::new(100.0, 1.0);
        layer.scroll(60.0);
        layer.scroll(60.0);
        assert!((layer.offset - -20.0).abs() < 1e-4);

        let mut layer = ScrollLayer::new(100.0, 1.0);
        layer.scroll(-60.0);
        layer.scroll(-60.0);
        assert!((layer.offset - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_backdrop_uses_parallax_factor() {
        let mut config = flat_config(vec![Rect::new(0.0, 0.0, 10.0, 10.0)]);
        config.backdrop = Some(BackdropConfig {
            tile_width: 2000.0,
            factor: 0.5,
        });
        let mut world = World::new(config).unwrap();
        world.advance(10.0);
        assert_eq!(world.backdrop().unwrap().offset, -5.0);
        assert_eq!(world.ground().offset, -10.0);
    }

    #[test]
    fn test_exit_opens_once_past_threshold() {
        let mut world = World::new(flat_config(vec![Rect::new(0.0, 0.0, 10.0, 10.0)])).unwrap();
        for _ in 0..100 {
            world.advance(10.0);
        }
        // Exactly at the threshold: not yet
        assert!(world.exit().is_none());

        world.advance(10.0);
        let exit = *world.exit().unwrap();
        assert_eq!(exit.rect, Rect::new(800.0, 1420.0, 950.0, 1620.0));
        assert!(!exit.fired);

        // Scrolls with the world afterwards, never re-created
        world.advance(10.0);
        assert_eq!(world.exit().unwrap().rect.left, 790.0);
    }

    #[test]
    fn test_active_anchor_uses_lock_on_multiplier() {
        let mut config = flat_config(vec![Rect::new(0.0, 0.0, 10.0, 10.0)]);
        config.anchors.points = vec![Vec2::new(500.0, 500.0)];
        config.anchors.radius = 20.0;
        config.anchors.lock_on_multiplier = 3.0;
        let world = World::new(config).unwrap();

        assert!(world.active_anchor(Vec2::new(500.0, 560.0)).is_some());
        assert!(world.active_anchor(Vec2::new(500.0, 561.0)).is_none());
    }

    proptest! {
        #[test]
        fn prop_ground_offset_stays_within_one_tile(deltas in proptest::collection::vec(-3000.0f32..3000.0, 1..200)) {
            let mut world = World::new(flat_config(vec![Rect::new(0.0, 0.0, 10.0, 10.0)])).unwrap();
            let tile = world.ground().tile_width;
            for delta in deltas {
                world.advance(delta);
                let offset = world.ground().offset;
                prop_assert!(offset > -tile && offset < tile, "offset {} out of range", offset);
            }
        }

        #[test]
        fn prop_wrap_around_keeps_the_same_set(deltas in proptest::collection::vec(-40.0f32..40.0, 1..400)) {
            let original = vec![
                Rect::new(200.0, 500.0, 600.0, 550.0),
                Rect::new(800.0, 400.0, 1000.0, 450.0),
                Rect::new(1200.0, 300.0, 1400.0, 350.0),
            ];
            let mut world = World::new(flat_config(original.clone())).unwrap();
            let screen = world.viewport().width;
            for delta in deltas {
                let before = world.platforms().to_vec();
                world.advance(delta);
                prop_assert_eq!(world.platforms().len(), original.len());
                for (p, o) in world.platforms().iter().zip(&original) {
                    prop_assert!((p.width() - o.width()).abs() < 1e-2);
                    prop_assert_eq!(p.top, o.top);
                    prop_assert_eq!(p.bottom, o.bottom);
                }
                // A wrapped platform re-enters at the edge it is scrolling in from
                for (p, b) in world.platforms().iter().zip(&before) {
                    if (p.left - (b.left - delta)).abs() > 1.0 {
                        if delta > 0.0 {
                            prop_assert!(p.left >= screen - delta - 1e-2, "wrapped to {:?}", p);
                        } else {
                            prop_assert!(p.right <= -delta + 1e-2, "wrapped to {:?}", p);
                        }
                    }
                }
            }
        }

        #[test]
        fn prop_streaming_count_is_invariant(deltas in proptest::collection::vec(0.0f32..60.0, 1..400), seed in any::<u64>()) {
            let mut config = streaming_config();
            config.seed = seed;
            let mut world = World::new(config).unwrap();
            let count = world.platforms().len();
            for delta in deltas {
                let before: Vec<Rect> = world.platforms().to_vec();
                world.advance(delta);
                prop_assert_eq!(world.platforms().len(), count);
                // Anything that disappeared had scrolled fully past the left edge
                for gone in before.iter().filter(|b| {
                    !world.platforms().iter().any(|p| p.top == b.top && (p.left - (b.left - delta)).abs() < 1e-3)
                }) {
                    prop_assert!(gone.right - delta < 0.0);
                }
            }
        }
    }
}
