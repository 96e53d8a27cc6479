//! Level definitions and progression
//!
//! A level is plain geometry handed to the simulation at construction time.
//! Levels come from JSON written by the host, or from the built-in set.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::{
    AnchorConfig, BackdropConfig, CollectibleConfig, ExitConfig, GroundConfig, PlatformPolicy,
    Rect, Span, StreamConfig, Viewport, WorldConfig,
};

/// One playable level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    pub act: u32,
    pub number: u32,
    pub title: String,
    /// Screen x of the player's left edge
    pub spawn_x: f32,
    pub world: WorldConfig,
}

/// Ordered, non-empty list of levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LevelDef>", into = "Vec<LevelDef>")]
pub struct LevelSet {
    levels: Vec<LevelDef>,
}

impl TryFrom<Vec<LevelDef>> for LevelSet {
    type Error = ConfigError;

    fn try_from(levels: Vec<LevelDef>) -> Result<Self, Self::Error> {
        Self::new(levels)
    }
}

impl From<LevelSet> for Vec<LevelDef> {
    fn from(set: LevelSet) -> Self {
        set.levels
    }
}

impl LevelSet {
    /// Validate every level's geometry up front
    pub fn new(levels: Vec<LevelDef>) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        for level in &levels {
            level.world.validate()?;
        }
        Ok(Self { levels })
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let levels: Vec<LevelDef> = serde_json::from_str(json)?;
        Self::new(levels)
    }

    pub fn get(&self, index: usize) -> Option<&LevelDef> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDef> {
        self.levels.iter()
    }

    /// Levels shipped with the game
    pub fn builtin() -> Self {
        Self {
            levels: vec![chalk_sketch_valley(), graphite_gorge()],
        }
    }
}

const VIEWPORT: Viewport = Viewport {
    width: 1920.0,
    height: 2000.0,
};

/// Act 1-1: the hand-placed looping layout
fn chalk_sketch_valley() -> LevelDef {
    let ground_line = VIEWPORT.height - GROUND_HEIGHT;
    let star_y = ground_line - PLAYER_SIZE / 2.0;
    LevelDef {
        act: 1,
        number: 1,
        title: "Chalk Sketch Valley".into(),
        spawn_x: 300.0,
        world: WorldConfig {
            viewport: VIEWPORT,
            ground: GroundConfig {
                height: GROUND_HEIGHT,
                tile_width: 960.0,
            },
            backdrop: Some(BackdropConfig {
                tile_width: 1920.0,
                factor: 0.5,
            }),
            platforms: vec![
                Rect::new(200.0, 1100.0, 600.0, 1150.0),
                Rect::new(800.0, 1200.0, 1000.0, 1250.0),
                Rect::new(1200.0, 1300.0, 1400.0, 1350.0),
                Rect::new(1600.0, 1500.0, 1800.0, 1550.0),
            ],
            policy: PlatformPolicy::WrapAround,
            collectibles: CollectibleConfig {
                points: vec![
                    Vec2::new(700.0, star_y),
                    Vec2::new(1100.0, star_y),
                    Vec2::new(1700.0, 1400.0),
                    Vec2::new(2400.0, star_y),
                ],
                radius: STAR_RADIUS,
            },
            anchors: AnchorConfig {
                points: vec![Vec2::new(1000.0, 1400.0), Vec2::new(2200.0, 1250.0)],
                ..Default::default()
            },
            exit: ExitConfig {
                threshold: 3000.0,
                rect: Rect::new(1500.0, ground_line - 250.0, 1650.0, ground_line),
            },
            seed: 1,
        },
    }
}

/// Act 1-2: endless procedurally streamed platforms
fn graphite_gorge() -> LevelDef {
    let ground_line = VIEWPORT.height - GROUND_HEIGHT;
    LevelDef {
        act: 1,
        number: 2,
        title: "Graphite Gorge".into(),
        spawn_x: 300.0,
        world: WorldConfig {
            viewport: VIEWPORT,
            ground: GroundConfig {
                height: GROUND_HEIGHT,
                tile_width: 960.0,
            },
            backdrop: Some(BackdropConfig {
                tile_width: 1920.0,
                factor: 0.5,
            }),
            platforms: vec![
                Rect::new(500.0, 1500.0, 800.0, 1550.0),
                Rect::new(1000.0, 1400.0, 1300.0, 1450.0),
                Rect::new(1500.0, 1450.0, 1750.0, 1500.0),
            ],
            policy: PlatformPolicy::Streaming(StreamConfig {
                width: Span::new(200.0, 500.0),
                top: Span::new(1250.0, 1550.0),
                height: 50.0,
                gap: 150.0,
            }),
            collectibles: CollectibleConfig {
                points: (1..=8)
                    .map(|i| Vec2::new(600.0 * i as f32, ground_line - PLAYER_SIZE / 2.0))
                    .collect(),
                radius: STAR_RADIUS,
            },
            anchors: AnchorConfig::default(),
            exit: ExitConfig {
                threshold: 6000.0,
                rect: Rect::new(1500.0, ground_line - 250.0, 1650.0, ground_line),
            },
            seed: 42,
        },
    }
}

/// Cursor over a level set
#[derive(Debug, Clone)]
pub struct Progression {
    levels: LevelSet,
    current: usize,
}

impl Progression {
    pub fn new(levels: LevelSet) -> Self {
        Self { levels, current: 0 }
    }

    pub fn current(&self) -> &LevelDef {
        // Non-empty by construction and `current` never passes the last index
        &self.levels.levels[self.current]
    }

    pub fn index(&self) -> usize {
        self.current
    }

    /// Move to the next level; `None` once the last level is done
    pub fn advance(&mut self) -> Option<&LevelDef> {
        if self.current + 1 < self.levels.len() {
            self.current += 1;
            Some(self.current())
        } else {
            log::info!("all {} levels complete", self.levels.len());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::World;

    #[test]
    fn test_builtin_levels_are_valid() {
        let set = LevelSet::builtin();
        assert_eq!(set.len(), 2);
        for level in set.iter() {
            assert!(World::new(level.world.clone()).is_ok(), "{}", level.title);
        }
    }

    #[test]
    fn test_builtin_has_both_policies() {
        let set = LevelSet::builtin();
        assert_eq!(set.get(0).unwrap().world.policy, PlatformPolicy::WrapAround);
        assert!(matches!(
            set.get(1).unwrap().world.policy,
            PlatformPolicy::Streaming(_)
        ));
    }

    #[test]
    fn test_json_round_trip_of_builtin() {
        let json = serde_json::to_string(&LevelSet::builtin()).unwrap();
        let parsed = LevelSet::from_json(&json).unwrap();
        assert_eq!(parsed, LevelSet::builtin());
    }

    #[test]
    fn test_empty_set_rejected() {
        assert!(matches!(LevelSet::from_json("[]"), Err(ConfigError::NoLevels)));
        assert!(matches!(LevelSet::new(Vec::new()), Err(ConfigError::NoLevels)));
    }

    #[test]
    fn test_invalid_level_rejected() {
        let mut level = LevelSet::builtin().get(0).unwrap().clone();
        level.world.platforms.clear();
        assert!(matches!(
            LevelSet::new(vec![level]),
            Err(ConfigError::NoPlatforms)
        ));
    }

    #[test]
    fn test_progression_walks_levels_then_completes() {
        let mut progression = Progression::new(LevelSet::builtin());
        assert_eq!(progression.current().title, "Chalk Sketch Valley");

        let next = progression.advance().unwrap();
        assert_eq!(next.number, 2);
        assert_eq!(progression.index(), 1);

        assert!(progression.advance().is_none());
        // Stays on the last level
        assert_eq!(progression.current().title, "Graphite Gorge");
    }
}
