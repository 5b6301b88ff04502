//! Level catalog: the ordered, immutable list of level definitions.
//!
//! The built-in catalog holds the three shipped levels.  A replacement
//! catalog can be read from TOML:
//!
//! ```toml
//! [[level]]
//! name = "Sky Village"
//! scroll_speed_multiplier = 1.0
//! obstacle_kinds = ["cloud_monster"]
//! obstacle_spawn_interval_ms = 2000
//! collectible_kinds = ["cinnamon_roll", "star"]
//! collectible_spawn_interval_ms = 3000
//! power_up_kinds = ["shield"]
//! power_up_spawn_interval_ms = 8000
//! target_score = 100
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::entities::{CollectibleKind, ObstacleKind, PowerUpKind};
use crate::error::{GameError, Result};

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    pub scroll_speed_multiplier: f32,
    pub obstacle_kinds: Vec<ObstacleKind>,
    pub obstacle_spawn_interval_ms: u32,
    #[serde(default)]
    pub collectible_kinds: Vec<CollectibleKind>,
    pub collectible_spawn_interval_ms: u32,
    #[serde(default)]
    pub power_up_kinds: Vec<PowerUpKind>,
    pub power_up_spawn_interval_ms: u32,
    /// Score needed to leave this level.  `None` or 0 means the level never
    /// advances on score.
    #[serde(default)]
    pub target_score: Option<u32>,
    /// Presentation-only identifiers.
    #[serde(default)]
    pub sky_color: String,
    #[serde(default)]
    pub background: String,
}

impl LevelConfig {
    /// The advance threshold, with 0 treated as "none".
    pub fn target_score_to_advance(&self) -> Option<u32> {
        self.target_score.filter(|&t| t > 0)
    }

    fn validate(&self, index: usize) -> Result<()> {
        let invalid = |reason: &str| GameError::InvalidLevel {
            index,
            reason: reason.to_string(),
        };

        if !(self.scroll_speed_multiplier.is_finite() && self.scroll_speed_multiplier > 0.0) {
            return Err(invalid("scroll_speed_multiplier must be a positive number"));
        }
        if self.obstacle_kinds.is_empty() {
            return Err(invalid("obstacle_kinds must not be empty"));
        }
        if self.obstacle_spawn_interval_ms == 0
            || self.collectible_spawn_interval_ms == 0
            || self.power_up_spawn_interval_ms == 0
        {
            return Err(invalid("spawn intervals must be greater than zero"));
        }
        if has_duplicates(&self.obstacle_kinds)
            || has_duplicates(&self.collectible_kinds)
            || has_duplicates(&self.power_up_kinds)
        {
            return Err(invalid("enabled kinds must not repeat"));
        }
        Ok(())
    }
}

fn has_duplicates<T: PartialEq>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .any(|(i, a)| items[i + 1..].contains(a))
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(rename = "level", default)]
    levels: Vec<LevelConfig>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LevelCatalog {
    levels: Vec<LevelConfig>,
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelCatalog {
    /// Validate and wrap a list of levels.
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self> {
        if levels.is_empty() {
            return Err(GameError::EmptyCatalog);
        }
        for (i, level) in levels.iter().enumerate() {
            level.validate(i)?;
        }
        Ok(LevelCatalog { levels })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::new(file.levels)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), levels = catalog.len(), "loaded level catalog");
        Ok(catalog)
    }

    /// `None` for an out-of-range index; callers route that to a fallback
    /// screen instead of failing.
    pub fn get_level_config(&self, index: usize) -> Option<&LevelConfig> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelConfig> {
        self.levels.iter()
    }

    /// The three levels the game ships with.
    pub fn builtin() -> Self {
        use CollectibleKind::*;
        use ObstacleKind::*;
        use PowerUpKind::*;

        let levels = vec![
            LevelConfig {
                name: "Sky Village".to_string(),
                scroll_speed_multiplier: 1.0,
                obstacle_kinds: vec![CloudMonster],
                obstacle_spawn_interval_ms: 2000,
                collectible_kinds: vec![CinnamonRoll, CoffeeCup, Star],
                collectible_spawn_interval_ms: 3000,
                power_up_kinds: vec![Shield, Speed],
                power_up_spawn_interval_ms: 8000,
                target_score: Some(100),
                sky_color: "#DCE9FF".to_string(),
                background: "mountains_bg".to_string(),
            },
            LevelConfig {
                name: "Cinnamon Forest".to_string(),
                scroll_speed_multiplier: 1.2,
                obstacle_kinds: vec![FlyingKitten],
                obstacle_spawn_interval_ms: 1800,
                collectible_kinds: vec![CinnamonRoll, CoffeeCup, Star],
                collectible_spawn_interval_ms: 2800,
                power_up_kinds: vec![Shield, Speed, Magnet],
                power_up_spawn_interval_ms: 7000,
                target_score: Some(250),
                sky_color: "#E67E80".to_string(),
                background: "forest_bg".to_string(),
            },
            LevelConfig {
                name: "Sugar Mountains".to_string(),
                scroll_speed_multiplier: 1.4,
                obstacle_kinds: vec![CloudMonster, FlyingKitten, Boulder],
                obstacle_spawn_interval_ms: 1500,
                collectible_kinds: vec![CinnamonRoll, CoffeeCup, Star],
                collectible_spawn_interval_ms: 2500,
                power_up_kinds: vec![Shield, Speed, Magnet],
                power_up_spawn_interval_ms: 6000,
                target_score: Some(500),
                sky_color: "#0A0F1F".to_string(),
                background: "planet_bg".to_string(),
            },
        ];
        LevelCatalog { levels }
    }
}
