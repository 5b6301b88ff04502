//! Runtime settings, read from an optional TOML file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::entities::Viewport;
use crate::error::{GameError, Result};
use crate::levels::LevelCatalog;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Target frames per second of the host loop.
    pub fps: u32,
    /// Fixed RNG seed; random when absent.
    pub seed: Option<u64>,
    /// Level catalog to use instead of the built-in levels.
    pub levels_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            viewport_width: 800.0,
            viewport_height: 600.0,
            fps: 30,
            seed: None,
            levels_path: None,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        if !(usable(self.viewport_width) && usable(self.viewport_height)) {
            return Err(GameError::InvalidConfig(
                "viewport dimensions must be finite and positive".to_string(),
            ));
        }
        if self.fps == 0 {
            return Err(GameError::InvalidConfig("fps must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.viewport_width,
            height: self.viewport_height,
        }
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }

    /// The configured catalog, or the built-in one.
    pub fn level_catalog(&self) -> Result<LevelCatalog> {
        match &self.levels_path {
            Some(path) => LevelCatalog::load(path),
            None => Ok(LevelCatalog::builtin()),
        }
    }
}

/// Log filter from a `RUST_LOG`-style string, `info` when unset or empty.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives.unwrap_or_default())
}
