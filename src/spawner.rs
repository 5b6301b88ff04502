//! Periodic spawning of obstacles, collectibles and power-ups.
//!
//! Each category has its own timer driven by the frame delta.  When a timer
//! elapses the spawner picks a kind uniformly from the level's enabled set,
//! places it just past the right edge at a random height, and hands it to
//! the matching pool.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::entities::{CollectibleKind, ObstacleKind, PowerUpKind, Viewport};
use crate::levels::LevelConfig;
use crate::pool::Pools;

pub const OBSTACLE_SCROLL_SPEED_BASE: f32 = -150.0;
pub const COLLECTIBLE_SCROLL_SPEED_BASE: f32 = -120.0;
pub const POWER_UP_SCROLL_SPEED_BASE: f32 = -100.0;

/// How far past the right edge new entities appear.
pub const SPAWN_MARGIN_X: f32 = 50.0;

/// Vertical spawn bands as fractions of the viewport height.
const OBSTACLE_BAND: (f32, f32) = (0.2, 0.8);
const COLLECTIBLE_BAND: (f32, f32) = (0.2, 0.8);
const POWER_UP_BAND: (f32, f32) = (0.3, 0.7);

/// A repeating timer advanced by explicit frame deltas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnTimer {
    interval_ms: u32,
    elapsed_ms: u32,
}

impl SpawnTimer {
    pub fn new(interval_ms: u32) -> Self {
        SpawnTimer {
            interval_ms: interval_ms.max(1),
            elapsed_ms: 0,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Accumulate `dt_ms` and return how many times the timer fired.
    pub fn advance(&mut self, dt_ms: u32) -> u32 {
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        let fires = self.elapsed_ms / self.interval_ms;
        self.elapsed_ms %= self.interval_ms;
        fires
    }
}

/// Which kinds were actually placed into pools during one `advance`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpawnReport {
    pub obstacles: Vec<ObstacleKind>,
    pub collectibles: Vec<CollectibleKind>,
    pub power_ups: Vec<PowerUpKind>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spawner {
    pub obstacles: SpawnTimer,
    pub collectibles: SpawnTimer,
    pub power_ups: SpawnTimer,
}

impl Spawner {
    /// Timers for a level.  Intervals stay fixed for the level's duration.
    pub fn for_level(config: &LevelConfig) -> Self {
        Spawner {
            obstacles: SpawnTimer::new(config.obstacle_spawn_interval_ms),
            collectibles: SpawnTimer::new(config.collectible_spawn_interval_ms),
            power_ups: SpawnTimer::new(config.power_up_spawn_interval_ms),
        }
    }

    /// Advance all three timers and spawn for every one that fired.
    pub fn advance<R: Rng>(
        &mut self,
        dt_ms: u32,
        config: &LevelConfig,
        pools: &mut Pools,
        viewport: Viewport,
        rng: &mut R,
    ) -> SpawnReport {
        let mut report = SpawnReport::default();

        for _ in 0..self.obstacles.advance(dt_ms) {
            if let Some(kind) = spawn_obstacle(config, pools, viewport, rng) {
                report.obstacles.push(kind);
            }
        }
        for _ in 0..self.collectibles.advance(dt_ms) {
            if let Some(kind) = spawn_collectible(config, pools, viewport, rng) {
                report.collectibles.push(kind);
            }
        }
        for _ in 0..self.power_ups.advance(dt_ms) {
            if let Some(kind) = spawn_power_up(config, pools, viewport, rng) {
                report.power_ups.push(kind);
            }
        }
        report
    }
}

/// Uniform choice from the enabled set; `None` when the set is empty.
pub fn pick_kind<K: Copy, R: Rng>(kinds: &[K], rng: &mut R) -> Option<K> {
    kinds.choose(rng).copied()
}

fn spawn_point<R: Rng>(viewport: Viewport, band: (f32, f32), rng: &mut R) -> (f32, f32) {
    let x = viewport.width + SPAWN_MARGIN_X;
    let y = rng.gen_range(viewport.height * band.0..=viewport.height * band.1);
    (x, y)
}

pub fn spawn_obstacle<R: Rng>(
    config: &LevelConfig,
    pools: &mut Pools,
    viewport: Viewport,
    rng: &mut R,
) -> Option<ObstacleKind> {
    let kind = pick_kind(&config.obstacle_kinds, rng)?;
    let (x, y) = spawn_point(viewport, OBSTACLE_BAND, rng);
    let speed = OBSTACLE_SCROLL_SPEED_BASE * config.scroll_speed_multiplier;
    pools.spawn_obstacle(kind, x, y, speed)?;
    debug!(?kind, y, speed, "spawned obstacle");
    Some(kind)
}

pub fn spawn_collectible<R: Rng>(
    config: &LevelConfig,
    pools: &mut Pools,
    viewport: Viewport,
    rng: &mut R,
) -> Option<CollectibleKind> {
    let kind = pick_kind(&config.collectible_kinds, rng)?;
    let (x, y) = spawn_point(viewport, COLLECTIBLE_BAND, rng);
    let speed = COLLECTIBLE_SCROLL_SPEED_BASE * config.scroll_speed_multiplier;
    pools.collectibles.try_spawn(kind, x, y, speed)?;
    debug!(?kind, y, speed, "spawned collectible");
    Some(kind)
}

pub fn spawn_power_up<R: Rng>(
    config: &LevelConfig,
    pools: &mut Pools,
    viewport: Viewport,
    rng: &mut R,
) -> Option<PowerUpKind> {
    let kind = pick_kind(&config.power_up_kinds, rng)?;
    let (x, y) = spawn_point(viewport, POWER_UP_BAND, rng);
    let speed = POWER_UP_SCROLL_SPEED_BASE * config.scroll_speed_multiplier;
    pools.power_ups.try_spawn(kind, x, y, speed)?;
    debug!(?kind, y, speed, "spawned power-up");
    Some(kind)
}
