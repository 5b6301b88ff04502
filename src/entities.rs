//! All game entity types and their per-kind tuning tables.
//!
//! Kinds are closed enums; everything that differs between kinds (visual
//! size, collision fraction, points, power-up duration, motion) is looked up
//! from a `match` table rather than modelled as separate types.

use std::f32::consts::PI;

use serde::Deserialize;

use crate::pool::Pools;
use crate::spawner::Spawner;

// ── Kinds ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    CloudMonster,
    FlyingKitten,
    Boulder,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectibleKind {
    CinnamonRoll,
    CoffeeCup,
    Star,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    /// Absorbs exactly one obstacle collision.
    Shield,
    /// Boosts the flap impulse while active.
    Speed,
    /// Pulls nearby collectibles toward the player.
    Magnet,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [
        ObstacleKind::CloudMonster,
        ObstacleKind::FlyingKitten,
        ObstacleKind::Boulder,
    ];

    /// Maximum simultaneously allocated obstacles of this kind.
    pub fn pool_capacity(self) -> usize {
        match self {
            ObstacleKind::CloudMonster => 20,
            ObstacleKind::FlyingKitten => 18,
            ObstacleKind::Boulder => 15,
        }
    }
}

impl CollectibleKind {
    pub const ALL: [CollectibleKind; 3] = [
        CollectibleKind::CinnamonRoll,
        CollectibleKind::CoffeeCup,
        CollectibleKind::Star,
    ];

    /// Score awarded when collected.
    pub fn points(self) -> u32 {
        match self {
            CollectibleKind::CinnamonRoll => 10,
            CollectibleKind::CoffeeCup => 5,
            CollectibleKind::Star => 25,
        }
    }
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Shield, PowerUpKind::Speed, PowerUpKind::Magnet];

    /// How long the effect lasts once picked up, in milliseconds.
    pub fn duration_ms(self) -> u32 {
        match self {
            PowerUpKind::Shield => 10_000,
            PowerUpKind::Speed => 7_000,
            PowerUpKind::Magnet => 8_000,
        }
    }

    /// Stable slot index used by the session's power-up table.
    pub fn index(self) -> usize {
        match self {
            PowerUpKind::Shield => 0,
            PowerUpKind::Speed => 1,
            PowerUpKind::Magnet => 2,
        }
    }
}

// ── Tuning ────────────────────────────────────────────────────────────────────

/// Optional per-kind movement layered on top of the horizontal scroll.
/// Only `Bob` changes the position; the others are cosmetic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    Drift,
    /// Vertical sine bob from the spawn height down by `amplitude` and back.
    Bob { amplitude: f32, half_period_ms: f32 },
    /// One full turn every `period_ms`.
    Spin { period_ms: f32 },
    /// Slow constant rotation.
    Rotate { rad_per_ms: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    /// Unscaled width of the kind's artwork in world units.
    pub visual_width: f32,
    pub scale: f32,
    /// Collision diameter as a fraction of the scaled visual width.
    pub collision_fraction: f32,
    pub motion: Motion,
}

impl Tuning {
    pub fn display_width(&self) -> f32 {
        self.visual_width * self.scale
    }

    /// Radius of the circular collision body; never below one unit.
    pub fn collision_radius(&self) -> f32 {
        (self.display_width() * self.collision_fraction / 2.0).max(1.0)
    }
}

/// Implemented by every kind a `Pool` can hold.
pub trait EntityKind: Copy + std::fmt::Debug + PartialEq {
    fn tuning(self) -> Tuning;
}

/// Collectibles turn 0.01 rad every 16.66 ms.
const COLLECTIBLE_ROTATION: f32 = 0.01 / 16.66;

impl EntityKind for ObstacleKind {
    fn tuning(self) -> Tuning {
        match self {
            ObstacleKind::CloudMonster => Tuning {
                visual_width: 160.0,
                scale: 0.7,
                collision_fraction: 0.8,
                motion: Motion::Drift,
            },
            ObstacleKind::FlyingKitten => Tuning {
                visual_width: 160.0,
                scale: 0.3,
                collision_fraction: 1.0,
                motion: Motion::Bob { amplitude: 15.0, half_period_ms: 1500.0 },
            },
            ObstacleKind::Boulder => Tuning {
                visual_width: 160.0,
                scale: 0.56,
                collision_fraction: 0.9,
                motion: Motion::Spin { period_ms: 3000.0 },
            },
        }
    }
}

impl EntityKind for CollectibleKind {
    fn tuning(self) -> Tuning {
        let (visual_width, scale) = match self {
            CollectibleKind::CinnamonRoll => (100.0, 0.4),
            CollectibleKind::CoffeeCup => (40.0, 1.0),
            CollectibleKind::Star => (40.0, 1.0),
        };
        Tuning {
            visual_width,
            scale,
            collision_fraction: 1.0,
            motion: Motion::Rotate { rad_per_ms: COLLECTIBLE_ROTATION },
        }
    }
}

impl EntityKind for PowerUpKind {
    fn tuning(self) -> Tuning {
        let (visual_width, scale) = match self {
            PowerUpKind::Shield => (400.0, 0.125),
            PowerUpKind::Speed => (250.0, 0.2),
            PowerUpKind::Magnet => (400.0, 0.1),
        };
        Tuning {
            visual_width,
            scale,
            collision_fraction: 1.0,
            motion: Motion::Drift,
        }
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport { width: 800.0, height: 600.0 }
    }
}

/// Circular collision body in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

// ── Pooled entities ───────────────────────────────────────────────────────────

/// Duration of the shrink-and-fade played after `collect`.
pub const COLLECT_FADE_MS: f32 = 200.0;

/// One pooled obstacle, collectible or power-up item.
///
/// `active == false` means the slot is free for reuse and inert to
/// collisions.  A collected entity may still be visible for a short fade
/// (`fade_ms > 0`) but it no longer interacts with anything.
#[derive(Clone, Debug)]
pub struct Entity<K> {
    pub kind: K,
    pub x: f32,
    pub y: f32,
    /// Current velocity, units per second.
    pub vx: f32,
    pub vy: f32,
    /// Scroll velocity given at spawn; restored whenever nothing steers the entity.
    pub scroll_vx: f32,
    pub active: bool,
    pub body_enabled: bool,
    pub scale: f32,
    pub collision_radius: f32,
    pub rotation: f32,
    pub alpha: f32,
    pub fade_ms: f32,
    anchor_y: f32,
    age_ms: f32,
}

impl<K: EntityKind> Entity<K> {
    /// A freshly allocated slot, already spawned.
    pub fn spawned(kind: K, x: f32, y: f32, velocity_x: f32) -> Self {
        let mut e = Entity {
            kind,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            scroll_vx: 0.0,
            active: false,
            body_enabled: false,
            scale: 1.0,
            collision_radius: 1.0,
            rotation: 0.0,
            alpha: 1.0,
            fade_ms: 0.0,
            anchor_y: y,
            age_ms: 0.0,
        };
        e.spawn(kind, x, y, velocity_x);
        e
    }

    /// Reinitialise this slot as a live entity.
    pub fn spawn(&mut self, kind: K, x: f32, y: f32, velocity_x: f32) {
        let tuning = kind.tuning();
        self.kind = kind;
        self.x = x;
        self.y = y;
        self.vx = velocity_x;
        self.vy = 0.0;
        self.scroll_vx = velocity_x;
        self.active = true;
        self.body_enabled = true;
        self.scale = tuning.scale;
        self.collision_radius = tuning.collision_radius();
        self.rotation = 0.0;
        self.alpha = 1.0;
        self.fade_ms = 0.0;
        self.anchor_y = y;
        self.age_ms = 0.0;
    }

    pub fn display_width(&self) -> f32 {
        self.kind.tuning().visual_width * self.scale
    }

    /// Collision body, or `None` once the entity has been deactivated.
    pub fn body(&self) -> Option<Circle> {
        if self.active && self.body_enabled {
            Some(Circle { x: self.x, y: self.y, radius: self.collision_radius })
        } else {
            None
        }
    }

    /// Whether the presentation layer should draw this entity.
    pub fn is_visible(&self) -> bool {
        self.active || self.fade_ms > 0.0
    }

    /// Deactivate with a shrink-and-fade.  Returns `false` (and changes
    /// nothing) if the entity was already inactive.
    pub fn collect(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.body_enabled = false;
        self.vx = 0.0;
        self.vy = 0.0;
        self.fade_ms = COLLECT_FADE_MS;
        true
    }

    /// Deactivate and hide immediately.  Returns `false` if already inactive.
    pub fn despawn(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.body_enabled = false;
        self.vx = 0.0;
        self.vy = 0.0;
        self.fade_ms = 0.0;
        true
    }

    /// Per-frame self update: move, animate, and despawn once fully past
    /// the left edge of the viewport.
    pub fn update(&mut self, dt_ms: f32) {
        if !self.active {
            if self.fade_ms > 0.0 {
                self.fade_ms = (self.fade_ms - dt_ms).max(0.0);
                let t = self.fade_ms / COLLECT_FADE_MS;
                self.alpha = t;
                self.scale = self.kind.tuning().scale * t;
            }
            return;
        }

        let dt = dt_ms / 1000.0;
        self.x += self.vx * dt;
        self.anchor_y += self.vy * dt;
        self.age_ms += dt_ms;

        match self.kind.tuning().motion {
            Motion::Drift => self.y = self.anchor_y,
            Motion::Bob { amplitude, half_period_ms } => {
                let phase = PI * self.age_ms / half_period_ms;
                self.y = self.anchor_y + amplitude * (1.0 - phase.cos()) / 2.0;
            }
            Motion::Spin { period_ms } => {
                self.y = self.anchor_y;
                self.rotation = 2.0 * PI * (self.age_ms % period_ms) / period_ms;
            }
            Motion::Rotate { rad_per_ms } => {
                self.y = self.anchor_y;
                self.rotation += rad_per_ms * dt_ms;
            }
        }

        if self.x < -self.display_width() {
            self.despawn();
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

/// Duration of the ease back to the home column after a hit.
pub const RETURN_HOME_MS: f32 = 300.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ReturnHome {
    pub from_x: f32,
    pub elapsed_ms: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    /// Vertical velocity, units per second (negative = up).
    pub vy: f32,
    pub radius: f32,
    pub home_x: f32,
    /// Remaining invincibility, if a window is running.  At most one.
    pub invincible_ms: Option<u32>,
    pub return_home: Option<ReturnHome>,
    /// Time left on the flap pose, for the renderer.
    pub flap_pose_ms: u32,
}

pub const PLAYER_RADIUS: f32 = 24.0;

impl Player {
    pub fn new(viewport: Viewport) -> Self {
        Player {
            x: viewport.width / 4.0,
            y: viewport.height / 2.0,
            vy: 0.0,
            radius: PLAYER_RADIUS,
            home_x: viewport.width / 4.0,
            invincible_ms: None,
            return_home: None,
            flap_pose_ms: 0,
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ms.is_some()
    }

    pub fn body(&self) -> Circle {
        Circle { x: self.x, y: self.y, radius: self.radius }
    }

    /// Begin easing back to `home_x` from the current column.
    pub fn start_return_home(&mut self) {
        self.return_home = Some(ReturnHome { from_x: self.x, elapsed_ms: 0.0 });
    }
}

// ── Master play state ─────────────────────────────────────────────────────────

/// Everything simulated while a level is being played.  The score, lives and
/// power-ups live in `GameSession`, which outlives a single level.
#[derive(Clone, Debug)]
pub struct PlayState {
    pub player: Player,
    pub pools: Pools,
    pub spawner: Spawner,
    pub viewport: Viewport,
    pub frame: u64,
    pub elapsed_ms: u64,
}
