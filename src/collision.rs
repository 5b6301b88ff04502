//! Player-versus-pool collision and its consequences.
//!
//! Obstacles use a solid-body test (bodies must actually interpenetrate);
//! collectibles and power-up items use a softer overlap test where touching
//! is enough.  The resolver only reads entity state and deactivates entities
//! through `collect`/`despawn`; all score, lives and power-up changes go
//! through `GameSession`.

use tracing::debug;

use crate::audio::Cue;
use crate::entities::{Circle, CollectibleKind, Player, PowerUpKind, Viewport};
use crate::pool::{Pool, Pools};
use crate::session::GameSession;

/// Length of the post-hit invincibility window.
pub const INVINCIBILITY_MS: u32 = 1500;
/// How far an obstacle hit shoves the player left before the ease home.
pub const KNOCKBACK_X: f32 = 40.0;
pub const MAGNET_RADIUS: f32 = 150.0;
/// Closing speed of attracted collectibles, units per second.
pub const MAGNET_SPEED: f32 = 200.0;

// ── Shape tests ───────────────────────────────────────────────────────────────

/// Solid-body test: the circles must interpenetrate.
pub fn collides(a: &Circle, b: &Circle) -> bool {
    let (dx, dy) = (a.x - b.x, a.y - b.y);
    let r = a.radius + b.radius;
    dx * dx + dy * dy < r * r
}

/// Overlap test: touching counts.
pub fn overlaps(a: &Circle, b: &Circle) -> bool {
    let (dx, dy) = (a.x - b.x, a.y - b.y);
    let r = a.radius + b.radius;
    dx * dx + dy * dy <= r * r
}

pub fn distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
}

// ── Hits ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitCause {
    Obstacle,
    OutOfBounds,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    /// The player was invincible; nothing happened.
    Ignored,
    /// A non-damaging hit (shield): knockback and invincibility only.
    Absorbed,
    /// A life was lost and the player survived.
    Damaged { lives_left: u32 },
    /// The last life was lost.
    Fatal,
}

/// The hit sequence.  A fatal hit returns before any other side effect.
pub fn player_hit(
    player: &mut Player,
    session: &mut GameSession,
    damaging: bool,
    cause: HitCause,
    viewport: Viewport,
) -> HitOutcome {
    if player.is_invincible() {
        return HitOutcome::Ignored;
    }

    let outcome = if damaging {
        session.decrement_lives();
        if session.lives() == 0 {
            debug!(?cause, "fatal hit");
            return HitOutcome::Fatal;
        }
        HitOutcome::Damaged { lives_left: session.lives() }
    } else {
        HitOutcome::Absorbed
    };

    // Replaces any window still running.
    player.invincible_ms = Some(INVINCIBILITY_MS);

    match cause {
        HitCause::Obstacle => player.x -= KNOCKBACK_X,
        HitCause::OutOfBounds => {
            player.y = viewport.height / 2.0;
            player.vy = 0.0;
        }
    }
    player.start_return_home();

    debug!(?cause, ?outcome, "player hit");
    outcome
}

/// What the resolver did this frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolution {
    pub hits: Vec<HitOutcome>,
    pub collected: Vec<CollectibleKind>,
    pub powered_up: Vec<PowerUpKind>,
    /// Score at the instant of a fatal hit, if one happened.
    pub fatal_score: Option<u32>,
    pub cues: Vec<Cue>,
}

impl Resolution {
    pub fn is_fatal(&self) -> bool {
        self.fatal_score.is_some()
    }
}

/// Resolve obstacles first, then collectibles, then power-ups.  A fatal
/// obstacle hit stops further obstacle checks but pickups still apply.
pub fn resolve(
    player: &mut Player,
    pools: &mut Pools,
    session: &mut GameSession,
    viewport: Viewport,
) -> Resolution {
    let mut res = Resolution::default();
    resolve_obstacles(player, pools, session, viewport, &mut res);
    resolve_collectibles(player, &mut pools.collectibles, session, &mut res);
    resolve_power_ups(player, &mut pools.power_ups, session, &mut res);
    res
}

pub fn resolve_obstacles(
    player: &mut Player,
    pools: &mut Pools,
    session: &mut GameSession,
    viewport: Viewport,
    res: &mut Resolution,
) {
    for obstacle in pools.obstacles_mut() {
        if res.is_fatal() || player.is_invincible() {
            return;
        }
        let Some(body) = obstacle.body() else {
            continue;
        };
        if !collides(&player.body(), &body) {
            continue;
        }

        if session.is_power_up_active(PowerUpKind::Shield) {
            session.deactivate_power_up(PowerUpKind::Shield);
            obstacle.despawn();
            res.cues.push(Cue::ShieldBlock);
            let outcome = player_hit(player, session, false, HitCause::Obstacle, viewport);
            res.hits.push(outcome);
            continue;
        }

        res.cues.push(Cue::ObstacleHit);
        obstacle.despawn();
        let outcome = player_hit(player, session, true, HitCause::Obstacle, viewport);
        if outcome == HitOutcome::Fatal {
            res.fatal_score = Some(session.score());
        }
        res.hits.push(outcome);
    }
}

pub fn resolve_collectibles(
    player: &Player,
    pool: &mut Pool<CollectibleKind>,
    session: &mut GameSession,
    res: &mut Resolution,
) {
    let player_body = player.body();
    for item in pool.iter_mut() {
        let Some(body) = item.body() else {
            continue;
        };
        if !overlaps(&player_body, &body) {
            continue;
        }
        session.increment_score(item.kind.points());
        item.collect();
        res.collected.push(item.kind);
        res.cues.push(Cue::ItemCollected);
    }
}

pub fn resolve_power_ups(
    player: &Player,
    pool: &mut Pool<PowerUpKind>,
    session: &mut GameSession,
    res: &mut Resolution,
) {
    let player_body = player.body();
    for item in pool.iter_mut() {
        let Some(body) = item.body() else {
            continue;
        };
        if !overlaps(&player_body, &body) {
            continue;
        }
        session.activate_power_up(item.kind, item.kind.duration_ms());
        item.collect();
        res.powered_up.push(item.kind);
        res.cues.push(Cue::PowerUpCollected);
    }
}

// ── Magnet ────────────────────────────────────────────────────────────────────

/// Steer collectibles toward the player.  Those inside `MAGNET_RADIUS` get a
/// pursuit velocity aimed at the player's current position; every other
/// active collectible falls back to its scroll velocity.  Call with
/// `active == false` once the magnet expires so pursuit stops.
pub fn attract_collectibles(player: &Player, pool: &mut Pool<CollectibleKind>, active: bool) {
    for item in pool.iter_mut() {
        if !item.active {
            continue;
        }
        let dist = distance(player.x, player.y, item.x, item.y);
        if active && dist < MAGNET_RADIUS && dist > f32::EPSILON {
            item.vx = (player.x - item.x) / dist * MAGNET_SPEED;
            item.vy = (player.y - item.y) / dist * MAGNET_SPEED;
        } else {
            item.vx = item.scroll_vx;
            item.vy = 0.0;
        }
    }
}
