//! The per-frame simulation step.
//!
//! `tick` advances one `PlayState` by one frame against the shared
//! `GameSession`.  It never changes scenes itself: it returns the
//! transition it wants and the audio cues it raised, and the caller
//! applies them once the step is complete.  All randomness comes through
//! the injected RNG so tests can seed it.

use rand::Rng;
use tracing::info;

use crate::audio::Cue;
use crate::collision::{self, HitCause, HitOutcome};
use crate::entities::{Player, PlayState, PowerUpKind, Viewport, RETURN_HOME_MS};
use crate::levels::LevelConfig;
use crate::pool::Pools;
use crate::session::{GameSession, LevelAdvance};
use crate::spawner::Spawner;

pub const GRAVITY: f32 = 800.0;
pub const FLAP_VELOCITY_NORMAL: f32 = -300.0;
pub const FLAP_VELOCITY_BOOSTED: f32 = -400.0;
/// How long the renderer shows the flap pose.
pub const FLAP_POSE_MS: u32 = 100;

/// Inputs gathered since the previous frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub flap: bool,
}

/// A scene change requested by the simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The session has already advanced; load this level next.
    LevelComplete { next_level_index: usize },
    Won { score: u32 },
    /// `level` is 1-based.
    GameOver { score: u32, level: usize },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepOutcome {
    pub transition: Option<Transition>,
    pub cues: Vec<Cue>,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Fresh play state for a level: player at home, empty pools, timers at zero.
pub fn init_play_state(config: &LevelConfig, viewport: Viewport) -> PlayState {
    PlayState {
        player: Player::new(viewport),
        pools: Pools::new(),
        spawner: Spawner::for_level(config),
        viewport,
        frame: 0,
        elapsed_ms: 0,
    }
}

// ── Player physics ───────────────────────────────────────────────────────────

/// Flap impulse for the current power-up state.
pub fn flap_velocity(session: &GameSession) -> f32 {
    if session.is_power_up_active(PowerUpKind::Speed) {
        FLAP_VELOCITY_BOOSTED
    } else {
        FLAP_VELOCITY_NORMAL
    }
}

pub fn flap(player: &mut Player, session: &GameSession) {
    player.vy = flap_velocity(session);
    player.flap_pose_ms = FLAP_POSE_MS;
}

/// Gravity, the return-home ease and the invincibility countdown.
pub fn update_player(player: &mut Player, dt_ms: u32) {
    let dt = dt_ms as f32 / 1000.0;
    player.vy += GRAVITY * dt;
    player.y += player.vy * dt;
    player.flap_pose_ms = player.flap_pose_ms.saturating_sub(dt_ms);

    if let Some(ease) = player.return_home.as_mut() {
        ease.elapsed_ms += dt_ms as f32;
        let t = (ease.elapsed_ms / RETURN_HOME_MS).min(1.0);
        // Ease-out: fast at first, settling on the home column.
        let k = 1.0 - (1.0 - t) * (1.0 - t);
        player.x = ease.from_x + (player.home_x - ease.from_x) * k;
        if t >= 1.0 {
            player.return_home = None;
        }
    }

    if let Some(left) = player.invincible_ms {
        let left = left.saturating_sub(dt_ms);
        player.invincible_ms = if left == 0 { None } else { Some(left) };
    }
}

/// Whether the player has left the viewport vertically.
pub fn is_out_of_bounds(player: &Player, viewport: Viewport) -> bool {
    player.y < -player.radius || player.y > viewport.height + player.radius
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame of `dt_ms` milliseconds.
///
/// Order: flap, power-up timers, player physics, spawning, magnet steering,
/// entity movement, collisions (obstacles before pickups), bounds, and
/// finally the level-target check.
pub fn tick<R: Rng>(
    state: &mut PlayState,
    session: &mut GameSession,
    input: FrameInput,
    dt_ms: u32,
    rng: &mut R,
) -> StepOutcome {
    let mut out = StepOutcome::default();
    state.frame += 1;
    state.elapsed_ms += u64::from(dt_ms);

    // ── 1. Input ─────────────────────────────────────────────────────────────
    if input.flap {
        flap(&mut state.player, session);
        out.cues.push(Cue::Flap);
    }

    // ── 2. Power-up timers ───────────────────────────────────────────────────
    session.update_power_up_timers(dt_ms);

    // ── 3. Player ────────────────────────────────────────────────────────────
    update_player(&mut state.player, dt_ms);

    // ── 4. Spawning ──────────────────────────────────────────────────────────
    if let Some(config) = session.current_level_config() {
        state
            .spawner
            .advance(dt_ms, config, &mut state.pools, state.viewport, rng);
    }

    // ── 5. Magnet, then entity self-update ───────────────────────────────────
    collision::attract_collectibles(
        &state.player,
        &mut state.pools.collectibles,
        session.is_power_up_active(PowerUpKind::Magnet),
    );
    state.pools.update(dt_ms as f32);

    // ── 6. Collisions ────────────────────────────────────────────────────────
    let res = collision::resolve(&mut state.player, &mut state.pools, session, state.viewport);
    out.cues.extend(res.cues.iter().copied());
    let mut fatal_score = res.fatal_score;

    // ── 7. Leaving the screen counts as a damaging hit ───────────────────────
    if fatal_score.is_none()
        && !state.player.is_invincible()
        && is_out_of_bounds(&state.player, state.viewport)
    {
        out.cues.push(Cue::ObstacleHit);
        let outcome = collision::player_hit(
            &mut state.player,
            session,
            true,
            HitCause::OutOfBounds,
            state.viewport,
        );
        if outcome == HitOutcome::Fatal {
            fatal_score = Some(session.score());
        }
    }

    if let Some(score) = fatal_score {
        let level = session.current_level_index() + 1;
        info!(score, level, "game over");
        out.cues.push(Cue::GameOver);
        out.transition = Some(Transition::GameOver { score, level });
        return out;
    }

    // ── 8. Level target ──────────────────────────────────────────────────────
    if session.game_won() {
        return out;
    }
    let target = session
        .current_level_config()
        .and_then(LevelConfig::target_score_to_advance);
    if let Some(target) = target {
        if session.score() >= target {
            let transition = match session.advance_to_next_level() {
                LevelAdvance::Next(next_level_index) => {
                    out.cues.push(Cue::LevelComplete);
                    Transition::LevelComplete { next_level_index }
                }
                LevelAdvance::Won => {
                    out.cues.push(Cue::GameWon);
                    Transition::Won { score: session.score() }
                }
            };
            out.transition = Some(transition);
        }
    }

    out
}
