//! The authoritative record of one play-through: score, lives, level
//! progress and power-up timers.
//!
//! Fields are private; every change goes through a named transition so the
//! invariants below hold at all times:
//!
//! * a power-up slot is active exactly when its remaining time is non-zero;
//! * lives never go below zero;
//! * the level index only moves forward until a reset.

use tracing::{debug, info};

use crate::entities::PowerUpKind;
use crate::levels::LevelConfig;

pub const STARTING_LIVES: u32 = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PowerUpSlot {
    active: bool,
    remaining_ms: u32,
}

impl PowerUpSlot {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }
}

/// Result of `advance_to_next_level`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelAdvance {
    /// Moved on to the level at this index; its config must be resolved.
    Next(usize),
    /// The final level was completed.
    Won,
}

/// Read-only copy of the session for the UI.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSnapshot {
    pub score: u32,
    pub lives: u32,
    /// 1-based level number.
    pub level_number: usize,
    pub level_name: Option<String>,
    pub game_won: bool,
    pub shield_ms: u32,
    pub speed_ms: u32,
    pub magnet_ms: u32,
}

impl SessionSnapshot {
    /// Seconds left on each running power-up, rounded up so a fresh timer
    /// shows its full duration.
    pub fn power_up_seconds(&self) -> Vec<(PowerUpKind, u32)> {
        [
            (PowerUpKind::Shield, self.shield_ms),
            (PowerUpKind::Speed, self.speed_ms),
            (PowerUpKind::Magnet, self.magnet_ms),
        ]
        .into_iter()
        .filter(|&(_, ms)| ms > 0)
        .map(|(kind, ms)| (kind, ms.div_ceil(1000)))
        .collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameSession {
    score: u32,
    lives: u32,
    current_level_index: usize,
    current_level_config: Option<LevelConfig>,
    game_won: bool,
    power_ups: [PowerUpSlot; 3],
    level_count: usize,
}

impl GameSession {
    /// A fresh session over a catalog of `level_count` levels.
    pub fn new(level_count: usize) -> Self {
        GameSession {
            score: 0,
            lives: STARTING_LIVES,
            current_level_index: 0,
            current_level_config: None,
            game_won: false,
            power_ups: [PowerUpSlot::default(); 3],
            level_count: level_count.max(1),
        }
    }

    // ── Observation ──────────────────────────────────────────────────────────

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn current_level_index(&self) -> usize {
        self.current_level_index
    }

    pub fn current_level_config(&self) -> Option<&LevelConfig> {
        self.current_level_config.as_ref()
    }

    pub fn game_won(&self) -> bool {
        self.game_won
    }

    /// Won, or out of lives: nothing left to play in this session.
    pub fn is_finished(&self) -> bool {
        self.game_won || self.lives == 0
    }

    pub fn power_up(&self, kind: PowerUpKind) -> PowerUpSlot {
        self.power_ups[kind.index()]
    }

    pub fn is_power_up_active(&self, kind: PowerUpKind) -> bool {
        self.power_ups[kind.index()].active
    }

    pub fn power_up_remaining_ms(&self, kind: PowerUpKind) -> u32 {
        self.power_ups[kind.index()].remaining_ms
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            score: self.score,
            lives: self.lives,
            level_number: self.current_level_index + 1,
            level_name: self.current_level_config.as_ref().map(|c| c.name.clone()),
            game_won: self.game_won,
            shield_ms: self.power_up_remaining_ms(PowerUpKind::Shield),
            speed_ms: self.power_up_remaining_ms(PowerUpKind::Speed),
            magnet_ms: self.power_up_remaining_ms(PowerUpKind::Magnet),
        }
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    pub fn increment_score(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount);
    }

    pub fn decrement_lives(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    /// Start (or restart) a power-up timer.  Re-collecting refreshes the
    /// duration; it never adds to what is left.
    pub fn activate_power_up(&mut self, kind: PowerUpKind, duration_ms: u32) {
        if duration_ms == 0 {
            self.deactivate_power_up(kind);
            return;
        }
        debug!(?kind, duration_ms, "power-up activated");
        self.power_ups[kind.index()] = PowerUpSlot {
            active: true,
            remaining_ms: duration_ms,
        };
    }

    pub fn deactivate_power_up(&mut self, kind: PowerUpKind) {
        self.power_ups[kind.index()] = PowerUpSlot::default();
    }

    /// Count every active timer down by one frame's elapsed time.  A timer
    /// that reaches zero switches its power-up off.
    pub fn update_power_up_timers(&mut self, delta_ms: u32) {
        for kind in PowerUpKind::ALL {
            let slot = &mut self.power_ups[kind.index()];
            if !slot.active {
                continue;
            }
            slot.remaining_ms = slot.remaining_ms.saturating_sub(delta_ms);
            if slot.remaining_ms == 0 {
                debug!(?kind, "power-up expired");
                self.deactivate_power_up(kind);
            }
        }
    }

    /// Move to the next level, or mark the game won when already on the
    /// last one.  Score and lives carry over; power-ups do not.
    pub fn advance_to_next_level(&mut self) -> LevelAdvance {
        if self.current_level_index + 1 >= self.level_count {
            info!(score = self.score, "final level complete");
            self.game_won = true;
            return LevelAdvance::Won;
        }
        self.current_level_index += 1;
        self.current_level_config = None;
        self.power_ups = [PowerUpSlot::default(); 3];
        info!(level = self.current_level_index + 1, score = self.score, "advanced to next level");
        LevelAdvance::Next(self.current_level_index)
    }

    /// Back to the state of a brand-new game.
    pub fn reset_game_session(&mut self) {
        *self = GameSession::new(self.level_count);
    }

    /// Bind the resolved config for a level.
    pub fn set_current_level_config(&mut self, index: usize, config: LevelConfig) {
        self.current_level_index = index;
        self.current_level_config = Some(config);
    }
}
