//! Audio service injected into the game driver.
//!
//! The core never waits on audio and never learns whether a cue played.
//! Implementations must swallow their own failures.

use std::io::Write;

use tracing::trace;

use crate::scene::SceneKind;

/// Named sound cues raised by the simulation and the scene flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Flap,
    ObstacleHit,
    ShieldBlock,
    ItemCollected,
    PowerUpCollected,
    LevelComplete,
    GameWon,
    GameOver,
    Confirm,
}

pub trait AudioSink {
    /// Tell the audio engine which scene is now showing.
    fn set_current_context(&mut self, scene: SceneKind);
    fn play_cue(&mut self, cue: Cue);
    /// Flip mute; returns `true` if audio is now enabled.
    fn toggle_mute(&mut self) -> bool;
}

/// Plays nothing.
#[derive(Clone, Debug, Default)]
pub struct NullAudio {
    muted: bool,
}

impl AudioSink for NullAudio {
    fn set_current_context(&mut self, _scene: SceneKind) {}

    fn play_cue(&mut self, _cue: Cue) {}

    fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        !self.muted
    }
}

/// Rings the terminal bell for the cues that matter most.
pub struct TerminalBell<W: Write> {
    out: W,
    muted: bool,
    context: Option<SceneKind>,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        TerminalBell { out, muted: false, context: None }
    }

    pub fn context(&self) -> Option<SceneKind> {
        self.context
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: Write> AudioSink for TerminalBell<W> {
    fn set_current_context(&mut self, scene: SceneKind) {
        self.context = Some(scene);
    }

    fn play_cue(&mut self, cue: Cue) {
        if self.muted {
            return;
        }
        let audible = matches!(cue, Cue::ObstacleHit | Cue::GameOver | Cue::GameWon | Cue::LevelComplete);
        if !audible {
            return;
        }
        let result = self.out.write_all(b"\x07").and_then(|_| self.out.flush());
        if let Err(err) = result {
            trace!(?cue, %err, "bell failed");
        }
    }

    fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        !self.muted
    }
}
