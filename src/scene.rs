//! Scene flow: Welcome → Menu → Play → GameOver / Win → ...
//!
//! `Game` is the outer driver.  It owns the session, the level catalog, the
//! current scene and the injected audio service.  Inputs arrive through
//! `handle_input`; `update` runs one simulation step while playing and then
//! applies whatever transition the step asked for.

use rand::Rng;
use tracing::{info, warn};

use crate::audio::{AudioSink, Cue};
use crate::compute::{init_play_state, tick, FrameInput, Transition};
use crate::entities::{PlayState, Viewport};
use crate::levels::LevelCatalog;
use crate::session::GameSession;

/// How long the "entering level" banner stays up.
pub const LEVEL_BANNER_MS: u32 = 2000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneKind {
    Welcome,
    Menu,
    Play,
    GameOver,
    Win,
}

#[derive(Clone, Debug)]
pub enum Scene {
    Welcome,
    Menu,
    Play(Box<PlayState>),
    /// `level` is the 1-based level reached.
    GameOver { score: u32, level: usize },
    Win { score: u32 },
}

impl Scene {
    pub fn kind(&self) -> SceneKind {
        match self {
            Scene::Welcome => SceneKind::Welcome,
            Scene::Menu => SceneKind::Menu,
            Scene::Play(_) => SceneKind::Play,
            Scene::GameOver { .. } => SceneKind::GameOver,
            Scene::Win { .. } => SceneKind::Win,
        }
    }
}

/// Discrete user actions, already mapped from raw keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    /// The flap action; outside of play it also confirms.
    Flap,
    Confirm,
    /// Leave a result screen for the welcome screen.
    Back,
    Quit,
    ToggleMute,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

/// Level name shown briefly when a level starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    pub text: String,
    pub remaining_ms: u32,
}

pub struct Game<A: AudioSink, R: Rng> {
    catalog: LevelCatalog,
    session: GameSession,
    scene: Scene,
    viewport: Viewport,
    audio: A,
    rng: R,
    pending_flap: bool,
    banner: Option<Banner>,
}

impl<A: AudioSink, R: Rng> Game<A, R> {
    pub fn new(catalog: LevelCatalog, viewport: Viewport, mut audio: A, rng: R) -> Self {
        let session = GameSession::new(catalog.len());
        audio.set_current_context(SceneKind::Welcome);
        Game {
            catalog,
            session,
            scene: Scene::Welcome,
            viewport,
            audio,
            rng,
            pending_flap: false,
            banner: None,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Stages score or lives ahead of a step; the terminal host never calls this.
    #[doc(hidden)]
    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Enter play at `index` directly, bypassing the menus. Indexes past
    /// the end start the last level.
    pub fn start_at(&mut self, index: usize) {
        self.start_level(index.min(self.catalog.last_index()));
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, input: Input) -> Control {
        if input == Input::ToggleMute {
            let enabled = self.audio.toggle_mute();
            info!(enabled, "audio toggled");
            return Control::Continue;
        }

        match (self.scene.kind(), input) {
            (SceneKind::Welcome | SceneKind::Menu, Input::Quit) => return Control::Exit,

            (SceneKind::Welcome, _) => {
                self.audio.play_cue(Cue::Confirm);
                self.go_to(Scene::Menu);
            }

            (SceneKind::Menu, Input::Flap | Input::Confirm) => {
                self.audio.play_cue(Cue::Confirm);
                if self.session.is_finished() {
                    self.session.reset_game_session();
                }
                self.start_level(self.session.current_level_index());
            }
            (SceneKind::Menu, _) => {}

            (SceneKind::Play, Input::Flap) => self.pending_flap = true,
            (SceneKind::Play, Input::Quit) => {
                info!(score = self.session.score(), "quit to menu");
                self.session.reset_game_session();
                self.go_to(Scene::Menu);
            }
            (SceneKind::Play, _) => {}

            (SceneKind::GameOver | SceneKind::Win, Input::Flap | Input::Confirm) => {
                self.audio.play_cue(Cue::Confirm);
                self.session.reset_game_session();
                self.start_level(0);
            }
            (SceneKind::GameOver | SceneKind::Win, Input::Back) => {
                self.audio.play_cue(Cue::Confirm);
                self.go_to(Scene::Welcome);
            }
            (SceneKind::GameOver | SceneKind::Win, Input::Quit) => return Control::Exit,
            (SceneKind::GameOver | SceneKind::Win, _) => {}
        }
        Control::Continue
    }

    // ── Frame ─────────────────────────────────────────────────────────────────

    /// Run one frame.  Returns the transition applied this frame, if any.
    pub fn update(&mut self, dt_ms: u32) -> Option<Transition> {
        if let Some(banner) = self.banner.as_mut() {
            banner.remaining_ms = banner.remaining_ms.saturating_sub(dt_ms);
            if banner.remaining_ms == 0 {
                self.banner = None;
            }
        }

        let Scene::Play(state) = &mut self.scene else {
            return None;
        };
        let input = FrameInput {
            flap: std::mem::take(&mut self.pending_flap),
        };
        let outcome = tick(state, &mut self.session, input, dt_ms, &mut self.rng);

        for cue in &outcome.cues {
            self.audio.play_cue(*cue);
        }
        if let Some(transition) = &outcome.transition {
            self.apply_transition(transition);
        }
        outcome.transition
    }

    fn apply_transition(&mut self, transition: &Transition) {
        match *transition {
            Transition::LevelComplete { next_level_index } => {
                self.start_level(next_level_index);
            }
            Transition::Won { score } => {
                info!(score, "game won");
                self.go_to(Scene::Win { score });
            }
            Transition::GameOver { score, level } => {
                self.session.reset_game_session();
                self.go_to(Scene::GameOver { score, level });
            }
        }
    }

    /// Resolve the level's config and enter play.  An unknown index falls
    /// back to the welcome screen.
    fn start_level(&mut self, index: usize) {
        let Some(config) = self.catalog.get_level_config(index) else {
            warn!(index, "no such level, returning to welcome screen");
            self.go_to(Scene::Welcome);
            return;
        };
        info!(level = index + 1, name = %config.name, "starting level");
        let state = init_play_state(config, self.viewport);
        self.session.set_current_level_config(index, config.clone());
        self.banner = Some(Banner {
            text: format!("Level {}: {}", index + 1, config.name),
            remaining_ms: LEVEL_BANNER_MS,
        });
        self.pending_flap = false;
        self.go_to(Scene::Play(Box::new(state)));
    }

    fn go_to(&mut self, scene: Scene) {
        if scene.kind() != SceneKind::Play {
            self.banner = None;
        }
        self.audio.set_current_context(scene.kind());
        self.scene = scene;
    }
}
