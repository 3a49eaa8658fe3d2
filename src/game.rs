//! Per-frame driver
//!
//! Owns the session and the host capabilities. The host calls `frame` once
//! per display refresh for as long as it returns true, and forwards discrete
//! key presses through `key_pressed`.

use crate::audio::AudioManager;
use crate::platform::{AudioOut, DrawSurface, KeyState, UiSink};
use crate::renderer::draw_frame;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, UpgradeKind, tick};
use crate::tuning::Tuning;

/// A game session wired to its host
pub struct Game<S: DrawSurface, A: AudioOut, U: UiSink> {
    pub state: GameState,
    pub settings: Settings,
    surface: S,
    audio: AudioManager<A>,
    ui: U,
}

impl<S: DrawSurface, A: AudioOut, U: UiSink> Game<S, A, U> {
    pub fn new(seed: u64, tuning: Tuning, settings: Settings, surface: S, audio: A, ui: U) -> Self {
        let audio = AudioManager::new(audio, &settings);
        Self {
            state: GameState::with_tuning(seed, tuning),
            settings,
            surface,
            audio,
            ui,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Begin the first run. Returns true if the host should start framing.
    pub fn start(&mut self, now_ms: f64) -> bool {
        self.state.start(now_ms);
        self.dispatch();
        self.state.is_running()
    }

    /// Begin a fresh run after game over
    pub fn restart(&mut self, now_ms: f64) -> bool {
        self.state.restart(now_ms);
        self.dispatch();
        self.state.is_running()
    }

    /// Returns true when the toggle resumed play and framing must restart
    pub fn toggle_pause(&mut self) -> bool {
        let was_paused = self.state.phase == GamePhase::Paused;
        self.state.toggle_pause();
        self.dispatch();
        was_paused && self.state.is_running()
    }

    pub fn fire(&mut self, now_ms: f64) -> u32 {
        let count = self.state.fire(now_ms);
        self.dispatch();
        count
    }

    pub fn apply_upgrade(&mut self, kind: UpgradeKind) -> bool {
        let applied = self.state.apply_upgrade(kind);
        self.dispatch();
        applied
    }

    /// Route a discrete key press. Returns true if framing must restart.
    pub fn key_pressed(&mut self, key: &str, now_ms: f64) -> bool {
        let key = key.to_lowercase();
        if key == self.settings.keys.pause {
            return self.toggle_pause();
        }
        if key == self.settings.keys.fire {
            self.fire(now_ms);
        }
        false
    }

    /// Route a host key-down event. Auto-repeats only feed held-key state,
    /// so pause and fire stay edge-triggered.
    pub fn key_down(&mut self, key: &str, repeat: bool, now_ms: f64) -> bool {
        if repeat {
            return false;
        }
        self.key_pressed(key, now_ms)
    }

    /// Keys whose default browser action must be suppressed
    pub fn claims_key(&self, key: &str) -> bool {
        key.to_lowercase() == self.settings.keys.fire
    }

    /// Run one display frame: simulate, draw, notify.
    ///
    /// Returns true while the next frame should be requested.
    pub fn frame(&mut self, now_ms: f64, keys: &(impl KeyState + ?Sized)) -> bool {
        if !self.state.is_running() {
            return false;
        }
        let input = self.settings.keys.read(keys);
        let again = tick(&mut self.state, &input, now_ms);
        draw_frame(&mut self.surface, &self.state);
        self.dispatch();
        again
    }

    /// Hand queued simulation events to audio and UI
    fn dispatch(&mut self) {
        for event in self.state.drain_events() {
            self.audio.handle(&event);
            match event {
                GameEvent::ScoreChanged(score) => self.ui.score_changed(score),
                GameEvent::UpgradeAvailable(available) => self.ui.upgrade_available(available),
                GameEvent::GameOver {
                    score,
                    destroyed,
                    elapsed_secs,
                } => self.ui.game_over(score, destroyed, elapsed_secs),
                GameEvent::Started
                | GameEvent::Paused
                | GameEvent::Resumed
                | GameEvent::Fired { .. } => {}
            }
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn audio(&self) -> &A {
        self.audio.backend()
    }

    pub fn audio_mut(&mut self) -> &mut A {
        self.audio.backend_mut()
    }
}
