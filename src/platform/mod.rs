//! Platform abstraction layer
//!
//! Capabilities the core needs from its host:
//! - Held-key queries
//! - A 2D draw surface
//! - Music and sound-effect playback
//! - UI notifications (score, upgrade prompt, game-over overlay)
//!
//! The browser build implements these over canvas/DOM in `main.rs`; tests and
//! the headless runner use the recording and no-op implementations below.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Image assets with fixed identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetId {
    Background,
    Player,
    Enemy,
    FastEnemy,
    LargeEnemy,
}

impl AssetId {
    pub const ALL: [AssetId; 5] = [
        AssetId::Background,
        AssetId::Player,
        AssetId::Enemy,
        AssetId::FastEnemy,
        AssetId::LargeEnemy,
    ];

    /// File name the host loads this image from
    pub fn file_name(self) -> &'static str {
        match self {
            AssetId::Background => "background.png",
            AssetId::Player => "player.png",
            AssetId::Enemy => "enemy.png",
            AssetId::FastEnemy => "enemy_fast.png",
            AssetId::LargeEnemy => "enemy_large.png",
        }
    }

    /// Enemy sprites are authored nose-up and drawn rotated half a turn
    pub fn faces_down(self) -> bool {
        matches!(self, AssetId::Enemy | AssetId::FastEnemy | AssetId::LargeEnemy)
    }
}

/// Audio tracks with fixed identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackId {
    Music,
    Shot,
}

impl TrackId {
    pub fn file_name(self) -> &'static str {
        match self {
            TrackId::Music => "music.mp3",
            TrackId::Shot => "shot.mp3",
        }
    }
}

/// RGB fill colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BULLET: Color = Color(0xff, 0xff, 0x00);

    /// CSS hex form, e.g. `#ffff00`
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// "Is key K currently held", keyed by lowercase key identifier
pub trait KeyState {
    fn is_held(&self, key: &str) -> bool;
}

impl KeyState for HashSet<String> {
    fn is_held(&self, key: &str) -> bool {
        self.contains(key)
    }
}

impl KeyState for [&str] {
    fn is_held(&self, key: &str) -> bool {
        self.contains(&key)
    }
}

/// Opaque 2D draw surface
pub trait DrawSurface {
    fn clear(&mut self);
    fn draw_image(&mut self, asset: AssetId, x: f32, y: f32, w: f32, h: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
}

/// Audio playback
pub trait AudioOut {
    fn play_looping(&mut self, track: TrackId, volume: f32);
    fn play_oneshot(&mut self, track: TrackId, volume: f32);
}

/// Fire-and-forget UI notifications
pub trait UiSink {
    fn score_changed(&mut self, score: u64);
    fn upgrade_available(&mut self, available: bool);
    fn game_over(&mut self, score: u64, destroyed: u32, elapsed_secs: f64);
}

/// Capability that ignores every call
#[derive(Debug, Clone, Copy, Default)]
pub struct Null;

impl DrawSurface for Null {
    fn clear(&mut self) {}
    fn draw_image(&mut self, _: AssetId, _: f32, _: f32, _: f32, _: f32) {}
    fn fill_rect(&mut self, _: f32, _: f32, _: f32, _: f32, _: Color) {}
}

impl AudioOut for Null {
    fn play_looping(&mut self, _: TrackId, _: f32) {}
    fn play_oneshot(&mut self, _: TrackId, _: f32) {}
}

impl UiSink for Null {
    fn score_changed(&mut self, _: u64) {}
    fn upgrade_available(&mut self, _: bool) {}
    fn game_over(&mut self, _: u64, _: u32, _: f64) {}
}

/// One captured capability call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Call {
    Clear,
    Image { asset: AssetId, x: f32, y: f32, w: f32, h: f32 },
    Rect { x: f32, y: f32, w: f32, h: f32, color: Color },
    Loop { track: TrackId, volume: f32 },
    OneShot { track: TrackId, volume: f32 },
    Score(u64),
    Upgrade(bool),
    GameOver { score: u64, destroyed: u32, elapsed_secs: f64 },
}

/// Capability that records every call in order
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
}

impl Recorder {
    pub fn take(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

impl DrawSurface for Recorder {
    fn clear(&mut self) {
        self.calls.push(Call::Clear);
    }
    fn draw_image(&mut self, asset: AssetId, x: f32, y: f32, w: f32, h: f32) {
        self.calls.push(Call::Image { asset, x, y, w, h });
    }
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.calls.push(Call::Rect { x, y, w, h, color });
    }
}

impl AudioOut for Recorder {
    fn play_looping(&mut self, track: TrackId, volume: f32) {
        self.calls.push(Call::Loop { track, volume });
    }
    fn play_oneshot(&mut self, track: TrackId, volume: f32) {
        self.calls.push(Call::OneShot { track, volume });
    }
}

impl UiSink for Recorder {
    fn score_changed(&mut self, score: u64) {
        self.calls.push(Call::Score(score));
    }
    fn upgrade_available(&mut self, available: bool) {
        self.calls.push(Call::Upgrade(available));
    }
    fn game_over(&mut self, score: u64, destroyed: u32, elapsed_secs: f64) {
        self.calls.push(Call::GameOver { score, destroyed, elapsed_secs });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_css() {
        assert_eq!(Color::BULLET.to_css(), "#ffff00");
    }

    #[test]
    fn test_key_state_slice() {
        let keys: &[&str] = &["a", "d"];
        assert!(keys.is_held("a"));
        assert!(!keys.is_held("w"));
    }

    #[test]
    fn test_recorder_keeps_order() {
        let mut rec = Recorder::default();
        rec.clear();
        rec.score_changed(3);
        assert_eq!(rec.take(), vec![Call::Clear, Call::Score(3)]);
        assert!(rec.calls.is_empty());
    }
}
