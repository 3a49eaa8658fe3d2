//! Player settings and preferences
//!
//! Persisted separately from balance tuning in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform::KeyState;
use crate::sim::TickInput;

/// Key bindings, by lowercase key identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: String,
    pub right: String,
    pub fire: String,
    pub pause: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: "a".into(),
            right: "d".into(),
            fire: " ".into(),
            pause: "p".into(),
        }
    }
}

impl KeyBindings {
    /// Held movement keys for this frame
    pub fn read(&self, keys: &(impl KeyState + ?Sized)) -> TickInput {
        TickInput {
            left: keys.is_held(&self.left),
            right: keys.is_held(&self.right),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Shot effect volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Behaviour ===
    /// Pause when the window loses focus
    pub pause_on_blur: bool,

    // === Input ===
    pub keys: KeyBindings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            music_volume: 0.2,
            sfx_volume: 1.0,
            pause_on_blur: true,
            keys: KeyBindings::default(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "sky_strike_settings";

    /// Parse settings JSON, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Ignoring unreadable settings: {err}");
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native: read from a JSON file if present
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(err) => {
                log::warn!("No settings at {}: {err}", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json() {
        let settings = Settings::from_json(r#"{ "music_volume": 0.5, "keys": { "left": "arrowleft" } }"#);
        assert_eq!(settings.music_volume, 0.5);
        assert_eq!(settings.sfx_volume, 1.0);
        assert_eq!(settings.keys.left, "arrowleft");
        assert_eq!(settings.keys.right, "d");
    }

    #[test]
    fn test_bad_json_defaults() {
        assert_eq!(Settings::from_json("[1, 2"), Settings::default());
    }

    #[test]
    fn test_bindings_read_keys() {
        let bindings = KeyBindings::default();
        let held: &[&str] = &["d", "w"];
        assert_eq!(bindings.read(held), TickInput { left: false, right: true });
    }
}
