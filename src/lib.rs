//! Sky Strike - a vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entities, spawning, collisions, game state)
//! - `game`: Per-frame driver wiring the simulation to platform capabilities
//! - `renderer`: Draw order over an opaque draw surface
//! - `platform`: Capability traits for input, drawing, audio and UI
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Player craft
    pub const PLAYER_WIDTH: f32 = 80.0;
    pub const PLAYER_HEIGHT: f32 = 80.0;
    /// Gap between the player craft and the bottom edge
    pub const PLAYER_BOTTOM_MARGIN: f32 = 10.0;
    pub const PLAYER_START_SPEED: f32 = 5.0;
    pub const PLAYER_START_BULLET_SPEED: f32 = 5.0;
    pub const PLAYER_START_BULLET_COUNT: u32 = 1;

    /// Enemy base sprite size (before the kind multiplier)
    pub const ENEMY_SIZE: f32 = 50.0;

    /// Bullet size
    pub const BULLET_WIDTH: f32 = 5.0;
    pub const BULLET_HEIGHT: f32 = 10.0;
    /// Horizontal gap between bullets of one volley
    pub const BULLET_SPREAD: f32 = 10.0;

    /// Difficulty ramp defaults (milliseconds, units per frame)
    pub const SPAWN_INTERVAL_START_MS: f64 = 1500.0;
    pub const SPAWN_INTERVAL_FLOOR_MS: f64 = 500.0;
    pub const SPAWN_INTERVAL_STEP_MS: f64 = 1.0;
    pub const ENEMY_BASE_SPEED: f32 = 1.0;
    pub const ENEMY_SPEED_INCREMENT: f32 = 0.001;

    /// Minimum time between two fire actions
    pub const FIRE_RATE_MS: f64 = 200.0;

    /// Upgrade points required per upgrade
    pub const UPGRADE_THRESHOLD: u32 = 50;

    /// Nominal display refresh used by the headless runner
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}
