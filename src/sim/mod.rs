//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One step per display frame, speeds in units per frame
//! - Seeded RNG only
//! - Stable iteration order (spawn/fire order, entities addressed by ID)
//! - No rendering or platform calls; effects leave as `GameEvent`s

pub mod collision;
pub mod entity;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod upgrade;

pub use collision::{Hit, find_hits, overlaps};
pub use entity::{Body, Bullet, Enemy, EnemyKind, KindProps, Player, Steer};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{FrameClock, TickInput, apply_difficulty_ramp, tick};
pub use upgrade::UpgradeKind;
