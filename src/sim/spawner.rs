//! Time-gated enemy spawning

use glam::Vec2;
use rand::Rng;

use super::entity::{Enemy, EnemyKind};
use super::state::GameState;
use crate::consts::FIELD_WIDTH;

/// Whether a spawn is due at simulation time `now_ms`
pub fn due(now_ms: f64, last_spawn_ms: Option<f64>, interval_ms: f64) -> bool {
    match last_spawn_ms {
        None => true,
        Some(last) => now_ms - last >= interval_ms,
    }
}

/// Choose a kind from two independent uniform draws.
///
/// The draws are not a partition: fast wins on `a`, large only gets a look
/// when fast didn't, so the split is roughly 10% / 9% / 81%.
pub fn pick_kind(a: f32, b: f32, fast_chance: f32, large_chance: f32) -> EnemyKind {
    if a < fast_chance {
        EnemyKind::Fast
    } else if b < large_chance {
        EnemyKind::Large
    } else {
        EnemyKind::Normal
    }
}

/// Spawn one enemy just above the top edge and record the spawn time
pub fn spawn_enemy(state: &mut GameState, now_ms: f64) -> u32 {
    let (fast_chance, large_chance) = (state.tuning.fast_chance, state.tuning.large_chance);
    let rng = state.rng();
    let a: f32 = rng.random();
    let b: f32 = rng.random();
    let kind = pick_kind(a, b, fast_chance, large_chance);

    let extent = kind.extent();
    let x = rng.random::<f32>() * (FIELD_WIDTH - extent);

    let id = state.next_entity_id();
    let enemy = Enemy::new(id, kind, Vec2::new(x, -extent), state.enemy_speed);
    log::debug!(
        "Spawned {:?} #{} at x={:.1} speed={:.3}",
        kind,
        id,
        x,
        enemy.speed
    );
    state.enemies.push(enemy);
    state.last_spawn_ms = Some(now_ms);
    id
}

/// Spawn if the interval has elapsed. Returns true when an enemy was added.
pub fn maybe_spawn(state: &mut GameState, now_ms: f64) -> bool {
    if !due(now_ms, state.last_spawn_ms, state.spawn_interval_ms) {
        return false;
    }
    spawn_enemy(state, now_ms);
    true
}
