//! Collision detection and resolution
//!
//! Overlap is a circle-proximity test between entity centres, not a box
//! intersection: two bodies touch when their centres are closer than the
//! mean of their widths.

use std::collections::HashSet;

use super::entity::{Body, Bullet, Enemy, EnemyKind, Player};
use super::state::{GameEvent, GameState};

/// Strictly closer than the mean width. Symmetric in `a` and `b`.
pub fn overlaps(a: &impl Body, b: &impl Body) -> bool {
    a.center().distance(b.center()) < (a.width() + b.width()) / 2.0
}

/// Index of the first enemy touching the player, in iteration order
pub fn first_player_hit(enemies: &[Enemy], player: &Player) -> Option<usize> {
    enemies.iter().position(|enemy| overlaps(enemy, player))
}

/// A bullet that struck an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub bullet_id: u32,
    pub enemy_id: u32,
    pub kind: EnemyKind,
}

/// Pair bullets with enemies. Each bullet and each enemy takes part in at
/// most one hit; ties go to the earlier bullet, then the earlier enemy.
pub fn find_hits(bullets: &[Bullet], enemies: &[Enemy]) -> Vec<Hit> {
    let mut dead_enemies: HashSet<u32> = HashSet::new();
    let mut hits = Vec::new();

    for bullet in bullets {
        let struck = enemies
            .iter()
            .filter(|enemy| !dead_enemies.contains(&enemy.id))
            .find(|enemy| overlaps(bullet, *enemy));
        if let Some(enemy) = struck {
            dead_enemies.insert(enemy.id);
            hits.push(Hit {
                bullet_id: bullet.id,
                enemy_id: enemy.id,
                kind: enemy.kind,
            });
        }
    }
    hits
}

/// Enemy vs player. Ends the run on the first contact; returns true if so.
pub fn enemy_player_pass(state: &mut GameState, now_ms: f64) -> bool {
    match first_player_hit(&state.enemies, &state.player) {
        Some(idx) => {
            log::debug!(
                "Player struck by {:?} #{}",
                state.enemies[idx].kind,
                state.enemies[idx].id
            );
            state.end_run(now_ms);
            true
        }
        None => false,
    }
}

/// Bullet vs enemy: remove both sides of every hit, then credit score,
/// destroyed count and upgrade points. Returns the number of kills.
pub fn bullet_enemy_pass(state: &mut GameState) -> usize {
    let hits = find_hits(&state.bullets, &state.enemies);
    if hits.is_empty() {
        return 0;
    }

    let dead_bullets: HashSet<u32> = hits.iter().map(|h| h.bullet_id).collect();
    let dead_enemies: HashSet<u32> = hits.iter().map(|h| h.enemy_id).collect();
    state.bullets.retain(|b| !dead_bullets.contains(&b.id));
    state.enemies.retain(|e| !dead_enemies.contains(&e.id));

    for hit in &hits {
        state.score += hit.kind.props().score;
        state.destroyed += 1;
        state.credit_upgrade_point();
        log::debug!("Destroyed {:?} #{}", hit.kind, hit.enemy_id);
        state.emit(GameEvent::ScoreChanged(state.score));
    }
    state.sync_upgrade_signal();
    hits.len()
}

/// Drop bullets above the field
pub fn cull_bullets(bullets: &mut Vec<Bullet>) {
    bullets.retain(|b| !b.is_above_field());
}

/// Drop enemies below the field
pub fn cull_enemies(enemies: &mut Vec<Enemy>) {
    enemies.retain(|e| !e.is_below_field());
}
