//! Per-frame simulation step
//!
//! One call to `tick` per display refresh. Movement is measured in units per
//! frame, so speeds are tied to the refresh rate; the delta time is kept for
//! bookkeeping and the spawn clock only.

use serde::{Deserialize, Serialize};

use super::collision::{bullet_enemy_pass, cull_bullets, cull_enemies, enemy_player_pass};
use super::entity::Steer;
use super::spawner::maybe_spawn;
use super::state::GameState;

/// Held-key input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move left (held)
    pub left: bool,
    /// Move right (held)
    pub right: bool,
}

/// Simulation clock that only advances while frames are being run.
///
/// Wall time spent paused never reaches `sim_ms`: after `suspend` the next
/// frame reports a zero delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameClock {
    /// Wall timestamp of the previous frame
    pub last_frame_ms: Option<f64>,
    /// Accumulated simulation time
    pub sim_ms: f64,
    /// Delta of the most recent frame
    pub last_dt_ms: f64,
}

impl FrameClock {
    /// Advance to wall time `now_ms`, returning the frame delta
    pub fn advance(&mut self, now_ms: f64) -> f64 {
        let dt = match self.last_frame_ms {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);
        self.sim_ms += dt;
        self.last_dt_ms = dt;
        dt
    }

    /// Forget the previous frame so a resume doesn't catch up
    pub fn suspend(&mut self) {
        self.last_frame_ms = None;
    }
}

/// Advance the game state by one frame at wall time `now_ms`.
///
/// Returns true while another frame should be scheduled.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) -> bool {
    if !state.is_running() {
        return false;
    }

    state.clock.advance(now_ms);
    let sim_now = state.clock.sim_ms;
    state.frame += 1;

    state.player.update(Steer {
        left: input.left,
        right: input.right,
    });

    for bullet in &mut state.bullets {
        bullet.update();
    }
    cull_bullets(&mut state.bullets);

    for enemy in &mut state.enemies {
        enemy.update();
    }
    cull_enemies(&mut state.enemies);
    if enemy_player_pass(state, now_ms) {
        return false;
    }

    bullet_enemy_pass(state);

    maybe_spawn(state, sim_now);

    apply_difficulty_ramp(state);

    state.is_running()
}

/// Enemies speed up and spawn faster every frame
pub fn apply_difficulty_ramp(state: &mut GameState) {
    let tuning = &state.tuning;
    state.enemy_speed += tuning.enemy_speed_increment;
    state.spawn_interval_ms = (state.spawn_interval_ms - tuning.spawn_interval_step_ms)
        .max(tuning.spawn_interval_floor_ms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::sim::entity::{Enemy, EnemyKind};
    use crate::sim::state::{GameEvent, GamePhase};
    use glam::Vec2;
    use proptest::prelude::*;

    fn running(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.start(0.0);
        state.drain_events();
        state
    }

    #[test]
    fn test_idle_does_not_tick() {
        let mut state = GameState::new(1);
        assert!(!tick(&mut state, &TickInput::default(), 0.0));
        assert_eq!(state.frame, 0);
    }

    #[test]
    fn test_first_frame_spawns() {
        let mut state = running(1);
        assert!(tick(&mut state, &TickInput::default(), 16.0));
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.last_spawn_ms, Some(0.0));
    }

    #[test]
    fn test_ramp_each_frame() {
        let mut state = running(1);
        tick(&mut state, &TickInput::default(), 16.0);
        assert_eq!(state.spawn_interval_ms, 1499.0);
        assert!((state.enemy_speed - 1.001).abs() < 1e-6);
    }

    #[test]
    fn test_player_steering() {
        let mut state = running(1);
        let x = state.player.pos.x;
        let input = TickInput { left: true, right: false };
        tick(&mut state, &input, 16.0);
        assert_eq!(state.player.pos.x, x - 5.0);
    }

    #[test]
    fn test_pause_time_is_invisible() {
        let mut state = running(1);
        let mut now = 0.0;
        for _ in 0..10 {
            now += FRAME_MS;
            tick(&mut state, &TickInput::default(), now);
        }
        let sim_before = state.clock.sim_ms;
        let spawned = state.enemies.len();

        state.toggle_pause();
        assert!(!tick(&mut state, &TickInput::default(), now + 10_000.0));
        state.toggle_pause();

        // Ten seconds later the first resumed frame has zero delta
        now += 60_000.0;
        tick(&mut state, &TickInput::default(), now);
        assert_eq!(state.clock.last_dt_ms, 0.0);
        assert_eq!(state.clock.sim_ms, sim_before);
        assert_eq!(state.enemies.len(), spawned);
    }

    #[test]
    fn test_head_on_collision_scenario() {
        let mut state = running(5);
        // Hold off the spawner so only the placed enemy exists
        state.last_spawn_ms = Some(0.0);
        state.spawn_interval_ms = 1.0e12;
        state.tuning.spawn_interval_floor_ms = 1.0e12;

        let id = state.next_entity_id();
        let x = state.player.pos.x + (state.player.size.x - 50.0) / 2.0;
        state
            .enemies
            .push(Enemy::new(id, EnemyKind::Normal, Vec2::new(x, -50.0), state.enemy_speed));
        let destroyed_before = state.destroyed;

        let mut now = 0.0;
        let mut frames = 0;
        let mut ending_frames = 0;
        while state.phase == GamePhase::Running && frames < 10_000 {
            now += FRAME_MS;
            let again = tick(&mut state, &TickInput::default(), now);
            frames += 1;
            if !again {
                ending_frames += 1;
            }
        }

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(ending_frames, 1);
        assert_eq!(state.destroyed, destroyed_before);
        assert_eq!(state.enemies.len(), 1);

        let events = state.drain_events();
        assert!(matches!(events.last(), Some(GameEvent::GameOver { destroyed: 0, .. })));

        // Frozen: further ticks change nothing
        let y = state.enemies[0].pos.y;
        assert!(!tick(&mut state, &TickInput::default(), now + FRAME_MS));
        assert_eq!(state.enemies[0].pos.y, y);
    }

    #[test]
    fn test_enemy_at_player_x_ends_run() {
        let mut state = running(9);
        state.last_spawn_ms = Some(0.0);
        state.spawn_interval_ms = 1.0e12;
        state.tuning.spawn_interval_floor_ms = 1.0e12;

        let id = state.next_entity_id();
        let x = state.player.pos.x;
        state
            .enemies
            .push(Enemy::new(id, EnemyKind::Normal, Vec2::new(x, -50.0), state.enemy_speed));

        let mut now = 0.0;
        while tick(&mut state, &TickInput::default(), now + FRAME_MS) {
            now += FRAME_MS;
            assert!(now < 1.0e6, "enemy never reached the player");
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].pos.x, x);
    }

    #[test]
    fn test_two_overlapping_enemies_end_run_once() {
        let mut state = running(9);
        state.last_spawn_ms = Some(0.0);
        state.spawn_interval_ms = 1.0e12;
        state.tuning.spawn_interval_floor_ms = 1.0e12;

        let (x, y) = (state.player.pos.x, state.player.pos.y);
        for dx in [0.0, 20.0] {
            let id = state.next_entity_id();
            state
                .enemies
                .push(Enemy::new(id, EnemyKind::Normal, Vec2::new(x + dx, y), state.enemy_speed));
        }

        assert!(!tick(&mut state, &TickInput::default(), FRAME_MS));
        assert!(!tick(&mut state, &TickInput::default(), 2.0 * FRAME_MS));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.enemies.len(), 2);

        let overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_bullet_kills_enemy_during_tick() {
        let mut state = running(5);
        state.last_spawn_ms = Some(0.0);
        state.spawn_interval_ms = 1.0e12;
        state.tuning.spawn_interval_floor_ms = 1.0e12;

        let id = state.next_entity_id();
        let x = state.player.pos.x + 15.0;
        state
            .enemies
            .push(Enemy::new(id, EnemyKind::Fast, Vec2::new(x, 100.0), 1.0));
        state.fire(0.0);

        let mut now = 0.0;
        for _ in 0..120 {
            now += FRAME_MS;
            tick(&mut state, &TickInput::default(), now);
        }
        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, 3);
        assert_eq!(state.destroyed, 1);
        assert!(state.is_running());
    }

    #[test]
    fn test_determinism() {
        let mut a = running(4242);
        let mut b = running(4242);
        let mut now = 0.0;
        for i in 0..3000 {
            now += FRAME_MS;
            let input = TickInput {
                left: i % 7 == 0,
                right: i % 3 == 0,
            };
            tick(&mut a, &input, now);
            tick(&mut b, &input, now);
        }
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.phase, b.phase);
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.pos, eb.pos);
            assert_eq!(ea.kind, eb.kind);
        }
    }

    proptest! {
        #[test]
        fn prop_spawn_interval_floor(frames in 0usize..3000) {
            let mut state = running(1);
            for _ in 0..frames {
                apply_difficulty_ramp(&mut state);
                prop_assert!(state.spawn_interval_ms >= 500.0);
            }
        }
    }
}
