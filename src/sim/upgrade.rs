//! Upgrade economy
//!
//! One point per kill. Each time the running total crosses a multiple of the
//! threshold the upgrade slot is armed; applying an upgrade spends exactly one
//! threshold of points and disarms the slot until the next crossing.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState};

/// Player stat an upgrade raises by one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    Speed,
    BulletSpeed,
    BulletCount,
}

impl GameState {
    /// Enough points banked and the slot is armed
    pub fn upgrade_ready(&self) -> bool {
        self.upgrade_points >= self.tuning.upgrade_threshold && self.upgrade_armed
    }

    /// Add one point, arming the slot if a threshold multiple was crossed
    pub(crate) fn credit_upgrade_point(&mut self) {
        let threshold = self.tuning.upgrade_threshold;
        let before = self.upgrade_points;
        self.upgrade_points += 1;
        if self.upgrade_points / threshold > before / threshold {
            self.upgrade_armed = true;
        }
    }

    /// Emit `UpgradeAvailable` when readiness changed since the last report
    pub(crate) fn sync_upgrade_signal(&mut self) {
        let ready = self.upgrade_ready();
        if ready != self.upgrade_signalled {
            self.upgrade_signalled = ready;
            self.emit(GameEvent::UpgradeAvailable(ready));
        }
    }

    /// Spend one threshold of points on `kind`. No-op unless ready.
    pub fn apply_upgrade(&mut self, kind: UpgradeKind) -> bool {
        if !self.upgrade_ready() {
            log::debug!(
                "Upgrade {:?} refused ({} points, armed={})",
                kind,
                self.upgrade_points,
                self.upgrade_armed
            );
            return false;
        }

        let player = &mut self.player;
        match kind {
            UpgradeKind::Speed => player.speed += 1.0,
            UpgradeKind::BulletSpeed => player.bullet_speed += 1.0,
            UpgradeKind::BulletCount => player.bullet_count += 1,
        }
        self.upgrade_points -= self.tuning.upgrade_threshold;
        self.upgrade_armed = false;
        log::info!("Applied {:?} upgrade ({} points left)", kind, self.upgrade_points);
        self.sync_upgrade_signal();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> GameState {
        let mut state = GameState::new(1);
        state.start(0.0);
        state.drain_events();
        state
    }

    fn kill(state: &mut GameState, n: u32) {
        for _ in 0..n {
            state.credit_upgrade_point();
        }
        state.sync_upgrade_signal();
    }

    #[test]
    fn test_not_ready_is_noop() {
        let mut state = running();
        kill(&mut state, 49);
        let before = state.player.clone();
        assert!(!state.apply_upgrade(UpgradeKind::Speed));
        assert_eq!(state.player.speed, before.speed);
        assert_eq!(state.upgrade_points, 49);
    }

    #[test]
    fn test_apply_deducts_one_threshold() {
        let mut state = running();
        kill(&mut state, 73);
        assert_eq!(state.drain_events(), vec![GameEvent::UpgradeAvailable(true)]);

        assert!(state.apply_upgrade(UpgradeKind::BulletCount));
        assert_eq!(state.player.bullet_count, 2);
        assert_eq!(state.upgrade_points, 23);
        assert!(!state.upgrade_armed);
        assert_eq!(state.drain_events(), vec![GameEvent::UpgradeAvailable(false)]);
    }

    #[test]
    fn test_one_upgrade_per_crossing() {
        let mut state = running();
        kill(&mut state, 120);
        assert!(state.apply_upgrade(UpgradeKind::Speed));
        // 70 points banked but the slot stays disarmed
        assert!(!state.apply_upgrade(UpgradeKind::Speed));
        assert_eq!(state.upgrade_points, 70);
        assert_eq!(state.player.speed, 6.0);

        // Crossing 150 re-arms
        kill(&mut state, 29);
        assert!(!state.upgrade_ready());
        kill(&mut state, 1);
        assert!(state.upgrade_ready());
        assert!(state.apply_upgrade(UpgradeKind::BulletSpeed));
        assert_eq!(state.player.bullet_speed, 6.0);
        assert_eq!(state.upgrade_points, 50);
    }
}
