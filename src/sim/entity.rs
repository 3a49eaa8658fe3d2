//! Movable entities: the player craft, enemy craft and bullets
//!
//! Entities are plain rectangles positioned by their top-left corner.
//! Speeds are in field units per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::platform::AssetId;

/// Anything with a rectangular footprint on the field
pub trait Body {
    /// Top-left corner
    fn pos(&self) -> Vec2;
    /// Width and height
    fn size(&self) -> Vec2;

    fn center(&self) -> Vec2 {
        self.pos() + self.size() * 0.5
    }

    fn width(&self) -> f32 {
        self.size().x
    }
}

/// Horizontal steering for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Steer {
    pub left: bool,
    pub right: bool,
}

/// The player's craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal units per frame
    pub speed: f32,
    /// Speed given to bullets fired from now on
    pub bullet_speed: f32,
    /// Bullets per volley
    pub bullet_count: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(
                FIELD_WIDTH / 2.0 - PLAYER_WIDTH / 2.0,
                FIELD_HEIGHT - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN,
            ),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            speed: PLAYER_START_SPEED,
            bullet_speed: PLAYER_START_BULLET_SPEED,
            bullet_count: PLAYER_START_BULLET_COUNT,
        }
    }
}

impl Player {
    /// Move along x for held keys, staying inside the field
    pub fn update(&mut self, steer: Steer) {
        if steer.left {
            self.pos.x -= self.speed;
        }
        if steer.right {
            self.pos.x += self.speed;
        }
        self.pos.x = self.pos.x.clamp(0.0, FIELD_WIDTH - self.size.x);
    }

    /// Spawn point for a bullet: horizontally centred on the nose
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0 - BULLET_WIDTH / 2.0, self.pos.y)
    }
}

impl Body for Player {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> Vec2 {
        self.size
    }
}

/// Enemy craft variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Normal,
    Fast,
    Large,
}

/// Static per-kind attributes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindProps {
    pub size_mul: f32,
    pub speed_mul: f32,
    pub sprite: AssetId,
    pub score: u64,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Normal, EnemyKind::Fast, EnemyKind::Large];

    pub fn props(self) -> KindProps {
        match self {
            EnemyKind::Normal => KindProps {
                size_mul: 1.0,
                speed_mul: 1.0,
                sprite: AssetId::Enemy,
                score: 1,
            },
            EnemyKind::Fast => KindProps {
                size_mul: 1.0,
                speed_mul: 1.5,
                sprite: AssetId::FastEnemy,
                score: 3,
            },
            EnemyKind::Large => KindProps {
                size_mul: 1.5,
                speed_mul: 1.0,
                sprite: AssetId::LargeEnemy,
                score: 5,
            },
        }
    }

    /// Side length of this kind's square sprite
    pub fn extent(self) -> f32 {
        ENEMY_SIZE * self.props().size_mul
    }
}

/// An enemy craft descending toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl Enemy {
    /// Build an enemy of `kind` at `pos`, resolving size and speed once
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, base_speed: f32) -> Self {
        let props = kind.props();
        let extent = kind.extent();
        Self {
            id,
            kind,
            pos,
            size: Vec2::splat(extent),
            speed: base_speed * props.speed_mul,
        }
    }

    pub fn update(&mut self) {
        self.pos.y += self.speed;
    }

    /// Top edge has passed the bottom of the field
    pub fn is_below_field(&self) -> bool {
        self.pos.y > FIELD_HEIGHT
    }
}

impl Body for Enemy {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> Vec2 {
        self.size
    }
}

/// A player bullet travelling straight up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl Bullet {
    pub fn new(id: u32, pos: Vec2, speed: f32) -> Self {
        Self {
            id,
            pos,
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            speed,
        }
    }

    pub fn update(&mut self) {
        self.pos.y -= self.speed;
    }

    /// Bottom edge has passed the top of the field
    pub fn is_above_field(&self) -> bool {
        self.pos.y + self.size.y < 0.0
    }
}

impl Body for Bullet {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> Vec2 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_player_starts_centered() {
        let player = Player::default();
        assert_eq!(player.pos.x, 360.0);
        assert_eq!(player.pos.y, 510.0);
        assert_eq!(player.bullet_count, 1);
    }

    #[test]
    fn test_player_clamps_left_edge() {
        let mut player = Player::default();
        player.pos.x = 2.0;
        player.update(Steer { left: true, right: false });
        assert_eq!(player.pos.x, 0.0);
    }

    #[test]
    fn test_player_opposing_keys_cancel() {
        let mut player = Player::default();
        let x = player.pos.x;
        player.update(Steer { left: true, right: true });
        assert_eq!(player.pos.x, x);
    }

    #[test]
    fn test_kind_props() {
        let fast = Enemy::new(1, EnemyKind::Fast, Vec2::ZERO, 2.0);
        assert_eq!(fast.speed, 3.0);
        assert_eq!(fast.size, Vec2::splat(50.0));

        let large = Enemy::new(2, EnemyKind::Large, Vec2::ZERO, 2.0);
        assert_eq!(large.speed, 2.0);
        assert_eq!(large.size, Vec2::splat(75.0));

        let normal = Enemy::new(3, EnemyKind::Normal, Vec2::ZERO, 2.0);
        assert_eq!(normal.speed, 2.0);
        assert_eq!(normal.size, Vec2::splat(50.0));
    }

    #[test]
    fn test_bullet_leaves_top() {
        let mut bullet = Bullet::new(1, Vec2::new(10.0, 0.0), 5.0);
        assert!(!bullet.is_above_field());
        bullet.update();
        assert!(!bullet.is_above_field()); // bottom edge still at y = 5
        bullet.update();
        bullet.update();
        assert!(bullet.is_above_field());
    }

    #[test]
    fn test_enemy_leaves_bottom() {
        let mut enemy = Enemy::new(1, EnemyKind::Normal, Vec2::new(0.0, FIELD_HEIGHT), 1.0);
        assert!(!enemy.is_below_field());
        enemy.update();
        assert!(enemy.is_below_field());
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_field(moves in proptest::collection::vec((any::<bool>(), any::<bool>()), 0..400), speed in 1.0f32..40.0) {
            let mut player = Player { speed, ..Player::default() };
            for (left, right) in moves {
                player.update(Steer { left, right });
                prop_assert!(player.pos.x >= 0.0);
                prop_assert!(player.pos.x <= FIELD_WIDTH - player.size.x);
            }
        }

        #[test]
        fn prop_kind_invariants(base in 0.1f32..20.0, kind_idx in 0usize..3) {
            let kind = EnemyKind::ALL[kind_idx];
            let enemy = Enemy::new(1, kind, Vec2::ZERO, base);
            match kind {
                EnemyKind::Fast => prop_assert_eq!(enemy.speed, base * 1.5),
                EnemyKind::Large => {
                    prop_assert_eq!(enemy.size.x, 50.0 * 1.5);
                    prop_assert_eq!(enemy.size.y, 50.0 * 1.5);
                }
                EnemyKind::Normal => prop_assert_eq!(enemy.speed, base),
            }
        }
    }
}
