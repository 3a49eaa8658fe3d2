//! Game state and session lifecycle
//!
//! One `GameState` owns the player, every live enemy and bullet, the
//! counters and the difficulty ramp. Phase transitions live here; per-frame
//! stepping lives in `tick`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Bullet, Enemy, Player};
use super::tick::FrameClock;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start action
    #[default]
    Idle,
    /// Frames are being simulated
    Running,
    /// Frozen until the pause toggle is pressed again
    Paused,
    /// Player craft was hit; waiting for restart
    GameOver,
}

/// Notifications produced by the simulation for audio and UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A run began (fresh or restarted)
    Started,
    Paused,
    Resumed,
    /// A volley left the player's craft
    Fired { count: u32 },
    ScoreChanged(u64),
    /// Whether an upgrade can be applied right now
    UpgradeAvailable(bool),
    GameOver {
        score: u64,
        destroyed: u32,
        elapsed_secs: f64,
    },
}

/// Complete state of one game session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    rng: Pcg32,
    /// Balance values, fixed for the life of the state
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub player: Player,
    /// Live enemies in spawn order
    pub enemies: Vec<Enemy>,
    /// Live bullets in fire order
    pub bullets: Vec<Bullet>,
    pub score: u64,
    /// Enemies destroyed by bullets this run
    pub destroyed: u32,
    pub upgrade_points: u32,
    /// Armed once per threshold crossing, cleared by an applied upgrade
    pub upgrade_armed: bool,
    /// Wall-clock start of the run (ms)
    pub started_at_ms: f64,
    /// Wall-clock end of the run (ms), set on game over
    pub ended_at_ms: Option<f64>,
    /// Enemy base speed (units/frame), ramps up every frame
    pub enemy_speed: f32,
    /// Time between spawns (ms), ramps down every frame to the floor
    pub spawn_interval_ms: f64,
    /// Simulation time of the last spawn
    pub last_spawn_ms: Option<f64>,
    /// Wall-clock time of the last accepted fire action
    pub last_fire_ms: Option<f64>,
    pub clock: FrameClock,
    /// Frames simulated this run
    pub frame: u64,
    /// Last upgrade availability reported to the UI
    pub(crate) upgrade_signalled: bool,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create an idle session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            player: Player::default(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            score: 0,
            destroyed: 0,
            upgrade_points: 0,
            upgrade_armed: true,
            started_at_ms: 0.0,
            ended_at_ms: None,
            enemy_speed: tuning.enemy_base_speed,
            spawn_interval_ms: tuning.spawn_interval_start_ms,
            last_spawn_ms: None,
            last_fire_ms: None,
            clock: FrameClock::default(),
            frame: 0,
            upgrade_signalled: false,
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Idle -> Running: reset every counter and entity, then start the clock
    pub fn start(&mut self, now_ms: f64) {
        if self.phase != GamePhase::Idle {
            log::warn!("Start ignored in {:?}", self.phase);
            return;
        }

        let tuning = &self.tuning;
        self.player = Player::default();
        self.enemies.clear();
        self.bullets.clear();
        self.score = 0;
        self.destroyed = 0;
        self.upgrade_points = 0;
        self.upgrade_armed = true;
        self.upgrade_signalled = false;
        self.enemy_speed = tuning.enemy_base_speed;
        self.spawn_interval_ms = tuning.spawn_interval_start_ms;
        self.last_spawn_ms = None;
        self.last_fire_ms = None;
        self.started_at_ms = now_ms;
        self.ended_at_ms = None;
        self.clock = FrameClock::default();
        self.frame = 0;
        self.phase = GamePhase::Running;

        self.emit(GameEvent::Started);
        self.emit(GameEvent::ScoreChanged(0));
        self.emit(GameEvent::UpgradeAvailable(false));
        log::info!("Run started (seed {})", self.seed);
    }

    /// Running <-> Paused. Ignored in every other phase.
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Running => {
                self.phase = GamePhase::Paused;
                self.clock.suspend();
                self.emit(GameEvent::Paused);
                log::info!("Paused at frame {}", self.frame);
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Running;
                self.emit(GameEvent::Resumed);
                log::info!("Resumed at frame {}", self.frame);
            }
            GamePhase::Idle | GamePhase::GameOver => {}
        }
    }

    /// Running -> GameOver: freeze everything and report the final tally
    pub fn end_run(&mut self, now_ms: f64) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.ended_at_ms = Some(now_ms);
        let elapsed_secs = self.elapsed_secs();
        self.emit(GameEvent::GameOver {
            score: self.score,
            destroyed: self.destroyed,
            elapsed_secs,
        });
        log::info!(
            "Game over: score {}, destroyed {}, survived {:.2}s",
            self.score,
            self.destroyed,
            elapsed_secs
        );
    }

    /// GameOver -> Idle -> Running with a fresh session
    pub fn restart(&mut self, now_ms: f64) {
        if self.phase != GamePhase::GameOver {
            log::warn!("Restart ignored in {:?}", self.phase);
            return;
        }
        self.phase = GamePhase::Idle;
        self.start(now_ms);
    }

    /// Seconds between start and end of the run (0 until it ends)
    pub fn elapsed_secs(&self) -> f64 {
        match self.ended_at_ms {
            Some(end) => (end - self.started_at_ms) / 1000.0,
            None => 0.0,
        }
    }

    /// Fire a volley if the fire rate allows. Returns bullets created.
    pub fn fire(&mut self, now_ms: f64) -> u32 {
        if self.phase != GamePhase::Running {
            return 0;
        }
        if let Some(last) = self.last_fire_ms {
            if now_ms - last < self.tuning.fire_rate_ms {
                log::debug!("Fire rejected: {:.1}ms since last shot", now_ms - last);
                return 0;
            }
        }
        self.last_fire_ms = Some(now_ms);

        let count = self.player.bullet_count;
        let muzzle = self.player.muzzle();
        let speed = self.player.bullet_speed;
        // Centre the volley on the muzzle
        let first = -(count as f32 - 1.0) / 2.0;
        for i in 0..count {
            let id = self.next_entity_id();
            let mut pos = muzzle;
            pos.x += (first + i as f32) * crate::consts::BULLET_SPREAD;
            self.bullets.push(Bullet::new(id, pos, speed));
        }
        self.emit(GameEvent::Fired { count });
        count
    }
}
