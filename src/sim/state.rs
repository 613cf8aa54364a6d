//! Game state and lifecycle
//!
//! `GameState` owns every entity collection, the player and the RNG. The
//! presentation layer reads it through [`GameState::hud`] and
//! [`GameState::drain_events`] and drives it through [`GameState::apply`]
//! and [`super::tick`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Bullet, Enemy, Particle, PowerUp};
use super::player::{Effect, Player};
use super::spawn::SpawnTimers;
use super::starfield::Starfield;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    Start,
    /// Active gameplay
    Playing,
    /// Entities frozen, stars still move
    Paused,
    /// Run ended
    GameOver,
}

/// Lifecycle commands issued by menus and buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Start -> Playing (fresh run)
    Start,
    /// Playing -> Paused
    Pause,
    /// Paused -> Playing
    Resume,
    /// Paused -> Playing (fresh run)
    RestartFromPause,
    /// GameOver -> Playing (fresh run)
    Restart,
    /// Paused | GameOver -> Start
    GoToMainMenu,
}

/// Transient banner shown after a level-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelUpMessage {
    pub text: String,
    /// Set on every 10th level, even if a later milestone rewrote the text
    pub intense: bool,
    pub remaining_ms: f32,
    pub total_ms: f32,
}

/// Read-only view of the level-up message for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageView {
    pub text: String,
    pub intense: bool,
    pub elapsed_ms: f32,
    pub total_ms: f32,
    /// 0 when shown, 1 when about to disappear
    pub progress: f32,
}

/// Everything the HUD displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub message: Option<MessageView>,
    /// Present only after the run ended
    pub final_score: Option<u64>,
}

/// Gameplay events for sound/feedback hooks in the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemyDestroyed { pos: Vec2 },
    PlayerHit { lives_left: u32 },
    ShieldAbsorbed { pos: Vec2 },
    PowerUpCollected { effect: Effect },
    LevelUp {
        level: u32,
        bonus_life: bool,
        double_power: bool,
        intense: bool,
    },
    GameOver { final_score: u64 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    /// Current playfield size (width, height)
    pub bounds: Vec2,
    /// Simulated play time (advances only while playing)
    pub time_ms: f64,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<PowerUp>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub starfield: Starfield,
    pub timers: SpawnTimers,
    pub level_up_message: Option<LevelUpMessage>,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a game on the start screen with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let bounds = Vec2::new(DEFAULT_PLAYFIELD_WIDTH, DEFAULT_PLAYFIELD_HEIGHT);
        let mut rng = Pcg32::seed_from_u64(seed);
        let starfield = Starfield::new(tuning.star_count, bounds, &mut rng);
        Self {
            seed,
            phase: GamePhase::Start,
            score: 0,
            lives: tuning.starting_lives,
            level: 1,
            bounds,
            time_ms: 0.0,
            player: Player::new(player_spawn(bounds), &tuning),
            bullets: Vec::new(),
            enemies: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            starfield,
            timers: SpawnTimers::new(&tuning),
            level_up_message: None,
            rng,
            events: Vec::new(),
            tuning,
        }
    }

    /// Update the playfield size. Non-finite or non-positive sizes are
    /// ignored and the previous bounds kept.
    pub fn set_bounds(&mut self, bounds: Vec2) {
        if bounds.is_finite() && bounds.x > 0.0 && bounds.y > 0.0 {
            self.bounds = bounds;
        }
    }

    /// Reset counters, timers, player and every collection for a new run.
    /// The star field and RNG stream carry over.
    pub fn reset(&mut self) {
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.level = 1;
        self.time_ms = 0.0;
        self.player = Player::new(player_spawn(self.bounds), &self.tuning);
        self.bullets.clear();
        self.enemies.clear();
        self.power_ups.clear();
        self.particles.clear();
        self.timers = SpawnTimers::new(&self.tuning);
        self.level_up_message = None;
        self.events.clear();
    }

    /// Apply a lifecycle command. Returns false (and changes nothing) when
    /// the command is not valid in the current phase.
    pub fn apply(&mut self, command: Command) -> bool {
        let next = match (command, self.phase) {
            (Command::Start, GamePhase::Start)
            | (Command::Restart, GamePhase::GameOver)
            | (Command::RestartFromPause, GamePhase::Paused) => {
                self.reset();
                GamePhase::Playing
            }
            (Command::Pause, GamePhase::Playing) => GamePhase::Paused,
            (Command::Resume, GamePhase::Paused) => GamePhase::Playing,
            (Command::GoToMainMenu, GamePhase::Paused | GamePhase::GameOver) => GamePhase::Start,
            (command, phase) => {
                log::debug!("Ignoring {:?} while {:?}", command, phase);
                return false;
            }
        };
        log::info!("Phase {:?} -> {:?} ({:?})", self.phase, next, command);
        self.phase = next;
        true
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Snapshot of everything the HUD shows
    pub fn hud(&self) -> Hud {
        Hud {
            phase: self.phase,
            score: self.score,
            lives: self.lives,
            level: self.level,
            message: self.level_up_message.as_ref().map(|m| {
                let elapsed_ms = (m.total_ms - m.remaining_ms).max(0.0);
                MessageView {
                    text: m.text.clone(),
                    intense: m.intense,
                    elapsed_ms,
                    total_ms: m.total_ms,
                    progress: (elapsed_ms / m.total_ms).clamp(0.0, 1.0),
                }
            }),
            final_score: (self.phase == GamePhase::GameOver).then_some(self.score),
        }
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Player spawn point: horizontally centered, near the bottom
fn player_spawn(bounds: Vec2) -> Vec2 {
    Vec2::new(
        bounds.x / 2.0,
        (bounds.y - PLAYER_SPAWN_OFFSET).max(bounds.y / 2.0),
    )
}
