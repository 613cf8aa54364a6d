//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - Elapsed-time scaled updates only (no frame counting)
//! - Seeded RNG only
//! - Stable iteration order (collections keep insertion order)

pub mod collision;
pub mod entity;
pub mod player;
pub mod progression;
pub mod spawn;
pub mod starfield;
pub mod state;
pub mod tick;

pub use collision::{Body, circles_overlap, is_colliding};
pub use entity::{Bullet, Enemy, MAX_PARTICLES, Particle, ParticleTint, PowerUp};
pub use player::{Effect, MovementIntent, Player};
pub use spawn::SpawnTimers;
pub use starfield::{Star, Starfield};
pub use state::{Command, GameEvent, GamePhase, GameState, Hud, LevelUpMessage, MessageView};
pub use tick::{TickInput, tick};
