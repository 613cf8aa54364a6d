//! Bullets, enemies, power-ups and particles
//!
//! Entities are plain records. They only know how to advance themselves;
//! all interaction between them happens in the tick's collision pass.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Body;
use super::player::Effect;

/// Enemy spin in radians per reference frame (cosmetic)
pub const ENEMY_SPIN: f32 = 0.02;
/// Power-up pulse phase advance per reference frame (cosmetic)
pub const POWER_UP_PULSE_RATE: f32 = 0.1;

/// Particle life lost per reference frame
pub const PARTICLE_DECAY: f32 = 0.02;
/// Particle velocity multiplier per reference frame
pub const PARTICLE_FRICTION: f32 = 0.95;
/// Maximum initial particle speed per axis for bursts
pub const PARTICLE_BURST_SPEED: f32 = 4.0;
/// Maximum live particles
pub const MAX_PARTICLES: usize = 1024;

/// A player projectile moving straight up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

impl Bullet {
    pub fn new(pos: Vec2, size: f32, speed: f32) -> Self {
        Self { pos, size, speed }
    }

    pub fn update(&mut self, frames: f32) {
        self.pos.y -= self.speed * frames;
    }

    /// Crossed above the top edge
    pub fn is_off_top(&self) -> bool {
        self.pos.y < 0.0
    }
}

impl Body for Bullet {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.size
    }
}

/// A descending hostile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    /// Cosmetic rotation in radians
    pub rotation: f32,
}

impl Enemy {
    pub fn new(pos: Vec2, size: f32, speed: f32) -> Self {
        Self {
            pos,
            size,
            speed,
            rotation: 0.0,
        }
    }

    pub fn update(&mut self, frames: f32) {
        self.pos.y += self.speed * frames;
        self.rotation = (self.rotation + ENEMY_SPIN * frames) % std::f32::consts::TAU;
    }

    /// Crossed below the bottom edge
    pub fn is_off_bottom(&self, height: f32) -> bool {
        self.pos.y > height
    }
}

impl Body for Enemy {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.size
    }
}

/// A descending collectible carrying an effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub effect: Effect,
    /// Cosmetic pulse phase in radians
    pub pulse: f32,
}

impl PowerUp {
    pub fn new(pos: Vec2, size: f32, speed: f32, effect: Effect) -> Self {
        Self {
            pos,
            size,
            speed,
            effect,
            pulse: 0.0,
        }
    }

    pub fn update(&mut self, frames: f32) {
        self.pos.y += self.speed * frames;
        self.pulse = (self.pulse + POWER_UP_PULSE_RATE * frames) % std::f32::consts::TAU;
    }

    pub fn is_off_bottom(&self, height: f32) -> bool {
        self.pos.y > height
    }
}

impl Body for PowerUp {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.size
    }
}

/// What spawned a particle; decides its color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleTint {
    /// Enemy shot down
    EnemyExplosion,
    /// Enemy rammed the player
    PlayerHit,
    /// Power-up pickup, colored like the power-up
    Pickup(Effect),
    /// Level-up celebration
    Gold,
}

/// A short-lived visual spark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at spawn, removed at <= 0
    pub life: f32,
    pub tint: ParticleTint,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, tint: ParticleTint) -> Self {
        Self {
            pos,
            vel,
            life: 1.0,
            tint,
        }
    }

    pub fn update(&mut self, frames: f32) {
        self.pos += self.vel * frames;
        self.vel *= PARTICLE_FRICTION.powf(frames);
        self.life -= PARTICLE_DECAY * frames;
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }

    /// Remaining life clamped to [0, 1] for fading
    pub fn life_fraction(&self) -> f32 {
        self.life.clamp(0.0, 1.0)
    }
}

/// Push `count` particles with random velocities at `pos`
pub fn spawn_burst(
    particles: &mut Vec<Particle>,
    rng: &mut impl Rng,
    pos: Vec2,
    count: u32,
    tint: ParticleTint,
) {
    for _ in 0..count {
        if particles.len() >= MAX_PARTICLES {
            break;
        }
        let vel = Vec2::new(
            rng.random_range(-PARTICLE_BURST_SPEED..PARTICLE_BURST_SPEED),
            rng.random_range(-PARTICLE_BURST_SPEED..PARTICLE_BURST_SPEED),
        );
        particles.push(Particle::new(pos, vel, tint));
    }
}
