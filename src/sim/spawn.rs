//! Timer-driven spawning of enemies and power-ups

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Enemy, PowerUp};
use super::player::Effect;
use crate::tuning::Tuning;

/// Independent spawn clocks for enemies and power-ups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimers {
    pub enemy_timer_ms: f32,
    /// Only ever decreases (see `progression`)
    pub enemy_interval_ms: f32,
    pub power_up_timer_ms: f32,
    /// Re-rolled after every power-up spawn
    pub power_up_interval_ms: f32,
}

impl SpawnTimers {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            enemy_timer_ms: 0.0,
            enemy_interval_ms: tuning.enemy_spawn_initial_ms,
            power_up_timer_ms: 0.0,
            power_up_interval_ms: tuning.power_up_spawn_initial_ms,
        }
    }

    /// Advance the enemy clock. Returns true (and resets the clock) when the
    /// interval has been exceeded.
    pub fn advance_enemy(&mut self, elapsed_ms: f32) -> bool {
        self.enemy_timer_ms += elapsed_ms;
        if self.enemy_timer_ms > self.enemy_interval_ms {
            self.enemy_timer_ms = 0.0;
            true
        } else {
            false
        }
    }

    /// Advance the power-up clock. On spawn the clock resets and the next
    /// interval is drawn from `[power_up_spawn_min_ms, power_up_spawn_max_ms)`.
    pub fn advance_power_up(
        &mut self,
        elapsed_ms: f32,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) -> bool {
        self.power_up_timer_ms += elapsed_ms;
        if self.power_up_timer_ms > self.power_up_interval_ms {
            self.power_up_timer_ms = 0.0;
            self.power_up_interval_ms =
                rng.random_range(tuning.power_up_spawn_min_ms..tuning.power_up_spawn_max_ms);
            true
        } else {
            false
        }
    }
}

/// Random x keeping an entity of `size` fully on screen
pub fn spawn_x(rng: &mut impl Rng, width: f32, size: f32) -> f32 {
    if width <= size * 2.0 {
        width / 2.0
    } else {
        rng.random_range(size..width - size)
    }
}

/// New enemy just above the top edge with a random speed
pub fn spawn_enemy(rng: &mut impl Rng, width: f32, tuning: &Tuning) -> Enemy {
    let size = tuning.enemy_size;
    let x = spawn_x(rng, width, size);
    let speed = rng.random_range(tuning.enemy_speed_min..tuning.enemy_speed_max);
    Enemy::new(Vec2::new(x, -size), size, speed)
}

/// New power-up of a random effect just above the top edge
pub fn spawn_power_up(rng: &mut impl Rng, width: f32, tuning: &Tuning) -> PowerUp {
    let size = tuning.power_up_size;
    let x = spawn_x(rng, width, size);
    let effect = Effect::random(rng);
    PowerUp::new(Vec2::new(x, -size), size, tuning.power_up_speed, effect)
}
