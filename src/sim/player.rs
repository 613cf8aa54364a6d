//! The player ship: movement, firing and timed effects

use std::collections::BTreeMap;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Body;
use super::entity::Bullet;
use crate::tuning::Tuning;

/// Timed modifiers granted by power-ups and level-ups
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Effect {
    RapidFire,
    Shield,
    MultiShot,
    SpeedBoost,
}

impl Effect {
    pub const ALL: [Effect; 4] = [
        Effect::RapidFire,
        Effect::Shield,
        Effect::MultiShot,
        Effect::SpeedBoost,
    ];

    /// Pick an effect uniformly at random
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::RapidFire => "Rapid Fire",
            Effect::Shield => "Shield",
            Effect::MultiShot => "Multi Shot",
            Effect::SpeedBoost => "Speed Boost",
        }
    }

    /// Single-character glyph drawn on the power-up orb
    pub fn glyph(&self) -> &'static str {
        match self {
            Effect::RapidFire => "R",
            Effect::Shield => "S",
            Effect::MultiShot => "M",
            Effect::SpeedBoost => "B",
        }
    }
}

/// Abstract movement request for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementIntent {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MovementIntent {
    /// Unnormalized direction; opposing keys cancel out
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        dir
    }
}

/// The player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: f32,
    /// Time until the next shot is allowed
    pub shoot_cooldown_ms: f32,
    /// Base interval between shots
    pub shoot_rate_ms: f32,
    /// Remaining duration per active effect. An entry exists only while > 0.
    pub effects: BTreeMap<Effect, f32>,
    base_speed: f32,
    boosted_speed: f32,
    rapid_fire_factor: f32,
    multi_shot_spread: f32,
    effect_duration_ms: f32,
    bullet_size: f32,
    bullet_speed: f32,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            size: tuning.player_size,
            shoot_cooldown_ms: 0.0,
            shoot_rate_ms: tuning.shoot_rate_ms,
            effects: BTreeMap::new(),
            base_speed: tuning.player_base_speed,
            boosted_speed: tuning.player_boosted_speed,
            rapid_fire_factor: tuning.rapid_fire_factor,
            multi_shot_spread: tuning.multi_shot_spread,
            effect_duration_ms: tuning.effect_duration_ms,
            bullet_size: tuning.bullet_size,
            bullet_speed: tuning.bullet_speed,
        }
    }

    pub fn has_effect(&self, effect: Effect) -> bool {
        self.effects.get(&effect).is_some_and(|ms| *ms > 0.0)
    }

    /// Remaining time on an effect, 0 when inactive
    pub fn effect_remaining(&self, effect: Effect) -> f32 {
        self.effects.get(&effect).copied().unwrap_or(0.0)
    }

    /// Current movement speed in px per reference frame
    pub fn speed(&self) -> f32 {
        if self.has_effect(Effect::SpeedBoost) {
            self.boosted_speed
        } else {
            self.base_speed
        }
    }

    /// Move according to intent and clamp to `[size, bounds - size]`
    pub fn apply_movement(&mut self, intent: MovementIntent, frames: f32, bounds: Vec2) {
        self.pos += intent.direction() * self.speed() * frames;
        self.clamp_to(bounds);
    }

    /// Keep the ship fully inside the playfield. A playfield smaller than
    /// the ship pins it to the center on that axis.
    pub fn clamp_to(&mut self, bounds: Vec2) {
        self.pos.x = clamp_axis(self.pos.x, self.size, bounds.x);
        self.pos.y = clamp_axis(self.pos.y, self.size, bounds.y);
    }

    /// Fire if the cooldown has elapsed
    pub fn shoot(&mut self, sink: &mut Vec<Bullet>) {
        if self.shoot_cooldown_ms > 0.0 {
            return;
        }

        let muzzle = Vec2::new(self.pos.x, self.pos.y - self.size);
        if self.has_effect(Effect::MultiShot) {
            for dx in [-self.multi_shot_spread, 0.0, self.multi_shot_spread] {
                sink.push(Bullet::new(
                    muzzle + Vec2::new(dx, 0.0),
                    self.bullet_size,
                    self.bullet_speed,
                ));
            }
        } else {
            sink.push(Bullet::new(muzzle, self.bullet_size, self.bullet_speed));
        }

        self.shoot_cooldown_ms = if self.has_effect(Effect::RapidFire) {
            self.shoot_rate_ms * self.rapid_fire_factor
        } else {
            self.shoot_rate_ms
        };
    }

    /// Activate or refresh an effect. Durations overwrite, they never stack.
    pub fn apply_power_up(&mut self, effect: Effect) {
        self.effects.insert(effect, self.effect_duration_ms);
    }

    /// Clear an effect; no-op when it is not active
    pub fn remove_effect(&mut self, effect: Effect) {
        self.effects.remove(&effect);
    }

    /// Decay the firing cooldown and every effect timer
    pub fn update(&mut self, elapsed_ms: f32) {
        if self.shoot_cooldown_ms > 0.0 {
            self.shoot_cooldown_ms = (self.shoot_cooldown_ms - elapsed_ms).max(0.0);
        }
        for remaining in self.effects.values_mut() {
            *remaining -= elapsed_ms;
        }
        self.effects.retain(|_, remaining| *remaining > 0.0);
    }
}

impl Body for Player {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.size
    }
}

fn clamp_axis(value: f32, margin: f32, extent: f32) -> f32 {
    if extent <= margin * 2.0 {
        extent / 2.0
    } else {
        value.clamp(margin, extent - margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn player() -> Player {
        Player::new(Vec2::new(400.0, 500.0), &Tuning::default())
    }

    #[test]
    fn test_single_shot_and_cooldown() {
        let mut p = player();
        let mut bullets = Vec::new();
        p.shoot(&mut bullets);
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].pos.x, 400.0);
        assert_eq!(p.shoot_cooldown_ms, 250.0);

        // Cooldown pending: no new bullet
        p.shoot(&mut bullets);
        assert_eq!(bullets.len(), 1);

        p.update(250.0);
        p.shoot(&mut bullets);
        assert_eq!(bullets.len(), 2);
    }

    #[test]
    fn test_multi_shot_fires_three() {
        let mut p = player();
        p.apply_power_up(Effect::MultiShot);
        let mut bullets = Vec::new();
        p.shoot(&mut bullets);
        assert_eq!(bullets.len(), 3);
        assert!(bullets[0].pos.x < bullets[1].pos.x);
        assert!(bullets[1].pos.x < bullets[2].pos.x);
        assert_eq!(bullets[1].pos.x, p.pos.x);
    }

    #[test]
    fn test_rapid_fire_shortens_cooldown() {
        let mut p = player();
        p.apply_power_up(Effect::RapidFire);
        let mut bullets = Vec::new();
        p.shoot(&mut bullets);
        assert!((p.shoot_cooldown_ms - 75.0).abs() < 1e-3);
    }

    #[test]
    fn test_effect_refresh_overwrites() {
        let mut p = player();
        p.apply_power_up(Effect::Shield);
        p.update(5000.0);
        assert!((p.effect_remaining(Effect::Shield) - 3000.0).abs() < 1e-3);
        p.apply_power_up(Effect::Shield);
        assert_eq!(p.effect_remaining(Effect::Shield), 8000.0);
    }

    #[test]
    fn test_effects_expire_independently() {
        let mut p = player();
        p.apply_power_up(Effect::Shield);
        p.update(3000.0);
        p.apply_power_up(Effect::SpeedBoost);
        p.update(5000.0);
        assert!(!p.has_effect(Effect::Shield));
        assert!(!p.effects.contains_key(&Effect::Shield));
        assert!(p.has_effect(Effect::SpeedBoost));
    }

    #[test]
    fn test_remove_inactive_effect_is_noop() {
        let mut p = player();
        p.remove_effect(Effect::MultiShot);
        assert!(p.effects.is_empty());
    }

    #[test]
    fn test_speed_boost_and_clamp() {
        let mut p = player();
        let bounds = Vec2::new(800.0, 600.0);
        let left = MovementIntent {
            left: true,
            ..Default::default()
        };
        p.apply_movement(left, 1.0, bounds);
        assert_eq!(p.pos.x, 395.0);

        p.apply_power_up(Effect::SpeedBoost);
        p.apply_movement(left, 1.0, bounds);
        assert_eq!(p.pos.x, 387.0);

        p.apply_movement(left, 1000.0, bounds);
        assert_eq!(p.pos.x, p.size);

        let down = MovementIntent {
            down: true,
            ..Default::default()
        };
        p.apply_movement(down, 1000.0, bounds);
        assert_eq!(p.pos.y, 600.0 - p.size);
    }

    #[test]
    fn test_clamp_against_shrunken_bounds() {
        let mut p = player();
        p.clamp_to(Vec2::new(300.0, 200.0));
        assert_eq!(p.pos, Vec2::new(280.0, 180.0));
    }

    #[test]
    fn test_random_effect_covers_all() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            seen.insert(Effect::random(&mut rng));
        }
        assert_eq!(seen.len(), Effect::ALL.len());
    }
}
