//! Data-driven game balance
//!
//! Every number that shapes difficulty lives here so it can be tweaked from
//! JSON without touching simulation code. Speeds are in pixels per
//! reference frame (see [`crate::consts::FRAME_MS`]); durations are in ms.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value `{field}` must be positive")]
    NonPositive { field: &'static str },
    #[error("tuning range `{field}` is inverted ({min} >= {max})")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_size: f32,
    pub player_base_speed: f32,
    pub player_boosted_speed: f32,
    pub shoot_rate_ms: f32,
    /// Cooldown multiplier while rapid fire is active
    pub rapid_fire_factor: f32,
    /// Horizontal offset of the side bullets in multi-shot
    pub multi_shot_spread: f32,
    pub effect_duration_ms: f32,
    pub starting_lives: u32,

    // === Entities ===
    pub bullet_size: f32,
    pub bullet_speed: f32,
    pub enemy_size: f32,
    pub enemy_speed_min: f32,
    pub enemy_speed_max: f32,
    pub power_up_size: f32,
    pub power_up_speed: f32,

    // === Spawning ===
    pub enemy_spawn_initial_ms: f32,
    pub power_up_spawn_initial_ms: f32,
    pub power_up_spawn_min_ms: f32,
    pub power_up_spawn_max_ms: f32,

    // === Level progression ===
    pub level_score_step: u64,
    pub level_spawn_step_ms: f32,
    pub level_spawn_floor_ms: f32,
    pub intense_spawn_step_ms: f32,
    pub intense_spawn_floor_ms: f32,
    pub power_up_milestone_step_ms: f32,
    pub power_up_interval_cap_ms: f32,
    pub level_message_ms: f32,

    // === Scoring ===
    pub enemy_score: u64,
    pub power_up_score: u64,
    pub level_bonus_score: u64,

    // === Particles / ambience ===
    pub explosion_particles: u32,
    pub pickup_particles: u32,
    pub celebration_particles: u32,
    pub star_count: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_size: 20.0,
            player_base_speed: 5.0,
            player_boosted_speed: 8.0,
            shoot_rate_ms: 250.0,
            rapid_fire_factor: 0.3,
            multi_shot_spread: 15.0,
            effect_duration_ms: 8000.0,
            starting_lives: 3,

            bullet_size: 5.0,
            bullet_speed: 10.0,
            enemy_size: 20.0,
            enemy_speed_min: 1.0,
            enemy_speed_max: 3.0,
            power_up_size: 15.0,
            power_up_speed: 2.0,

            enemy_spawn_initial_ms: 2000.0,
            power_up_spawn_initial_ms: 15000.0,
            power_up_spawn_min_ms: 10000.0,
            power_up_spawn_max_ms: 20000.0,

            level_score_step: 1000,
            level_spawn_step_ms: 150.0,
            level_spawn_floor_ms: 400.0,
            intense_spawn_step_ms: 100.0,
            intense_spawn_floor_ms: 300.0,
            power_up_milestone_step_ms: 1000.0,
            power_up_interval_cap_ms: 25000.0,
            level_message_ms: 3000.0,

            enemy_score: 100,
            power_up_score: 50,
            level_bonus_score: 200,

            explosion_particles: 15,
            pickup_particles: 10,
            celebration_particles: 30,
            star_count: 100,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning file. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would stall or invert the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("player_size", self.player_size),
            ("player_base_speed", self.player_base_speed),
            ("player_boosted_speed", self.player_boosted_speed),
            ("shoot_rate_ms", self.shoot_rate_ms),
            ("rapid_fire_factor", self.rapid_fire_factor),
            ("effect_duration_ms", self.effect_duration_ms),
            ("bullet_size", self.bullet_size),
            ("bullet_speed", self.bullet_speed),
            ("enemy_size", self.enemy_size),
            ("enemy_speed_min", self.enemy_speed_min),
            ("power_up_size", self.power_up_size),
            ("power_up_speed", self.power_up_speed),
            ("enemy_spawn_initial_ms", self.enemy_spawn_initial_ms),
            ("power_up_spawn_initial_ms", self.power_up_spawn_initial_ms),
            ("power_up_spawn_min_ms", self.power_up_spawn_min_ms),
            ("level_spawn_step_ms", self.level_spawn_step_ms),
            ("level_spawn_floor_ms", self.level_spawn_floor_ms),
            ("intense_spawn_step_ms", self.intense_spawn_step_ms),
            ("intense_spawn_floor_ms", self.intense_spawn_floor_ms),
            ("power_up_milestone_step_ms", self.power_up_milestone_step_ms),
            ("power_up_interval_cap_ms", self.power_up_interval_cap_ms),
            ("level_message_ms", self.level_message_ms),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::NonPositive { field });
            }
        }
        if self.starting_lives == 0 {
            return Err(TuningError::NonPositive {
                field: "starting_lives",
            });
        }
        if self.level_score_step == 0 {
            return Err(TuningError::NonPositive {
                field: "level_score_step",
            });
        }

        let ranges = [
            ("enemy_speed", self.enemy_speed_min, self.enemy_speed_max),
            (
                "power_up_spawn",
                self.power_up_spawn_min_ms,
                self.power_up_spawn_max_ms,
            ),
        ];
        for (field, min, max) in ranges {
            if min >= max {
                return Err(TuningError::InvertedRange { field, min, max });
            }
        }

        // Equal bounds are fine here: the intense floor may match the level
        // floor and the cap may match the longest rolled interval.
        let ordered = [
            (
                "spawn_floor",
                self.intense_spawn_floor_ms,
                self.level_spawn_floor_ms,
            ),
            (
                "power_up_interval_cap",
                self.power_up_spawn_max_ms,
                self.power_up_interval_cap_ms,
            ),
        ];
        for (field, min, max) in ordered {
            if min > max {
                return Err(TuningError::InvertedRange { field, min, max });
            }
        }
        Ok(())
    }
}
