//! Level progression and difficulty scaling
//!
//! A level-up fires the first tick the score sits on a new multiple of
//! `level_score_step`. Each level speeds up enemy spawning and hands out
//! rewards; milestone levels (every 2nd, 3rd, 5th and 10th) add extras.

use glam::Vec2;

use super::entity::{MAX_PARTICLES, Particle, ParticleTint};
use super::player::Effect;
use super::state::{GameEvent, GameState, LevelUpMessage};
use crate::polar_to_cartesian;

/// Outward speed of celebration ring particles (px per reference frame)
const RING_SPEED: f32 = 3.0;

/// Whether the current score earns a level-up
pub fn level_up_due(score: u64, level: u32, step: u64) -> bool {
    score > 0 && score % step == 0 && score / step > u64::from(level.saturating_sub(1))
}

/// Lower `value` by `step` without going below `floor`. A value already at
/// or below the floor is left alone so intervals never grow.
pub fn decrease_toward(value: f32, step: f32, floor: f32) -> f32 {
    if value <= floor {
        value
    } else {
        (value - step).max(floor)
    }
}

/// Check the score and level up if due. Returns true on level-up.
pub fn check_level_up(state: &mut GameState) -> bool {
    if level_up_due(state.score, state.level, state.tuning.level_score_step) {
        level_up(state);
        true
    } else {
        false
    }
}

/// Advance one level and hand out rewards
pub fn level_up(state: &mut GameState) {
    state.level += 1;
    let level = state.level;
    let tuning = &state.tuning;

    state.timers.enemy_interval_ms = decrease_toward(
        state.timers.enemy_interval_ms,
        tuning.level_spawn_step_ms,
        tuning.level_spawn_floor_ms,
    );

    let gift = Effect::random(&mut state.rng);
    state.player.apply_power_up(gift);
    state.score += tuning.level_bonus_score;

    let mut text = format!("LEVEL {level}!");
    let mut intense = false;
    let mut double_power = false;
    let mut bonus_life = false;

    // Power-ups get rarer as difficulty rises
    if level % 2 == 0 {
        state.timers.power_up_interval_ms = (state.timers.power_up_interval_ms
            + tuning.power_up_milestone_step_ms)
            .min(tuning.power_up_interval_cap_ms);
    }

    if level % 10 == 0 {
        state.timers.enemy_interval_ms = decrease_toward(
            state.timers.enemy_interval_ms,
            tuning.intense_spawn_step_ms,
            tuning.intense_spawn_floor_ms,
        );
        intense = true;
        text = format!("LEVEL {level} - INTENSE MODE!");
    }

    if level % 3 == 0 {
        let second = Effect::random(&mut state.rng);
        state.player.apply_power_up(second);
        double_power = true;
        text = format!("LEVEL {level} - DOUBLE POWER!");
    }

    // Evaluated last, so its text wins on levels that are also multiples of 3
    if level % 5 == 0 {
        state.lives += 1;
        bonus_life = true;
        text = format!("LEVEL {level} - BONUS LIFE!");
    }

    log::info!(
        "Level {} reached (enemy interval {} ms, power-up interval {} ms)",
        level,
        state.timers.enemy_interval_ms,
        state.timers.power_up_interval_ms
    );

    state.level_up_message = Some(LevelUpMessage {
        text,
        intense,
        remaining_ms: state.tuning.level_message_ms,
        total_ms: state.tuning.level_message_ms,
    });

    spawn_ring(
        &mut state.particles,
        state.player.pos,
        state.player.size,
        state.tuning.celebration_particles,
    );

    state.events.push(GameEvent::LevelUp {
        level,
        bonus_life,
        double_power,
        intense,
    });
}

/// Count the level-up banner down and clear it at zero
pub fn update_message(state: &mut GameState, elapsed_ms: f32) {
    if let Some(message) = state.level_up_message.as_mut() {
        message.remaining_ms -= elapsed_ms;
        if message.remaining_ms <= 0.0 {
            state.level_up_message = None;
        }
    }
}

/// Evenly spaced gold particles flying outward from a circle around `center`
fn spawn_ring(particles: &mut Vec<Particle>, center: Vec2, radius: f32, count: u32) {
    for i in 0..count {
        if particles.len() >= MAX_PARTICLES {
            break;
        }
        let angle = std::f32::consts::TAU * (i as f32 / count as f32);
        let dir = polar_to_cartesian(1.0, angle);
        particles.push(Particle::new(
            center + dir * radius,
            dir * RING_SPEED,
            ParticleTint::Gold,
        ));
    }
}
