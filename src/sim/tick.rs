//! Variable timestep simulation tick
//!
//! Core game loop: the host calls [`tick`] once per animation frame with the
//! real elapsed time. Every speed and timer scales with that time so the
//! game plays the same at any refresh rate.

use glam::Vec2;

use super::collision::{is_colliding, retain_unflagged};
use super::entity::{ParticleTint, spawn_burst};
use super::player::{Effect, MovementIntent};
use super::progression::{check_level_up, update_message};
use super::spawn::{spawn_enemy, spawn_power_up};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::{frame_scale, sanitize_elapsed};

/// Input for a single tick
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Held movement directions (keyboard or derived from touch)
    pub movement: MovementIntent,
    /// Fire button held
    pub fire: bool,
    /// Current playfield size (width, height)
    pub playfield: Vec2,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            movement: MovementIntent::default(),
            fire: false,
            playfield: Vec2::new(DEFAULT_PLAYFIELD_WIDTH, DEFAULT_PLAYFIELD_HEIGHT),
        }
    }
}

/// Advance the game by `elapsed_ms`
pub fn tick(state: &mut GameState, input: &TickInput, elapsed_ms: f32) {
    let elapsed_ms = sanitize_elapsed(elapsed_ms);
    let frames = frame_scale(elapsed_ms);
    state.set_bounds(input.playfield);
    let bounds = state.bounds;

    // Background keeps scrolling on menus and while paused
    state.starfield.update(frames, bounds, &mut state.rng);

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ms += f64::from(elapsed_ms);

    // Input
    state.player.apply_movement(input.movement, frames, bounds);
    if input.fire {
        state.player.shoot(&mut state.bullets);
    }

    // Cooldown and effect timers
    state.player.update(elapsed_ms);

    for bullet in &mut state.bullets {
        bullet.update(frames);
    }
    state.bullets.retain(|b| !b.is_off_top());

    if state.timers.advance_enemy(elapsed_ms) {
        let enemy = spawn_enemy(&mut state.rng, bounds.x, &state.tuning);
        log::debug!("Enemy spawned at x={:.0}", enemy.pos.x);
        state.enemies.push(enemy);
    }

    for enemy in &mut state.enemies {
        enemy.update(frames);
    }
    // Escaping enemies cost nothing
    state.enemies.retain(|e| !e.is_off_bottom(bounds.y));

    if state
        .timers
        .advance_power_up(elapsed_ms, &state.tuning, &mut state.rng)
    {
        let power_up = spawn_power_up(&mut state.rng, bounds.x, &state.tuning);
        log::debug!("Power-up {:?} spawned", power_up.effect);
        state.power_ups.push(power_up);
    }

    for power_up in &mut state.power_ups {
        power_up.update(frames);
    }
    state.power_ups.retain(|p| !p.is_off_bottom(bounds.y));

    for particle in &mut state.particles {
        particle.update(frames);
    }
    state.particles.retain(|p| !p.is_dead());

    resolve_collisions(state);
    if state.phase == GamePhase::GameOver {
        return;
    }

    check_level_up(state);
    update_message(state, elapsed_ms);
}

/// Resolve bullet/enemy, player/enemy and player/power-up overlaps.
///
/// Removals are flagged during each pass and excised afterwards. If the
/// player loses the last life the game ends immediately and later passes
/// are skipped.
fn resolve_collisions(state: &mut GameState) {
    resolve_bullet_hits(state);
    resolve_player_hits(state);
    if state.phase == GamePhase::GameOver {
        return;
    }
    resolve_pickups(state);
}

fn resolve_bullet_hits(state: &mut GameState) {
    let mut dead_bullets = vec![false; state.bullets.len()];
    let mut dead_enemies = vec![false; state.enemies.len()];
    let mut kills = Vec::new();

    for (bi, bullet) in state.bullets.iter().enumerate() {
        for (ei, enemy) in state.enemies.iter().enumerate() {
            if dead_enemies[ei] || !is_colliding(bullet, enemy) {
                continue;
            }
            dead_bullets[bi] = true;
            dead_enemies[ei] = true;
            kills.push(enemy.pos);
            break;
        }
    }

    if kills.is_empty() {
        return;
    }

    retain_unflagged(&mut state.bullets, &dead_bullets);
    retain_unflagged(&mut state.enemies, &dead_enemies);
    for pos in kills {
        spawn_burst(
            &mut state.particles,
            &mut state.rng,
            pos,
            state.tuning.explosion_particles,
            ParticleTint::EnemyExplosion,
        );
        state.score += state.tuning.enemy_score;
        state.events.push(GameEvent::EnemyDestroyed { pos });
    }
}

fn resolve_player_hits(state: &mut GameState) {
    let mut dead_enemies = vec![false; state.enemies.len()];
    let mut impacts = Vec::new();
    let mut fatal = false;

    for (ei, enemy) in state.enemies.iter().enumerate() {
        if !is_colliding(&state.player, enemy) {
            continue;
        }
        dead_enemies[ei] = true;
        impacts.push(enemy.pos);

        if state.player.has_effect(Effect::Shield) {
            state.events.push(GameEvent::ShieldAbsorbed { pos: enemy.pos });
            continue;
        }

        state.lives = state.lives.saturating_sub(1);
        state.events.push(GameEvent::PlayerHit {
            lives_left: state.lives,
        });
        if state.lives == 0 {
            fatal = true;
            break;
        }
    }

    if impacts.is_empty() {
        return;
    }

    retain_unflagged(&mut state.enemies, &dead_enemies);
    for pos in impacts {
        spawn_burst(
            &mut state.particles,
            &mut state.rng,
            pos,
            state.tuning.explosion_particles,
            ParticleTint::PlayerHit,
        );
    }

    // The phase flips last; nothing is mutated after the run ends
    if fatal {
        state.phase = GamePhase::GameOver;
        log::info!("Game over: score {} at level {}", state.score, state.level);
        state.events.push(GameEvent::GameOver {
            final_score: state.score,
        });
    }
}

fn resolve_pickups(state: &mut GameState) {
    let mut collected = vec![false; state.power_ups.len()];
    let mut pickups = Vec::new();

    for (pi, power_up) in state.power_ups.iter().enumerate() {
        if is_colliding(&state.player, power_up) {
            collected[pi] = true;
            pickups.push((power_up.pos, power_up.effect));
        }
    }

    if pickups.is_empty() {
        return;
    }

    retain_unflagged(&mut state.power_ups, &collected);
    for (pos, effect) in pickups {
        spawn_burst(
            &mut state.particles,
            &mut state.rng,
            pos,
            state.tuning.pickup_particles,
            ParticleTint::Pickup(effect),
        );
        state.player.apply_power_up(effect);
        state.score += state.tuning.power_up_score;
        state.events.push(GameEvent::PowerUpCollected { effect });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Bullet, Enemy, PowerUp};
    use crate::sim::state::Command;
    use proptest::prelude::*;

    fn playing() -> GameState {
        let mut state = GameState::new(12345);
        state.apply(Command::Start);
        state
    }

    /// Enemy parked on top of the player
    fn enemy_on_player(state: &GameState) -> Enemy {
        Enemy::new(state.player.pos, 20.0, 0.0)
    }

    #[test]
    fn test_start_phase_only_moves_stars() {
        let mut state = GameState::new(12345);
        state.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), 20.0, 2.0));
        let stars_before: Vec<Vec2> = state.starfield.stars.iter().map(|s| s.pos).collect();

        tick(&mut state, &TickInput::default(), FRAME_MS);

        assert_eq!(state.enemies[0].pos, Vec2::new(100.0, 100.0));
        assert!(state.bullets.is_empty());
        let stars_after: Vec<Vec2> = state.starfield.stars.iter().map(|s| s.pos).collect();
        assert_ne!(stars_before, stars_after);
    }

    #[test]
    fn test_paused_freezes_entities() {
        let mut state = playing();
        state.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), 20.0, 2.0));
        state.apply(Command::Pause);
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &input, FRAME_MS);
        }
        assert_eq!(state.enemies[0].pos, Vec2::new(100.0, 100.0));
        assert!(state.bullets.is_empty());
        assert_eq!(state.timers.enemy_timer_ms, 0.0);
    }

    #[test]
    fn test_fire_spawns_bullet() {
        let mut state = playing();
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_MS);
        assert_eq!(state.bullets.len(), 1);
        // Cooldown blocks the next frame
        tick(&mut state, &input, FRAME_MS);
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_negative_elapsed_is_zero() {
        let mut state = playing();
        state.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), 20.0, 2.0));
        tick(&mut state, &TickInput::default(), -50.0);
        assert_eq!(state.enemies[0].pos, Vec2::new(100.0, 100.0));
        assert_eq!(state.timers.enemy_timer_ms, 0.0);
    }

    #[test]
    fn test_enemy_spawns_after_interval() {
        let mut state = playing();
        tick(&mut state, &TickInput::default(), 2000.0);
        assert!(state.enemies.is_empty());
        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.timers.enemy_timer_ms, 0.0);
    }

    #[test]
    fn test_bullet_kills_enemy() {
        let mut state = playing();
        let pos = Vec2::new(200.0, 200.0);
        state.bullets.push(Bullet::new(pos, 5.0, 0.0));
        state.enemies.push(Enemy::new(pos, 20.0, 0.0));

        tick(&mut state, &TickInput::default(), 0.0);

        assert!(state.bullets.is_empty());
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 100);
        assert_eq!(state.particles.len(), 15);
        assert!(
            state
                .particles
                .iter()
                .all(|p| p.tint == ParticleTint::EnemyExplosion)
        );
    }

    #[test]
    fn test_one_bullet_kills_one_enemy() {
        let mut state = playing();
        let pos = Vec2::new(200.0, 200.0);
        state.bullets.push(Bullet::new(pos, 5.0, 0.0));
        state.enemies.push(Enemy::new(pos, 20.0, 0.0));
        state.enemies.push(Enemy::new(pos + Vec2::new(5.0, 0.0), 20.0, 0.0));

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.score, 100);
    }

    #[test]
    fn test_two_bullets_two_enemies_no_skips() {
        let mut state = playing();
        for x in [100.0, 300.0] {
            let pos = Vec2::new(x, 200.0);
            state.bullets.push(Bullet::new(pos, 5.0, 0.0));
            state.enemies.push(Enemy::new(pos, 20.0, 0.0));
        }
        tick(&mut state, &TickInput::default(), 0.0);
        assert!(state.bullets.is_empty());
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 200);
    }

    #[test]
    fn test_player_hit_costs_life() {
        let mut state = playing();
        let enemy = enemy_on_player(&state);
        state.enemies.push(enemy);
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.lives, 2);
        assert!(state.enemies.is_empty());
        assert!(state.particles.iter().all(|p| p.tint == ParticleTint::PlayerHit));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_shield_absorbs_hit() {
        let mut state = playing();
        state.player.apply_power_up(Effect::Shield);
        let enemy = enemy_on_player(&state);
        state.enemies.push(enemy);
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.lives, 3);
        assert!(state.enemies.is_empty());
        assert_eq!(state.particles.len(), 15);
    }

    #[test]
    fn test_fatal_hit_cleans_up_before_game_over() {
        let mut state = playing();
        state.lives = 1;
        let first = enemy_on_player(&state);
        let second = Enemy::new(state.player.pos + Vec2::new(5.0, 0.0), 20.0, 0.0);
        state.enemies.push(first);
        state.enemies.push(second);

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.phase, GamePhase::GameOver);
        // Only the fatal enemy is removed and burst; the pass stops there
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].pos, state.player.pos + Vec2::new(5.0, 0.0));
        assert_eq!(
            state.particles.len(),
            state.tuning.explosion_particles as usize
        );
        let events = state.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::PlayerHit { lives_left: 0 },
                GameEvent::GameOver { final_score: 0 },
            ]
        );
    }

    #[test]
    fn test_last_life_ends_game_same_tick() {
        let mut state = playing();
        state.lives = 1;
        let enemy = enemy_on_player(&state);
        state.enemies.push(enemy);
        let power_up = PowerUp::new(state.player.pos, 15.0, 0.0, Effect::Shield);
        state.power_ups.push(power_up);
        state.score = 950;

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        // Power-up pass skipped
        assert_eq!(state.power_ups.len(), 1);
        assert_eq!(state.score, 950);
        assert_eq!(state.hud().final_score, Some(950));
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::GameOver { final_score: 950 }));

        // Nothing moves afterwards
        state.enemies.push(Enemy::new(Vec2::new(50.0, 50.0), 20.0, 3.0));
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.enemies[0].pos, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_pickup_applies_effect() {
        let mut state = playing();
        let power_up = PowerUp::new(state.player.pos, 15.0, 0.0, Effect::MultiShot);
        state.power_ups.push(power_up);
        tick(&mut state, &TickInput::default(), 0.0);
        assert!(state.power_ups.is_empty());
        assert_eq!(state.score, 50);
        assert_eq!(state.player.effect_remaining(Effect::MultiShot), 8000.0);
        assert_eq!(state.particles.len(), 10);
        assert!(
            state
                .particles
                .iter()
                .all(|p| p.tint == ParticleTint::Pickup(Effect::MultiShot))
        );
    }

    #[test]
    fn test_simultaneous_kills_land_on_threshold_once() {
        let mut state = playing();
        state.score = 800;
        for x in [100.0, 300.0] {
            let pos = Vec2::new(x, 150.0);
            state.bullets.push(Bullet::new(pos, 5.0, 0.0));
            state.enemies.push(Enemy::new(pos, 20.0, 0.0));
        }
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.level, 2);
        assert_eq!(state.score, 1200);
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.level, 2);
    }

    #[test]
    fn test_playfield_resize_clamps_player() {
        let mut state = playing();
        let input = TickInput {
            playfield: Vec2::new(200.0, 150.0),
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_MS);
        assert!(state.player.pos.x <= 180.0);
        assert!(state.player.pos.y <= 130.0);
    }

    #[test]
    fn test_determinism() {
        let mut a = playing();
        let mut b = playing();
        let input = TickInput {
            fire: true,
            movement: MovementIntent {
                left: true,
                ..Default::default()
            },
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut a, &input, FRAME_MS);
            tick(&mut b, &input, FRAME_MS);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.player.pos, b.player.pos);
    }

    proptest! {
        #[test]
        fn score_never_decreases(
            seed in any::<u64>(),
            steps in proptest::collection::vec((any::<bool>(), any::<bool>(), any::<bool>(), 0.0f32..100.0), 1..200),
        ) {
            let mut state = GameState::new(seed);
            state.apply(Command::Start);
            let mut last = state.score;
            for (left, right, fire, ms) in steps {
                let input = TickInput {
                    movement: MovementIntent { left, right, ..Default::default() },
                    fire,
                    ..Default::default()
                };
                tick(&mut state, &input, ms);
                prop_assert!(state.score >= last);
                last = state.score;
            }
        }
    }
}
