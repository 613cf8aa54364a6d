//! Rendering module
//!
//! Turns simulation state into a flat list of 2D draw commands. The list is
//! backend-agnostic: the browser host replays it on a canvas 2D context, and
//! tests inspect it directly.

pub mod shapes;

pub use shapes::{Color, DrawCommand};

use glam::Vec2;

use crate::settings::Settings;
use crate::sim::{Effect, GamePhase, GameState};
use shapes::{circle, effect_color, enemy, ring, ship, text, tint_color, with_alpha};

/// Drawn particle radius at full life
const PARTICLE_RADIUS: f32 = 3.0;
/// Power-up radius swing while pulsing, as a fraction of its size
const PULSE_AMPLITUDE: f32 = 0.15;
/// Shield ring radius relative to the ship size
const SHIELD_SCALE: f32 = 1.5;
const SHIELD_WIDTH: f32 = 2.0;
/// Level-up banner font size before scaling
const BANNER_SIZE: f32 = 48.0;
/// Fraction of the banner lifetime spent fading out
const BANNER_FADE: f32 = 0.2;

/// Colors for one frame
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub star: Color,
    pub bullet: Color,
    pub enemy: Color,
    pub ship: Color,
    pub engine: Color,
    pub glyph: Color,
    pub banner: Color,
    pub banner_intense: Color,
}

impl Palette {
    pub fn for_settings(settings: &Settings) -> Self {
        if settings.high_contrast {
            Self {
                background: [0.0, 0.0, 0.0, 1.0],
                star: [1.0, 1.0, 1.0, 1.0],
                bullet: [1.0, 1.0, 0.0, 1.0],
                enemy: [1.0, 0.0, 0.0, 1.0],
                ship: [1.0, 1.0, 1.0, 1.0],
                engine: [1.0, 0.6, 0.0, 1.0],
                glyph: [0.0, 0.0, 0.0, 1.0],
                banner: [1.0, 1.0, 0.0, 1.0],
                banner_intense: [1.0, 0.0, 0.0, 1.0],
            }
        } else {
            Self {
                background: [0.02, 0.02, 0.08, 1.0],
                star: [0.85, 0.9, 1.0, 1.0],
                bullet: [0.4, 1.0, 1.0, 1.0],
                enemy: [0.95, 0.3, 0.35, 1.0],
                ship: [0.55, 0.8, 1.0, 1.0],
                engine: [1.0, 0.55, 0.15, 1.0],
                glyph: [0.05, 0.05, 0.1, 1.0],
                banner: [1.0, 0.84, 0.0, 1.0],
                banner_intense: [1.0, 0.25, 0.2, 1.0],
            }
        }
    }
}

/// Build the draw list for the current state, back to front.
///
/// `time_ms` is wall-clock time and drives purely cosmetic animation (star
/// twinkle, shield shimmer, engine flicker) so it keeps moving while paused.
pub fn build_frame(state: &GameState, settings: &Settings, time_ms: f64) -> Vec<DrawCommand> {
    let palette = Palette::for_settings(settings);
    let animate = settings.animate();
    let t = (time_ms * 0.001) as f32;
    let mut out = Vec::with_capacity(
        1 + state.starfield.stars.len()
            + state.particles.len()
            + state.bullets.len()
            + state.enemies.len()
            + state.power_ups.len() * 3
            + 4,
    );

    out.push(DrawCommand::Polygon {
        points: vec![
            Vec2::ZERO,
            Vec2::new(state.bounds.x, 0.0),
            state.bounds,
            Vec2::new(0.0, state.bounds.y),
        ],
        color: palette.background,
    });

    if settings.draw_starfield() {
        for star in &state.starfield.stars {
            let alpha = if animate {
                0.7 + 0.3 * (t * 3.0 + star.pos.x * 0.1).sin()
            } else {
                0.8
            };
            out.push(circle(star.pos, star.size, with_alpha(palette.star, alpha)));
        }
    }

    for particle in state.particles.iter().take(settings.max_particles()) {
        let life = particle.life_fraction();
        let color = tint_color(particle.tint, settings.high_contrast);
        out.push(circle(
            particle.pos,
            PARTICLE_RADIUS * (0.5 + 0.5 * life),
            with_alpha(color, life),
        ));
    }

    for power_up in &state.power_ups {
        let radius = if animate {
            power_up.size * (1.0 + PULSE_AMPLITUDE * power_up.pulse.sin())
        } else {
            power_up.size
        };
        let color = effect_color(power_up.effect, settings.high_contrast);
        if settings.quality.glow_enabled() {
            out.push(circle(power_up.pos, radius * 1.6, with_alpha(color, 0.25)));
        }
        out.push(circle(power_up.pos, radius, color));
        out.push(text(power_up.pos, power_up.effect.glyph(), radius, palette.glyph));
    }

    for bullet in &state.bullets {
        out.push(circle(bullet.pos, bullet.size, palette.bullet));
    }

    for e in &state.enemies {
        let rotation = if animate { e.rotation } else { 0.0 };
        out.push(enemy(e.pos, e.size, rotation, palette.enemy));
    }

    if state.phase != GamePhase::GameOver {
        push_player(&mut out, state, settings, &palette, t);
    }

    if let Some(message) = &state.level_up_message {
        let progress = if message.total_ms > 0.0 {
            (1.0 - message.remaining_ms / message.total_ms).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let alpha = if progress > 1.0 - BANNER_FADE {
            (1.0 - progress) / BANNER_FADE
        } else {
            1.0
        };
        let size = if animate {
            BANNER_SIZE * (1.0 + 0.2 * (1.0 - progress))
        } else {
            BANNER_SIZE
        };
        let color = if message.intense {
            palette.banner_intense
        } else {
            palette.banner
        };
        out.push(text(
            Vec2::new(state.bounds.x / 2.0, state.bounds.y / 3.0),
            message.text.clone(),
            size,
            with_alpha(color, alpha),
        ));
    }

    out
}

fn push_player(
    out: &mut Vec<DrawCommand>,
    state: &GameState,
    settings: &Settings,
    palette: &Palette,
    t: f32,
) {
    let player = &state.player;
    let animate = settings.animate();

    let engine_color = if player.has_effect(Effect::SpeedBoost) {
        effect_color(Effect::SpeedBoost, settings.high_contrast)
    } else {
        palette.engine
    };
    let flicker = if animate { 1.0 + 0.2 * (t * 30.0).sin() } else { 1.0 };
    out.push(circle(
        player.pos + Vec2::new(0.0, player.size * 0.9),
        player.size * 0.35 * flicker,
        with_alpha(engine_color, 0.8),
    ));

    if settings.quality.glow_enabled() {
        out.push(circle(player.pos, player.size * 1.3, with_alpha(palette.ship, 0.15)));
    }
    out.push(ship(player.pos, player.size, palette.ship));

    if player.has_effect(Effect::Shield) {
        let alpha = if animate { 0.6 + 0.3 * (t * 6.0).sin() } else { 0.7 };
        out.push(ring(
            player.pos,
            player.size * SHIELD_SCALE,
            SHIELD_WIDTH,
            with_alpha(effect_color(Effect::Shield, settings.high_contrast), alpha),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::QualityPreset;
    use crate::sim::{Enemy, LevelUpMessage, Particle, ParticleTint, PowerUp};

    fn low_quality() -> Settings {
        let mut settings = Settings::default();
        settings.apply_preset(QualityPreset::Low);
        settings
    }

    fn count_rings(frame: &[DrawCommand]) -> usize {
        frame
            .iter()
            .filter(|c| matches!(c, DrawCommand::Ring { .. }))
            .count()
    }

    fn texts(frame: &[DrawCommand]) -> Vec<String> {
        frame
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_starfield_toggle() {
        let state = GameState::new(3);
        let with_stars = build_frame(&state, &Settings::default(), 0.0);
        let without = build_frame(&state, &low_quality(), 0.0);
        assert_eq!(
            with_stars.len() - without.len(),
            state.starfield.stars.len()
        );
    }

    #[test]
    fn test_particle_cap_and_fade() {
        let mut state = GameState::new(3);
        for _ in 0..200 {
            state.particles.push(Particle::new(
                Vec2::new(50.0, 50.0),
                Vec2::ZERO,
                ParticleTint::EnemyExplosion,
            ));
        }
        state.particles[0].life = 0.25;

        let settings = Settings {
            starfield: false,
            ..low_quality()
        };
        let frame = build_frame(&state, &settings, 0.0);
        let particle_circles: Vec<_> = frame
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { center, .. } if *center == Vec2::new(50.0, 50.0)))
            .collect();
        assert_eq!(particle_circles.len(), 100);
        assert_eq!(particle_circles[0].color()[3], 0.25);

        let off = Settings {
            particles: false,
            ..settings
        };
        let frame = build_frame(&state, &off, 0.0);
        assert!(!frame.iter().any(
            |c| matches!(c, DrawCommand::Circle { center, .. } if *center == Vec2::new(50.0, 50.0))
        ));
    }

    #[test]
    fn test_shield_ring_only_when_active() {
        let mut state = GameState::new(3);
        let settings = Settings::default();
        assert_eq!(count_rings(&build_frame(&state, &settings, 0.0)), 0);
        state.player.apply_power_up(Effect::Shield);
        assert_eq!(count_rings(&build_frame(&state, &settings, 0.0)), 1);
    }

    #[test]
    fn test_power_up_glyph_and_banner() {
        let mut state = GameState::new(3);
        state.power_ups.push(PowerUp::new(
            Vec2::new(100.0, 100.0),
            15.0,
            2.0,
            Effect::MultiShot,
        ));
        state.level_up_message = Some(LevelUpMessage {
            text: "LEVEL 2!".into(),
            intense: false,
            remaining_ms: 3000.0,
            total_ms: 3000.0,
        });
        let frame = build_frame(&state, &Settings::default(), 0.0);
        let labels = texts(&frame);
        assert!(labels.contains(&Effect::MultiShot.glyph().to_string()));
        assert!(labels.contains(&"LEVEL 2!".to_string()));
    }

    #[test]
    fn test_banner_fades_out() {
        let mut state = GameState::new(3);
        state.level_up_message = Some(LevelUpMessage {
            text: "LEVEL 5 - BONUS LIFE!".into(),
            intense: false,
            remaining_ms: 300.0,
            total_ms: 3000.0,
        });
        let frame = build_frame(&state, &Settings::default(), 0.0);
        let banner = frame
            .iter()
            .find(|c| matches!(c, DrawCommand::Text { .. }))
            .unwrap();
        assert!((banner.color()[3] - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_reduced_motion_freezes_cosmetics() {
        let mut state = GameState::new(3);
        let mut e = Enemy::new(Vec2::new(200.0, 200.0), 20.0, 1.0);
        e.rotation = 1.0;
        state.enemies.push(e);
        let settings = Settings {
            reduced_motion: true,
            starfield: false,
            ..Default::default()
        };
        let a = build_frame(&state, &settings, 0.0);
        let b = build_frame(&state, &settings, 12_345.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_ship_after_game_over() {
        let mut state = GameState::new(3);
        let settings = Settings {
            starfield: false,
            ..Default::default()
        };
        let playing = build_frame(&state, &settings, 0.0).len();
        state.phase = GamePhase::GameOver;
        assert!(build_frame(&state, &settings, 0.0).len() < playing);
    }
}
