//! Shape generation for 2D primitives
//!
//! Shapes are emitted as backend-agnostic draw commands in playfield pixel
//! coordinates (origin top-left, y down).

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, TAU};

use crate::polar_to_cartesian;
use crate::sim::{Effect, ParticleTint};

/// Straight RGBA, components in [0, 1]
pub type Color = [f32; 4];

/// A single drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled circle
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    /// Stroked circle outline
    Ring {
        center: Vec2,
        radius: f32,
        width: f32,
        color: Color,
    },
    /// Filled closed polygon
    Polygon { points: Vec<Vec2>, color: Color },
    /// Centered text
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: Color,
    },
}

impl DrawCommand {
    pub fn color(&self) -> Color {
        match self {
            DrawCommand::Circle { color, .. }
            | DrawCommand::Ring { color, .. }
            | DrawCommand::Polygon { color, .. }
            | DrawCommand::Text { color, .. } => *color,
        }
    }
}

/// Replace the alpha channel
#[inline]
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], alpha.clamp(0.0, 1.0)]
}

/// Signature color of each effect
pub fn effect_color(effect: Effect, high_contrast: bool) -> Color {
    match (effect, high_contrast) {
        (Effect::RapidFire, false) => [1.0, 0.85, 0.2, 1.0],
        (Effect::Shield, false) => [0.3, 0.7, 1.0, 1.0],
        (Effect::MultiShot, false) => [0.75, 0.4, 1.0, 1.0],
        (Effect::SpeedBoost, false) => [0.3, 1.0, 0.5, 1.0],
        (Effect::RapidFire, true) => [1.0, 1.0, 0.0, 1.0],
        (Effect::Shield, true) => [0.0, 1.0, 1.0, 1.0],
        (Effect::MultiShot, true) => [1.0, 0.0, 1.0, 1.0],
        (Effect::SpeedBoost, true) => [0.0, 1.0, 0.0, 1.0],
    }
}

/// Particle color by what spawned it
pub fn tint_color(tint: ParticleTint, high_contrast: bool) -> Color {
    match tint {
        ParticleTint::EnemyExplosion => [1.0, 0.5, 0.1, 1.0],
        ParticleTint::PlayerHit => [1.0, 0.15, 0.2, 1.0],
        ParticleTint::Pickup(effect) => effect_color(effect, high_contrast),
        ParticleTint::Gold => [1.0, 0.84, 0.0, 1.0],
    }
}

pub fn circle(center: Vec2, radius: f32, color: Color) -> DrawCommand {
    DrawCommand::Circle {
        center,
        radius,
        color,
    }
}

pub fn ring(center: Vec2, radius: f32, width: f32, color: Color) -> DrawCommand {
    DrawCommand::Ring {
        center,
        radius,
        width,
        color,
    }
}

/// Regular polygon with its first vertex at `rotation`
pub fn regular_polygon(
    center: Vec2,
    radius: f32,
    sides: u32,
    rotation: f32,
    color: Color,
) -> DrawCommand {
    let sides = sides.max(3);
    let points = (0..sides)
        .map(|i| center + polar_to_cartesian(radius, rotation + TAU * i as f32 / sides as f32))
        .collect();
    DrawCommand::Polygon { points, color }
}

/// Upward-pointing ship hull fitting inside a circle of `size`
pub fn ship(center: Vec2, size: f32, color: Color) -> DrawCommand {
    let nose = center + Vec2::new(0.0, -size);
    let left = center + Vec2::new(-size * 0.8, size * 0.8);
    let notch = center + Vec2::new(0.0, size * 0.4);
    let right = center + Vec2::new(size * 0.8, size * 0.8);
    DrawCommand::Polygon {
        points: vec![nose, right, notch, left],
        color,
    }
}

/// Enemy diamond, spun by its cosmetic rotation
pub fn enemy(center: Vec2, size: f32, rotation: f32, color: Color) -> DrawCommand {
    regular_polygon(center, size, 4, rotation - FRAC_PI_2, color)
}

pub fn text(pos: Vec2, text: impl Into<String>, size: f32, color: Color) -> DrawCommand {
    DrawCommand::Text {
        pos,
        text: text.into(),
        size,
        color,
    }
}
