//! Star Blaster - A vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation (entities, spawning, collisions, level progression)
//! - `renderer`: Draw-list generation from simulation state
//! - `platform`: Keyboard/touch translation into simulation input
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{QualityPreset, Settings};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Reference frame length in ms. Per-frame speeds in `Tuning` are
    /// expressed against this and scaled by the real elapsed time.
    pub const FRAME_MS: f32 = 1000.0 / 60.0;

    /// Playfield used until the host reports a real canvas size
    pub const DEFAULT_PLAYFIELD_WIDTH: f32 = 800.0;
    pub const DEFAULT_PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Player spawns this far above the bottom edge
    pub const PLAYER_SPAWN_OFFSET: f32 = 100.0;
}

/// Clamp a host-supplied elapsed time to a usable value.
///
/// Negative, NaN and infinite inputs become 0 so a stalled or bogus frame
/// never corrupts the simulation.
#[inline]
pub fn sanitize_elapsed(elapsed_ms: f32) -> f32 {
    if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
        elapsed_ms
    } else {
        0.0
    }
}

/// Number of reference frames covered by `elapsed_ms`
#[inline]
pub fn frame_scale(elapsed_ms: f32) -> f32 {
    sanitize_elapsed(elapsed_ms) / consts::FRAME_MS
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_elapsed() {
        assert_eq!(sanitize_elapsed(16.0), 16.0);
        assert_eq!(sanitize_elapsed(-5.0), 0.0);
        assert_eq!(sanitize_elapsed(f32::NAN), 0.0);
        assert_eq!(sanitize_elapsed(f32::INFINITY), 0.0);
    }

    #[test]
    fn test_frame_scale_reference_frame() {
        assert!((frame_scale(consts::FRAME_MS) - 1.0).abs() < 1e-6);
        assert_eq!(frame_scale(-1.0), 0.0);
    }

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(2.0, 0.0);
        assert!((p.x - 2.0).abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
    }
}
