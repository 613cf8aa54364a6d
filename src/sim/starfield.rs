//! Scrolling background stars
//!
//! The star field keeps moving in every phase, including the start screen,
//! pause and game over.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Star radius range in px
const STAR_SIZE_MIN: f32 = 0.5;
const STAR_SIZE_MAX: f32 = 2.0;
/// Star fall speed range in px per reference frame
const STAR_SPEED_MIN: f32 = 0.5;
const STAR_SPEED_MAX: f32 = 2.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Starfield {
    pub stars: Vec<Star>,
}

impl Starfield {
    /// Scatter `count` stars over the playfield
    pub fn new(count: u32, bounds: Vec2, rng: &mut impl Rng) -> Self {
        let stars = (0..count)
            .map(|_| Star {
                pos: Vec2::new(
                    rng.random::<f32>() * bounds.x,
                    rng.random::<f32>() * bounds.y,
                ),
                size: rng.random_range(STAR_SIZE_MIN..STAR_SIZE_MAX),
                speed: rng.random_range(STAR_SPEED_MIN..STAR_SPEED_MAX),
            })
            .collect();
        Self { stars }
    }

    /// Advance every star; stars leaving the bottom re-enter at the top at a
    /// new random x
    pub fn update(&mut self, frames: f32, bounds: Vec2, rng: &mut impl Rng) {
        for star in &mut self.stars {
            star.pos.y += star.speed * frames;
            if star.pos.y > bounds.y {
                star.pos.y = 0.0;
                star.pos.x = rng.random::<f32>() * bounds.x;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_stars_fall() {
        let mut rng = Pcg32::seed_from_u64(3);
        let bounds = Vec2::new(800.0, 600.0);
        let mut field = Starfield::new(50, bounds, &mut rng);
        assert_eq!(field.stars.len(), 50);

        let before: Vec<f32> = field.stars.iter().map(|s| s.pos.y).collect();
        field.update(1.0, bounds, &mut rng);
        for (star, y) in field.stars.iter().zip(before) {
            assert!(star.pos.y > y || star.pos.y == 0.0);
        }
    }

    #[test]
    fn test_star_wraps_to_top() {
        let mut rng = Pcg32::seed_from_u64(3);
        let bounds = Vec2::new(800.0, 600.0);
        let mut field = Starfield {
            stars: vec![Star {
                pos: Vec2::new(100.0, 599.5),
                size: 1.0,
                speed: 2.0,
            }],
        };
        field.update(1.0, bounds, &mut rng);
        let star = &field.stars[0];
        assert_eq!(star.pos.y, 0.0);
        assert!(star.pos.x >= 0.0 && star.pos.x <= 800.0);
    }
}
