//! Collision detection
//!
//! Every entity is treated as a circle: its center and its `size` as the
//! radius. Two bodies collide when their circles overlap strictly; touching
//! edges do not count.

use glam::Vec2;

/// Anything that takes part in collision checks
pub trait Body {
    fn center(&self) -> Vec2;
    fn radius(&self) -> f32;
}

/// Circle-circle overlap test
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    a_pos.distance(b_pos) < a_radius + b_radius
}

/// Check whether two bodies overlap
#[inline]
pub fn is_colliding<A: Body + ?Sized, B: Body + ?Sized>(a: &A, b: &B) -> bool {
    circles_overlap(a.center(), a.radius(), b.center(), b.radius())
}

/// Drop every element whose flag is set, preserving order
///
/// Collision passes mark entities while iterating and excise them
/// afterwards so no element is skipped or visited twice.
pub fn retain_unflagged<T>(items: &mut Vec<T>, removed: &[bool]) {
    debug_assert_eq!(items.len(), removed.len());
    let mut index = 0;
    items.retain(|_| {
        let keep = !removed.get(index).copied().unwrap_or(false);
        index += 1;
        keep
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Dot {
        pos: Vec2,
        r: f32,
    }

    impl Body for Dot {
        fn center(&self) -> Vec2 {
            self.pos
        }
        fn radius(&self) -> f32 {
            self.r
        }
    }

    #[test]
    fn test_overlapping_circles_collide() {
        let a = Dot {
            pos: Vec2::new(0.0, 0.0),
            r: 10.0,
        };
        let b = Dot {
            pos: Vec2::new(15.0, 0.0),
            r: 10.0,
        };
        assert!(is_colliding(&a, &b));
    }

    #[test]
    fn test_touching_circles_do_not_collide() {
        let a = Dot {
            pos: Vec2::new(0.0, 0.0),
            r: 10.0,
        };
        let b = Dot {
            pos: Vec2::new(20.0, 0.0),
            r: 10.0,
        };
        assert!(!is_colliding(&a, &b));
    }

    #[test]
    fn test_retain_unflagged() {
        let mut items = vec![1, 2, 3, 4, 5];
        retain_unflagged(&mut items, &[false, true, false, true, true]);
        assert_eq!(items, vec![1, 3]);
    }

    proptest! {
        #[test]
        fn collision_is_symmetric(
            ax in -1000.0f32..1000.0, ay in -1000.0f32..1000.0, ar in 0.0f32..50.0,
            bx in -1000.0f32..1000.0, by in -1000.0f32..1000.0, br in 0.0f32..50.0,
        ) {
            let a = Dot { pos: Vec2::new(ax, ay), r: ar };
            let b = Dot { pos: Vec2::new(bx, by), r: br };
            prop_assert_eq!(is_colliding(&a, &b), is_colliding(&b, &a));
        }
    }
}
