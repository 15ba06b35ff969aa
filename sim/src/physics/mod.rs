//! Physics provider seam and the arcade-style implementation used by the world.
//!
//! Bodies are circles. The provider supplies:
//! - World-bound clamping
//! - Collide-and-stop resolution against solid circles (with axis sliding)
//! - Water overlap tests

pub mod geometry;

pub use geometry::{circles_overlap, shortest_angle_between, within_arc, Circle, Vec2};

use log::trace;

/// Rectangular world extent, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Clamp a circle's center so the whole circle stays inside the bounds.
    pub fn clamp_circle(&self, center: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            center.x.max(radius).min(self.width - radius),
            center.y.max(radius).min(self.height - radius),
        )
    }
}

/// Collision and overlap services consumed by the simulation
pub trait PhysicsProvider {
    /// Move `body` toward `target` and return where it ends up.
    fn resolve_motion(&self, body: Circle, target: Vec2, solids: &[Circle]) -> Vec2;

    /// Whether `body` overlaps any water.
    fn in_water(&self, body: Circle) -> bool;
}

/// Circle-vs-circle physics with static water pools
#[derive(Debug, Clone)]
pub struct ArcadePhysics {
    bounds: Bounds,
    water: Vec<Circle>,
}

impl ArcadePhysics {
    pub fn with_water(bounds: Bounds, water: Vec<Circle>) -> Self {
        Self { bounds, water }
    }

    /// A move is blocked when it ends overlapping a solid it is getting closer to.
    /// Bodies that already overlap may still separate.
    fn blocked(body: Circle, to: Vec2, solids: &[Circle]) -> bool {
        solids.iter().any(|solid| {
            circles_overlap(to, body.radius, solid)
                && to.distance_squared_to(solid.center) < body.center.distance_squared_to(solid.center)
        })
    }
}

impl PhysicsProvider for ArcadePhysics {
    fn resolve_motion(&self, body: Circle, target: Vec2, solids: &[Circle]) -> Vec2 {
        let target = self.bounds.clamp_circle(target, body.radius);
        if !Self::blocked(body, target, solids) {
            return target;
        }

        // Slide along whichever axis is still free
        let along_x = self.bounds.clamp_circle(Vec2::new(target.x, body.center.y), body.radius);
        if !Self::blocked(body, along_x, solids) {
            return along_x;
        }
        let along_y = self.bounds.clamp_circle(Vec2::new(body.center.x, target.y), body.radius);
        if !Self::blocked(body, along_y, solids) {
            return along_y;
        }

        trace!(
            "[COLLISION] body at ({:.1}, {:.1}) stopped moving toward ({:.1}, {:.1})",
            body.center.x, body.center.y, target.x, target.y
        );
        body.center
    }

    fn in_water(&self, body: Circle) -> bool {
        self.water.iter().any(|pool| body.overlaps(pool))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physics() -> ArcadePhysics {
        ArcadePhysics::with_water(Bounds::new(1000.0, 1000.0), Vec::new())
    }

    #[test]
    fn test_free_motion() {
        let body = Circle::new(100.0, 100.0, 20.0);
        let end = physics().resolve_motion(body, Vec2::new(110.0, 100.0), &[]);
        assert_eq!(end, Vec2::new(110.0, 100.0));
    }

    #[test]
    fn test_world_bounds_clamp() {
        let body = Circle::new(25.0, 500.0, 20.0);
        let end = physics().resolve_motion(body, Vec2::new(5.0, 500.0), &[]);
        assert_eq!(end, Vec2::new(20.0, 500.0));
    }

    #[test]
    fn test_stops_at_solid() {
        let body = Circle::new(100.0, 100.0, 20.0);
        let tree = Circle::new(134.0, 100.0, 12.5);
        let end = physics().resolve_motion(body, Vec2::new(103.0, 100.0), &[tree]);
        assert_eq!(end, body.center);
    }

    #[test]
    fn test_slides_along_free_axis() {
        let body = Circle::new(100.0, 100.0, 20.0);
        let tree = Circle::new(134.0, 100.0, 12.5);
        let end = physics().resolve_motion(body, Vec2::new(103.0, 103.0), &[tree]);
        assert_eq!(end, Vec2::new(100.0, 103.0));
    }

    #[test]
    fn test_overlapping_bodies_can_separate() {
        let body = Circle::new(100.0, 100.0, 20.0);
        let other = Circle::new(110.0, 100.0, 20.0);
        let end = physics().resolve_motion(body, Vec2::new(95.0, 100.0), &[other]);
        assert_eq!(end, Vec2::new(95.0, 100.0));
    }

    #[test]
    fn test_water_overlap() {
        let physics = ArcadePhysics::with_water(Bounds::new(1000.0, 1000.0), vec![Circle::new(500.0, 500.0, 90.0)]);
        assert!(physics.in_water(Circle::new(600.0, 500.0, 20.0)));
        assert!(!physics.in_water(Circle::new(620.0, 500.0, 20.0)));
    }
}
