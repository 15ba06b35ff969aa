//! 2D vectors, angles and circle overlap tests.

use std::f32::consts::{PI, TAU};

/// Slack allowed on arc boundaries so that a target sitting exactly on the
/// edge of an arc still counts as inside it.
pub const ARC_TOLERANCE: f32 = 1e-4;

/// A 2D position or direction in world units
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_array(pos: [f32; 2]) -> Self {
        Self { x: pos[0], y: pos[1] }
    }

    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// Unit vector pointing along `angle` (radians).
    pub fn from_angle(angle: f32) -> Self {
        Self { x: angle.cos(), y: angle.sin() }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len > 0.0001 {
            Self { x: self.x / len, y: self.y / len }
        } else {
            Self::ZERO
        }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn dot(&self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn distance_to(&self, other: Vec2) -> f32 {
        self.distance_squared_to(other).sqrt()
    }

    pub fn distance_squared_to(&self, other: Vec2) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Angle (radians) of the direction from `self` to `other`.
    pub fn angle_to(&self, other: Vec2) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2 { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2 { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2 { x: self.x * rhs, y: self.y * rhs }
    }
}

/// Signed smallest rotation taking `from` to `to`, in [-PI, PI].
pub fn shortest_angle_between(from: f32, to: f32) -> f32 {
    let diff = (to - from).rem_euclid(TAU);
    if diff > PI {
        diff - TAU
    } else {
        diff
    }
}

/// Whether `direction` lies within `half_arc` radians of `aim`, boundary inclusive.
pub fn within_arc(aim: f32, direction: f32, half_arc: f32) -> bool {
    shortest_angle_between(aim, direction).abs() <= half_arc + ARC_TOLERANCE
}

/// Circular body or obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self { center: Vec2::new(x, y), radius }
    }

    pub fn at(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn overlaps(&self, other: &Circle) -> bool {
        circles_overlap(self.center, self.radius, other)
    }
}

/// Check if a circle (at `pos` with `radius`) overlaps another circle
pub fn circles_overlap(pos: Vec2, radius: f32, other: &Circle) -> bool {
    let reach = radius + other.radius;
    pos.distance_squared_to(other.center) < reach * reach
}
