// src/mechanics/rotation.rs
use crate::geometry::Block;

/// Fraction of one tick of rotation kept as slack when testing alignment.
pub const ALIGNMENT_EPSILON: f64 = 1e-4;

/// Maps any angle into `[0, 360)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Shortest distance around the circle between two angles, `[0, 180]`.
pub fn arc_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).abs() % 360.0;
    if d > 180.0 {
        360.0 - d
    } else {
        d
    }
}

/// True when `target` is less than one tick of rotation away from `angle`.
///
/// Stepping the platter in increments of `speed` visits exactly one angle in
/// each window of that size, so a boundary is detected on exactly one tick.
pub fn is_aligned(angle: f64, target: f64, speed: f64) -> bool {
    arc_distance(angle, target) < speed * (1.0 - ALIGNMENT_EPSILON)
}

/// The single platter shared by every request.
#[derive(Debug, Clone)]
pub struct RotationController {
    angle: f64,
    speed: f64,
}

impl RotationController {
    pub fn new(speed: f64) -> Self {
        RotationController { angle: 0.0, speed }
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Advances the platter by one tick.
    pub fn advance(&mut self) {
        self.angle += self.speed;
        // subtract rather than take a remainder so integral speeds stay exact
        while self.angle >= 360.0 {
            self.angle -= 360.0;
        }
    }

    /// Angle at which the sector holding `block` begins.
    pub fn sector_start(block: &Block, half_width: f64) -> f64 {
        normalize_angle(block.angle - half_width)
    }

    /// Angle at which the sector holding `block` ends.
    pub fn sector_end(block: &Block, half_width: f64) -> f64 {
        normalize_angle(block.angle + half_width)
    }

    pub fn done_with_rotation(&self, block: &Block, half_width: f64) -> bool {
        is_aligned(self.angle, Self::sector_start(block, half_width), self.speed)
    }

    pub fn done_with_transfer(&self, block: &Block, half_width: f64) -> bool {
        is_aligned(self.angle, Self::sector_end(block, half_width), self.speed)
    }
}
