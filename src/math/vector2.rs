//! 2D coordinate value type.
//!
//! [`Vector2`] is `Copy`, so every owner holds its own value; handing a
//! position to another system hands over a copy, never an alias.

use std::ops::{Add, Mul, Sub};

/// A 2D vector in engine (canvas pixel) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    /// The zero vector.
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };
    /// Unit scale.
    pub const ONE: Vector2 = Vector2 { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Multiply component-wise in place.
    pub fn multiply(&mut self, other: Vector2) {
        self.x *= other.x;
        self.y *= other.y;
    }

    /// Euclidean length.
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Return this vector rotated by `angle_degrees` around the origin.
    pub fn rotated(self, angle_degrees: f32) -> Vector2 {
        let rad = angle_degrees.to_radians();
        let (sin, cos) = rad.sin_cos();
        Vector2 {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Vector2;

    fn mul(self, rhs: f32) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}
