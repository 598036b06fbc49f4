use serde::{Deserialize, Serialize};

use crate::geometry::geo_traits::Transformable;

/// Geometric primitive representing a point
#[derive(Debug, Clone, PartialEq, Copy, Serialize, Deserialize)]
pub struct Point(pub f64, pub f64);

impl Point {
    pub fn distance(&self, other: &Point) -> f64 {
        self.sq_distance(other).sqrt()
    }

    pub fn sq_distance(&self, other: &Point) -> f64 {
        (self.0 - other.0).powi(2) + (self.1 - other.1).powi(2)
    }

    /// Rotates the point counter-clockwise around the origin by `angle` degrees.
    pub fn rotate(&self, angle: f64) -> Point {
        let (sin, cos) = angle.to_radians().sin_cos();
        Point(self.0 * cos - self.1 * sin, self.0 * sin + self.1 * cos)
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }
}

impl Transformable for Point {
    fn translate(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.0 += dx;
        self.1 += dy;
        self
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.0, p.1)
    }
}

impl From<(f64, f64)> for Point {
    fn from(p: (f64, f64)) -> Self {
        Point(p.0, p.1)
    }
}
