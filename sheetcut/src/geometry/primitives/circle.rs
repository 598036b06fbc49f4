use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::geometry::geo_traits::{CollidesWith, DistanceTo, Shape, Transformable};
use crate::geometry::primitives::{Point, Rect};
use crate::util::Tolerance;

/// Geometric primitive representing a circle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        debug_assert!(
            radius.is_finite() && radius > 0.0,
            "invalid circle radius: {radius}"
        );
        debug_assert!(center.is_finite(), "invalid circle center: {center:?}");

        Self { center, radius }
    }
}

impl Shape for Circle {
    fn centroid(&self) -> Point {
        self.center
    }

    fn area(&self) -> f64 {
        PI * self.radius.powi(2)
    }

    fn bbox(&self) -> Rect {
        let (r, Point(x, y)) = (self.radius, self.center);
        Rect {
            x_min: x - r,
            y_min: y - r,
            x_max: x + r,
            y_max: y + r,
        }
    }

    fn diameter(&self) -> f64 {
        self.radius * 2.0
    }
}

impl Transformable for Circle {
    fn translate(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.center.translate(dx, dy);
        self
    }
}

impl CollidesWith<Circle> for Circle {
    fn collides_with(&self, other: &Circle, tol: Tolerance) -> bool {
        let penetration = self.radius + other.radius - self.center.distance(&other.center);
        penetration > tol.value()
    }
}

impl CollidesWith<Rect> for Circle {
    fn collides_with(&self, rect: &Rect, tol: Tolerance) -> bool {
        match rect.contains_point(&self.center) {
            true => true,
            false => self.radius - rect.distance_to(&self.center) > tol.value(),
        }
    }
}

impl CollidesWith<Circle> for Rect {
    fn collides_with(&self, circle: &Circle, tol: Tolerance) -> bool {
        circle.collides_with(self, tol)
    }
}
