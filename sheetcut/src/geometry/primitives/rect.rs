use anyhow::Result;
use anyhow::ensure;
use serde::{Deserialize, Serialize};

use crate::geometry::geo_traits::{CollidesWith, DistanceTo, Shape, Transformable};
use crate::geometry::primitives::{Edge, Point};
use crate::util::Tolerance;

///Axis-aligned rectangle
#[derive(Clone, Debug, PartialEq, Copy, Serialize, Deserialize)]
pub struct Rect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Rect {
    pub fn try_new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<Self> {
        ensure!(
            x_min < x_max && y_min < y_max,
            "invalid rectangle, x_min: {x_min}, x_max: {x_max}, y_min: {y_min}, y_max: {y_max}"
        );
        Ok(Rect {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    /// Rectangle with its bottom-left corner at `(x, y)`.
    pub fn from_origin(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x_min: x,
            y_min: y,
            x_max: x + width,
            y_max: y + height,
        }
    }

    /// Whether `other` lies inside `self`, allowing `other` to stick out by at most the tolerance.
    /// Degenerate (zero-thickness) rectangles are contained as long as their extent fits.
    pub fn surrounds(&self, other: &Rect, tol: Tolerance) -> bool {
        tol.le(self.x_min, other.x_min)
            && tol.le(self.y_min, other.y_min)
            && tol.le(other.x_max, self.x_max)
            && tol.le(other.y_max, self.y_max)
    }

    /// Returns the four corners of `self`, counter-clockwise starting from the bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point(self.x_min, self.y_min),
            Point(self.x_max, self.y_min),
            Point(self.x_max, self.y_max),
            Point(self.x_min, self.y_max),
        ]
    }

    /// Returns the four edges that make up `self`, in the same order as [Rect::corners].
    pub fn edges(&self) -> [Edge; 4] {
        let c = self.corners();
        [
            Edge::new(c[0], c[1]),
            Edge::new(c[1], c[2]),
            Edge::new(c[2], c[3]),
            Edge::new(c[3], c[0]),
        ]
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Returns the smallest rectangle that contains both `a` and `b`.
    pub fn bounding_rect(a: Rect, b: Rect) -> Rect {
        Rect {
            x_min: f64::min(a.x_min, b.x_min),
            y_min: f64::min(a.y_min, b.y_min),
            x_max: f64::max(a.x_max, b.x_max),
            y_max: f64::max(a.y_max, b.y_max),
        }
    }

    /// Smallest rectangle containing all `points`, `None` if there are none.
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
        points.into_iter().fold(None, |acc, Point(x, y)| {
            let p = Rect {
                x_min: x,
                y_min: y,
                x_max: x,
                y_max: y,
            };
            Some(match acc {
                None => p,
                Some(r) => Rect::bounding_rect(r, p),
            })
        })
    }

    /// Whether `point` lies inside or on the boundary of `self`.
    pub fn contains_point(&self, point: &Point) -> bool {
        let Point(x, y) = *point;
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }
}

impl Shape for Rect {
    fn centroid(&self) -> Point {
        Point(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    fn area(&self) -> f64 {
        (self.x_max - self.x_min) * (self.y_max - self.y_min)
    }

    fn bbox(&self) -> Rect {
        *self
    }

    fn diameter(&self) -> f64 {
        let dx = self.x_max - self.x_min;
        let dy = self.y_max - self.y_min;
        (dx.powi(2) + dy.powi(2)).sqrt()
    }
}

impl Transformable for Rect {
    fn translate(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.x_min += dx;
        self.x_max += dx;
        self.y_min += dy;
        self.y_max += dy;
        self
    }
}

impl CollidesWith<Rect> for Rect {
    #[inline(always)]
    fn collides_with(&self, other: &Rect, tol: Tolerance) -> bool {
        //penetration depth along both axes must exceed the tolerance
        let x_overlap = f64::min(self.x_max, other.x_max) - f64::max(self.x_min, other.x_min);
        let y_overlap = f64::min(self.y_max, other.y_max) - f64::max(self.y_min, other.y_min);
        x_overlap > tol.value() && y_overlap > tol.value()
    }
}

impl DistanceTo<Point> for Rect {
    #[inline(always)]
    fn sq_distance_to(&self, point: &Point) -> f64 {
        let Point(x, y) = *point;
        let mut distance: f64 = 0.0;
        if x < self.x_min {
            distance += (x - self.x_min).powi(2);
        } else if x > self.x_max {
            distance += (x - self.x_max).powi(2);
        }
        if y < self.y_min {
            distance += (y - self.y_min).powi(2);
        } else if y > self.y_max {
            distance += (y - self.y_max).powi(2);
        }
        distance
    }
}
