use serde::{Deserialize, Serialize};

use crate::geometry::geo_traits::DistanceTo;
use crate::geometry::primitives::Point;

/// Geometric primitive representing a line segment
#[derive(Clone, Debug, PartialEq, Copy, Serialize, Deserialize)]
pub struct Edge {
    pub start: Point,
    pub end: Point,
}

impl Edge {
    pub fn new(start: Point, end: Point) -> Self {
        debug_assert!(start != end, "degenerate edge: {start:?}");
        Edge { start, end }
    }

    /// Unit normal pointing to the right of the edge direction.
    /// For a counter-clockwise polygon, this is the outward normal.
    pub fn outward_normal(&self) -> (f64, f64) {
        let dx = self.end.0 - self.start.0;
        let dy = self.end.1 - self.start.1;
        let len = (dx * dx + dy * dy).sqrt();
        (dy / len, -dx / len)
    }

    /// Returns the point on the edge closest to `point`.
    pub fn closest_point_on_edge(&self, point: &Point) -> Point {
        let Point(sx, sy) = self.start;
        let Point(ex, ey) = self.end;
        let (dx, dy) = (ex - sx, ey - sy);
        let sq_len = dx * dx + dy * dy;
        if sq_len == 0.0 {
            return self.start;
        }
        let t = (((point.0 - sx) * dx + (point.1 - sy) * dy) / sq_len).clamp(0.0, 1.0);
        Point(sx + t * dx, sy + t * dy)
    }

    /// Signed 2D cross product of the edge direction and the vector to `point`.
    /// Positive when `point` lies left of the edge.
    pub fn side_of(&self, point: &Point) -> f64 {
        let Point(sx, sy) = self.start;
        let Point(ex, ey) = self.end;
        (ex - sx) * (point.1 - sy) - (ey - sy) * (point.0 - sx)
    }
}

impl DistanceTo<Point> for Edge {
    #[inline(always)]
    fn sq_distance_to(&self, point: &Point) -> f64 {
        self.closest_point_on_edge(point).sq_distance(point)
    }
}
