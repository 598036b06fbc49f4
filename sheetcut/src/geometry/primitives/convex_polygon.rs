use anyhow::{Result, bail, ensure};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::geometry::geo_traits::{CollidesWith, DistanceTo, Shape, Transformable};
use crate::geometry::primitives::{Circle, Edge, Point, Rect};
use crate::util::Tolerance;

/// Geometric primitive representing a convex polygon.
/// Points are stored counter-clockwise, without repeating the first point at the end.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvexPolygon {
    pub points: Vec<Point>,
}

impl ConvexPolygon {
    /// Creates a new convex polygon from a set of points.
    /// Consecutive duplicate points are removed and clockwise input is reversed.
    /// Fails when fewer than 3 distinct points remain, a coordinate is not finite, the area is zero
    /// or the polygon is not convex.
    pub fn try_new(points: Vec<Point>) -> Result<Self> {
        ensure!(
            points.iter().all(|p| p.is_finite()),
            "polygon has non-finite coordinates"
        );
        let mut points = points.into_iter().dedup().collect_vec();
        while points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        ensure!(
            points.len() >= 3,
            "polygon needs at least 3 distinct vertices, got {}",
            points.len()
        );

        let signed_area = signed_area(&points);
        ensure!(signed_area != 0.0, "polygon has zero area");
        if signed_area < 0.0 {
            points.reverse();
        }

        let n = points.len();
        for i in 0..n {
            let (a, b, c) = (points[i], points[(i + 1) % n], points[(i + 2) % n]);
            let cross = (b.0 - a.0) * (c.1 - b.1) - (b.1 - a.1) * (c.0 - b.0);
            if cross < -1e-9 * (1.0 + a.sq_distance(&b).max(b.sq_distance(&c))) {
                bail!("polygon is not convex at vertex {}", (i + 1) % n);
            }
        }

        Ok(ConvexPolygon { points })
    }

    /// Creates a polygon from points known to describe a convex shape, only fixing the orientation.
    pub(crate) fn from_convex_points(mut points: Vec<Point>) -> Self {
        if signed_area(&points) < 0.0 {
            points.reverse();
        }
        ConvexPolygon { points }
    }

    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    pub fn edge(&self, i: usize) -> Edge {
        let j = (i + 1) % self.n_points();
        Edge::new(self.points[i], self.points[j])
    }

    pub fn edge_iter(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.n_points()).map(move |i| self.edge(i))
    }

    /// Whether `point` lies inside or on the boundary of the polygon.
    pub fn contains_point(&self, point: &Point) -> bool {
        self.edge_iter().all(|e| e.side_of(point) >= 0.0)
    }

    /// Projects all points onto `axis`, returning the covered interval.
    fn project(&self, axis: (f64, f64)) -> (f64, f64) {
        self.points
            .iter()
            .map(|p| p.0 * axis.0 + p.1 * axis.1)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
                (min.min(v), max.max(v))
            })
    }

    /// Rotates the polygon counter-clockwise around the origin by `angle` degrees.
    pub fn rotate(&self, angle: f64) -> ConvexPolygon {
        ConvexPolygon {
            points: self.points.iter().map(|p| p.rotate(angle)).collect(),
        }
    }
}

fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a.0 * b.1 - b.0 * a.1
        })
        .sum::<f64>()
        / 2.0
}

impl Shape for ConvexPolygon {
    fn centroid(&self) -> Point {
        let area = self.area();
        let n = self.n_points();
        let (cx, cy) = (0..n).fold((0.0, 0.0), |(cx, cy), i| {
            let (a, b) = (self.points[i], self.points[(i + 1) % n]);
            let cross = a.0 * b.1 - b.0 * a.1;
            (cx + (a.0 + b.0) * cross, cy + (a.1 + b.1) * cross)
        });
        Point(cx / (6.0 * area), cy / (6.0 * area))
    }

    fn area(&self) -> f64 {
        signed_area(&self.points).abs()
    }

    fn bbox(&self) -> Rect {
        Rect::enclosing(self.points.iter().copied()).unwrap_or(Rect {
            x_min: 0.0,
            y_min: 0.0,
            x_max: 0.0,
            y_max: 0.0,
        })
    }

    fn diameter(&self) -> f64 {
        self.points
            .iter()
            .tuple_combinations()
            .map(|(a, b)| a.sq_distance(b))
            .fold(0.0, f64::max)
            .sqrt()
    }
}

impl Transformable for ConvexPolygon {
    fn translate(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.points.iter_mut().for_each(|p| {
            p.translate(dx, dy);
        });
        self
    }
}

impl From<Rect> for ConvexPolygon {
    fn from(r: Rect) -> Self {
        ConvexPolygon {
            points: r.corners().to_vec(),
        }
    }
}

impl CollidesWith<ConvexPolygon> for ConvexPolygon {
    /// Separating axis theorem: the polygons only collide when their projections overlap
    /// by more than the tolerance on every edge normal of both polygons.
    fn collides_with(&self, other: &ConvexPolygon, tol: Tolerance) -> bool {
        self.edge_iter()
            .chain(other.edge_iter())
            .map(|e| e.outward_normal())
            .all(|axis| {
                let (a_min, a_max) = self.project(axis);
                let (b_min, b_max) = other.project(axis);
                f64::min(a_max, b_max) - f64::max(a_min, b_min) > tol.value()
            })
    }
}

impl CollidesWith<Rect> for ConvexPolygon {
    fn collides_with(&self, rect: &Rect, tol: Tolerance) -> bool {
        self.collides_with(&ConvexPolygon::from(*rect), tol)
    }
}

impl CollidesWith<ConvexPolygon> for Rect {
    fn collides_with(&self, poly: &ConvexPolygon, tol: Tolerance) -> bool {
        poly.collides_with(self, tol)
    }
}

impl CollidesWith<Circle> for ConvexPolygon {
    fn collides_with(&self, circle: &Circle, tol: Tolerance) -> bool {
        if self.contains_point(&circle.center) {
            return true;
        }
        let distance = self
            .edge_iter()
            .map(|e| e.sq_distance_to(&circle.center))
            .fold(f64::INFINITY, f64::min)
            .sqrt();
        circle.radius - distance > tol.value()
    }
}

impl CollidesWith<ConvexPolygon> for Circle {
    fn collides_with(&self, poly: &ConvexPolygon, tol: Tolerance) -> bool {
        poly.collides_with(self, tol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(offset: f64) -> ConvexPolygon {
        let mut t =
            ConvexPolygon::try_new(vec![Point(0.0, 0.0), Point(10.0, 0.0), Point(0.0, 10.0)])
                .unwrap();
        t.translate(offset, offset);
        t
    }

    #[test]
    fn clockwise_input_is_reoriented() {
        let cw = vec![Point(0.0, 0.0), Point(0.0, 10.0), Point(10.0, 0.0)];
        let poly = ConvexPolygon::try_new(cw).unwrap();
        assert!(signed_area(&poly.points) > 0.0);
        assert_eq!(poly.area(), 50.0);
    }

    #[test]
    fn non_convex_and_degenerate_are_rejected() {
        let arrow = vec![
            Point(0.0, 0.0),
            Point(10.0, 5.0),
            Point(0.0, 10.0),
            Point(3.0, 5.0),
        ];
        assert!(ConvexPolygon::try_new(arrow).is_err());
        let collinear = vec![Point(0.0, 0.0), Point(5.0, 0.0), Point(10.0, 0.0)];
        assert!(ConvexPolygon::try_new(collinear).is_err());
        assert!(ConvexPolygon::try_new(vec![Point(0.0, 0.0), Point(1.0, 1.0)]).is_err());
    }

    #[test]
    fn sat_separates_triangles_sharing_a_diagonal() {
        let tol = Tolerance(1e-3);
        let lower = triangle(0.0);
        //the complementary triangle of the 10x10 square, touching along the hypotenuse
        let upper =
            ConvexPolygon::try_new(vec![Point(10.0, 0.0), Point(10.0, 10.0), Point(0.0, 10.0)])
                .unwrap();
        assert!(!lower.collides_with(&upper, tol));
        assert!(lower.collides_with(&triangle(2.0), tol));
        assert!(!lower.collides_with(&triangle(6.0), tol));
    }

    #[test]
    fn circle_against_polygon_edge() {
        let tol = Tolerance(1e-3);
        let tri = triangle(0.0);
        assert!(!tri.collides_with(&Circle::new(Point(10.0, 10.0), 7.0), tol));
        assert!(tri.collides_with(&Circle::new(Point(10.0, 10.0), 7.2), tol));
        assert!(tri.collides_with(&Circle::new(Point(2.0, 2.0), 0.5), tol));
    }
}
