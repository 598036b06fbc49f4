use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use crate::geometry::geo_traits::{CollidesWith, Shape, Transformable};
use crate::geometry::primitives::{Circle, ConvexPolygon, Point, Rect};
use crate::util::{FPA, Tolerance};

/// Shape of a piece requested by an order.
///
/// Shapes are expressed in local coordinates: the bottom-left corner of their bounding box
/// lies at the origin. Placing a shape at `(x, y)` moves that corner to `(x, y)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PieceShape {
    Rectangle { width: f64, height: f64 },
    Circle { radius: f64 },
    /// Convex polygon
    Polygon { vertices: Vec<Point> },
}

impl PieceShape {
    pub fn rectangle(width: f64, height: f64) -> Self {
        PieceShape::Rectangle { width, height }
    }

    pub fn circle(radius: f64) -> Self {
        PieceShape::Circle { radius }
    }

    /// Convex polygon, translated so its bounding box starts at the origin.
    pub fn polygon(vertices: Vec<Point>) -> Self {
        PieceShape::Polygon {
            vertices: to_origin(vertices),
        }
    }

    /// Validates the shape and returns its canonical form
    /// (polygons counter-clockwise and anchored at the origin).
    pub fn normalized(&self) -> Result<PieceShape> {
        match self {
            PieceShape::Rectangle { width, height } => {
                ensure!(
                    width.is_finite() && height.is_finite(),
                    "rectangle has non-finite dimensions {width}x{height}"
                );
                ensure!(
                    *width > 0.0 && *height > 0.0,
                    "rectangle has non-positive area ({width}x{height})"
                );
                Ok(self.clone())
            }
            PieceShape::Circle { radius } => {
                ensure!(
                    radius.is_finite() && *radius > 0.0,
                    "circle has invalid radius {radius}"
                );
                Ok(self.clone())
            }
            PieceShape::Polygon { vertices } => {
                let poly = ConvexPolygon::try_new(vertices.clone())?;
                Ok(PieceShape::polygon(poly.points))
            }
        }
    }

    pub fn area(&self) -> f64 {
        match self {
            PieceShape::Rectangle { width, height } => width * height,
            PieceShape::Circle { radius } => std::f64::consts::PI * radius * radius,
            PieceShape::Polygon { vertices } => {
                ConvexPolygon::from_convex_points(vertices.clone()).area()
            }
        }
    }

    /// Bounding box in local coordinates
    pub fn bbox(&self) -> Rect {
        let (w, h) = self.dimensions();
        Rect::from_origin(0.0, 0.0, w, h)
    }

    /// Width and height of the bounding box
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PieceShape::Rectangle { width, height } => (*width, *height),
            PieceShape::Circle { radius } => (2.0 * radius, 2.0 * radius),
            PieceShape::Polygon { vertices } => Rect::enclosing(vertices.iter().copied())
                .map(|r| (r.x_max, r.y_max))
                .unwrap_or((0.0, 0.0)),
        }
    }

    /// Returns the shape rotated counter-clockwise by `angle` degrees, re-anchored at the origin.
    ///
    /// Rectangles stay rectangles for multiples of 90°; any other angle turns them into a polygon.
    /// Circles are invariant.
    pub fn rotate(&self, angle: f64) -> PieceShape {
        let angle = angle.rem_euclid(360.0);
        match self {
            PieceShape::Circle { .. } => self.clone(),
            PieceShape::Rectangle { width, height } => {
                let half_turns = FPA(angle.rem_euclid(180.0));
                if half_turns == FPA(0.0) || FPA(angle) == FPA(360.0) {
                    self.clone()
                } else if half_turns == FPA(90.0) {
                    PieceShape::rectangle(*height, *width)
                } else {
                    let corners = Rect::from_origin(0.0, 0.0, *width, *height).corners();
                    PieceShape::polygon(corners.iter().map(|c| c.rotate(angle)).collect())
                }
            }
            PieceShape::Polygon { vertices } => {
                PieceShape::polygon(vertices.iter().map(|v| v.rotate(angle)).collect())
            }
        }
    }

    /// Materializes the shape in world coordinates, with its bounding box starting at `(x, y)`.
    pub fn place(&self, x: f64, y: f64) -> PlacedGeometry {
        match self {
            PieceShape::Rectangle { width, height } => {
                PlacedGeometry::Rectangle(Rect::from_origin(x, y, *width, *height))
            }
            PieceShape::Circle { radius } => {
                PlacedGeometry::Circle(Circle::new(Point(x + radius, y + radius), *radius))
            }
            PieceShape::Polygon { vertices } => {
                let mut poly = ConvexPolygon::from_convex_points(vertices.clone());
                poly.translate(x, y);
                PlacedGeometry::Polygon(poly)
            }
        }
    }

    pub fn is_square(&self) -> bool {
        match self {
            PieceShape::Rectangle { width, height } => FPA(*width) == FPA(*height),
            _ => false,
        }
    }
}

fn to_origin(vertices: Vec<Point>) -> Vec<Point> {
    match Rect::enclosing(vertices.iter().copied()) {
        Some(bbox) => vertices
            .into_iter()
            .map(|p| Point(p.0 - bbox.x_min, p.1 - bbox.y_min))
            .collect(),
        None => vertices,
    }
}

/// A [`PieceShape`] materialized in the coordinate system of a stock sheet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PlacedGeometry {
    Rectangle(Rect),
    Circle(Circle),
    Polygon(ConvexPolygon),
}

impl Shape for PlacedGeometry {
    fn centroid(&self) -> Point {
        match self {
            PlacedGeometry::Rectangle(r) => r.centroid(),
            PlacedGeometry::Circle(c) => c.centroid(),
            PlacedGeometry::Polygon(p) => p.centroid(),
        }
    }

    fn area(&self) -> f64 {
        match self {
            PlacedGeometry::Rectangle(r) => r.area(),
            PlacedGeometry::Circle(c) => c.area(),
            PlacedGeometry::Polygon(p) => p.area(),
        }
    }

    fn bbox(&self) -> Rect {
        match self {
            PlacedGeometry::Rectangle(r) => *r,
            PlacedGeometry::Circle(c) => c.bbox(),
            PlacedGeometry::Polygon(p) => p.bbox(),
        }
    }

    fn diameter(&self) -> f64 {
        match self {
            PlacedGeometry::Rectangle(r) => r.diameter(),
            PlacedGeometry::Circle(c) => c.diameter(),
            PlacedGeometry::Polygon(p) => p.diameter(),
        }
    }
}

impl CollidesWith<PlacedGeometry> for PlacedGeometry {
    fn collides_with(&self, other: &PlacedGeometry, tol: Tolerance) -> bool {
        use PlacedGeometry as PG;
        match (self, other) {
            (PG::Rectangle(a), PG::Rectangle(b)) => a.collides_with(b, tol),
            (PG::Rectangle(a), PG::Circle(b)) => a.collides_with(b, tol),
            (PG::Rectangle(a), PG::Polygon(b)) => a.collides_with(b, tol),
            (PG::Circle(a), PG::Rectangle(b)) => a.collides_with(b, tol),
            (PG::Circle(a), PG::Circle(b)) => a.collides_with(b, tol),
            (PG::Circle(a), PG::Polygon(b)) => a.collides_with(b, tol),
            (PG::Polygon(a), PG::Rectangle(b)) => a.collides_with(b, tol),
            (PG::Polygon(a), PG::Circle(b)) => a.collides_with(b, tol),
            (PG::Polygon(a), PG::Polygon(b)) => a.collides_with(b, tol),
        }
    }
}
