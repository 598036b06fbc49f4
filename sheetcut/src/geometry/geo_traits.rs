use crate::geometry::primitives::{Point, Rect};
use crate::util::Tolerance;

/// Trait for types that can detect collisions between `Self` and `T`.
///
/// Two entities only collide when they interpenetrate by more than the [`Tolerance`].
/// Entities that merely touch, or overlap by less than the tolerance due to floating point arithmetic,
/// are not considered colliding.
pub trait CollidesWith<T> {
    fn collides_with(&self, other: &T, tol: Tolerance) -> bool;
}

/// Trait for types that can compute the minimum distance between `Self` and `T`.
pub trait DistanceTo<T> {
    /// Minimum distance between two primitives. Will be 0 in case of a collision.
    fn distance_to(&self, other: &T) -> f64 {
        self.sq_distance_to(other).sqrt()
    }

    /// Squared version of [DistanceTo::distance_to]
    fn sq_distance_to(&self, other: &T) -> f64;
}

/// Trait for types that can be moved around the plane.
pub trait Transformable: Clone {
    /// Translates `self` by `(dx, dy)`.
    fn translate(&mut self, dx: f64, dy: f64) -> &mut Self;
}

/// Trait for shared properties of geometric primitives.
pub trait Shape {
    /// Geometric center of the shape
    fn centroid(&self) -> Point;

    /// Area of the interior of the shape
    fn area(&self) -> f64;

    /// Bounding box of the shape
    fn bbox(&self) -> Rect;

    /// The distance between the two furthest points in the shape.
    fn diameter(&self) -> f64;
}
