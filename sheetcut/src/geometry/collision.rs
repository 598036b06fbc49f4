use crate::entities::{PlacedShape, Stock};
use crate::geometry::PlacedGeometry;
use crate::geometry::geo_traits::{CollidesWith, Shape};
use crate::geometry::piece_shape::PieceShape;
use crate::geometry::primitives::Rect;
use crate::util::Tolerance;

/// Whether two placed shapes interpenetrate by more than the tolerance.
/// Shapes on different stock sheets never overlap.
pub fn overlaps(a: &PlacedShape, b: &PlacedShape, tol: Tolerance) -> bool {
    a.stock_idx() == b.stock_idx() && geometries_overlap(a.geometry(), b.geometry(), tol)
}

/// Conservative bounding box test first, the exact test decides.
#[inline]
pub fn geometries_overlap(a: &PlacedGeometry, b: &PlacedGeometry, tol: Tolerance) -> bool {
    if !a.bbox().collides_with(&b.bbox(), tol) {
        return false;
    }
    a.collides_with(b, tol)
}

/// Whether `shape`, rotated by `rotation` degrees and with its bounding box starting at `(x, y)`,
/// lies entirely within the bounds of `stock`.
pub fn fits_within(
    shape: &PieceShape,
    stock: &Stock,
    x: f64,
    y: f64,
    rotation: f64,
    tol: Tolerance,
) -> bool {
    let (w, h) = shape.rotate(rotation).dimensions();
    bbox_within(&Rect::from_origin(x, y, w, h), &stock.bounds(), tol)
}

/// Whether `inner` is contained in `outer`, within tolerance.
/// Unlike the collision test, this holds for boxes thinner than the tolerance.
#[inline]
pub fn bbox_within(inner: &Rect, outer: &Rect, tol: Tolerance) -> bool {
    outer.surrounds(inner, tol)
}
