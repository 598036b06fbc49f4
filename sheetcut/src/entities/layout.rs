use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::entities::PlacedShape;
use crate::geometry::PlacedGeometry;
use crate::geometry::collision::geometries_overlap;
use crate::geometry::primitives::Rect;
use crate::util::Tolerance;

/// Per-run working state of a single stock sheet: the shapes placed on it so far.
#[derive(Debug, Clone)]
pub struct Layout {
    stock_idx: usize,
    placed: Vec<PlacedShape>,
    placed_area: f64,
}

impl Layout {
    pub fn new(stock_idx: usize) -> Self {
        Layout {
            stock_idx,
            placed: vec![],
            placed_area: 0.0,
        }
    }

    pub fn stock_idx(&self) -> usize {
        self.stock_idx
    }

    pub fn placed_shapes(&self) -> &[PlacedShape] {
        &self.placed
    }

    pub fn placed_area(&self) -> f64 {
        self.placed_area
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Whether `geometry` can be added without overlapping any shape already placed.
    pub fn is_free(&self, geometry: &PlacedGeometry, tol: Tolerance) -> bool {
        self.placed
            .iter()
            .all(|p| !geometries_overlap(p.geometry(), geometry, tol))
    }

    pub fn place(&mut self, placed_shape: PlacedShape) {
        debug_assert_eq!(placed_shape.stock_idx(), self.stock_idx);
        self.placed_area += placed_shape.area();
        self.placed.push(placed_shape);
    }

    pub fn bboxes(&self) -> impl Iterator<Item = Rect> + '_ {
        self.placed.iter().map(|p| p.bbox())
    }

    /// Candidate positions in raster order (y ascending, then x ascending), built from the sheet origin
    /// and the right and top edges of every bounding box already placed.
    pub fn raster_positions(&self, tol: Tolerance) -> Vec<(f64, f64)> {
        let xs = event_coordinates(self.bboxes().map(|b| b.x_max), tol);
        let ys = event_coordinates(self.bboxes().map(|b| b.y_max), tol);
        ys.iter()
            .flat_map(|&y| xs.iter().map(move |&x| (x, y)))
            .collect()
    }

    /// Anchor points for bottom-left placement: the sheet origin, plus the bottom-right and top-left
    /// corners of every bounding box already placed.
    pub fn anchors(&self) -> Vec<(f64, f64)> {
        std::iter::once((0.0, 0.0))
            .chain(
                self.bboxes()
                    .flat_map(|b| [(b.x_max, b.y_min), (b.x_min, b.y_max)]),
            )
            .collect()
    }
}

/// `0` plus all given coordinates, sorted and with near-duplicates removed.
fn event_coordinates(coords: impl Iterator<Item = f64>, tol: Tolerance) -> Vec<f64> {
    std::iter::once(0.0)
        .chain(coords)
        .sorted_by_key(|&c| OrderedFloat(c))
        .dedup_by(|a, b| tol.eq(*a, *b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::DemandUnit;
    use crate::geometry::PieceShape;

    fn unit(uid: usize) -> DemandUnit {
        DemandUnit {
            uid,
            order_idx: 0,
            copy_idx: uid,
        }
    }

    #[test]
    fn raster_positions_are_y_major() {
        let mut layout = Layout::new(0);
        let square = PieceShape::rectangle(10.0, 10.0);
        layout.place(PlacedShape::new(unit(0), 0, 0.0, 0.0, 0.0, square.clone()));
        layout.place(PlacedShape::new(unit(1), 0, 10.0, 0.0, 0.0, square));
        let positions = layout.raster_positions(Tolerance(1e-3));
        assert_eq!(
            positions,
            vec![
                (0.0, 0.0),
                (10.0, 0.0),
                (20.0, 0.0),
                (0.0, 10.0),
                (10.0, 10.0),
                (20.0, 10.0)
            ]
        );
        assert_eq!(layout.placed_area(), 200.0);
    }

    #[test]
    fn free_space_allows_touching() {
        let tol = Tolerance(1e-3);
        let mut layout = Layout::new(0);
        let square = PieceShape::rectangle(10.0, 10.0);
        layout.place(PlacedShape::new(unit(0), 0, 0.0, 0.0, 0.0, square.clone()));
        assert!(layout.is_free(&square.place(10.0, 0.0), tol));
        assert!(!layout.is_free(&square.place(5.0, 5.0), tol));
    }
}
