use serde::{Deserialize, Serialize};

use crate::entities::DemandUnit;
use crate::geometry::geo_traits::Shape;
use crate::geometry::primitives::Rect;
use crate::geometry::{PieceShape, PlacedGeometry};

/// A demand unit bound to a position on a stock sheet.
/// Only created by the placers and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedShape {
    unit: DemandUnit,
    stock_idx: usize,
    x: f64,
    y: f64,
    /// Rotation in degrees, counter-clockwise
    rotation: f64,
    /// Rotated shape in local coordinates
    shape: PieceShape,
    /// Rotated shape in the coordinate system of the stock sheet
    geometry: PlacedGeometry,
}

impl PlacedShape {
    pub(crate) fn new(
        unit: DemandUnit,
        stock_idx: usize,
        x: f64,
        y: f64,
        rotation: f64,
        shape: PieceShape,
    ) -> Self {
        let geometry = shape.place(x, y);
        PlacedShape {
            unit,
            stock_idx,
            x,
            y,
            rotation,
            shape,
            geometry,
        }
    }

    pub fn unit(&self) -> DemandUnit {
        self.unit
    }

    pub fn order_idx(&self) -> usize {
        self.unit.order_idx
    }

    pub fn stock_idx(&self) -> usize {
        self.stock_idx
    }

    /// Bottom-left corner of the rotated bounding box
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn shape(&self) -> &PieceShape {
        &self.shape
    }

    pub fn geometry(&self) -> &PlacedGeometry {
        &self.geometry
    }

    pub fn bbox(&self) -> Rect {
        self.geometry.bbox()
    }

    pub fn area(&self) -> f64 {
        self.geometry.area()
    }
}
