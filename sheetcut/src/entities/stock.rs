use serde::{Deserialize, Serialize};

use crate::geometry::primitives::Rect;

/// Kind of raw material. Pieces can only be cut from stock of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    #[default]
    Glass,
    Metal,
    Wood,
    Plastic,
    Fabric,
    Leather,
    Paper,
    Ceramic,
    Composite,
}

/// Inventory status of a stock sheet. Only [`StockStatus::Available`] sheets receive pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    #[default]
    Available,
    Reserved,
    InUse,
    Depleted,
}

/// A rectangular sheet of raw material, in which pieces can be cut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub id: String,
    pub width: f64,
    pub height: f64,
    /// Thickness of the sheet, informational only
    #[serde(default = "default_thickness")]
    pub thickness: f64,
    #[serde(default)]
    pub material: MaterialKind,
    /// Cost incurred when the sheet is used
    #[serde(default)]
    pub unit_cost: f64,
    #[serde(default)]
    pub status: StockStatus,
}

fn default_thickness() -> f64 {
    6.0
}

impl Stock {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Stock {
            id: id.into(),
            width,
            height,
            thickness: default_thickness(),
            material: MaterialKind::default(),
            unit_cost: 0.0,
            status: StockStatus::Available,
        }
    }

    pub fn with_material(mut self, material: MaterialKind) -> Self {
        self.material = material;
        self
    }

    pub fn with_unit_cost(mut self, unit_cost: f64) -> Self {
        self.unit_cost = unit_cost;
        self
    }

    pub fn with_status(mut self, status: StockStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// The sheet's extent, with its bottom-left corner at the origin
    pub fn bounds(&self) -> Rect {
        Rect::from_origin(0.0, 0.0, self.width, self.height)
    }

    pub fn is_available(&self) -> bool {
        self.status == StockStatus::Available
    }
}
