use serde::{Deserialize, Serialize};

use crate::config::Algorithm;
use crate::entities::{MaterialKind, Priority, StockStatus};
use crate::result::UnfulfilledReason;
use crate::search::Termination;

/// External representation of a [`Stock`](crate::entities::Stock).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtStock {
    /// Unique identifier of the stock sheet
    pub id: String,
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub thickness: Option<f64>,
    /// Glass if not specified
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub material: Option<MaterialKind>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub unit_cost: Option<f64>,
    /// Available if not specified
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status: Option<StockStatus>,
}

/// External representation of an [`Order`](crate::entities::Order).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtOrder {
    /// Unique identifier of the order
    pub id: String,
    pub shape: ExtShape,
    /// Number of identical pieces requested
    pub quantity: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub material: Option<MaterialKind>,
    /// Global rotation policy if not specified
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rotation_allowed: Option<bool>,
}

/// Shapes of pieces
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum ExtShape {
    Rectangle { width: f64, height: f64 },
    Circle { radius: f64 },
    /// Convex polygon, as a list of vertices
    Polygon(Vec<(f64, f64)>),
}

/// A complete cutting problem
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtInstance {
    /// The name of the instance
    pub name: String,
    pub stocks: Vec<ExtStock>,
    pub orders: Vec<ExtOrder>,
}

/// A piece cut from a stock sheet
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtPlacement {
    pub order_id: String,
    /// Which copy of the order this piece is
    pub copy_idx: usize,
    /// Bottom-left corner of the piece's bounding box on the sheet
    pub position: (f64, f64),
    /// Counter-clockwise rotation in degrees
    pub rotation: f64,
}

/// All pieces cut from a single stock sheet
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtStockLayout {
    pub stock_id: String,
    pub placements: Vec<ExtPlacement>,
    pub utilization: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtUnfulfilled {
    pub order_id: String,
    pub copy_idx: usize,
    pub reason: UnfulfilledReason,
}

/// External representation of a [`CuttingResult`](crate::result::CuttingResult).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtSolution {
    /// Layouts of the stock sheets that were used
    pub layouts: Vec<ExtStockLayout>,
    pub unfulfilled: Vec<ExtUnfulfilled>,
    pub efficiency: f64,
    pub waste_area: f64,
    pub total_cost: f64,
    pub algorithm: Algorithm,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub termination: Option<Termination>,
    pub run_time_sec: f64,
}
