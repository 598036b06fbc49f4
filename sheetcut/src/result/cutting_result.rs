use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Algorithm;
use crate::entities::{DemandUnit, PlacedShape};
use crate::search::{SearchStats, Termination};

/// Why a demand unit was not placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnfulfilledReason {
    /// The piece does not fit on any available stock sheet of its material, in any allowed orientation
    InfeasibleInput,
    /// The piece fits on an empty sheet, but no space was left for it
    NoSpace,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnfulfilledUnit {
    pub unit: DemandUnit,
    pub order_id: String,
    pub reason: UnfulfilledReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStatus {
    Fulfilled,
    PartiallyFulfilled,
    Unfulfilled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderFulfillment {
    pub order_id: String,
    pub requested: usize,
    pub placed: usize,
    pub status: FulfillmentStatus,
}

/// Usage of a single stock sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockUtilization {
    pub stock_id: String,
    pub stock_idx: usize,
    /// Whether at least one piece is cut from this sheet
    pub used: bool,
    pub n_placed: usize,
    pub placed_area: f64,
    pub stock_area: f64,
    /// Placed area over the sheet's area
    pub utilization: f64,
    /// Unused area of the sheet, zero for unused sheets
    pub waste_area: f64,
    /// Cost of the sheet, zero for unused sheets
    pub cost: f64,
}

/// Whether the layout of a result passed the final overlap and containment check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validity {
    Valid,
    /// The layout of the requested algorithm broke an invariant,
    /// the result holds the bottom-left greedy layout instead
    FellBack,
}

/// Outcome of an optimization call. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuttingResult {
    pub(super) placed_shapes: Vec<PlacedShape>,
    pub(super) unfulfilled: Vec<UnfulfilledUnit>,
    pub(super) stock_utilization: Vec<StockUtilization>,
    pub(super) order_fulfillment: Vec<OrderFulfillment>,
    pub(super) placed_area: f64,
    pub(super) used_stock_area: f64,
    pub(super) efficiency: f64,
    pub(super) waste_area: f64,
    pub(super) total_cost: f64,
    pub(super) computation_time: Duration,
    pub(super) algorithm: Algorithm,
    pub(super) termination: Option<Termination>,
    pub(super) stats: SearchStats,
    pub(super) validity: Validity,
}

impl CuttingResult {
    /// All placed shapes, grouped by stock sheet in placement order
    pub fn placed_shapes(&self) -> &[PlacedShape] {
        &self.placed_shapes
    }

    pub fn unfulfilled(&self) -> &[UnfulfilledUnit] {
        &self.unfulfilled
    }

    /// One entry per stock sheet of the input, in input order
    pub fn stock_utilization(&self) -> &[StockUtilization] {
        &self.stock_utilization
    }

    /// One entry per order of the input, in input order
    pub fn order_fulfillment(&self) -> &[OrderFulfillment] {
        &self.order_fulfillment
    }

    pub fn placed_area(&self) -> f64 {
        self.placed_area
    }

    /// Total area of the stock sheets holding at least one piece
    pub fn used_stock_area(&self) -> f64 {
        self.used_stock_area
    }

    /// Placed area over the area of the stock sheets actually used, zero if no sheet is used
    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// Unused area of the stock sheets actually used
    pub fn waste_area(&self) -> f64 {
        self.waste_area
    }

    /// Summed cost of the stock sheets actually used
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn computation_time(&self) -> Duration {
        self.computation_time
    }

    /// Algorithm that produced the layout. Differs from the requested one if the exact solver fell back.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Why the search engine stopped, `None` for the greedy placers and the exact solver
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn validity(&self) -> Validity {
        self.validity
    }

    pub fn is_valid(&self) -> bool {
        self.validity == Validity::Valid
    }

    pub fn n_stocks_used(&self) -> usize {
        self.stock_utilization.iter().filter(|s| s.used).count()
    }

    /// Fraction of all demand units that were placed
    pub fn fulfillment_rate(&self) -> f64 {
        let total = self.placed_shapes.len() + self.unfulfilled.len();
        match total {
            0 => 0.0,
            _ => self.placed_shapes.len() as f64 / total as f64,
        }
    }
}
