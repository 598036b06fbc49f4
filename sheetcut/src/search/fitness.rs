use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::config::FitnessWeights;
use crate::entities::Instance;
use crate::placement::PlacementOutcome;

/// Quality of a decoded candidate. Higher is better.
///
/// `value = w_util * utilization - w_waste * waste_fraction - w_unplaced * unplaced_fraction`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fitness {
    pub value: OrderedFloat<f64>,
    /// Placed area over the area of the stock sheets used
    pub utilization: f64,
    /// Unused area of the used sheets over the area of all available sheets
    pub waste_fraction: f64,
    /// Area of the unplaced units over the total demanded area
    pub unplaced_fraction: f64,
    pub n_unplaced: usize,
}

impl Fitness {
    /// Recomputed from scratch for every decoded candidate.
    pub fn evaluate(
        instance: &Instance,
        outcome: &PlacementOutcome,
        weights: &FitnessWeights,
    ) -> Self {
        let placed_area = outcome.placed_area();
        let used_area = outcome.used_stock_area(instance);
        let eligible_area = instance.eligible_stock_area();
        let demand_area = instance.total_demand_area();
        let unplaced_area = outcome
            .unplaced
            .iter()
            .map(|&uid| instance.unit_area(uid))
            .sum::<f64>();

        let utilization = ratio(placed_area, used_area);
        let waste_fraction = ratio(used_area - placed_area, eligible_area);
        let unplaced_fraction = ratio(unplaced_area, demand_area);

        let value = weights.utilization * utilization
            - weights.waste * waste_fraction
            - weights.unplaced * unplaced_fraction;

        Fitness {
            value: OrderedFloat(value),
            utilization,
            waste_fraction,
            unplaced_fraction,
            n_unplaced: outcome.unplaced.len(),
        }
    }

    pub fn value(&self) -> f64 {
        self.value.0
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    match denominator > 0.0 {
        true => (numerator / denominator).max(0.0),
        false => 0.0,
    }
}
