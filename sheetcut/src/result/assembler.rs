use std::time::Instant;

use log::{error, info, warn};

use crate::config::Algorithm;
use crate::entities::Instance;
use crate::error::CuttingError;
use crate::placement::{PlacementOutcome, PlacerKind};
use crate::result::{
    CuttingResult, FulfillmentStatus, OrderFulfillment, StockUtilization, UnfulfilledReason,
    UnfulfilledUnit, Validity,
};
use crate::search::{Candidate, SearchStats, Termination};
use crate::util::assertions;

/// How a placement outcome came to be
#[derive(Debug, Clone)]
pub struct Provenance {
    pub algorithm: Algorithm,
    pub termination: Option<Termination>,
    pub stats: SearchStats,
    /// Start of the optimization call
    pub start: Instant,
}

/// Packages a decoded layout into an immutable [`CuttingResult`], after a final overlap and
/// containment check.
pub struct ResultAssembler<'a> {
    instance: &'a Instance,
}

impl<'a> ResultAssembler<'a> {
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    /// On a violated invariant, the bottom-left greedy layout replaces the outcome and the result is
    /// marked [`Validity::FellBack`]. Fails only if that layout is invalid as well.
    pub fn assemble(
        &self,
        outcome: PlacementOutcome,
        provenance: Provenance,
    ) -> Result<CuttingResult, CuttingError> {
        let instance = self.instance;
        match assertions::first_violation(instance, &outcome.layouts) {
            None => Ok(self.build(outcome, provenance, Validity::Valid)),
            Some((stock_idx, violation)) => {
                error!(
                    "[RESULT] {violation:?} on stock '{}' in the {:?} layout, falling back to bottom-left placement",
                    instance.stock(stock_idx).id,
                    provenance.algorithm
                );
                let fallback =
                    Candidate::greedy(instance).decode(instance, PlacerKind::BottomLeft, 1);
                if let Some((stock_idx, violation)) =
                    assertions::first_violation(instance, &fallback.layouts)
                {
                    let stock_id = instance.stock(stock_idx).id.clone();
                    error!("[RESULT] {violation:?} on stock '{stock_id}' in the fallback layout");
                    return Err(CuttingError::OverlapInvariantViolated { stock_id });
                }
                Ok(self.build(fallback, provenance, Validity::FellBack))
            }
        }
    }

    fn build(
        &self,
        outcome: PlacementOutcome,
        provenance: Provenance,
        validity: Validity,
    ) -> CuttingResult {
        let instance = self.instance;
        debug_assert!(assertions::units_conserved(
            instance,
            &outcome.layouts,
            &outcome.unplaced
        ));

        let stock_utilization = outcome
            .layouts
            .iter()
            .map(|layout| {
                let stock = instance.stock(layout.stock_idx());
                let used = !layout.is_empty();
                let placed_area = layout.placed_area();
                StockUtilization {
                    stock_id: stock.id.clone(),
                    stock_idx: layout.stock_idx(),
                    used,
                    n_placed: layout.placed_shapes().len(),
                    placed_area,
                    stock_area: stock.area(),
                    utilization: placed_area / stock.area(),
                    waste_area: if used { stock.area() - placed_area } else { 0.0 },
                    cost: if used { stock.unit_cost } else { 0.0 },
                }
            })
            .collect::<Vec<_>>();

        let mut placed_per_order = vec![0; instance.orders().len()];
        outcome
            .placed_shapes()
            .for_each(|p| placed_per_order[p.order_idx()] += 1);

        let order_fulfillment = instance
            .orders()
            .iter()
            .zip(placed_per_order)
            .map(|(order, placed)| OrderFulfillment {
                order_id: order.id.clone(),
                requested: order.quantity,
                placed,
                status: match placed {
                    0 => FulfillmentStatus::Unfulfilled,
                    p if p == order.quantity => FulfillmentStatus::Fulfilled,
                    _ => FulfillmentStatus::PartiallyFulfilled,
                },
            })
            .collect::<Vec<_>>();

        let mut unplaced = outcome.unplaced.clone();
        unplaced.sort_unstable();
        let unfulfilled = unplaced
            .into_iter()
            .map(|uid| {
                let unit = instance.unit(uid);
                UnfulfilledUnit {
                    unit,
                    order_id: instance.order(unit.order_idx).id.clone(),
                    reason: match instance.is_infeasible(uid) {
                        true => UnfulfilledReason::InfeasibleInput,
                        false => UnfulfilledReason::NoSpace,
                    },
                }
            })
            .collect::<Vec<_>>();

        let placed_area = outcome.placed_area();
        let used_stock_area = outcome.used_stock_area(instance);
        let efficiency = match used_stock_area > 0.0 {
            true => placed_area / used_stock_area,
            false => 0.0,
        };
        let total_cost = stock_utilization.iter().map(|s| s.cost).sum();
        let placed_shapes = outcome
            .layouts
            .into_iter()
            .flat_map(|l| l.placed_shapes().to_vec())
            .collect::<Vec<_>>();

        let result = CuttingResult {
            placed_shapes,
            unfulfilled,
            stock_utilization,
            order_fulfillment,
            placed_area,
            used_stock_area,
            efficiency,
            waste_area: used_stock_area - placed_area,
            total_cost,
            computation_time: provenance.start.elapsed(),
            algorithm: provenance.algorithm,
            termination: provenance.termination,
            stats: provenance.stats,
            validity,
        };

        info!(
            "[RESULT] {:?}: {} pieces placed on {} stock sheets with an efficiency of {:.3}%, {} unfulfilled, in {:.3}ms",
            result.algorithm,
            result.placed_shapes.len(),
            result.n_stocks_used(),
            result.efficiency * 100.0,
            result.unfulfilled.len(),
            result.computation_time.as_secs_f64() * 1000.0
        );
        if result.unfulfilled.iter().any(|u| u.reason == UnfulfilledReason::InfeasibleInput) {
            warn!("[RESULT] some pieces do not fit on any compatible stock sheet");
        }
        result
    }
}
