use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::{Instance, MaterialKind};
use crate::placement::{PlacementOutcome, Placer, PlacerKind};

/// Problems with a complexity above this limit are never handed to an [`ExactSolver`]
pub const EXACT_COMPLEXITY_LIMIT: usize = 200;

/// An available stock sheet, as seen by an exact solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockCapacity {
    pub stock_idx: usize,
    pub stock_id: String,
    pub width: f64,
    pub height: f64,
    pub material: MaterialKind,
}

/// The demand of a single order, described by the bounding box of its shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandProfile {
    pub order_idx: usize,
    pub order_id: String,
    pub width: f64,
    pub height: f64,
    pub area: f64,
    pub quantity: usize,
    pub rotation_allowed: bool,
    pub material: MaterialKind,
}

/// How many copies of which orders to cut from a single stock sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuttingPattern {
    pub stock_idx: usize,
    /// `(order_idx, count)` pairs
    pub counts: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("no feasible cutting plan: {reason}")]
pub struct Infeasible {
    pub reason: String,
}

/// External solver (column generation or any other mathematical programming backend)
/// that assigns demand to stock sheets as a set of cutting patterns.
pub trait ExactSolver: Send + Sync {
    fn solve(
        &self,
        capacity: &[StockCapacity],
        demand: &[DemandProfile],
    ) -> Result<Vec<CuttingPattern>, Infeasible>;
}

/// Capacities of the available stock sheets of an instance
pub fn capacities(instance: &Instance) -> Vec<StockCapacity> {
    instance
        .eligible_stocks()
        .iter()
        .map(|&stock_idx| {
            let stock = instance.stock(stock_idx);
            StockCapacity {
                stock_idx,
                stock_id: stock.id.clone(),
                width: stock.width,
                height: stock.height,
                material: stock.material,
            }
        })
        .collect()
}

pub fn demand_profiles(instance: &Instance) -> Vec<DemandProfile> {
    instance
        .orders()
        .iter()
        .enumerate()
        .map(|(order_idx, order)| {
            let (width, height) = order.shape.dimensions();
            DemandProfile {
                order_idx,
                order_id: order.id.clone(),
                width,
                height,
                area: order.piece_area(),
                quantity: order.quantity,
                rotation_allowed: instance.orientations(order_idx).len() > 1,
                material: order.material,
            }
        })
        .collect()
}

/// Turns cutting patterns into a layout. Each pattern's units are inserted bottom-left into the
/// pattern's stock sheet. Units the patterns do not cover, or which did not fit where the pattern
/// wanted them, are placed afterwards by ordinary bottom-left insertion in greedy order.
pub fn realize(instance: &Instance, patterns: &[CuttingPattern]) -> PlacementOutcome {
    let mut placer = Placer::new(instance, PlacerKind::BottomLeft, 1);

    //remaining units per order, in copy order
    let mut remaining = vec![vec![]; instance.orders().len()];
    for unit in instance.units().iter().rev() {
        remaining[unit.order_idx].push(unit.uid);
    }
    let mut placed = vec![false; instance.n_units()];
    let mut n_missed = 0;

    for pattern in patterns {
        if pattern.stock_idx >= instance.stocks().len() {
            warn!(
                "[EXACT] ignoring pattern for unknown stock index {}",
                pattern.stock_idx
            );
            continue;
        }
        for &(order_idx, count) in &pattern.counts {
            let Some(queue) = remaining.get_mut(order_idx) else {
                warn!("[EXACT] ignoring pattern entry for unknown order index {order_idx}");
                continue;
            };
            let take = count.min(queue.len());
            let units = queue.split_off(queue.len() - take);
            for uid in units.into_iter().rev() {
                match placer.insert_into(uid, 0, pattern.stock_idx) {
                    true => placed[uid] = true,
                    false => n_missed += 1,
                }
            }
        }
    }

    let leftovers = instance
        .greedy_sequence()
        .into_iter()
        .filter(|&uid| !placed[uid])
        .collect::<Vec<_>>();

    debug!(
        "[EXACT] realized {} patterns, {} units missed their pattern, {} units left to bottom-left",
        patterns.len(),
        n_missed,
        leftovers.len()
    );

    for uid in leftovers {
        placer.insert(uid, 0);
    }
    placer.finish()
}
