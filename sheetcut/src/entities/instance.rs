use std::cmp::Reverse;
use std::collections::HashSet;

use itertools::Itertools;
use log::{debug, warn};
use ordered_float::OrderedFloat;

use crate::entities::{DemandUnit, Order, Stock};
use crate::error::CuttingError;
use crate::geometry::PieceShape;
use crate::geometry::collision::bbox_within;
use crate::util::Tolerance;

/// An allowed orientation of an order's shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Orientation {
    /// Rotation in degrees, counter-clockwise
    pub rotation: f64,
    /// The rotated shape, anchored at the origin
    pub shape: PieceShape,
    pub width: f64,
    pub height: f64,
}

impl Orientation {
    fn new(base: &PieceShape, rotation: f64) -> Self {
        let shape = base.rotate(rotation);
        let (width, height) = shape.dimensions();
        Orientation {
            rotation,
            shape,
            width,
            height,
        }
    }
}

/// Validated, immutable view of a cutting problem: stock sheets, orders, their demand units and
/// everything that can be precomputed about them.
/// Shared read-only by all placers and evaluation threads.
#[derive(Debug, Clone)]
pub struct Instance {
    stocks: Vec<Stock>,
    orders: Vec<Order>,
    units: Vec<DemandUnit>,
    /// Allowed orientations per order
    orientations: Vec<Vec<Orientation>>,
    /// Per order, the available stocks of the same material on which at least one orientation fits
    compatible_stocks: Vec<Vec<usize>>,
    /// Stocks with status `Available`
    eligible_stocks: Vec<usize>,
    tolerance: Tolerance,
}

impl Instance {
    /// Validates the input and expands the orders into demand units.
    /// Fails before any placement is attempted.
    pub fn new(
        stocks: &[Stock],
        orders: &[Order],
        allow_rotation: bool,
        tolerance: Tolerance,
    ) -> Result<Self, CuttingError> {
        if stocks.is_empty() {
            return Err(CuttingError::InvalidInput("no stock sheets provided".into()));
        }
        if orders.is_empty() {
            return Err(CuttingError::InvalidInput("no orders provided".into()));
        }
        check_unique_ids(stocks.iter().map(|s| s.id.as_str()), "stock")?;
        check_unique_ids(orders.iter().map(|o| o.id.as_str()), "order")?;

        for stock in stocks {
            if !(stock.width.is_finite() && stock.height.is_finite()) {
                return Err(CuttingError::degenerate(
                    "stock",
                    &stock.id,
                    "non-finite dimensions",
                ));
            }
            if stock.width <= 0.0 || stock.height <= 0.0 {
                return Err(CuttingError::degenerate(
                    "stock",
                    &stock.id,
                    format!("non-positive area ({}x{})", stock.width, stock.height),
                ));
            }
            if !stock.unit_cost.is_finite() || stock.unit_cost < 0.0 {
                return Err(CuttingError::InvalidInput(format!(
                    "stock '{}' has an invalid unit cost: {}",
                    stock.id, stock.unit_cost
                )));
            }
        }

        let orders = orders
            .iter()
            .map(|order| {
                if order.quantity == 0 {
                    return Err(CuttingError::InvalidInput(format!(
                        "order '{}' has a quantity of zero",
                        order.id
                    )));
                }
                let shape = order
                    .shape
                    .normalized()
                    .map_err(|e| CuttingError::degenerate("order", &order.id, e.to_string()))?;
                Ok(Order {
                    shape,
                    ..order.clone()
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let units = orders
            .iter()
            .enumerate()
            .flat_map(|(order_idx, order)| {
                (0..order.quantity).map(move |copy_idx| (order_idx, copy_idx))
            })
            .enumerate()
            .map(|(uid, (order_idx, copy_idx))| DemandUnit {
                uid,
                order_idx,
                copy_idx,
            })
            .collect_vec();

        let orientations = orders
            .iter()
            .map(|order| {
                let rotation_allowed = order.rotation_allowed.unwrap_or(allow_rotation);
                let angles: &[f64] = match (&order.shape, rotation_allowed) {
                    (_, false) | (PieceShape::Circle { .. }, _) => &[0.0],
                    (s @ PieceShape::Rectangle { .. }, true) if s.is_square() => &[0.0],
                    (PieceShape::Rectangle { .. }, true) => &[0.0, 90.0],
                    (PieceShape::Polygon { .. }, true) => &[0.0, 90.0, 180.0, 270.0],
                };
                angles
                    .iter()
                    .map(|&angle| Orientation::new(&order.shape, angle))
                    .collect_vec()
            })
            .collect_vec();

        let eligible_stocks = stocks
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_available())
            .map(|(i, _)| i)
            .collect_vec();

        if eligible_stocks.is_empty() {
            warn!("[INST] none of the {} stock sheets is available", stocks.len());
        }

        let compatible_stocks = orders
            .iter()
            .zip(orientations.iter())
            .map(|(order, orients)| {
                eligible_stocks
                    .iter()
                    .copied()
                    .filter(|&s_idx| {
                        let stock = &stocks[s_idx];
                        stock.material == order.material
                            && orients.iter().any(|o| {
                                let bbox = o.shape.bbox();
                                bbox_within(&bbox, &stock.bounds(), tolerance)
                            })
                    })
                    .collect_vec()
            })
            .collect_vec();

        for (order, compatible) in orders.iter().zip(compatible_stocks.iter()) {
            if compatible.is_empty() {
                warn!(
                    "[INST] order '{}' does not fit on any available stock sheet of material {:?}",
                    order.id, order.material
                );
            }
        }

        let instance = Instance {
            stocks: stocks.to_vec(),
            orders,
            units,
            orientations,
            compatible_stocks,
            eligible_stocks,
            tolerance,
        };

        debug!(
            "[INST] {} stock sheets ({} available), {} orders expanded into {} units, complexity {}",
            instance.stocks.len(),
            instance.eligible_stocks.len(),
            instance.orders.len(),
            instance.units.len(),
            instance.complexity()
        );

        Ok(instance)
    }

    pub fn stocks(&self) -> &[Stock] {
        &self.stocks
    }

    pub fn stock(&self, idx: usize) -> &Stock {
        &self.stocks[idx]
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn order(&self, idx: usize) -> &Order {
        &self.orders[idx]
    }

    pub fn units(&self) -> &[DemandUnit] {
        &self.units
    }

    pub fn unit(&self, uid: usize) -> DemandUnit {
        self.units[uid]
    }

    pub fn n_units(&self) -> usize {
        self.units.len()
    }

    pub fn orientations(&self, order_idx: usize) -> &[Orientation] {
        &self.orientations[order_idx]
    }

    /// Orientations allowed for a unit, starting from the preferred one
    pub fn orientations_from(
        &self,
        uid: usize,
        preferred: u8,
    ) -> impl Iterator<Item = &Orientation> + '_ {
        let orients = self.orientations(self.units[uid].order_idx);
        let n = orients.len();
        (0..n).map(move |i| &orients[(preferred as usize + i) % n])
    }

    pub fn n_orientations(&self, uid: usize) -> usize {
        self.orientations[self.units[uid].order_idx].len()
    }

    pub fn compatible_stocks(&self, order_idx: usize) -> &[usize] {
        &self.compatible_stocks[order_idx]
    }

    /// A unit is infeasible if no orientation fits on any compatible stock sheet, even an empty one
    pub fn is_infeasible(&self, uid: usize) -> bool {
        self.compatible_stocks[self.units[uid].order_idx].is_empty()
    }

    pub fn eligible_stocks(&self) -> &[usize] {
        &self.eligible_stocks
    }

    pub fn unit_area(&self, uid: usize) -> f64 {
        self.orders[self.units[uid].order_idx].piece_area()
    }

    pub fn total_demand_area(&self) -> f64 {
        self.orders
            .iter()
            .map(|o| o.piece_area() * o.quantity as f64)
            .sum()
    }

    pub fn eligible_stock_area(&self) -> f64 {
        self.eligible_stocks
            .iter()
            .map(|&s| self.stocks[s].area())
            .sum()
    }

    /// Problem size measure driving the auto-scaling of the search engines:
    /// the number of demand units times the number of available stock sheets.
    pub fn complexity(&self) -> usize {
        self.units.len() * self.eligible_stocks.len()
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Deterministic greedy sequence: descending piece area, then descending priority, then unit id.
    pub fn greedy_sequence(&self) -> Vec<usize> {
        self.sequence_by(|uid| {
            let order = &self.orders[self.units[uid].order_idx];
            (
                Reverse(OrderedFloat(order.piece_area())),
                Reverse(order.priority),
            )
        })
    }

    /// Unit ids sorted by `key`, ties resolved by unit id
    pub fn sequence_by<K: Ord>(&self, key: impl Fn(usize) -> K) -> Vec<usize> {
        (0..self.units.len())
            .sorted_by_cached_key(|&uid| (key(uid), uid))
            .collect()
    }
}

fn check_unique_ids<'a>(
    ids: impl Iterator<Item = &'a str>,
    entity: &str,
) -> Result<(), CuttingError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CuttingError::InvalidInput(format!(
                "duplicate {entity} id '{id}'"
            )));
        }
    }
    Ok(())
}
