use log::trace;
use serde::{Deserialize, Serialize};

use crate::entities::{Instance, Layout, Orientation, PlacedShape, Stock};
use crate::geometry::collision::bbox_within;
use crate::geometry::primitives::Rect;
use crate::util::{Tolerance, assertions};

mod best_fit;
mod bottom_left;
mod first_fit;

/// Deterministic greedy placement strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlacerKind {
    /// First valid position in raster order, scanning stocks in order
    FirstFit,
    /// Position leaving the least free area on its stock, over a bounded sample of options
    BestFit,
    /// Lowest, then leftmost anchor point, followed by compaction
    #[default]
    BottomLeft,
}

/// Where and how a unit will be placed.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlacementOption<'a> {
    pub stock_idx: usize,
    pub orientation: &'a Orientation,
    pub x: f64,
    pub y: f64,
}

/// The result of placing a sequence of units: one layout per stock sheet (indexed like the
/// instance's stocks, possibly empty) and the units that could not be placed.
#[derive(Debug, Clone)]
pub struct PlacementOutcome {
    pub layouts: Vec<Layout>,
    pub unplaced: Vec<usize>,
}

impl PlacementOutcome {
    pub fn placed_shapes(&self) -> impl Iterator<Item = &PlacedShape> {
        self.layouts.iter().flat_map(|l| l.placed_shapes())
    }

    pub fn n_placed(&self) -> usize {
        self.layouts.iter().map(|l| l.placed_shapes().len()).sum()
    }

    pub fn placed_area(&self) -> f64 {
        self.layouts.iter().map(|l| l.placed_area()).sum()
    }

    /// Layouts of stock sheets holding at least one piece
    pub fn used_layouts(&self) -> impl Iterator<Item = &Layout> {
        self.layouts.iter().filter(|l| !l.is_empty())
    }

    pub fn used_stock_area(&self, instance: &Instance) -> f64 {
        self.used_layouts()
            .map(|l| instance.stock(l.stock_idx()).area())
            .sum()
    }
}

/// Places units one by one on the stock sheets of an instance, without backtracking.
pub struct Placer<'a> {
    instance: &'a Instance,
    kind: PlacerKind,
    best_fit_sample: usize,
    layouts: Vec<Layout>,
    unplaced: Vec<usize>,
}

impl<'a> Placer<'a> {
    pub fn new(instance: &'a Instance, kind: PlacerKind, best_fit_sample: usize) -> Self {
        Placer {
            instance,
            kind,
            best_fit_sample,
            layouts: (0..instance.stocks().len()).map(Layout::new).collect(),
            unplaced: vec![],
        }
    }

    /// Tries every allowed orientation of the unit (`preferred` first) on every compatible stock sheet.
    /// Returns whether the unit was placed; if not, it is recorded as unplaced.
    pub fn insert(&mut self, uid: usize, preferred: u8) -> bool {
        let instance = self.instance;
        let stocks = instance.compatible_stocks(instance.unit(uid).order_idx);
        let option = match stocks.is_empty() {
            true => None,
            false => match self.kind {
                PlacerKind::FirstFit => {
                    first_fit::search(instance, &self.layouts, uid, preferred, stocks)
                }
                PlacerKind::BestFit => best_fit::search(
                    instance,
                    &self.layouts,
                    uid,
                    preferred,
                    stocks,
                    self.best_fit_sample,
                ),
                PlacerKind::BottomLeft => {
                    bottom_left::search(instance, &self.layouts, uid, preferred, stocks)
                }
            },
        };
        self.commit(uid, option)
    }

    /// Bottom-left insertion restricted to a single stock sheet.
    /// A failed insertion is not recorded, the unit can still be inserted elsewhere.
    pub fn insert_into(&mut self, uid: usize, preferred: u8, stock_idx: usize) -> bool {
        let instance = self.instance;
        let compatible = instance.compatible_stocks(instance.unit(uid).order_idx);
        if !compatible.contains(&stock_idx) {
            return false;
        }
        match bottom_left::search(instance, &self.layouts, uid, preferred, &[stock_idx]) {
            Some(option) => self.commit(uid, Some(option)),
            None => false,
        }
    }

    fn commit(&mut self, uid: usize, option: Option<PlacementOption>) -> bool {
        match option {
            Some(PlacementOption {
                stock_idx,
                orientation,
                x,
                y,
            }) => {
                trace!(
                    "[PLACER] unit {uid} on stock {stock_idx} at ({x:.3}, {y:.3}), rotated {}°",
                    orientation.rotation
                );
                let unit = self.instance.unit(uid);
                let placed = PlacedShape::new(
                    unit,
                    stock_idx,
                    x,
                    y,
                    orientation.rotation,
                    orientation.shape.clone(),
                );
                self.layouts[stock_idx].place(placed);
                true
            }
            None => {
                self.unplaced.push(uid);
                false
            }
        }
    }

    pub fn finish(self) -> PlacementOutcome {
        debug_assert!(assertions::layouts_are_valid(self.instance, &self.layouts));
        PlacementOutcome {
            layouts: self.layouts,
            unplaced: self.unplaced,
        }
    }
}

/// Places the units in `sequence` order, each with its preferred orientation index taken from
/// `orientations` (indexed by unit id).
pub fn place(
    instance: &Instance,
    kind: PlacerKind,
    sequence: &[usize],
    orientations: &[u8],
    best_fit_sample: usize,
) -> PlacementOutcome {
    let mut placer = Placer::new(instance, kind, best_fit_sample);
    for &uid in sequence {
        placer.insert(uid, orientations[uid]);
    }
    placer.finish()
}

/// Whether the oriented shape, with its bounding box at `(x, y)`, lies within the stock sheet and
/// does not overlap anything already placed on it.
pub(crate) fn is_feasible(
    stock: &Stock,
    layout: &Layout,
    orientation: &Orientation,
    x: f64,
    y: f64,
    tol: Tolerance,
) -> bool {
    let bbox = Rect::from_origin(x, y, orientation.width, orientation.height);
    bbox_within(&bbox, &stock.bounds(), tol)
        && layout.is_free(&orientation.shape.place(x, y), tol)
}
