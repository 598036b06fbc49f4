use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::entities::{Instance, Layout, Orientation, Stock};
use crate::placement::{PlacementOption, is_feasible};
use crate::util::Tolerance;

/// Lowest, then leftmost feasible anchor over all allowed orientations, compacted afterwards.
/// The first stock sheet offering any position is used.
pub(super) fn search<'a>(
    instance: &'a Instance,
    layouts: &[Layout],
    uid: usize,
    preferred: u8,
    stocks: &[usize],
) -> Option<PlacementOption<'a>> {
    let tol = instance.tolerance();
    for &stock_idx in stocks {
        let stock = instance.stock(stock_idx);
        let layout = &layouts[stock_idx];
        let anchors = layout.anchors();

        //min_by_key keeps the first of equal elements, so the preferred orientation wins ties
        let lowest = instance
            .orientations_from(uid, preferred)
            .cartesian_product(anchors.iter().copied())
            .filter(|(o, (x, y))| is_feasible(stock, layout, o, *x, *y, tol))
            .min_by_key(|(_, (x, y))| (OrderedFloat(*y), OrderedFloat(*x)));

        if let Some((orientation, (x, y))) = lowest {
            let (x, y) = compact(stock, layout, orientation, x, y, tol);
            return Some(PlacementOption {
                stock_idx,
                orientation,
                x,
                y,
            });
        }
    }
    None
}

/// Alternately slides the shape down and to the left, as long as it stays feasible.
fn compact(
    stock: &Stock,
    layout: &Layout,
    orientation: &Orientation,
    mut x: f64,
    mut y: f64,
    tol: Tolerance,
) -> (f64, f64) {
    let (w, h) = (orientation.width, orientation.height);
    //every move lands on a distinct event coordinate, so this bounds the number of moves
    let max_moves = 2 * layout.placed_shapes().len() + 2;

    for _ in 0..max_moves {
        let mut moved = false;

        //highest top edge below the shape, among boxes sharing part of its horizontal span
        let floor = layout
            .bboxes()
            .filter(|b| overlap(b.x_min, b.x_max, x, x + w) > tol.value())
            .map(|b| b.y_max)
            .filter(|&top| tol.le(top, y))
            .fold(0.0, f64::max);
        if tol.lt(floor, y) && is_feasible(stock, layout, orientation, x, floor, tol) {
            y = floor;
            moved = true;
        }

        let wall = layout
            .bboxes()
            .filter(|b| overlap(b.y_min, b.y_max, y, y + h) > tol.value())
            .map(|b| b.x_max)
            .filter(|&right| tol.le(right, x))
            .fold(0.0, f64::max);
        if tol.lt(wall, x) && is_feasible(stock, layout, orientation, wall, y, tol) {
            x = wall;
            moved = true;
        }

        if !moved {
            break;
        }
    }
    (x, y)
}

fn overlap(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> f64 {
    f64::min(a_max, b_max) - f64::max(a_min, b_min)
}
