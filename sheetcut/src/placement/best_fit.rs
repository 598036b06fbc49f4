use crate::entities::{Instance, Layout};
use crate::placement::{PlacementOption, is_feasible};

/// Option leaving the least free area on its stock sheet after insertion.
///
/// Every (stock, orientation) pair contributes its first feasible position in raster order,
/// at most `sample` options are evaluated.
/// Ties go to the lowest stock index, then to raster order.
pub(super) fn search<'a>(
    instance: &'a Instance,
    layouts: &[Layout],
    uid: usize,
    preferred: u8,
    stocks: &[usize],
    sample: usize,
) -> Option<PlacementOption<'a>> {
    let tol = instance.tolerance();
    let piece_area = instance.unit_area(uid);

    let options = stocks.iter().flat_map(|&stock_idx| {
        let stock = instance.stock(stock_idx);
        let layout = &layouts[stock_idx];
        let positions = layout.raster_positions(tol);
        instance
            .orientations_from(uid, preferred)
            .filter_map(move |orientation| {
                positions
                    .iter()
                    .find(|&&(x, y)| is_feasible(stock, layout, orientation, x, y, tol))
                    .map(|&(x, y)| PlacementOption {
                        stock_idx,
                        orientation,
                        x,
                        y,
                    })
            })
    });

    let mut best: Option<(f64, PlacementOption)> = None;
    for option in options.take(sample) {
        let layout = &layouts[option.stock_idx];
        let leftover =
            instance.stock(option.stock_idx).area() - layout.placed_area() - piece_area;
        //strictly better only, earlier options win ties
        if best.is_none_or(|(best_leftover, _)| tol.lt(leftover, best_leftover)) {
            best = Some((leftover, option));
        }
    }
    best.map(|(_, option)| option)
}
