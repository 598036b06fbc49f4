use crate::entities::{Instance, Layout};
use crate::placement::{PlacementOption, is_feasible};

/// First valid position: stocks in order, orientations from the preferred one,
/// candidate positions in raster order.
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
        let positions = layout.raster_positions(tol);
        for orientation in instance.orientations_from(uid, preferred) {
            let hit = positions
                .iter()
                .find(|&&(x, y)| is_feasible(stock, layout, orientation, x, y, tol));
            if let Some(&(x, y)) = hit {
                return Some(PlacementOption {
                    stock_idx,
                    orientation,
                    x,
                    y,
                });
            }
        }
    }
    None
}
