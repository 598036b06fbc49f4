//Various checks to verify correctness of the state of the system
//Used in debug_assertion!() blocks and by the result assembler

use itertools::Itertools;
use log::error;

use crate::entities::{Instance, Layout};
use crate::geometry::collision::{bbox_within, geometries_overlap};

/// Kind of broken invariant found in a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Shape `uid` sticks out of its stock sheet
    OutOfBounds { uid: usize },
    /// Shapes `a` and `b` interpenetrate
    Overlap { a: usize, b: usize },
}

/// Returns the index of the first stock sheet whose layout breaks the containment or
/// no-overlap invariant, together with the violation.
pub fn first_violation(instance: &Instance, layouts: &[Layout]) -> Option<(usize, Violation)> {
    let tol = instance.tolerance();
    layouts.iter().find_map(|layout| {
        let bounds = instance.stock(layout.stock_idx()).bounds();
        let placed = layout.placed_shapes();

        let out_of_bounds = placed
            .iter()
            .find(|p| !bbox_within(&p.bbox(), &bounds, tol))
            .map(|p| Violation::OutOfBounds { uid: p.unit().uid });

        let overlap = || {
            placed
                .iter()
                .tuple_combinations()
                .find(|(a, b)| geometries_overlap(a.geometry(), b.geometry(), tol))
                .map(|(a, b)| Violation::Overlap {
                    a: a.unit().uid,
                    b: b.unit().uid,
                })
        };

        out_of_bounds
            .or_else(overlap)
            .map(|v| (layout.stock_idx(), v))
    })
}

pub fn layouts_are_valid(instance: &Instance, layouts: &[Layout]) -> bool {
    match first_violation(instance, layouts) {
        None => true,
        Some((stock_idx, violation)) => {
            error!(
                "[ASSERT] {violation:?} on stock '{}'",
                instance.stock(stock_idx).id
            );
            false
        }
    }
}

/// Every unit is either placed exactly once or reported unplaced
pub fn units_conserved(instance: &Instance, layouts: &[Layout], unplaced: &[usize]) -> bool {
    let mut seen = vec![0usize; instance.n_units()];
    layouts
        .iter()
        .flat_map(|l| l.placed_shapes())
        .map(|p| p.unit().uid)
        .chain(unplaced.iter().copied())
        .for_each(|uid| seen[uid] += 1);
    seen.iter().all(|&count| count == 1)
}
