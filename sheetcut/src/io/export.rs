use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use itertools::Itertools;
use log::info;
use serde::Serialize;

use crate::io::ext_repr::{ExtPlacement, ExtSolution, ExtStockLayout, ExtUnfulfilled};
use crate::result::CuttingResult;

/// Exports a [`CuttingResult`] by composing an [`ExtSolution`] from it.
/// Only stock sheets holding at least one piece get a layout.
pub fn export_solution(result: &CuttingResult) -> ExtSolution {
    let order_id = |order_idx: usize| result.order_fulfillment()[order_idx].order_id.clone();

    let layouts = result
        .stock_utilization()
        .iter()
        .filter(|s| s.used)
        .map(|s| ExtStockLayout {
            stock_id: s.stock_id.clone(),
            placements: result
                .placed_shapes()
                .iter()
                .filter(|p| p.stock_idx() == s.stock_idx)
                .map(|p| ExtPlacement {
                    order_id: order_id(p.order_idx()),
                    copy_idx: p.unit().copy_idx,
                    position: p.position(),
                    rotation: p.rotation(),
                })
                .collect_vec(),
            utilization: s.utilization,
        })
        .collect_vec();

    let unfulfilled = result
        .unfulfilled()
        .iter()
        .map(|u| ExtUnfulfilled {
            order_id: u.order_id.clone(),
            copy_idx: u.unit.copy_idx,
            reason: u.reason,
        })
        .collect_vec();

    ExtSolution {
        layouts,
        unfulfilled,
        efficiency: result.efficiency(),
        waste_area: result.waste_area(),
        total_cost: result.total_cost(),
        algorithm: result.algorithm(),
        termination: result.termination(),
        run_time_sec: result.computation_time().as_secs_f64(),
    }
}

pub fn write_json(value: &impl Serialize, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("could not open output file: {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value)
        .with_context(|| format!("could not write output file: {}", path.display()))?;
    info!("[IO] json written to {}", path.display());
    Ok(())
}
