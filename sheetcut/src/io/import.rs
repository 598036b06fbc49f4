use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use itertools::Itertools;

use crate::entities::{Order, Stock};
use crate::geometry::PieceShape;
use crate::geometry::primitives::Point;
use crate::io::ext_repr::{ExtInstance, ExtOrder, ExtShape, ExtStock};

/// Converts external representations of stock and orders into internal ones.
/// Only the structure is checked here, geometric validation happens when the instance is built.
pub fn import_stock(ext_stock: &ExtStock) -> Result<Stock> {
    ensure!(!ext_stock.id.is_empty(), "stock without an id");
    let mut stock = Stock::new(ext_stock.id.clone(), ext_stock.width, ext_stock.height);
    if let Some(thickness) = ext_stock.thickness {
        stock = stock.with_thickness(thickness);
    }
    if let Some(material) = ext_stock.material {
        stock = stock.with_material(material);
    }
    if let Some(unit_cost) = ext_stock.unit_cost {
        stock = stock.with_unit_cost(unit_cost);
    }
    if let Some(status) = ext_stock.status {
        stock = stock.with_status(status);
    }
    Ok(stock)
}

pub fn import_order(ext_order: &ExtOrder) -> Result<Order> {
    ensure!(!ext_order.id.is_empty(), "order without an id");
    let shape = import_shape(&ext_order.shape)
        .with_context(|| format!("invalid shape for order '{}'", ext_order.id))?;
    let mut order = Order::new(ext_order.id.clone(), shape, ext_order.quantity);
    if let Some(priority) = ext_order.priority {
        order = order.with_priority(priority);
    }
    if let Some(material) = ext_order.material {
        order = order.with_material(material);
    }
    if let Some(allowed) = ext_order.rotation_allowed {
        order = order.with_rotation(allowed);
    }
    Ok(order)
}

pub fn import_shape(ext_shape: &ExtShape) -> Result<PieceShape> {
    let shape = match ext_shape {
        ExtShape::Rectangle { width, height } => PieceShape::rectangle(*width, *height),
        ExtShape::Circle { radius } => PieceShape::circle(*radius),
        ExtShape::Polygon(vertices) => {
            ensure!(
                vertices.len() >= 3,
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            );
            PieceShape::polygon(vertices.iter().map(|&p| Point::from(p)).collect_vec())
        }
    };
    Ok(shape)
}

pub fn import_instance(ext_instance: &ExtInstance) -> Result<(Vec<Stock>, Vec<Order>)> {
    let stocks = ext_instance
        .stocks
        .iter()
        .map(import_stock)
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("importing stock of instance '{}'", ext_instance.name))?;
    let orders = ext_instance
        .orders
        .iter()
        .map(import_order)
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("importing orders of instance '{}'", ext_instance.name))?;
    Ok((stocks, orders))
}

pub fn read_json_instance(path: &Path) -> Result<ExtInstance> {
    let file = File::open(path)
        .with_context(|| format!("could not open instance file: {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("could not parse instance file: {}", path.display()))
}
