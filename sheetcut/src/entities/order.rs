use serde::{Deserialize, Serialize};

use crate::entities::MaterialKind;
use crate::geometry::PieceShape;

/// Urgency of an order. Only used as a tie-break and seeding weight, never as a hard constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low = 1,
    #[default]
    Medium = 2,
    High = 3,
    Urgent = 4,
}

/// A request for `quantity` identical pieces of a given shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub shape: PieceShape,
    pub quantity: usize,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub material: MaterialKind,
    /// Whether pieces of this order may be rotated.
    /// Falls back to [`OptimizerConfig::allow_rotation`](crate::config::OptimizerConfig::allow_rotation) if undefined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_allowed: Option<bool>,
}

impl Order {
    pub fn new(id: impl Into<String>, shape: PieceShape, quantity: usize) -> Self {
        Order {
            id: id.into(),
            shape,
            quantity,
            priority: Priority::default(),
            material: MaterialKind::default(),
            rotation_allowed: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_material(mut self, material: MaterialKind) -> Self {
        self.material = material;
        self
    }

    pub fn with_rotation(mut self, allowed: bool) -> Self {
        self.rotation_allowed = Some(allowed);
        self
    }

    /// Area of a single piece
    pub fn piece_area(&self) -> f64 {
        self.shape.area()
    }
}

/// A single physical piece to cut: one copy of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DemandUnit {
    /// Index of the unit in the instance, also its position in every candidate's orientation vector
    pub uid: usize,
    pub order_idx: usize,
    /// Which copy of the order this unit is, in `0..quantity`
    pub copy_idx: usize,
}
