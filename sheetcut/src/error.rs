use thiserror::Error;

/// Errors that abort an optimization call.
///
/// Pieces that cannot be placed are not errors: they are reported as
/// [`UnfulfilledUnit`](crate::result::UnfulfilledUnit)s in the result.
/// An expired time budget is a normal [`Termination`](crate::search::Termination).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CuttingError {
    /// A stock or order carries geometry that cannot be placed meaningfully
    /// (non-positive area, non-finite coordinates, a non-convex polygon, ...).
    #[error("degenerate geometry in {entity} '{id}': {reason}")]
    DegenerateGeometry {
        entity: &'static str,
        id: String,
        reason: String,
    },

    /// The input as a whole is malformed (no stock, no orders, zero quantities, duplicate ids).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The configuration contains values outside their valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A layout with overlapping or out-of-bounds pieces survived, even after falling back to the greedy placer.
    #[error("overlap invariant violated on stock '{stock_id}'")]
    OverlapInvariantViolated { stock_id: String },
}

impl CuttingError {
    pub(crate) fn degenerate(entity: &'static str, id: &str, reason: impl Into<String>) -> Self {
        CuttingError::DegenerateGeometry {
            entity,
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
