//! Places requested pieces (rectangles, circles and convex polygons) onto rectangular sheets of stock
//! material, maximizing material utilization.
//!
//! The entry point is [`optimize`]. It validates the input into an [`Instance`](entities::Instance),
//! runs the configured [`Algorithm`](config::Algorithm) and packages the best layout found into an
//! immutable [`CuttingResult`](result::CuttingResult).
//! Every returned layout is guaranteed to be overlap-free and contained within its stock sheets.

/// Configuration of the optimizer and its search engines
pub mod config;

/// Entities to model cutting problems: stock, orders, placed shapes and per-run working state
pub mod entities;

/// Error taxonomy of the public API
pub mod error;

/// Geometric primitives, piece shapes and the collision model
pub mod geometry;

/// Importing and exporting instances and results from and to external representations
pub mod io;

/// Entry point and algorithm dispatch
pub mod optimizer;

/// Interface through which an external exact solver is consumed
pub mod oracle;

/// Deterministic greedy placers, used as decoder, baseline and fallback
pub mod placement;

/// Packaging of decoded layouts into results
pub mod result;

/// Candidate encoding, fitness and the metaheuristic search engines
pub mod search;

/// Helper functions which do not belong to any specific module
pub mod util;

#[doc(inline)]
pub use optimizer::{Optimizer, optimize};
