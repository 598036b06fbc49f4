/// Pairwise overlap and containment predicates between placed shapes
pub mod collision;
pub mod geo_traits;
pub mod primitives;

mod piece_shape;

#[doc(inline)]
pub use collision::{fits_within, overlaps};
#[doc(inline)]
pub use piece_shape::{PieceShape, PlacedGeometry};
