mod instance;
mod layout;
mod order;
mod placed_shape;
mod stock;

#[doc(inline)]
pub use instance::Instance;
#[doc(inline)]
pub use instance::Orientation;
#[doc(inline)]
pub use layout::Layout;
#[doc(inline)]
pub use order::DemandUnit;
#[doc(inline)]
pub use order::Order;
#[doc(inline)]
pub use order::Priority;
#[doc(inline)]
pub use placed_shape::PlacedShape;
#[doc(inline)]
pub use stock::MaterialKind;
#[doc(inline)]
pub use stock::Stock;
#[doc(inline)]
pub use stock::StockStatus;
