mod assembler;
mod cutting_result;

#[doc(inline)]
pub use assembler::{Provenance, ResultAssembler};
#[doc(inline)]
pub use cutting_result::{
    CuttingResult, FulfillmentStatus, OrderFulfillment, StockUtilization, UnfulfilledReason,
    UnfulfilledUnit, Validity,
};
