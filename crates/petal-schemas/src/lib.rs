//! petal-schemas
//!
//! Wire-level data model shared by every petal crate: field definitions,
//! order records, label tables and the partial-order update contract.
//!
//! Serde only. No resolution logic lives here.

mod field;
mod label;
mod order;
mod update;

pub use field::*;
pub use label::*;
pub use order::*;
pub use update::*;
