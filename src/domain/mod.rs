pub mod category;
pub mod product;

pub use category::*;
pub use product::*;

/// Identifier of a record within its collection.
pub type RecordId = i64;
