//! HTTP handlers for table requests.

pub mod table;
pub use table::*;
