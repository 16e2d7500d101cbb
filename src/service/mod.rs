//! Table operations: identifier whitelist, statement execution, and request dispatch.

mod crud;
mod dispatch;
mod validation;
pub use crud::TableService;
pub use dispatch::dispatch;
pub use validation::Identifier;
