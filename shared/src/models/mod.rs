//! Data models
//!
//! Wire types exchanged with the backend REST API. JSON fields are camelCase;
//! all ids are `i64`.

pub mod filter;
pub mod invoice;
pub mod order;
pub mod product;
pub mod table_map;
pub mod user;

// Re-exports
pub use filter::*;
pub use invoice::*;
pub use order::*;
pub use product::*;
pub use table_map::*;
pub use user::*;
