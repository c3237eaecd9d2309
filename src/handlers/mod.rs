//! HTTP handlers for entity CRUD, child collections and search.

pub mod entity;
pub mod search;
pub use entity::*;
pub use search::*;
