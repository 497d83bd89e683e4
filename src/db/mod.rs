//! Persistence module split across logical submodules.

mod connection;
mod slots;

pub use connection::{create_tables, ensure_schema};
pub use slots::SqliteSlots;
