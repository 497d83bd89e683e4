//! Core library surface for the Book List Manager TUI application.
//!
//! The `bin` target wires these pieces together; tests and other front-ends can
//! drive the same store and controller directly.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

/// Persistence bootstrap for the embedded SQLite slot table.
pub use db::{ensure_schema, SqliteSlots};

pub use config::Config;
pub use logging::init_logging;
pub use models::{Book, BookFields, BookId};
pub use store::{MemorySlots, SlotStore, Store, StoreError};

/// The interactive application entry point and state container.
pub use ui::{run_app, App, BookListController, TableView};
